//! Core data types for the sensor control library
//!
//! Defines the register-list element type, the resolution mode catalog
//! entry, and the bus-observable sensor state.

use serde::Serialize;

use crate::constants::state;

/// A single operation in a register list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOp {
    /// Sleep for the given number of milliseconds before the next op
    Delay(u16),
    /// Write one byte to a register
    Write { address: u16, value: u8 },
}

/// Named, ordered sequence of register operations
///
/// Insertion order is the exact wire sequence; lists are applied front to
/// back and never reordered.
#[derive(Debug, Clone, Copy)]
pub struct RegisterList {
    pub name: &'static str,
    pub ops: &'static [RegisterOp],
}

/// A supported output resolution with its register program
#[derive(Debug)]
pub struct ResolutionMode {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Media bus pixel code
    pub code: u32,
    /// CSI-2 datatype ID
    pub datatype: u8,
    /// Frame rate
    pub fps: u32,
    /// Sensor register settings for this resolution
    pub reg_list: &'static RegisterList,
}

/// One row of the drive mode table
#[derive(Debug, Clone, Copy)]
pub struct DriveMode {
    pub lanes: u8,
    pub fps: u32,
    pub code: u8,
}

/// Bus-observable sensor state
///
/// Always read fresh from the state register before a transition
/// decision; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorState {
    /// Startup (standby) state
    Startup,
    /// Actively streaming
    Streaming,
    /// Any other device-reported code, treated as transient
    Unknown(u8),
}

impl SensorState {
    /// Map a raw state register value
    pub fn from_raw(raw: u32) -> Self {
        match raw as u8 {
            state::STARTUP => Self::Startup,
            state::STREAMING => Self::Streaming,
            other => Self::Unknown(other),
        }
    }
}

/// Format requested by the host when selecting a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatRequest {
    pub width: u32,
    pub height: u32,
    pub code: u32,
}

/// One stream entry of a frame descriptor
#[derive(Debug, Clone, Serialize)]
pub struct FrameDescEntry {
    pub stream: u32,
    pub pixel_code: u32,
    pub datatype: u8,
    /// CSI-2 virtual channel
    pub vc: u8,
}

/// Pixel output description for the active mode
#[derive(Debug, Clone, Serialize)]
pub struct FrameDescriptor {
    pub entries: Vec<FrameDescEntry>,
}
