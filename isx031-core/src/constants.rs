//! Constants for the ISX031 sensor control library
//!
//! Centralizes register addresses, magic values, retry policies, and timing.
//! This is the SINGLE SOURCE OF TRUTH for these values.
//! Never use magic numbers in other files - add them here first.

use std::time::Duration;

/// Register map addresses
pub mod reg {
    /// Sensor state register (reports the running state)
    pub const SENSOR_STATE: u16 = 0x6005;

    /// Drive mode select register
    pub const MODE_SELECT: u16 = 0x8A00;

    /// Mode set register (standby / streaming)
    pub const MODE_SET: u16 = 0x8A01;

    /// Mode set lock register; must receive the unlock token before every
    /// write to MODE_SET
    pub const MODE_SET_LOCK: u16 = 0xBEF0;

    /// OTP type name, low byte
    pub const OTP_TYPE_NAME_L: u16 = 0x7E8A;

    /// OTP type name, high byte
    pub const OTP_TYPE_NAME_H: u16 = 0x7E8B;
}

/// Mode set and drive mode select values
pub mod mode {
    /// MODE_SET value for standby
    pub const STANDBY: u8 = 0x00;

    /// MODE_SET value for streaming
    pub const STREAMING: u8 = 0x80;

    /// Unlock token for MODE_SET_LOCK; sent fresh before each mode set,
    /// never cached
    pub const UNLOCK: u8 = 0x53;

    /// Drive mode code for 4 lanes at 60 fps
    pub const DRIVE_4LANES_60FPS: u8 = 0x01;

    /// Drive mode code for 4 lanes at 30 fps
    pub const DRIVE_4LANES_30FPS: u8 = 0x17;

    /// Drive mode code for 2 lanes at 30 fps
    pub const DRIVE_2LANES_30FPS: u8 = 0x18;
}

/// Sensor state register codes
pub mod state {
    /// Sensor is in the startup (standby) state
    pub const STARTUP: u8 = 0x02;

    /// Sensor is streaming
    pub const STREAMING: u8 = 0x05;
}

/// OTP module identity
pub mod identity {
    /// Valid bits of the OTP type name high byte
    pub const TYPE_NAME_H_MASK: u16 = 0x0F;

    /// Expected module ID for the ISX031 family
    pub const MODULE_ID: u16 = 0x031;
}

/// Retry policies for register access and power sequencing
///
/// Fixed-count polling with a constant inter-attempt delay; there is no
/// exponential backoff anywhere in the driver.
pub mod retry {
    /// Attempts for sensor-state and OTP reads
    pub const READ_ATTEMPTS: u32 = 50;

    /// Attempts for tolerant configuration writes
    pub const WRITE_ATTEMPTS: u32 = 100;

    /// Attempts for the power-on reset-line poll
    pub const POWER_ON_ATTEMPTS: u32 = 10;
}

/// Timing constants for register polling and power sequencing
pub mod timing {
    use super::*;

    /// Nominal delay between state/OTP read attempts
    pub const READ_POLL_INTERVAL: Duration = Duration::from_millis(10);

    /// Delay between tolerant write attempts
    pub const WRITE_RETRY_INTERVAL: Duration = Duration::from_millis(20);

    /// Settle time after releasing the reset line
    pub const POWER_ON_SETTLE: Duration = Duration::from_millis(200);
}

/// Bus location and wire format
pub mod bus {
    /// Default i2c character device
    pub const DEFAULT_DEVICE: &str = "/dev/i2c-0";

    /// Default 7-bit i2c address of the sensor
    pub const DEFAULT_ADDRESS: u16 = 0x1A;

    /// Maximum register value width in bytes
    pub const MAX_VALUE_LEN: u16 = 4;
}

/// CSI-2 link reporting
pub mod link {
    /// Fixed link frequency reported to the host (Hz)
    pub const FREQUENCY_HZ: u64 = 300_000_000;

    /// Media bus pixel code for UYVY 8-bit 1X16
    pub const PIXEL_CODE_UYVY8: u32 = 0x2006;

    /// CSI-2 datatype ID for YUV422 8-bit
    pub const DATATYPE_YUV422_8B: u8 = 0x1E;
}

/// File size limits for configuration parsing
pub mod limits {
    /// Maximum platform config file size (64 KiB)
    pub const MAX_CONFIG_SIZE: u64 = 64 * 1024;
}
