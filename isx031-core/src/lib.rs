//! ISX031 image sensor control library
//!
//! Userspace control of the ISX031 image-sensor module over its two-wire
//! register bus: power-on, identification, configuration, streaming, and
//! suspend/resume.
//!
//! # Features
//!
//! - **Register engine**: big-endian register codec with bounded-retry
//!   policies for state polls and configuration writes
//! - **Mode catalog**: compile-time register programs for the supported
//!   resolutions, selected by host format requests
//! - **State machine**: the unlock/select/set transition sequence between
//!   startup and streaming, guarded by OTP identification
//! - **Session controller**: one mutex-serialized surface for stream
//!   enable/disable, format selection, suspend, and resume
//!
//! # Module Structure
//!
//! - `hw/` - Bus transport, retry policies, GPIO and power sequencing
//! - `data/` - Register tables, mode catalog, platform configuration
//! - `engine/` - Mode transition machine and the serialized session
//!
//! # Example
//!
//! ```no_run
//! use isx031_core::{AlwaysOn, LinuxI2cBus, NoControls, PlatformConfig, SessionController};
//!
//! let config = PlatformConfig::default();
//! let bus = LinuxI2cBus::open(&config.i2c_device, config.i2c_address).unwrap();
//! let sensor = SessionController::attach(
//!     bus,
//!     None,
//!     Box::new(AlwaysOn),
//!     Box::new(NoControls),
//!     config,
//! )
//! .unwrap();
//!
//! sensor.enable_streams().unwrap();
//! ```

// Grouped modules
pub mod data;
pub mod engine;
pub mod hw;

// Standalone modules
pub mod constants;
pub mod error;

// Re-export primary types from data/
pub use data::{
    DriveMode, FormatRequest, FrameDescEntry, FrameDescriptor, PlatformConfig, RegisterList,
    RegisterOp, ResolutionMode, SensorState,
};

// Re-export the static tables from data/
pub use data::{default_mode, DRIVE_MODES, FRAMESYNC_LIST, INIT_LIST, SUPPORTED_MODES};

// Re-export config and validation functions from data/
pub use data::{
    load_config, save_config, validate_i2c_address, validate_lane_count,
    validate_platform_config,
};

// Re-export error types
pub use error::{Isx031Error, Result};

// Re-export engine types
pub use engine::{
    find_drive_mode, identify, initialize, transit, AlwaysOn, HostControls, NoControls,
    RuntimePower, SessionController,
};

// Re-export hardware access from hw/
pub use hw::{
    apply_register_list, power_on_and_wait, read_reg, read_reg_poll, write_reg, write_reg_retry,
    RegisterBus, ResetLine, SysfsGpio,
};
#[cfg(target_os = "linux")]
pub use hw::LinuxI2cBus;
