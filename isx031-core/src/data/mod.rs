//! Data types, register tables, and platform configuration
//!
//! Contains the compile-time register programs, the mode catalog, and the
//! host-supplied wiring configuration.

mod config;
mod tables;
mod types;
mod validation;

pub use config::{load_config, save_config, PlatformConfig};
pub use tables::{
    default_mode, DRIVE_MODES, FRAMESYNC_LIST, INIT_LIST, SUPPORTED_MODES,
};
pub use types::{
    DriveMode, FormatRequest, FrameDescEntry, FrameDescriptor, RegisterList, RegisterOp,
    ResolutionMode, SensorState,
};
pub use validation::{validate_i2c_address, validate_lane_count, validate_platform_config};
