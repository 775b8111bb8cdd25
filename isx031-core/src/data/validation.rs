//! Platform configuration validation
//!
//! Small focused validators; each returns an InvalidConfig error naming
//! the offending field.

use crate::data::config::PlatformConfig;
use crate::error::{Isx031Error, Result};

/// Validate the CSI-2 lane count (the sensor supports 2 or 4 lanes)
pub fn validate_lane_count(lanes: u8) -> Result<()> {
    if lanes == 2 || lanes == 4 {
        Ok(())
    } else {
        Err(Isx031Error::invalid_config(
            "lanes",
            format!("{lanes} (only 2 or 4 data lanes are supported)"),
        ))
    }
}

/// Validate a 7-bit i2c address (reserved ranges excluded)
pub fn validate_i2c_address(address: u16) -> Result<()> {
    if (0x08..=0x77).contains(&address) {
        Ok(())
    } else {
        Err(Isx031Error::invalid_config(
            "i2c_address",
            format!("0x{address:02X} (must be a 7-bit address in 0x08-0x77)"),
        ))
    }
}

/// Validate a complete platform configuration
pub fn validate_platform_config(config: &PlatformConfig) -> Result<()> {
    validate_lane_count(config.lanes)?;
    validate_i2c_address(config.i2c_address)?;
    Ok(())
}
