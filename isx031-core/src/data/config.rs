//! Platform configuration
//!
//! The facts the host platform supplies about how the sensor is wired:
//! lane count, frame sync source, bus location, and the reset line.
//! Persisted as JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::{bus, limits};
use crate::data::validation::validate_platform_config;
use crate::error::{Isx031Error, Result};

/// Wiring and bus description for one sensor module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Number of CSI-2 data lanes wired to the host (2 or 4)
    #[serde(default = "default_lanes")]
    pub lanes: u8,

    /// Frame sync is driven by a host interrupt line rather than by the
    /// frame sync register program
    #[serde(default)]
    pub fsin_interrupt_driven: bool,

    /// i2c character device the sensor answers on
    #[serde(default = "default_i2c_device")]
    pub i2c_device: PathBuf,

    /// 7-bit i2c address
    #[serde(default = "default_i2c_address")]
    pub i2c_address: u16,

    /// GPIO number of the active-low reset line, if wired
    #[serde(default)]
    pub reset_gpio: Option<u32>,

    /// Optional name suffix for multi-camera systems
    #[serde(default)]
    pub suffix: Option<String>,
}

fn default_lanes() -> u8 {
    4
}

fn default_i2c_device() -> PathBuf {
    PathBuf::from(bus::DEFAULT_DEVICE)
}

fn default_i2c_address() -> u16 {
    bus::DEFAULT_ADDRESS
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            lanes: default_lanes(),
            fsin_interrupt_driven: false,
            i2c_device: default_i2c_device(),
            i2c_address: default_i2c_address(),
            reset_gpio: None,
            suffix: None,
        }
    }
}

/// Load and validate a platform configuration from a JSON file
pub fn load_config(path: &Path) -> Result<PlatformConfig> {
    let metadata = fs::metadata(path).map_err(|e| Isx031Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    if metadata.len() > limits::MAX_CONFIG_SIZE {
        return Err(Isx031Error::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: limits::MAX_CONFIG_SIZE,
        });
    }

    let content = fs::read_to_string(path).map_err(|e| Isx031Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: PlatformConfig = serde_json::from_str(&content)?;
    validate_platform_config(&config)?;

    debug!("loaded platform config from {}", path.display());
    Ok(config)
}

/// Validate and save a platform configuration as pretty JSON
pub fn save_config(path: &Path, config: &PlatformConfig) -> Result<()> {
    validate_platform_config(config)?;

    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content).map_err(|e| Isx031Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!("saved platform config to {}", path.display());
    Ok(())
}
