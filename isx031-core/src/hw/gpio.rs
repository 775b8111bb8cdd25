//! Reset line access via sysfs GPIO
//!
//! The reset line is active low: an asserted line holds the sensor in
//! power-down. The line is owned by the session for the device's lifetime;
//! nothing else touches it.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Isx031Error, Result};

/// Physical reset line of the sensor module
#[cfg_attr(test, mockall::automock)]
pub trait ResetLine: Send {
    /// Drive the line into reset (sensor held in power-down)
    fn assert_reset(&mut self) -> Result<()>;

    /// Release the line (sensor powered)
    fn release_reset(&mut self) -> Result<()>;

    /// Read back the line level; true while reset is asserted
    fn is_asserted(&mut self) -> Result<bool>;
}

/// Reset line exported through /sys/class/gpio
pub struct SysfsGpio {
    value_path: PathBuf,
}

impl SysfsGpio {
    const GPIO_BASE: &'static str = "/sys/class/gpio";

    /// Export the pin and configure it as an output
    pub fn open(pin: u32) -> Result<Self> {
        let base = PathBuf::from(Self::GPIO_BASE);
        let pin_dir = base.join(format!("gpio{pin}"));

        if !pin_dir.exists() {
            let export = base.join("export");
            fs::write(&export, pin.to_string())
                .map_err(|e| Isx031Error::gpio(export, format!("export failed: {e}")))?;
        }

        let direction = pin_dir.join("direction");
        fs::write(&direction, "out")
            .map_err(|e| Isx031Error::gpio(direction, format!("direction failed: {e}")))?;

        debug!("reset gpio {} exported as output", pin);
        Ok(Self {
            value_path: pin_dir.join("value"),
        })
    }

    fn write_level(&self, level: u8) -> Result<()> {
        fs::write(&self.value_path, level.to_string())
            .map_err(|e| Isx031Error::gpio(self.value_path.clone(), format!("write failed: {e}")))
    }

    fn read_level(&self) -> Result<u8> {
        let content = fs::read_to_string(&self.value_path)
            .map_err(|e| Isx031Error::gpio(self.value_path.clone(), format!("read failed: {e}")))?;
        content.trim().parse::<u8>().map_err(|e| {
            Isx031Error::gpio(self.value_path.clone(), format!("parse '{}': {e}", content.trim()))
        })
    }
}

impl ResetLine for SysfsGpio {
    // Active-low wiring: line level 1 holds the sensor in reset
    fn assert_reset(&mut self) -> Result<()> {
        self.write_level(1)
    }

    fn release_reset(&mut self) -> Result<()> {
        self.write_level(0)
    }

    fn is_asserted(&mut self) -> Result<bool> {
        Ok(self.read_level()? != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gpio_in_tempdir() -> (tempfile::TempDir, SysfsGpio) {
        let dir = tempfile::tempdir().unwrap();
        let value_path = dir.path().join("value");
        fs::write(&value_path, "1\n").unwrap();
        (dir, SysfsGpio { value_path })
    }

    #[test]
    fn test_assert_and_release() {
        let (_dir, mut gpio) = gpio_in_tempdir();

        assert!(gpio.is_asserted().unwrap());

        gpio.release_reset().unwrap();
        assert!(!gpio.is_asserted().unwrap());

        gpio.assert_reset().unwrap();
        assert!(gpio.is_asserted().unwrap());
    }

    #[test]
    fn test_missing_value_file_is_gpio_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut gpio = SysfsGpio {
            value_path: dir.path().join("missing"),
        };
        assert!(matches!(
            gpio.is_asserted(),
            Err(Isx031Error::Gpio { .. })
        ));
    }
}
