//! Linux i2c-dev bus implementation
//!
//! Drives the sensor through /dev/i2c-N using I2C_RDWR transactions, so
//! the address write and value read of a register read happen in one bus
//! exchange. The kernel reports the number of messages that completed; a
//! short count is a failed transfer, never a partial value.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Isx031Error, Result};
use crate::hw::transport::RegisterBus;

const I2C_RDWR: libc::c_ulong = 0x0707;
const I2C_M_RD: u16 = 0x0001;

#[repr(C)]
struct I2cMsg {
    addr: u16,
    flags: u16,
    len: u16,
    buf: *mut u8,
}

#[repr(C)]
struct I2cRdwrIoctlData {
    msgs: *mut I2cMsg,
    nmsgs: u32,
}

/// Register bus over a Linux i2c character device
pub struct LinuxI2cBus {
    dev: File,
    path: PathBuf,
    address: u16,
}

impl LinuxI2cBus {
    /// Open the character device for the sensor at the given 7-bit address
    pub fn open(path: &Path, address: u16) -> Result<Self> {
        let dev = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| Isx031Error::BusOpen {
                path: path.to_path_buf(),
                source: e,
            })?;

        debug!("opened {} (sensor at 0x{:02X})", path.display(), address);
        Ok(Self {
            dev,
            path: path.to_path_buf(),
            address,
        })
    }

    fn rdwr(&mut self, msgs: &mut [I2cMsg]) -> Result<()> {
        let mut data = I2cRdwrIoctlData {
            msgs: msgs.as_mut_ptr(),
            nmsgs: msgs.len() as u32,
        };

        // SAFETY: msgs and the buffers they point at live for the whole
        // ioctl call; the kernel reads/writes only within the given lens.
        let ret = unsafe { libc::ioctl(self.dev.as_raw_fd(), I2C_RDWR, &mut data) };

        if ret < 0 {
            return Err(Isx031Error::bus_transfer(format!(
                "{}: {}",
                self.path.display(),
                io::Error::last_os_error()
            )));
        }
        if ret as usize != msgs.len() {
            return Err(Isx031Error::bus_transfer(format!(
                "{}: {}/{} messages completed",
                self.path.display(),
                ret,
                msgs.len()
            )));
        }
        Ok(())
    }
}

impl RegisterBus for LinuxI2cBus {
    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        let mut msgs = [
            I2cMsg {
                addr: self.address,
                flags: 0,
                len: write.len() as u16,
                buf: write.as_ptr() as *mut u8,
            },
            I2cMsg {
                addr: self.address,
                flags: I2C_M_RD,
                len: read.len() as u16,
                buf: read.as_mut_ptr(),
            },
        ];
        self.rdwr(&mut msgs)
    }

    fn send(&mut self, buf: &[u8]) -> Result<()> {
        let mut msgs = [I2cMsg {
            addr: self.address,
            flags: 0,
            len: buf.len() as u16,
            buf: buf.as_ptr() as *mut u8,
        }];
        self.rdwr(&mut msgs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_device() {
        let result = LinuxI2cBus::open(Path::new("/dev/i2c-does-not-exist"), 0x1A);
        assert!(matches!(result, Err(Isx031Error::BusOpen { .. })));
    }
}
