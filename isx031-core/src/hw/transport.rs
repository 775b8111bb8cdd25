//! Register bus transport and wire codec
//!
//! Registers have a 2-byte big-endian address and a 1-4 byte big-endian
//! value. Values shorter than 4 bytes are right-aligned within the 4-byte
//! value convention: reads land in the tail of a 4-byte buffer, writes
//! shift the value up so its leading bytes go on the wire.

use tracing::trace;

use crate::constants::bus;
use crate::error::{Isx031Error, Result};

/// Two-wire bus primitive the register codec drives
///
/// Implementations report success only on full-length transfers; a short
/// transfer must surface as an error, never as a partial value.
pub trait RegisterBus: Send {
    /// Combined write-then-read transaction (address phase, then value phase)
    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<()>;

    /// Single write transaction
    fn send(&mut self, buf: &[u8]) -> Result<()>;
}

/// Read a register value of `len` bytes (1-4), big-endian
pub fn read_reg<B: RegisterBus>(bus: &mut B, reg: u16, len: u16) -> Result<u32> {
    if len == 0 || len > bus::MAX_VALUE_LEN {
        return Err(Isx031Error::InvalidLength { len });
    }

    let addr_buf = reg.to_be_bytes();
    let mut data_buf = [0u8; bus::MAX_VALUE_LEN as usize];
    let start = (bus::MAX_VALUE_LEN - len) as usize;

    bus.transfer(&addr_buf, &mut data_buf[start..])?;

    let val = u32::from_be_bytes(data_buf);
    trace!("read  0x{:04X} len {} -> 0x{:08X}", reg, len, val);
    Ok(val)
}

/// Write a register value of `len` bytes (1-4), big-endian
pub fn write_reg<B: RegisterBus>(bus: &mut B, reg: u16, len: u16, val: u32) -> Result<()> {
    if len == 0 || len > bus::MAX_VALUE_LEN {
        return Err(Isx031Error::InvalidLength { len });
    }

    let mut buf = [0u8; 6];
    buf[..2].copy_from_slice(&reg.to_be_bytes());
    let shifted = val << (8 * (bus::MAX_VALUE_LEN - len));
    buf[2..].copy_from_slice(&shifted.to_be_bytes());

    trace!("write 0x{:04X} len {} <- 0x{:08X}", reg, len, val);
    bus.send(&buf[..2 + len as usize])
}
