//! Retrying register access policies
//!
//! Two fixed-count retry policies cover the tolerant paths: state and OTP
//! reads poll until the sensor answers, configuration-list writes ride out
//! transient bus contention. Mode transition writes never come through
//! here; a possibly half-applied transition must fail loudly, so those
//! stay single shot.

use std::thread;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::constants::{retry, timing};
use crate::data::{RegisterList, RegisterOp};
use crate::error::Result;
use crate::hw::transport::{read_reg, write_reg, RegisterBus};

/// Poll a 1-byte register until it reads back, up to READ_ATTEMPTS times
///
/// Used for sensor-state and OTP identity reads. Returns the first
/// successful value, or the last error once attempts are exhausted.
pub fn read_reg_poll<B: RegisterBus>(bus: &mut B, address: u16) -> Result<u32> {
    let mut result = read_reg(bus, address, 1);
    for _ in 1..retry::READ_ATTEMPTS {
        if result.is_ok() {
            return result;
        }
        thread::sleep(timing::READ_POLL_INTERVAL);
        result = read_reg(bus, address, 1);
    }

    if result.is_err() {
        warn!(
            "register 0x{:04X} did not answer after {} read attempts",
            address,
            retry::READ_ATTEMPTS
        );
    }
    result
}

/// Write a register, retrying transient failures up to WRITE_ATTEMPTS times
pub fn write_reg_retry<B: RegisterBus>(bus: &mut B, address: u16, len: u16, val: u32) -> Result<()> {
    let mut result = write_reg(bus, address, len, val);
    for _ in 1..retry::WRITE_ATTEMPTS {
        if result.is_ok() {
            return result;
        }
        thread::sleep(timing::WRITE_RETRY_INTERVAL);
        result = write_reg(bus, address, len, val);
    }

    if result.is_err() {
        warn!(
            "register 0x{:04X} write failed after {} attempts",
            address,
            retry::WRITE_ATTEMPTS
        );
    }
    result
}

/// Apply a register list strictly in order
///
/// A Delay op sleeps and continues; the first failing write aborts the
/// list and returns its error. Registers already written stay written -
/// lists are idempotent prefixes of a larger configuration, so there is
/// nothing to roll back.
pub fn apply_register_list<B: RegisterBus>(
    bus: &mut B,
    list: &RegisterList,
    use_retry: bool,
) -> Result<()> {
    debug!(
        "applying register list '{}' ({} ops, retry={})",
        list.name,
        list.ops.len(),
        use_retry
    );

    for op in list.ops {
        match *op {
            RegisterOp::Delay(ms) => thread::sleep(Duration::from_millis(ms as u64)),
            RegisterOp::Write { address, value } => {
                let result = if use_retry {
                    write_reg_retry(bus, address, 1, value as u32)
                } else {
                    write_reg(bus, address, 1, value as u32)
                };

                if let Err(e) = result {
                    error!(
                        "write reg failed (addr=0x{:04X}, list='{}'): {}",
                        address, list.name, e
                    );
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
