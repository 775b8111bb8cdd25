//! Sensor mode engine
//!
//! The unlock -> select -> set -> poll sequence that moves the sensor
//! between startup and streaming, plus OTP identification and the
//! post-power-on initialization pass.

use tracing::{debug, error, info};

use crate::constants::{identity, mode, reg};
use crate::data::{SensorState, DRIVE_MODES, FRAMESYNC_LIST, INIT_LIST};
use crate::error::{Isx031Error, Result};
use crate::hw::{apply_register_list, read_reg_poll, write_reg, RegisterBus};

/// Look up the drive mode code for a lane count and frame rate
///
/// A missing entry means the platform wiring and the mode catalog
/// disagree; it is never defaulted.
pub fn find_drive_mode(lanes: u8, fps: u32) -> Result<u8> {
    DRIVE_MODES
        .iter()
        .find(|m| m.lanes == lanes && m.fps == fps)
        .map(|m| m.code)
        .ok_or(Isx031Error::DriveModeNotFound { lanes, fps })
}

/// Program the drive mode select register for the target configuration
fn set_drive_mode<B: RegisterBus>(bus: &mut B, lanes: u8, fps: u32) -> Result<()> {
    let code = find_drive_mode(lanes, fps)?;
    write_reg(bus, reg::MODE_SELECT, 1, code as u32)
}

/// Move the sensor between the startup and streaming states
///
/// Every write in this sequence is single shot: retrying a possibly
/// half-applied transition could corrupt sensor state, so any failure
/// surfaces immediately and nothing is undone.
pub fn transit<B: RegisterBus>(bus: &mut B, lanes: u8, fps: u32, target: SensorState) -> Result<()> {
    let set_value = match target {
        SensorState::Startup => mode::STANDBY,
        SensorState::Streaming => mode::STREAMING,
        SensorState::Unknown(code) => {
            return Err(Isx031Error::invalid_config(
                "target_state",
                format!("0x{code:02X} is not a reachable state"),
            ))
        }
    };

    let current = read_reg_poll(bus, reg::SENSOR_STATE).map_err(|e| {
        error!("failed to read sensor state: {}", e);
        e
    })?;

    set_drive_mode(bus, lanes, fps).map_err(|e| {
        error!("failed to set drive mode: {}", e);
        e
    })?;

    // The unlock token goes out fresh before every mode set
    write_reg(bus, reg::MODE_SET_LOCK, 1, mode::UNLOCK as u32).map_err(|e| {
        error!("failed to unlock mode: {}", e);
        e
    })?;

    write_reg(bus, reg::MODE_SET, 1, set_value as u32).map_err(|e| {
        error!(
            "failed to transit mode from 0x{:02X} to 0x{:02X}: {}",
            current, set_value, e
        );
        e
    })?;

    // The transition is not confirmed until this settle poll answers.
    // The state value itself is not compared against the target.
    read_reg_poll(bus, reg::SENSOR_STATE).map_err(|e| {
        error!("failed to read sensor state: {}", e);
        e
    })?;

    debug!("sensor transition to {:?} complete", target);
    Ok(())
}

/// Check the OTP module identity
///
/// Reads the two factory-burned type name fields and compares the
/// combined module ID against the expected family constant. A mismatch
/// means the device is absent or the wrong part - not retryable.
pub fn identify<B: RegisterBus>(bus: &mut B) -> Result<()> {
    let name_l = read_reg_poll(bus, reg::OTP_TYPE_NAME_L).map_err(|e| {
        error!("failed to read OTP NAME_L register: {}", e);
        e
    })?;
    let name_h = read_reg_poll(bus, reg::OTP_TYPE_NAME_H).map_err(|e| {
        error!("failed to read OTP NAME_H register: {}", e);
        e
    })?;

    let module_id = ((name_h as u16 & identity::TYPE_NAME_H_MASK) << 8) | (name_l as u16 & 0xFF);
    if module_id != identity::MODULE_ID {
        return Err(Isx031Error::ModuleMismatch {
            expected: identity::MODULE_ID,
            found: module_id,
        });
    }

    info!("module identity 0x{:04X} verified", module_id);
    Ok(())
}

/// Bring the sensor from an arbitrary post-power state to a configured
/// startup state
///
/// Reconfiguration is only safe from startup, so a sensor found streaming
/// is transitioned down first. The init list tolerates bus contention and
/// is applied with retry; the frame sync program is not.
pub fn initialize<B: RegisterBus>(
    bus: &mut B,
    lanes: u8,
    fps: u32,
    fsin_interrupt_driven: bool,
) -> Result<()> {
    let raw = read_reg_poll(bus, reg::SENSOR_STATE).map_err(|e| {
        error!("failed to read sensor state: {}", e);
        e
    })?;

    if SensorState::from_raw(raw) == SensorState::Streaming {
        transit(bus, lanes, fps, SensorState::Startup)?;
    }

    apply_register_list(bus, &INIT_LIST, true)?;

    if !fsin_interrupt_driven {
        apply_register_list(bus, &FRAMESYNC_LIST, false).map_err(|e| {
            error!("failed to set framesync: {}", e);
            e
        })?;
    }

    Ok(())
}
