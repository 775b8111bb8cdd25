//! Power-on sequencing over the reset line
//!
//! Models the physical RC power-up delay: the reset line is released and
//! polled until it reads back deasserted. Every register engine operation
//! on the resume path is gated on this.

use std::thread;

use tracing::{debug, warn};

use crate::constants::{retry, timing};
use crate::error::{Isx031Error, Result};
use crate::hw::gpio::ResetLine;

/// Release the reset line and wait for the sensor to power up
///
/// Succeeds on the first observed deasserted level; otherwise exhausts
/// POWER_ON_ATTEMPTS polls and reports a timeout.
pub fn power_on_and_wait(line: &mut dyn ResetLine) -> Result<()> {
    for attempt in 1..=retry::POWER_ON_ATTEMPTS {
        line.release_reset()?;
        thread::sleep(timing::POWER_ON_SETTLE);

        match line.is_asserted() {
            Ok(false) => {
                debug!("sensor powered on after {} poll(s)", attempt);
                return Ok(());
            }
            Ok(true) => {}
            Err(e) => warn!("reset line readback failed on poll {}: {}", attempt, e),
        }
    }

    Err(Isx031Error::PowerOnTimeout(format!(
        "reset line still asserted after {} polls",
        retry::POWER_ON_ATTEMPTS
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::gpio::MockResetLine;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_power_on_succeeds_on_final_poll() {
        let mut line = MockResetLine::new();
        line.expect_release_reset().times(10).returning(|| Ok(()));

        let polls = Arc::new(AtomicU32::new(0));
        let polls_in_mock = Arc::clone(&polls);
        line.expect_is_asserted().times(10).returning(move || {
            let n = polls_in_mock.fetch_add(1, Ordering::SeqCst);
            Ok(n < 9)
        });

        power_on_and_wait(&mut line).unwrap();
        assert_eq!(polls.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_power_on_times_out_when_line_stays_asserted() {
        let mut line = MockResetLine::new();
        line.expect_release_reset().times(10).returning(|| Ok(()));
        line.expect_is_asserted().times(10).returning(|| Ok(true));

        assert!(matches!(
            power_on_and_wait(&mut line),
            Err(Isx031Error::PowerOnTimeout(_))
        ));
    }

    #[test]
    fn test_power_on_first_poll_fast_path() {
        let mut line = MockResetLine::new();
        line.expect_release_reset().times(1).returning(|| Ok(()));
        line.expect_is_asserted().times(1).returning(|| Ok(false));

        power_on_and_wait(&mut line).unwrap();
    }
}
