//! Bounded line waits
//!
//! Both protocols spend most of their time waiting for the other side to
//! move a line. These helpers poll once per microsecond and give up after
//! the deadline, so a missing or stuck device can never hang the caller.

use embedded_hal::delay::DelayNs;
use hygro_hal::{InputPin, Level};

/// Poll interval of the bounded waits (µs)
pub const POLL_INTERVAL_US: u32 = 1;

/// A bounded wait ran past its deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Expired {
    /// Time spent polling before giving up (µs)
    pub waited_us: u32,
}

/// Wait while `pin` reads `level`
///
/// Returns the time spent waiting in microseconds, or [`Expired`] if the
/// line still reads `level` after `timeout_us`. Time is counted in poll
/// intervals rather than read from a clock, so the bound holds for any
/// `DelayNs` implementation.
pub fn wait_while<P, D>(pin: &P, delay: &mut D, level: Level, timeout_us: u32) -> Result<u32, Expired>
where
    P: InputPin,
    D: DelayNs,
{
    let mut waited_us = 0;

    while pin.level() == level {
        if waited_us >= timeout_us {
            return Err(Expired { waited_us });
        }
        delay.delay_us(POLL_INTERVAL_US);
        waited_us += POLL_INTERVAL_US;
    }

    Ok(waited_us)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Clock, SimDelay};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Line that goes low once the clock passes `falls_at_ns`
    struct FallingLine {
        clock: Clock,
        falls_at_ns: u64,
    }

    impl InputPin for FallingLine {
        fn is_high(&self) -> bool {
            self.clock.get() < self.falls_at_ns
        }
    }

    #[test]
    fn test_returns_immediately_when_level_differs() {
        let clock: Clock = Rc::new(Cell::new(0));
        let line = FallingLine {
            clock: clock.clone(),
            falls_at_ns: 0,
        };
        let mut delay = SimDelay::new(clock.clone());

        assert_eq!(wait_while(&line, &mut delay, Level::High, 10), Ok(0));
        assert_eq!(clock.get(), 0);
    }

    #[test]
    fn test_waits_for_edge() {
        let clock: Clock = Rc::new(Cell::new(0));
        let line = FallingLine {
            clock: clock.clone(),
            falls_at_ns: 25_000,
        };
        let mut delay = SimDelay::new(clock.clone());

        assert_eq!(wait_while(&line, &mut delay, Level::High, 100), Ok(25));
    }

    #[test]
    fn test_deadline_expires() {
        let clock: Clock = Rc::new(Cell::new(0));
        let line = FallingLine {
            clock: clock.clone(),
            falls_at_ns: u64::MAX,
        };
        let mut delay = SimDelay::new(clock.clone());

        assert_eq!(
            wait_while(&line, &mut delay, Level::High, 50),
            Err(Expired { waited_us: 50 })
        );
        assert_eq!(clock.get(), 50_000);
    }
}
