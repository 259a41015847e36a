//! GPIO pin abstractions
//!
//! Provides traits for digital lines that can be implemented by
//! chip-specific HALs or by host-side simulations.

/// Logic level of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Check if this is the high level
    pub fn is_high(self) -> bool {
        self == Level::High
    }

    /// Check if this is the low level
    pub fn is_low(self) -> bool {
        self == Level::Low
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Line direction for bidirectional pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Line is sampled; the output driver is disabled and the pull-up wins
    /// unless another device pulls the line low
    Input,
    /// Line is driven by this side
    Output,
}

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific level
    fn set_level(&mut self, level: Level) {
        match level {
            Level::High => self.set_high(),
            Level::Low => self.set_low(),
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }

    /// Sample the current line level
    fn level(&self) -> Level {
        Level::from(self.is_high())
    }
}

/// Bidirectional line
///
/// Used for open-drain style signalling: the owning side either drives the
/// line (`Direction::Output`) or releases it to the pull-up and samples
/// (`Direction::Input`). On open-drain capable hardware `set_high` may
/// itself release the line; callers still switch direction explicitly at
/// every ownership handoff.
pub trait FlexPin: OutputPin + InputPin {
    /// Switch the line between driving and sampling
    fn set_direction(&mut self, direction: Direction);

    /// Release the line: stop driving it and let the pull-up take it high
    ///
    /// The output is disabled before the latch is raised, so the pad never
    /// drives high against another device holding the line low.
    fn release(&mut self) {
        self.set_direction(Direction::Input);
        self.set_high();
    }

    /// Take ownership of the line and drive it to `level`
    fn drive(&mut self, level: Level) {
        self.set_level(level);
        self.set_direction(Direction::Output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line {
        driven: bool,
        out: bool,
        direction: Direction,
    }

    impl OutputPin for Line {
        fn set_high(&mut self) {
            self.out = true;
        }

        fn set_low(&mut self) {
            self.out = false;
        }

        fn is_set_high(&self) -> bool {
            self.out
        }
    }

    impl InputPin for Line {
        fn is_high(&self) -> bool {
            // Pull-up: released line reads high
            !self.driven || self.out
        }
    }

    impl FlexPin for Line {
        fn set_direction(&mut self, direction: Direction) {
            self.direction = direction;
            self.driven = direction == Direction::Output;
        }
    }

    #[test]
    fn test_level_conversions() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert_eq!(!Level::High, Level::Low);
        assert!(Level::High.is_high());
        assert!(Level::Low.is_low());
    }

    #[test]
    fn test_drive_and_release() {
        let mut line = Line {
            driven: false,
            out: true,
            direction: Direction::Input,
        };

        line.drive(Level::Low);
        assert_eq!(line.direction, Direction::Output);
        assert_eq!(line.level(), Level::Low);

        line.release();
        assert_eq!(line.direction, Direction::Input);
        assert_eq!(line.level(), Level::High);
    }

    /// Line that records every latch change made while driving
    struct Recorder {
        direction: Direction,
        driven_high: u32,
    }

    impl OutputPin for Recorder {
        fn set_high(&mut self) {
            if self.direction == Direction::Output {
                self.driven_high += 1;
            }
        }

        fn set_low(&mut self) {}

        fn is_set_high(&self) -> bool {
            false
        }
    }

    impl InputPin for Recorder {
        fn is_high(&self) -> bool {
            true
        }
    }

    impl FlexPin for Recorder {
        fn set_direction(&mut self, direction: Direction) {
            self.direction = direction;
        }
    }

    #[test]
    fn test_release_never_drives_high() {
        let mut line = Recorder {
            direction: Direction::Output,
            driven_high: 0,
        };

        line.release();
        assert_eq!(line.direction, Direction::Input);
        assert_eq!(line.driven_high, 0);

        line.drive(Level::Low);
        line.release();
        assert_eq!(line.driven_high, 0);
    }

    #[test]
    fn test_set_level_default() {
        let mut line = Line {
            driven: true,
            out: false,
            direction: Direction::Output,
        };

        line.set_level(Level::High);
        assert!(line.is_set_high());
        line.set_level(Level::Low);
        assert!(!line.is_set_high());
        assert!(line.is_low());
    }
}
