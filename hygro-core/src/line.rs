//! Single-wire protocol phases and line ownership
//!
//! One sensor exchange is a single linear pass through the phases below.
//! No phase is re-entered within an exchange; the driver returns to
//! `Idle` once the exchange completes or fails.

use crate::reading::READING_BYTES;

/// Who currently determines the level of the sensor line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineOwner {
    /// The station drives the line low (request pulse)
    HeldLowByDriver,
    /// Nobody drives the line; the pull-up holds it high
    Released,
    /// The sensor pulls the line low or lets it float high
    DrivenBySensor,
}

/// The three sequential waits of the sensor handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeStep {
    /// Line still floating high after release; sensor has not answered
    AwaitLow,
    /// Sensor acknowledgment pulse (line low)
    AckPulse,
    /// Sensor ready pulse (line high) before the first bit
    ReadyPulse,
}

impl HandshakeStep {
    /// Next handshake step, or `None` after the ready pulse
    pub fn next(self) -> Option<Self> {
        match self {
            HandshakeStep::AwaitLow => Some(HandshakeStep::AckPulse),
            HandshakeStep::AckPulse => Some(HandshakeStep::ReadyPulse),
            HandshakeStep::ReadyPulse => None,
        }
    }
}

/// Protocol phase of one sensor exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Line released, no exchange in progress
    #[default]
    Idle,
    /// Request pulse: line held low for the start window
    Requesting,
    /// Waiting through the handshake
    AwaitingResponse(HandshakeStep),
    /// Sampling payload bit `bit` (0 = MSB) of byte `byte`
    ReceivingBit { byte: u8, bit: u8 },
    /// All 40 bits sampled
    Done,
}

impl Phase {
    /// Phase after the request pulse has been released
    pub const fn handshake() -> Self {
        Phase::AwaitingResponse(HandshakeStep::AwaitLow)
    }

    /// First payload bit
    pub const fn first_bit() -> Self {
        Phase::ReceivingBit { byte: 0, bit: 0 }
    }

    /// Advance to the next phase of the linear pass
    ///
    /// `Done` and `Idle` are terminal for a pass and map to themselves.
    pub fn next(self) -> Self {
        match self {
            Phase::Idle => Phase::Requesting,
            Phase::Requesting => Phase::handshake(),
            Phase::AwaitingResponse(step) => match step.next() {
                Some(step) => Phase::AwaitingResponse(step),
                None => Phase::first_bit(),
            },
            Phase::ReceivingBit { byte, bit } => {
                if bit < 7 {
                    Phase::ReceivingBit { byte, bit: bit + 1 }
                } else if (byte as usize) < READING_BYTES - 1 {
                    Phase::ReceivingBit {
                        byte: byte + 1,
                        bit: 0,
                    }
                } else {
                    Phase::Done
                }
            }
            Phase::Done => Phase::Done,
        }
    }

    /// Which side owns the line during this phase
    pub fn line_owner(self) -> LineOwner {
        match self {
            Phase::Idle | Phase::Done => LineOwner::Released,
            Phase::Requesting => LineOwner::HeldLowByDriver,
            Phase::AwaitingResponse(_) | Phase::ReceivingBit { .. } => LineOwner::DrivenBySensor,
        }
    }

    /// Zero-based index of the payload bit, if receiving
    pub fn bit_index(self) -> Option<usize> {
        match self {
            Phase::ReceivingBit { byte, bit } => Some(byte as usize * 8 + bit as usize),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::READING_BITS;

    #[test]
    fn test_linear_pass() {
        let mut phase = Phase::Idle;
        phase = phase.next();
        assert_eq!(phase, Phase::Requesting);
        assert_eq!(phase.line_owner(), LineOwner::HeldLowByDriver);

        phase = phase.next();
        assert_eq!(phase, Phase::AwaitingResponse(HandshakeStep::AwaitLow));
        phase = phase.next();
        assert_eq!(phase, Phase::AwaitingResponse(HandshakeStep::AckPulse));
        phase = phase.next();
        assert_eq!(phase, Phase::AwaitingResponse(HandshakeStep::ReadyPulse));
        assert_eq!(phase.line_owner(), LineOwner::DrivenBySensor);

        phase = phase.next();
        assert_eq!(phase, Phase::first_bit());

        let mut bits = 0;
        while let Some(index) = phase.bit_index() {
            assert_eq!(index, bits);
            bits += 1;
            phase = phase.next();
        }
        assert_eq!(bits, READING_BITS);
        assert_eq!(phase, Phase::Done);
        assert_eq!(phase.next(), Phase::Done);
        assert_eq!(phase.line_owner(), LineOwner::Released);
    }

    #[test]
    fn test_byte_boundary() {
        assert_eq!(
            Phase::ReceivingBit { byte: 1, bit: 7 }.next(),
            Phase::ReceivingBit { byte: 2, bit: 0 }
        );
        assert_eq!(Phase::ReceivingBit { byte: 4, bit: 7 }.next(), Phase::Done);
    }
}
