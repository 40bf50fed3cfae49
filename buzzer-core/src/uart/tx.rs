//! Transmit half of the software UART.

use crate::clock::BitClock;
use crate::config::UartTiming;
use crate::types::TimerTick;

use super::UartError;

/// Bits in one 8N1 frame: start, eight data bits, stop.
pub const FRAME_BITS: u8 = 10;

/// Build the shift register for one byte.
///
/// Bit 0 is the start bit (space), bits 1-8 the data LSB-first and bit 9
/// the stop bit (mark).
#[inline]
#[must_use]
pub const fn encode_frame(byte: u8) -> u16 {
    ((byte as u16) | 0x100) << 1
}

/// What the transmit deadline handler must do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxStep {
    /// Drive the line to `level` now and fire again at `next`.
    Drive { level: bool, next: TimerTick },
    /// The stop bit has been held for a full period; the channel is idle.
    Complete,
}

/// Transmit state machine driven by one compare channel.
///
/// [`TxEngine::load`] arms the channel one bit period in the future; every
/// deadline after that shifts one frame bit onto the line. One extra
/// deadline after the stop bit releases the engine, so a following byte can
/// never cut the stop bit short.
#[derive(Clone, Debug)]
pub struct TxEngine {
    clock: BitClock,
    frame: u16,
    bits_left: u8,
    busy: bool,
}

impl TxEngine {
    #[must_use]
    pub const fn new(timing: UartTiming) -> Self {
        Self {
            clock: BitClock::new(timing.bit),
            frame: 0,
            bits_left: FRAME_BITS,
            busy: false,
        }
    }

    /// A frame is in flight; [`TxEngine::load`] would refuse.
    #[inline]
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Start transmitting `byte`, returning the first deadline.
    ///
    /// # Errors
    ///
    /// Returns [`UartError::Busy`] while the previous frame is still going
    /// out. Callers wait and retry.
    pub fn load(&mut self, byte: u8, now: TimerTick) -> Result<TimerTick, UartError> {
        if self.busy {
            return Err(UartError::Busy);
        }
        self.frame = encode_frame(byte);
        self.bits_left = FRAME_BITS;
        self.busy = true;
        Ok(self.clock.arm(now.wrapping_add(self.clock.period())))
    }

    /// Handle the compare deadline.
    pub fn on_deadline(&mut self) -> TxStep {
        if !self.busy {
            return TxStep::Complete;
        }

        let next = self.clock.advance();
        if self.bits_left == 0 {
            self.busy = false;
            self.bits_left = FRAME_BITS;
            return TxStep::Complete;
        }

        let level = self.frame & 0x01 != 0;
        self.frame >>= 1;
        self.bits_left -= 1;
        TxStep::Drive { level, next }
    }

    /// Next compare target.
    #[inline]
    #[must_use]
    pub const fn deadline(&self) -> TimerTick {
        self.clock.target()
    }
}
