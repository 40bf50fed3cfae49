//! Receive half of the software UART.

use crate::clock::BitClock;
use crate::config::UartTiming;
use crate::types::TimerTick;

/// Data bits sampled per frame.
pub const DATA_BITS: u8 = 8;

/// Channel mode of the receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxMode {
    /// Waiting for the falling edge of a start bit.
    Capture,
    /// Sampling data bits on compare deadlines.
    Compare,
}

/// What the receive deadline handler must do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxStep {
    /// Sample the line again at `next`.
    Sample { next: TimerTick },
    /// A full byte arrived; the channel is back in capture mode.
    Received(u8),
    /// Deadline fired while in capture mode; nothing to do.
    Idle,
}

/// Receive state machine driven by one capture/compare channel.
///
/// The start-bit edge is captured, then the channel switches to compare
/// mode with its first target in the middle of data bit 0. Samples are
/// shifted in from the top of a right-shifting accumulator, so after eight
/// samples the first bit received sits in bit 0.
#[derive(Clone, Debug)]
pub struct RxEngine {
    clock: BitClock,
    half_bit: u32,
    mode: RxMode,
    shift: u8,
    bits_left: u8,
}

impl RxEngine {
    #[must_use]
    pub const fn new(timing: UartTiming) -> Self {
        Self {
            clock: BitClock::new(timing.bit),
            half_bit: timing.half_bit,
            mode: RxMode::Capture,
            shift: 0,
            bits_left: DATA_BITS,
        }
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> RxMode {
        self.mode
    }

    /// Handle a captured falling edge at `at`.
    ///
    /// Returns the first sample deadline, or `None` when a frame is
    /// already being sampled (edges inside a frame are data, not starts).
    pub fn on_edge(&mut self, at: TimerTick) -> Option<TimerTick> {
        if self.mode != RxMode::Capture {
            return None;
        }
        self.mode = RxMode::Compare;
        self.shift = 0;
        self.bits_left = DATA_BITS;
        let mid_d0 = at
            .wrapping_add(self.clock.period())
            .wrapping_add(self.half_bit);
        Some(self.clock.arm(mid_d0))
    }

    /// Handle a compare deadline with the sampled line `level`.
    pub fn on_deadline(&mut self, level: bool) -> RxStep {
        if self.mode != RxMode::Compare {
            return RxStep::Idle;
        }

        let next = self.clock.advance();
        self.shift >>= 1;
        if level {
            self.shift |= 0x80;
        }
        self.bits_left -= 1;

        if self.bits_left == 0 {
            self.bits_left = DATA_BITS;
            self.mode = RxMode::Capture;
            RxStep::Received(self.shift)
        } else {
            RxStep::Sample { next }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMING: UartTiming = UartTiming::REFERENCE;

    fn feed(rx: &mut RxEngine, bits: [bool; 8]) -> RxStep {
        let mut step = RxStep::Idle;
        for bit in bits {
            step = rx.on_deadline(bit);
        }
        step
    }

    #[test]
    fn test_first_sample_mid_data_bit_zero() {
        let mut rx = RxEngine::new(TIMING);
        assert_eq!(rx.on_edge(1000), Some(1000 + 104 + 52));
        assert_eq!(rx.mode(), RxMode::Compare);
    }

    #[test]
    fn test_samples_step_by_bit_period() {
        let mut rx = RxEngine::new(TIMING);
        let first = rx.on_edge(0).unwrap();
        assert_eq!(rx.on_deadline(true), RxStep::Sample { next: first + 104 });
        assert_eq!(rx.on_deadline(true), RxStep::Sample { next: first + 208 });
    }

    #[test]
    fn test_assembles_lsb_first() {
        let mut rx = RxEngine::new(TIMING);
        rx.on_edge(0);
        // 0x41 = 'A': d0=1, d6=1
        let step = feed(
            &mut rx,
            [true, false, false, false, false, false, true, false],
        );
        assert_eq!(step, RxStep::Received(0x41));
        assert_eq!(rx.mode(), RxMode::Capture);
    }

    #[test]
    fn test_edges_ignored_while_sampling() {
        let mut rx = RxEngine::new(TIMING);
        rx.on_edge(0);
        rx.on_deadline(false);
        assert_eq!(rx.on_edge(400), None);
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut rx = RxEngine::new(TIMING);
        rx.on_edge(0);
        assert_eq!(feed(&mut rx, [true; 8]), RxStep::Received(0xFF));
        rx.on_edge(2000);
        assert_eq!(feed(&mut rx, [false; 8]), RxStep::Received(0x00));
    }

    #[test]
    fn test_deadline_in_capture_mode_is_idle() {
        let mut rx = RxEngine::new(TIMING);
        assert_eq!(rx.on_deadline(false), RxStep::Idle);
    }
}
