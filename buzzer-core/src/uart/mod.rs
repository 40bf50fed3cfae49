//! Full-duplex software UART built from two timer compare channels.
//!
//! Both halves are plain state machines: the board calls them from its
//! deadline and edge handlers and applies what they return (drive a level,
//! schedule the next deadline, publish a byte). Neither half touches the
//! other's clock.
//!
//! # Frame format
//!
//! 8 data bits, no parity, 1 stop bit, idle-high, LSB first.
//!
//! ```text
//! idle ‾‾‾‾|_start_|d0|d1|d2|d3|d4|d5|d6|d7|‾stop‾|‾‾‾ idle
//! ```
//!
//! # Timing
//!
//! The bit period and half-bit period come from [`UartTiming`]. The
//! receiver samples each data bit half a period after its leading edge.
//!
//! [`UartTiming`]: crate::config::UartTiming

mod rx;
mod slot;
mod tx;

pub use rx::{RxEngine, RxMode, RxStep, DATA_BITS};
pub use slot::RxSlot;
pub use tx::{encode_frame, TxEngine, TxStep, FRAME_BITS};

/// Error type for UART operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// A frame is still being transmitted.
    Busy,
}

impl core::fmt::Display for UartError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Busy => write!(f, "transmitter busy"),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use super::*;
    use crate::config::UartTiming;
    use crate::types::TimerTick;

    const TIMING: UartTiming = UartTiming::REFERENCE;

    /// Recorded serial line: idle high until the first transition.
    #[derive(Default)]
    struct Line {
        transitions: Vec<(TimerTick, bool)>,
    }

    impl Line {
        fn drive(&mut self, at: TimerTick, level: bool) {
            self.transitions.push((at, level));
        }

        fn level_at(&self, t: TimerTick) -> bool {
            self.transitions
                .iter()
                .take_while(|(at, _)| *at <= t)
                .last()
                .map_or(true, |&(_, level)| level)
        }

        fn falling_edges(&self) -> impl Iterator<Item = TimerTick> + '_ {
            let mut prev = true;
            self.transitions.iter().filter_map(move |&(at, level)| {
                let edge = prev && !level;
                prev = level;
                edge.then_some(at)
            })
        }
    }

    /// Run the transmitter over `bytes`, returning the line and the first
    /// deadline of every frame.
    fn transmit(bytes: &[u8], start: TimerTick, gap: u32) -> (Line, Vec<TimerTick>) {
        let mut tx = TxEngine::new(TIMING);
        let mut line = Line::default();
        let mut firsts = Vec::new();
        let mut now = start;

        for &byte in bytes {
            let first = tx.load(byte, now).unwrap();
            firsts.push(first);
            loop {
                let at = tx.deadline();
                match tx.on_deadline() {
                    TxStep::Drive { level, .. } => line.drive(at, level),
                    TxStep::Complete => {
                        now = at + gap;
                        break;
                    }
                }
            }
        }
        (line, firsts)
    }

    /// Feed a recorded line through the receiver.
    fn receive(line: &Line) -> Vec<u8> {
        let mut rx = RxEngine::new(TIMING);
        let mut out = Vec::new();
        let mut busy_until: TimerTick = 0;

        for edge in line.falling_edges() {
            if edge < busy_until {
                continue;
            }
            let Some(mut deadline) = rx.on_edge(edge) else {
                continue;
            };
            loop {
                match rx.on_deadline(line.level_at(deadline)) {
                    RxStep::Sample { next } => deadline = next,
                    RxStep::Received(byte) => {
                        out.push(byte);
                        break;
                    }
                    RxStep::Idle => break,
                }
            }
            busy_until = deadline;
        }
        out
    }

    #[test]
    fn test_every_byte_samples_correctly_mid_bit() {
        for byte in 0..=255u8 {
            let (line, firsts) = transmit(&[byte], 10_000, 0);
            let first = firsts[0];
            let sample = |slot: u32| line.level_at(first + slot * TIMING.bit + TIMING.half_bit);

            assert!(!sample(0), "start bit of {byte:#04x}");
            for bit in 0..8 {
                let expected = (byte >> bit) & 1 != 0;
                assert_eq!(sample(1 + bit), expected, "bit {bit} of {byte:#04x}");
            }
            assert!(sample(9), "stop bit of {byte:#04x}");
        }
    }

    #[test]
    fn test_stop_bit_lasts_full_period_before_next_start() {
        let (line, firsts) = transmit(&[0x00, 0x00], 0, 0);
        let stop_start = firsts[0] + 9 * TIMING.bit;
        let next_start_bit = firsts[1];
        assert!(next_start_bit >= stop_start + 2 * TIMING.bit);
        assert!(line.level_at(stop_start + TIMING.bit - 1));
    }

    #[test]
    fn test_string_round_trip() {
        let message = b"Go...!_\r999_ms_R*";
        let (line, _) = transmit(message, 0, 0);
        assert_eq!(receive(&line), message);
    }

    #[test]
    fn test_round_trip_all_bytes_with_idle_gaps() {
        let message: Vec<u8> = (0..=255u8).collect();
        let (line, _) = transmit(&message, 1_000, 37);
        assert_eq!(receive(&line), message);
    }
}
