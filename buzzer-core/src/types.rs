//! Core data types: timer ticks, stopwatch snapshots and button events.

pub use buzzer_proto::{ButtonId, InputSet};

/// Raw counter value of a tick source.
///
/// Wraps at `u32::MAX`; every comparison and offset must use wrapping
/// arithmetic.
pub type TimerTick = u32;

/// Stopwatch snapshot taken when an input latches.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElapsedTicks(pub u32);

impl ElapsedTicks {
    pub const ZERO: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// One latched button press, handed from the latch to the game loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    /// Input that won arbitration.
    pub button: ButtonId,
    /// Stopwatch value at the moment of the winning edge.
    pub elapsed: ElapsedTicks,
}

impl ButtonEvent {
    #[must_use]
    pub const fn new(button: ButtonId, elapsed: ElapsedTicks) -> Self {
        Self { button, elapsed }
    }
}
