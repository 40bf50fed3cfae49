//! Time base abstractions: tick sources, per-channel bit clocks and the
//! reaction stopwatch.
//!
//! The hardware offers one free-running counter. It is split into three
//! logical clocks that never share phase state:
//!
//! - a [`BitClock`] owned by the UART transmitter,
//! - a [`BitClock`] owned by the UART receiver,
//! - the [`Stopwatch`] owned by the button latch.
//!
//! Each bit clock only remembers its own next deadline, so scheduling one
//! channel can neither stall nor skew another.

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use crate::types::{ElapsedTicks, TimerTick};

/// A free-running counter.
pub trait TickSource {
    /// Current raw count.
    fn now(&self) -> TimerTick;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now(&self) -> TimerTick {
        (**self).now()
    }
}

/// Wrapping "has `now` reached `deadline`" test.
///
/// Valid as long as the two values are less than half the counter range
/// apart.
#[inline]
#[must_use]
pub const fn reached(now: TimerTick, deadline: TimerTick) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

/// Compare channel that fires every bit period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitClock {
    target: TimerTick,
    period: u32,
}

impl BitClock {
    #[must_use]
    pub const fn new(period: u32) -> Self {
        Self { target: 0, period }
    }

    /// Program the compare target and return it.
    #[inline]
    pub fn arm(&mut self, at: TimerTick) -> TimerTick {
        self.target = at;
        at
    }

    /// Move the target one period forward and return it.
    #[inline]
    pub fn advance(&mut self) -> TimerTick {
        self.target = self.target.wrapping_add(self.period);
        self.target
    }

    #[inline]
    #[must_use]
    pub const fn target(&self) -> TimerTick {
        self.target
    }

    #[inline]
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }
}

/// Reaction-time stopwatch.
///
/// Shared between the edge handler (which stops it) and the game loop
/// (which restarts it), so every field is atomic. Starting resets the count
/// to zero; stopping freezes it.
#[derive(Debug)]
pub struct Stopwatch {
    base: AtomicU32,
    frozen: AtomicU32,
    running: AtomicBool,
}

impl Stopwatch {
    /// A stopped stopwatch reading zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base: AtomicU32::new(0),
            frozen: AtomicU32::new(0),
            running: AtomicBool::new(false),
        }
    }

    /// Reset to zero and start counting from `now`.
    pub fn start(&self, now: TimerTick) {
        self.base.store(now, Ordering::Relaxed);
        self.frozen.store(0, Ordering::Relaxed);
        self.running.store(true, Ordering::Release);
    }

    /// Freeze the count and return the snapshot.
    ///
    /// Stopping an already stopped stopwatch returns the frozen value.
    pub fn stop(&self, now: TimerTick) -> ElapsedTicks {
        if self.running.swap(false, Ordering::AcqRel) {
            let elapsed = now.wrapping_sub(self.base.load(Ordering::Relaxed));
            self.frozen.store(elapsed, Ordering::Release);
            ElapsedTicks(elapsed)
        } else {
            ElapsedTicks(self.frozen.load(Ordering::Acquire))
        }
    }

    /// Current reading without stopping.
    #[must_use]
    pub fn elapsed(&self, now: TimerTick) -> ElapsedTicks {
        if self.running.load(Ordering::Acquire) {
            ElapsedTicks(now.wrapping_sub(self.base.load(Ordering::Relaxed)))
        } else {
            ElapsedTicks(self.frozen.load(Ordering::Acquire))
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
