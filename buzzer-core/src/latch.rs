//! Button latch: first-press arbitration and reaction-time capture.
//!
//! The latch keeps an armed set of inputs. Edges on inputs outside the set
//! are dropped before dispatch, which is what makes the first press final:
//! the moment a colour latches, every colour leaves the armed set and only
//! Start can open the next round.
//!
//! Everything is atomic so one `static` latch can be driven from the edge
//! handler and read from the game loop.

use portable_atomic::{AtomicU8, Ordering};

use crate::clock::Stopwatch;
use crate::input::InputError;
use crate::mailbox::EventMailbox;
use crate::types::{ButtonEvent, ButtonId, ElapsedTicks, InputSet, TimerTick};

/// Coarse latch state, derived from the armed set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LatchState {
    /// Every input is live.
    Armed,
    /// A colour won; only Start is live.
    Locked,
}

/// A press that won arbitration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Latched {
    /// Event posted to the mailbox.
    pub event: ButtonEvent,
    /// Lamp to light; every other lamp goes dark.
    pub indicator: ButtonId,
    /// Armed set after the latch.
    pub armed: InputSet,
}

/// Result of dispatching a batch of pending edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeOutcome {
    Latched(Latched),
    /// An event is still unacknowledged; the edges were discarded.
    Busy,
    /// No armed input was among the pending edges.
    Masked,
}

/// Interrupt-side state machine for the button bank.
#[derive(Debug)]
pub struct ButtonLatch {
    armed: AtomicU8,
    mailbox: EventMailbox,
    stopwatch: Stopwatch,
}

impl ButtonLatch {
    /// A latch with every input armed and the stopwatch stopped at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            armed: AtomicU8::new(InputSet::ALL.0),
            mailbox: EventMailbox::new(),
            stopwatch: Stopwatch::new(),
        }
    }

    #[must_use]
    pub fn armed(&self) -> InputSet {
        InputSet(self.armed.load(Ordering::Acquire))
    }

    #[must_use]
    pub fn state(&self) -> LatchState {
        if self.armed() == InputSet::ALL {
            LatchState::Armed
        } else {
            LatchState::Locked
        }
    }

    /// Dispatch the edges flagged in `pending`, observed at stopwatch time
    /// `now`.
    ///
    /// Called from the edge handler. Pending flags are consumed whatever the
    /// outcome; the caller clears them after this returns.
    pub fn on_edges(&self, pending: InputSet, now: TimerTick) -> EdgeOutcome {
        if self.mailbox.is_pending() {
            return EdgeOutcome::Busy;
        }

        let Some(button) = (pending & self.armed()).first_by_priority() else {
            return EdgeOutcome::Masked;
        };

        let elapsed = self.stopwatch.stop(now);
        let armed = match button {
            ButtonId::Start => InputSet::ALL,
            _ => InputSet::START,
        };
        self.armed.store(armed.raw(), Ordering::Release);

        let event = ButtonEvent::new(button, elapsed);
        // Single producer: nothing can have posted since the check above
        let _ = self.mailbox.try_post(event);

        EdgeOutcome::Latched(Latched {
            event,
            indicator: button,
            armed,
        })
    }

    /// Pending event, if any. See [`EventMailbox::try_receive`].
    pub fn try_receive(&self) -> Option<Result<ButtonEvent, InputError>> {
        self.mailbox.try_receive()
    }

    /// Zero the mailbox snapshot and release the latch for the next event.
    ///
    /// The stopwatch keeps its frozen reading: the next Start press takes
    /// it as the seed for the following hold-off.
    pub fn acknowledge(&self) {
        self.mailbox.acknowledge();
    }

    /// Put every input back in the armed set without posting an event.
    pub fn rearm(&self) {
        self.armed.store(InputSet::ALL.raw(), Ordering::Release);
    }

    /// Zero the stopwatch and open the reaction window at `now`.
    pub fn restart_stopwatch(&self, now: TimerTick) {
        self.stopwatch.start(now);
    }

    /// Current stopwatch reading.
    #[must_use]
    pub fn elapsed(&self, now: TimerTick) -> ElapsedTicks {
        self.stopwatch.elapsed(now)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.mailbox.is_pending()
    }
}

impl Default for ButtonLatch {
    fn default() -> Self {
        Self::new()
    }
}
