//! Single-slot event mailbox between the edge handler and the game loop.
//!
//! Contract: the interrupt side posts at most one event, the foreground
//! side reads it (any number of times) and then acknowledges. Nothing new
//! can be posted until the acknowledgement.

use portable_atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::input::InputError;
use crate::types::{ButtonEvent, ButtonId, ElapsedTicks};

/// Lock-free single-producer/single-consumer event cell.
///
/// `pending` is the round semaphore. The payload fields are written before
/// it is raised and only read while it is up.
#[derive(Debug)]
pub struct EventMailbox {
    pending: AtomicBool,
    button: AtomicU8,
    elapsed: AtomicU32,
}

impl EventMailbox {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            button: AtomicU8::new(0),
            elapsed: AtomicU32::new(0),
        }
    }

    /// An event is waiting to be acknowledged.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Post an event from interrupt context.
    ///
    /// # Errors
    ///
    /// Hands the event back if one is already pending.
    pub fn try_post(&self, event: ButtonEvent) -> Result<(), ButtonEvent> {
        if self.is_pending() {
            return Err(event);
        }
        self.button.store(event.button as u8, Ordering::Relaxed);
        self.elapsed.store(event.elapsed.raw(), Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
        Ok(())
    }

    /// Read the pending event without consuming it.
    ///
    /// Returns `Some(Err(InputError::UnknownButton))` if the stored tag does
    /// not decode; the caller still has to acknowledge it.
    pub fn try_receive(&self) -> Option<Result<ButtonEvent, InputError>> {
        if !self.is_pending() {
            return None;
        }
        let raw = self.button.load(Ordering::Relaxed);
        let elapsed = ElapsedTicks(self.elapsed.load(Ordering::Relaxed));
        Some(
            ButtonId::from_u8(raw)
                .map(|button| ButtonEvent::new(button, elapsed))
                .ok_or(InputError::UnknownButton),
        )
    }

    /// Zero the stored snapshot and lower the semaphore.
    pub fn acknowledge(&self) {
        self.elapsed.store(0, Ordering::Relaxed);
        self.pending.store(false, Ordering::Release);
    }

    #[cfg(test)]
    pub(crate) fn force_raw(&self, raw: u8) {
        self.button.store(raw, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
    }
}

impl Default for EventMailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mailbox() {
        let mailbox = EventMailbox::new();
        assert!(!mailbox.is_pending());
        assert_eq!(mailbox.try_receive(), None);
    }

    #[test]
    fn test_post_receive_acknowledge() {
        let mailbox = EventMailbox::new();
        let event = ButtonEvent::new(ButtonId::Green, ElapsedTicks(321));
        assert_eq!(mailbox.try_post(event), Ok(()));
        assert!(mailbox.is_pending());

        // Reading does not consume
        assert_eq!(mailbox.try_receive(), Some(Ok(event)));
        assert_eq!(mailbox.try_receive(), Some(Ok(event)));

        mailbox.acknowledge();
        assert!(!mailbox.is_pending());
        assert_eq!(mailbox.try_receive(), None);
    }

    #[test]
    fn test_second_post_rejected_until_acknowledged() {
        let mailbox = EventMailbox::new();
        let first = ButtonEvent::new(ButtonId::Red, ElapsedTicks(10));
        let second = ButtonEvent::new(ButtonId::Blue, ElapsedTicks(11));

        mailbox.try_post(first).unwrap();
        assert_eq!(mailbox.try_post(second), Err(second));
        assert_eq!(mailbox.try_receive(), Some(Ok(first)));

        mailbox.acknowledge();
        assert_eq!(mailbox.try_post(second), Ok(()));
        assert_eq!(mailbox.try_receive(), Some(Ok(second)));
    }

    #[test]
    fn test_unknown_tag_reported() {
        let mailbox = EventMailbox::new();
        mailbox.force_raw(9);
        assert_eq!(mailbox.try_receive(), Some(Err(InputError::UnknownButton)));
        mailbox.acknowledge();
        assert!(!mailbox.is_pending());
    }
}
