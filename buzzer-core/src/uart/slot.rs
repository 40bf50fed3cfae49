//! Single-byte mailbox between the receive handler and the foreground.

use portable_atomic::{AtomicU16, Ordering};

/// Flag bit marking the slot as holding an unread byte.
const FULL: u16 = 0x100;

/// One-byte receive buffer with overwrite-on-overrun semantics.
///
/// The receive handler publishes, the foreground takes. There is no
/// overrun protection: a byte published before the previous one was taken
/// replaces it.
#[derive(Debug)]
pub struct RxSlot(AtomicU16);

impl RxSlot {
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU16::new(0))
    }

    /// Store `byte`, returning `true` if an unread byte was overwritten.
    pub fn publish(&self, byte: u8) -> bool {
        let prev = self.0.swap(FULL | u16::from(byte), Ordering::AcqRel);
        prev & FULL != 0
    }

    /// Remove and return the stored byte, if any.
    pub fn take(&self) -> Option<u8> {
        let value = self.0.swap(0, Ordering::AcqRel);
        (value & FULL != 0).then_some(value as u8)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.0.load(Ordering::Acquire) & FULL != 0
    }
}

impl Default for RxSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot() {
        let slot = RxSlot::new();
        assert!(!slot.is_full());
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_publish_take() {
        let slot = RxSlot::new();
        assert!(!slot.publish(0x00));
        assert!(slot.is_full());
        assert_eq!(slot.take(), Some(0x00));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_overrun_overwrites() {
        let slot = RxSlot::new();
        slot.publish(b'a');
        assert!(slot.publish(b'b'));
        assert_eq!(slot.take(), Some(b'b'));
    }
}
