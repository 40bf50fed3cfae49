//! Event source trait and error types.

use core::future::Future;

use crate::types::ButtonEvent;

/// Error type for input operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// The event source has gone away.
    Disconnected,
    /// A latched event carried an input tag outside the known buttons.
    UnknownButton,
}

impl core::fmt::Display for InputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "event source disconnected"),
            Self::UnknownButton => write!(f, "unknown button in latched event"),
        }
    }
}

/// Async trait for latched button events.
///
/// `receive` yields the pending event without consuming it; the game loop
/// calls `acknowledge` once it has finished handling the event, and only
/// then may the source latch another one.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait EventSource {
    /// Wait until an event is pending and return it.
    fn receive(&mut self) -> impl Future<Output = Result<ButtonEvent, InputError>>;

    /// Release the pending event.
    fn acknowledge(&mut self);
}
