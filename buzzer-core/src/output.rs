//! Output sink trait and error types.

use core::future::Future;

use buzzer_proto::SerializeError;

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// Transmitter not running.
    NotReady,
    /// Message did not fit its buffer.
    Encode,
}

impl From<SerializeError> for OutputError {
    fn from(_: SerializeError) -> Self {
        OutputError::Encode
    }
}

impl core::fmt::Display for OutputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotReady => write!(f, "transmitter not ready"),
            Self::Encode => write!(f, "message encoding failed"),
        }
    }
}

/// Async trait for the text link to the host.
///
/// Bytes are written in order and every byte passed to `send` goes out
/// before the future resolves, so two sends never interleave.
pub trait OutputSink {
    /// Transmit `bytes` in order.
    fn send(&mut self, bytes: &[u8]) -> impl Future<Output = Result<(), OutputError>>;

    /// Check if the sink is ready to accept data.
    fn is_ready(&self) -> bool;
}
