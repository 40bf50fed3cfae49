//! Platform-agnostic soft UART, button latch and game loop for the quiz
//! buzzer console.
//!
//! This crate holds every piece of the console that does not touch a pin.
//! It runs in embedded `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! - [`clock`]: tick sources, per-channel [`BitClock`]s and the reaction [`Stopwatch`]
//! - [`uart`]: software UART transmit/receive engines ([`TxEngine`], [`RxEngine`])
//!   and the single-byte receive slot ([`RxSlot`])
//! - [`latch`]: first-press arbitration ([`ButtonLatch`])
//! - [`mailbox`]: the single-slot event cell between latch and loop ([`EventMailbox`])
//! - [`rng`]: the round-start delay generator ([`RoundRng`], [`AnsiLcg`])
//! - [`config`]: bit timing and game parameters ([`UartTiming`], [`GameConfig`])
//! - [`input`] / [`output`]: the traits the board implements ([`EventSource`], [`OutputSink`])
//! - [`controller`]: the foreground game loop ([`GameController`])
//!
//! # Round lifecycle
//!
//! ```text
//! Start edge ──► latch (Armed) ──► "Go...!_\r" ──► random hold-off ──► stopwatch restart
//!                                                                           │
//!      "<ms>_ms_<tag>*" ◄── loop ◄── latch (Locked) ◄── first colour edge ◄─┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use buzzer_core::{ButtonLatch, ButtonId, EdgeOutcome, InputSet};
//!
//! let latch = ButtonLatch::new();
//! latch.restart_stopwatch(0);
//!
//! // Red and Blue land in the same dispatch: Blue wins
//! let outcome = latch.on_edges(InputSet::RED | InputSet::BLUE, 4096);
//! let EdgeOutcome::Latched(latched) = outcome else { unreachable!() };
//! assert_eq!(latched.event.button, ButtonId::Blue);
//! assert_eq!(latched.armed, InputSet::START);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded targets)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This must go first so the macros are visible to the other modules.
#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod controller;
pub mod input;
pub mod latch;
pub mod mailbox;
pub mod output;
pub mod rng;
pub mod types;
pub mod uart;

// Re-export main types at crate root
pub use clock::{reached, BitClock, Stopwatch, TickSource};
pub use config::{ConfigError, DelayWindow, GameConfig, TickScale, UartTiming};
pub use controller::{ControllerError, GameController, RoundControl, RoundOutcome};
pub use input::{EventSource, InputError};
pub use latch::{ButtonLatch, EdgeOutcome, LatchState, Latched};
pub use mailbox::EventMailbox;
pub use output::{OutputError, OutputSink};
pub use rng::{AnsiLcg, RoundRng};
pub use types::{ButtonEvent, ButtonId, ElapsedTicks, InputSet, TimerTick};
pub use uart::{RxEngine, RxMode, RxSlot, RxStep, TxEngine, TxStep, UartError};
