//! Compile-time configuration: serial bit timing and game parameters.
//!
//! Nothing here is read at runtime from storage; the firmware builds a
//! [`GameConfig`] and a [`UartTiming`] from constants and validates them once
//! at boot.

use crate::types::ElapsedTicks;

/// Clock feeding the serial bit clocks in the reference configuration.
pub const REFERENCE_CLOCK_HZ: u32 = 1_000_000;

/// Serial line rate.
pub const REFERENCE_BAUD: u32 = 9_600;

/// Stopwatch tick rate in the reference configuration (32768 Hz / 8).
pub const REFERENCE_STOPWATCH_HZ: u32 = 4_096;

/// Largest value the default delay generator can produce.
pub const DRAW_MAX: u16 = 0x7FFF;

/// Error type for configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Delay window has `lo >= hi`, resampling would never terminate.
    EmptyDelayWindow,
    /// Delay window lies entirely above what the generator can draw.
    DelayWindowUnreachable,
    /// Tick scale has a zero denominator.
    ZeroScaleDenominator,
    /// Bit period under two ticks; the half-bit offset would be zero.
    BitPeriodTooShort,
    /// Seed modulus of zero.
    ZeroSeedModulus,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyDelayWindow => write!(f, "delay window is empty"),
            Self::DelayWindowUnreachable => write!(f, "delay window is out of generator range"),
            Self::ZeroScaleDenominator => write!(f, "tick scale denominator is zero"),
            Self::BitPeriodTooShort => write!(f, "bit period too short for clock/baud"),
            Self::ZeroSeedModulus => write!(f, "seed modulus is zero"),
        }
    }
}

/// Bit timing for the software UART, in timer ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartTiming {
    /// Ticks per bit: `clock_hz / baud`.
    pub bit: u32,
    /// Ticks per half bit: `clock_hz / (2 * baud)`.
    pub half_bit: u32,
}

impl UartTiming {
    /// 9600 baud from a 1 MHz clock: 104 ticks per bit, 52 per half bit.
    pub const REFERENCE: Self = Self::new(REFERENCE_CLOCK_HZ, REFERENCE_BAUD);

    /// Derive the bit timing from a clock rate and a baud rate.
    ///
    /// A zero baud rate yields zero periods, which [`UartTiming::validate`]
    /// rejects.
    #[must_use]
    pub const fn new(clock_hz: u32, baud: u32) -> Self {
        let bit = match clock_hz.checked_div(baud) {
            Some(bit) => bit,
            None => 0,
        };
        let half_bit = match clock_hz.checked_div(baud.saturating_mul(2)) {
            Some(half) => half,
            None => 0,
        };
        Self { bit, half_bit }
    }

    /// Ticks taken by one complete 8N1 frame.
    #[inline]
    #[must_use]
    pub const fn frame_ticks(&self) -> u32 {
        self.bit * 10
    }

    /// Check the timing is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BitPeriodTooShort`] if the half bit rounds to zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.half_bit == 0 {
            Err(ConfigError::BitPeriodTooShort)
        } else {
            Ok(())
        }
    }
}

/// Half-open window `[lo_ms, hi_ms)` for the round-start hold-off delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DelayWindow {
    pub lo_ms: u16,
    pub hi_ms: u16,
}

impl DelayWindow {
    #[must_use]
    pub const fn new(lo_ms: u16, hi_ms: u16) -> Self {
        Self { lo_ms, hi_ms }
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, value: u16) -> bool {
        value >= self.lo_ms && value < self.hi_ms
    }

    /// Check the window is non-empty and reachable by a generator whose
    /// output lies in `0..=DRAW_MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyDelayWindow`] or
    /// [`ConfigError::DelayWindowUnreachable`].
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.lo_ms >= self.hi_ms {
            Err(ConfigError::EmptyDelayWindow)
        } else if self.lo_ms > DRAW_MAX {
            Err(ConfigError::DelayWindowUnreachable)
        } else {
            Ok(())
        }
    }
}

/// Rational factor converting stopwatch ticks to milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickScale {
    pub num: u32,
    pub den: u32,
}

impl TickScale {
    /// `ticks * 244 / 1000`, the integer approximation of 1000 / 4096.
    pub const REFERENCE: Self = Self { num: 244, den: 1000 };

    /// Convert ticks to whole milliseconds, truncating.
    ///
    /// Saturates at `u32::MAX` instead of wrapping.
    #[inline]
    #[must_use]
    pub const fn to_millis(&self, ticks: ElapsedTicks) -> u32 {
        let ms = ticks.0 as u64 * self.num as u64 / self.den as u64;
        if ms > u32::MAX as u64 {
            u32::MAX
        } else {
            ms as u32
        }
    }
}

/// Game loop parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameConfig {
    /// Window the random hold-off delay is drawn from.
    pub delay_window: DelayWindow,
    /// Stopwatch ticks to milliseconds.
    pub tick_scale: TickScale,
    /// Pause after each event before the latch accepts the next one.
    pub settle_ms: u32,
    /// Rate of the stopwatch tick source.
    pub stopwatch_hz: u32,
    /// The generator seed is `elapsed_ticks % seed_modulus`.
    pub seed_modulus: u32,
}

impl GameConfig {
    pub const REFERENCE: Self = Self {
        delay_window: DelayWindow::new(500, 2000),
        tick_scale: TickScale::REFERENCE,
        settle_ms: 50,
        stopwatch_hz: REFERENCE_STOPWATCH_HZ,
        seed_modulus: 10,
    };

    /// Validate every parameter. Called once at startup; a failure is fatal.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = self.delay_window.validate() {
            return Err(e);
        }
        if self.tick_scale.den == 0 {
            return Err(ConfigError::ZeroScaleDenominator);
        }
        if self.seed_modulus == 0 {
            return Err(ConfigError::ZeroSeedModulus);
        }
        Ok(())
    }

    /// Generator seed derived from a stopwatch snapshot.
    #[inline]
    #[must_use]
    pub const fn seed_from(&self, ticks: ElapsedTicks) -> u32 {
        ticks.0 % self.seed_modulus
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::REFERENCE
    }
}
