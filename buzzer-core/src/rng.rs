//! Hold-off delay generator.
//!
//! The round-start delay only has to be unpredictable to the players, not
//! cryptographically strong. The generator is reseeded from the stopwatch
//! on every Start press, so the reaction time of the game master is the
//! entropy source.

use crate::config::{DelayWindow, DRAW_MAX};

/// Reseedable generator of delays inside a [`DelayWindow`].
pub trait RoundRng {
    /// Restart the sequence from `seed`.
    fn reseed(&mut self, seed: u32);

    /// Next raw output, in `0..=DRAW_MAX`.
    fn next_raw(&mut self) -> u16;

    /// Reseed, then resample until a value falls inside `window`.
    ///
    /// `window` must have passed [`DelayWindow::validate`], otherwise this
    /// may never return.
    fn draw(&mut self, seed: u32, window: &DelayWindow) -> u16 {
        self.reseed(seed);
        loop {
            let value = self.next_raw();
            if window.contains(value) {
                return value;
            }
        }
    }
}

/// The linear congruential generator from the ANSI C `rand()` example.
///
/// `state = state * 1103515245 + 12345`, output bits 16..31 masked to 15
/// bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnsiLcg {
    state: u32,
}

impl AnsiLcg {
    const MUL: u32 = 1_103_515_245;
    const INC: u32 = 12_345;

    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }
}

impl Default for AnsiLcg {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RoundRng for AnsiLcg {
    fn reseed(&mut self, seed: u32) {
        self.state = seed;
    }

    fn next_raw(&mut self) -> u16 {
        self.state = self.state.wrapping_mul(Self::MUL).wrapping_add(Self::INC);
        ((self.state >> 16) as u16) & DRAW_MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: DelayWindow = DelayWindow::new(500, 2000);

    // Counts calls to next_raw so the resampling loop can be observed
    struct Counting {
        inner: AnsiLcg,
        calls: usize,
    }

    impl RoundRng for Counting {
        fn reseed(&mut self, seed: u32) {
            self.calls = 0;
            self.inner.reseed(seed);
        }

        fn next_raw(&mut self) -> u16 {
            self.calls += 1;
            self.inner.next_raw()
        }
    }

    #[test]
    fn test_raw_sequence_seed_one() {
        let mut rng = AnsiLcg::new(1);
        assert_eq!(rng.next_raw(), 16838);
        assert_eq!(rng.next_raw(), 5758);
        assert_eq!(rng.next_raw(), 10113);
    }

    #[test]
    fn test_raw_sequence_seed_seven() {
        let mut rng = AnsiLcg::default();
        rng.reseed(7);
        let expected = [19564, 9806, 10868, 22674, 32531, 3365, 32034, 31790];
        for value in expected {
            assert_eq!(rng.next_raw(), value);
        }
    }

    #[test]
    fn test_seed_zero_starts_at_zero() {
        let mut rng = AnsiLcg::new(0);
        assert_eq!(rng.next_raw(), 0);
        assert_eq!(rng.next_raw(), 21468);
    }

    #[test]
    fn test_draw_pinned_seeds() {
        let mut rng = Counting { inner: AnsiLcg::default(), calls: 0 };

        assert_eq!(rng.draw(7, &WINDOW), 749);
        assert_eq!(rng.calls, 15);

        assert_eq!(rng.draw(2, &WINDOW), 908);
        assert_eq!(rng.calls, 1);

        assert_eq!(rng.draw(4, &WINDOW), 1817);
        assert_eq!(rng.calls, 1);
    }

    #[test]
    fn test_draw_is_deterministic_per_seed() {
        let expected = [514, 920, 908, 880, 1817, 985, 1964, 749, 1701, 691];
        let mut rng = AnsiLcg::default();
        for (seed, value) in expected.into_iter().enumerate() {
            assert_eq!(rng.draw(seed as u32, &WINDOW), value);
            // Previous draws leave no trace
            assert_eq!(rng.draw(seed as u32, &WINDOW), value);
        }
    }

    #[test]
    fn test_draw_stays_in_window() {
        let mut rng = AnsiLcg::default();
        for seed in 0..200 {
            let value = rng.draw(seed, &WINDOW);
            assert!((500..2000).contains(&value), "seed {seed} gave {value}");
        }
    }

    #[test]
    fn test_narrow_window() {
        let window = DelayWindow::new(749, 750);
        let mut rng = AnsiLcg::default();
        assert_eq!(rng.draw(7, &window), 749);
    }
}
