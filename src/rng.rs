//! Randomness for the computer's hand.

use rand::rngs::{OsRng, SmallRng};
use rand::{Rng, SeedableRng};

use crate::rules::Choice;

/// Produces values uniformly distributed over `0..3`.
pub trait ChoiceSource {
    fn draw(&mut self) -> u8;
}

/// Picks the computer's hand, consuming one draw.
pub fn pick_computer_choice<R: ChoiceSource + ?Sized>(source: &mut R) -> Choice {
    Choice::from_index(source.draw())
}

/// Small fast generator seeded from OS / browser entropy.
#[derive(Debug, Clone)]
pub struct EntropySource {
    rng: SmallRng,
}

impl EntropySource {
    pub fn new() -> Self {
        let rng = SmallRng::from_rng(OsRng).unwrap_or_else(|e| {
            log::warn!("entropy unavailable ({}), using a fixed seed", e);
            SmallRng::seed_from_u64(0x9E37_79B9_7F4A_7C15)
        });
        Self { rng }
    }

    /// Reproducible stream for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl ChoiceSource for EntropySource {
    fn draw(&mut self) -> u8 {
        self.rng.gen_range(0..3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entropy_draws_stay_in_range_and_cover_all_choices() {
        let mut src = EntropySource::new();
        let mut seen = [false; 3];
        for _ in 0..600 {
            let v = src.draw();
            assert!(v < 3);
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn same_seed_same_hands() {
        let mut a = EntropySource::seeded(42);
        let mut b = EntropySource::seeded(42);
        let xs: Vec<Choice> = (0..32).map(|_| pick_computer_choice(&mut a)).collect();
        let ys: Vec<Choice> = (0..32).map(|_| pick_computer_choice(&mut b)).collect();
        assert_eq!(xs, ys);
    }

    struct Fixed(u8);
    impl ChoiceSource for Fixed {
        fn draw(&mut self) -> u8 {
            self.0
        }
    }

    #[test]
    fn pick_maps_draws_to_choices() {
        assert_eq!(pick_computer_choice(&mut Fixed(0)), Choice::Rock);
        assert_eq!(pick_computer_choice(&mut Fixed(1)), Choice::Paper);
        assert_eq!(pick_computer_choice(&mut Fixed(2)), Choice::Scissors);
    }
}
