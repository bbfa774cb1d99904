//! Injectable randomness and deterministic seeded streams.
use hmac::{Hmac, Mac};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;
use std::collections::VecDeque;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// RNG wrapper that tracks how many draws were made against it.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl<R: RngCore> CountingRng<R> {
    pub const fn wrap(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl CountingRng<ChaCha20Rng> {
    fn seeded(seed: u64) -> Self {
        Self::wrap(ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

impl<R: RngCore> RandomSource for CountingRng<R> {
    fn next_unit(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }
}

/// Independent seeded streams for the two kinds of draws a session makes.
#[derive(Debug, Clone)]
pub struct RngBundle {
    enhance: CountingRng<ChaCha20Rng>,
    craft: CountingRng<ChaCha20Rng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            enhance: CountingRng::seeded(derive_stream_seed(seed, b"enhance")),
            craft: CountingRng::seeded(derive_stream_seed(seed, b"craft")),
        }
    }

    /// Access the enhancement roll stream.
    pub fn enhance(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.enhance
    }

    /// Access the crafting roll stream.
    pub fn craft(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.craft
    }

    /// Draw counts `(enhance, craft)`.
    #[must_use]
    pub const fn draws(&self) -> (u64, u64) {
        (self.enhance.draws(), self.craft.draws())
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length, so construction cannot fail.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Replays a fixed sequence of unit draws, then yields `fallback`.
///
/// Values are clamped into `[0, 1)` so a script can never produce a draw a
/// real generator could not.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    queue: VecDeque<f64>,
    fallback: f64,
    consumed: usize,
}

impl ScriptedRolls {
    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            queue: rolls.into_iter().collect(),
            fallback: 0.0,
            consumed: 0,
        }
    }

    /// Build from percentages in `[0, 100)`, matching the enhancement scale.
    #[must_use]
    pub fn from_percent(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self::new(rolls.into_iter().map(|pct| pct / 100.0))
    }

    #[must_use]
    pub const fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Draws consumed so far, including fallback draws.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl RandomSource for ScriptedRolls {
    fn next_unit(&mut self) -> f64 {
        self.consumed += 1;
        let value = self.queue.pop_front().unwrap_or(self.fallback);
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;

    #[test]
    fn bundle_streams_are_deterministic() {
        let mut a = RngBundle::from_user_seed(1337);
        let mut b = RngBundle::from_user_seed(1337);
        for _ in 0..16 {
            assert!((a.enhance().next_unit() - b.enhance().next_unit()).abs() < f64::EPSILON);
        }
        assert_eq!(a.draws(), (16, 0));
    }

    #[test]
    fn bundle_streams_are_domain_separated() {
        let mut bundle = RngBundle::from_user_seed(42);
        let enhance: Vec<f64> = (0..4).map(|_| bundle.enhance().next_unit()).collect();
        let craft: Vec<f64> = (0..4).map(|_| bundle.craft().next_unit()).collect();
        assert_ne!(enhance, craft);
    }

    #[test]
    fn counting_rng_draws_stay_in_unit_range() {
        let mut rng = CountingRng::wrap(SmallRng::seed_from_u64(9));
        for _ in 0..1_000 {
            let value = rng.next_unit();
            assert!((0.0..1.0).contains(&value));
        }
        assert!(rng.draws() >= 1_000);
    }

    #[test]
    fn scripted_rolls_replay_then_fall_back() {
        let mut rolls = ScriptedRolls::from_percent([50.0, 30.0]).with_fallback(0.25);
        assert!((rolls.next_unit() - 0.5).abs() < 1e-12);
        assert!((rolls.next_unit() - 0.3).abs() < 1e-12);
        assert!((rolls.next_unit() - 0.25).abs() < 1e-12);
        assert_eq!(rolls.consumed(), 3);
        assert_eq!(rolls.remaining(), 0);
    }

    #[test]
    fn scripted_rolls_clamp_out_of_range_values() {
        let mut rolls = ScriptedRolls::new([1.5, -0.2]);
        assert!(rolls.next_unit() < 1.0);
        assert!(rolls.next_unit().abs() < f64::EPSILON);
    }
}
