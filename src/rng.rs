use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Reproducible sampler for spot-checking generated data.
/// Without an explicit seed one is drawn from the thread RNG and kept, so a
/// run can be repeated with `--seed`.
pub struct SampleRng {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SampleRng {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        SampleRng {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Up to `count` distinct items in random order
    pub fn sample<T: Clone>(&mut self, items: &[T], count: usize) -> Vec<T> {
        items
            .choose_multiple(&mut self.rng, count)
            .cloned()
            .collect()
    }
}
