use num_bigint::{BigUint, RandBigInt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded random source shared by prime and key generation.
/// Same seed, same sequence.
pub struct RandState {
    rng: StdRng,
    seed: u64,
}

impl RandState {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `[0, 2^bits)`.
    pub fn urandomb(&mut self, bits: u64) -> BigUint {
        self.rng.gen_biguint(bits)
    }

    /// Uniform value in `[0, bound)`, `bound` must be non-zero.
    pub fn urandomm(&mut self, bound: &BigUint) -> BigUint {
        self.rng.gen_biguint_below(bound)
    }

    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        self.rng.gen_range(low..high)
    }

    pub fn fill_bytes(&mut self, buf: &mut [u8]) {
        self.rng.fill(buf);
    }
}
