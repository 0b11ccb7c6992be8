use rand_chacha::{ChaCha20Rng, rand_core::SeedableRng};
use rand_core::{CryptoRng, RngCore};

/// Cryptographically secure source of randomness backed by ChaCha20.
///
/// A [Source] built with [Source::new] is fully determined by its seed, which is
/// what tests and benchmarks use. Production callers should use
/// [Source::from_entropy].
pub struct Source {
    source: ChaCha20Rng,
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha20Rng::from_seed(seed),
        }
    }

    /// Seeds a new [Source] from the operating system.
    ///
    /// # Panics
    /// Panics if the operating system entropy source is unavailable.
    pub fn from_entropy() -> Source {
        Source {
            source: ChaCha20Rng::from_os_rng(),
        }
    }

    pub fn branch(&mut self) -> ([u8; 32], Self) {
        let seed: [u8; 32] = self.new_seed();
        (seed, Source::new(seed))
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.fill_bytes(&mut seed);
        seed
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}

impl CryptoRng for Source {}
