use itertools::izip;
use rand_core::{CryptoRng, RngCore};
use sampling::stream::KeyedStream;
use tracing::trace;

use crate::{
    modulus::ModSub,
    params::NoiseParameters,
    residue::{RESIDUE_BYTES, Residue, residues_from_bytes},
    table::GaussianTable,
};

/// Number of random bits written by the flooding generator, rounded down to
/// whole bytes when filling.
pub const FLOODING_BITS: usize = 124;
pub const FLOODING_BYTES: usize = FLOODING_BITS / 8;

const GAUSSIAN_DRAW_BYTES: usize = 4;

/// Generates noise vectors of [Residue]s.
///
/// Built once per standard deviation; every generation method takes `&self`
/// and draws its randomness from the source passed by the caller, so a single
/// generator can be shared across threads that each own their source.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    table: GaussianTable,
}

impl NoiseGenerator {
    /// Builds the lookup table and CDF for the discrete Gaussian of standard
    /// deviation `sigma`. Negative table entries are computed with `modulus`.
    ///
    /// # Panics
    /// Panics if `sigma` is negative or not finite.
    pub fn new<M: ModSub>(sigma: f64, modulus: &M) -> Self {
        NoiseGenerator {
            table: GaussianTable::new(sigma, modulus),
        }
    }

    pub fn from_params<M: ModSub>(params: &NoiseParameters, modulus: &M) -> Self {
        params.validate();
        NoiseGenerator::new(params.sigma, modulus)
    }

    pub fn sigma(&self) -> f64 {
        self.table.sigma()
    }

    pub fn table(&self) -> &GaussianTable {
        &self.table
    }

    /// Draws a single signed offset of the discrete Gaussian.
    pub fn sample_gaussian_offset<R: RngCore + CryptoRng>(&self, source: &mut R) -> i64 {
        let mut bytes: [u8; GAUSSIAN_DRAW_BYTES] = [0u8; GAUSSIAN_DRAW_BYTES];
        source.fill_bytes(&mut bytes);
        self.table.offset(gaussian_draw(&bytes))
    }

    /// Overwrites `res` with discrete Gaussian samples, consuming exactly
    /// 4 * res.len() bytes from `source`.
    pub fn fill_gaussian<R: RngCore + CryptoRng>(&self, res: &mut [Residue], source: &mut R) {
        let mut bytes: Vec<u8> = vec![0u8; GAUSSIAN_DRAW_BYTES * res.len()];
        source.fill_bytes(&mut bytes);
        izip!(res.iter_mut(), bytes.chunks_exact(GAUSSIAN_DRAW_BYTES)).for_each(|(r, b)| {
            *r = *self.table.entry(self.table.offset(gaussian_draw(b)));
        });
    }

    pub fn generate_gaussian_vector<R: RngCore + CryptoRng>(&self, n: usize, source: &mut R) -> Vec<Residue> {
        let mut res: Vec<Residue> = vec![Residue::ZERO; n];
        self.fill_gaussian(&mut res, source);
        trace!(n, sigma = self.sigma(), "generated gaussian vector");
        res
    }

    /// Returns `n` uniformly random three-limb values, not reduced modulo q.
    pub fn generate_uniform_vector<R: RngCore + CryptoRng>(&self, n: usize, source: &mut R) -> Vec<Residue> {
        let res: Vec<Residue> = uniform_residues(n, source);
        trace!(n, "generated uniform vector");
        res
    }

    /// Deterministic counterpart of [NoiseGenerator::generate_uniform_vector]:
    /// the first 16 bytes of `seed` key an AES-128-CTR stream, the remaining
    /// bytes form its IV. Equal `(seed, n)` always give equal output.
    ///
    /// # Panics
    /// Panics if `seed` is shorter than 16 bytes.
    pub fn generate_uniform_vector_from_seed(&self, seed: &[u8], n: usize) -> Vec<Residue> {
        let mut stream: KeyedStream = KeyedStream::from_seed(seed);
        let res: Vec<Residue> = uniform_residues(n, &mut stream);
        trace!(n, "generated seeded uniform vector");
        res
    }

    /// Returns `n` residues equal to 0 or 1 with probability 1/2 each.
    pub fn generate_binary_vector<R: RngCore + CryptoRng>(&self, n: usize, source: &mut R) -> Vec<Residue> {
        let mut bytes: Vec<u8> = vec![0u8; n];
        source.fill_bytes(&mut bytes);
        let res: Vec<Residue> = bytes
            .iter()
            .map(|b| *self.table.entry((b % 2) as i64))
            .collect();
        trace!(n, "generated binary vector");
        res
    }

    /// Returns `n` residues over {-1, 0, 1} with P(0) = 1/2 and P(1) = P(-1) = 1/4.
    pub fn generate_zo_vector<R: RngCore + CryptoRng>(&self, n: usize, source: &mut R) -> Vec<Residue> {
        let mut bytes: Vec<u8> = vec![0u8; n];
        source.fill_bytes(&mut bytes);
        let res: Vec<Residue> = bytes
            .iter()
            .map(|b| match b % 4 {
                0 => *self.table.one(),
                1 => *self.table.minus_one(),
                _ => *self.table.zero(),
            })
            .collect();
        trace!(n, "generated zo vector");
        res
    }

    /// Writes [FLOODING_BYTES] random bytes into the low bytes of each residue
    /// of `res`. The remaining high bytes are left as they are: callers that
    /// want values below 2^(8 * FLOODING_BYTES) must zero `res` beforehand.
    pub fn fill_flooding_noise<R: RngCore + CryptoRng>(&self, res: &mut [Residue], source: &mut R) {
        let mut bytes: Vec<u8> = vec![0u8; FLOODING_BYTES * res.len()];
        source.fill_bytes(&mut bytes);
        izip!(res.iter_mut(), bytes.chunks_exact(FLOODING_BYTES)).for_each(|(r, b)| {
            let mut le: [u8; RESIDUE_BYTES] = r.to_le_bytes();
            le[..FLOODING_BYTES].copy_from_slice(b);
            *r = Residue::from_le_bytes(&le);
        });
    }

    /// Returns `n` flooding noise residues, each below 2^(8 * [FLOODING_BYTES]).
    pub fn generate_flooding_noise_vector<R: RngCore + CryptoRng>(&self, n: usize, source: &mut R) -> Vec<Residue> {
        let mut res: Vec<Residue> = vec![Residue::ZERO; n];
        self.fill_flooding_noise(&mut res, source);
        trace!(n, "generated flooding noise vector");
        res
    }
}

/// Reads one Gaussian draw, little-endian, from a [GAUSSIAN_DRAW_BYTES] chunk.
#[inline(always)]
fn gaussian_draw(bytes: &[u8]) -> u32 {
    let mut le: [u8; GAUSSIAN_DRAW_BYTES] = [0u8; GAUSSIAN_DRAW_BYTES];
    le.copy_from_slice(bytes);
    u32::from_le_bytes(le)
}

fn uniform_residues<R: RngCore>(n: usize, source: &mut R) -> Vec<Residue> {
    let mut bytes: Vec<u8> = vec![0u8; RESIDUE_BYTES * n];
    source.fill_bytes(&mut bytes);
    residues_from_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::{FLOODING_BYTES, NoiseGenerator};
    use crate::{modulus::Modulus, residue::Residue};
    use rand_core::{CryptoRng, RngCore};
    use rug::Integer;
    use sampling::source::Source;

    /// Wraps a source and counts the bytes drawn from it.
    struct Counting<'a> {
        inner: &'a mut Source,
        drawn: usize,
    }

    impl RngCore for Counting<'_> {
        fn next_u32(&mut self) -> u32 {
            self.drawn += 4;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.drawn += 8;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, bytes: &mut [u8]) {
            self.drawn += bytes.len();
            self.inner.fill_bytes(bytes)
        }
    }

    impl CryptoRng for Counting<'_> {}

    fn test_modulus() -> Modulus {
        Modulus::from_integer(&((Integer::from(1) << 191) - 19))
    }

    #[test]
    fn randomness_accounting() {
        let generator: NoiseGenerator = NoiseGenerator::new(3.2, &test_modulus());
        let mut source: Source = Source::new([0u8; 32]);
        let n: usize = 37;

        let mut counting: Counting = Counting {
            inner: &mut source,
            drawn: 0,
        };
        generator.generate_gaussian_vector(n, &mut counting);
        assert_eq!(counting.drawn, 4 * n);

        counting.drawn = 0;
        generator.generate_uniform_vector(n, &mut counting);
        assert_eq!(counting.drawn, 24 * n);

        counting.drawn = 0;
        generator.generate_binary_vector(n, &mut counting);
        assert_eq!(counting.drawn, n);

        counting.drawn = 0;
        generator.generate_zo_vector(n, &mut counting);
        assert_eq!(counting.drawn, n);

        counting.drawn = 0;
        generator.generate_flooding_noise_vector(n, &mut counting);
        assert_eq!(counting.drawn, FLOODING_BYTES * n);
    }

    #[test]
    fn single_offsets_match_vector() {
        let modulus: Modulus = test_modulus();
        let generator: NoiseGenerator = NoiseGenerator::new(3.2, &modulus);
        let max_val: i64 = generator.table().max_val() as i64;
        let n: usize = 1000;

        let mut a: Source = Source::new([4u8; 32]);
        let mut b: Source = Source::new([4u8; 32]);

        let offsets: Vec<i64> = (0..n).map(|_| generator.sample_gaussian_offset(&mut a)).collect();
        let decoded: Vec<i64> = generator
            .generate_gaussian_vector(n, &mut b)
            .iter()
            .map(|r| modulus.decode_centered(r).to_i64().expect("offset fits in i64"))
            .collect();

        assert_eq!(offsets, decoded);
        offsets
            .iter()
            .for_each(|x| assert!(x.abs() <= max_val, "|{}| > {}", x, max_val));
        assert!(offsets.iter().any(|x| *x != 0));
    }

    #[test]
    fn flooding_keeps_high_bytes() {
        let generator: NoiseGenerator = NoiseGenerator::new(3.2, &test_modulus());
        let mut source: Source = Source::new([0u8; 32]);
        let marker: u64 = 0xAB00_0000_0000_0000;
        let mut res: Vec<Residue> = vec![Residue([0, marker, u64::MAX]); 64];
        generator.fill_flooding_noise(&mut res, &mut source);
        res.iter().for_each(|r| {
            // Byte 15 is the top byte of limb 1.
            assert_eq!(r.0[1] & 0xFF00_0000_0000_0000, marker);
            assert_eq!(r.0[2], u64::MAX);
        });
        assert!(res.iter().any(|r| r.0[0] != 0));
    }

    #[test]
    fn flooding_vector_is_bounded() {
        let generator: NoiseGenerator = NoiseGenerator::new(3.2, &test_modulus());
        let mut source: Source = Source::new([1u8; 32]);
        let res: Vec<Residue> = generator.generate_flooding_noise_vector(256, &mut source);
        res.iter().for_each(|r| {
            assert_eq!(r.0[1] >> 56, 0);
            assert_eq!(r.0[2], 0);
        });
        assert!(res.iter().any(|r| r.0[1] >> 48 != 0));
    }

    #[test]
    fn zo_maps_to_table_entries() {
        let modulus: Modulus = test_modulus();
        let generator: NoiseGenerator = NoiseGenerator::new(3.2, &modulus);
        let mut source: Source = Source::new([2u8; 32]);
        generator
            .generate_zo_vector(1000, &mut source)
            .iter()
            .for_each(|r| {
                let v: Integer = modulus.decode_centered(r);
                assert!(v == -1 || v == 0 || v == 1, "v={}", v);
            });
    }

    #[test]
    fn works_with_thread_rng() {
        let generator: NoiseGenerator = NoiseGenerator::new(3.2, &test_modulus());
        let mut rng = rand::rng();
        assert_eq!(generator.generate_gaussian_vector(16, &mut rng).len(), 16);
        assert_eq!(generator.generate_uniform_vector(16, &mut rng).len(), 16);
    }
}
