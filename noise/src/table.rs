use tracing::debug;

use crate::{
    cdt::cdt_sample,
    modulus::ModSub,
    residue::{RESIDUE_BYTES, Residue},
};

/// Two-sided tail mass of the continuous Gaussian discarded by the table.
pub const TAIL_PROBABILITY: f64 = 1e-15;

/// Largest table radius whose 2 * radius + 1 entries fit in one allocation.
pub const MAX_RADIUS: usize = (isize::MAX as usize / RESIDUE_BYTES - 1) / 2;

/// Returns the smallest integer cut-off `max_val` such that the Gaussian of
/// standard deviation `sigma` has less than [TAIL_PROBABILITY] mass beyond
/// `max_val`. Saturates at `usize::MAX` for huge `sigma`.
pub fn tail_cut(sigma: f64) -> usize {
    (sigma * (-2.0 * TAIL_PROBABILITY.ln()).sqrt()).ceil() as usize
}

/// Discretized Gaussian over [-max_val, max_val]: residue lookup table and
/// cumulative distribution of the positive half.
///
/// The lookup table is dense and indexed by `i + radius`, where
/// `radius = max(max_val, 1)` so that the entries for 1 and -1 always exist.
/// The modulus used to build the negative entries must be larger than
/// `radius`.
#[derive(Clone, Debug)]
pub struct GaussianTable {
    sigma: f64,
    max_val: usize,
    radius: usize,
    a: f64,
    entries: Vec<Residue>,
    cdf: Vec<f64>,
}

impl GaussianTable {
    /// # Panics
    /// Panics if `sigma` is negative, not finite, or so large that the table
    /// radius exceeds [MAX_RADIUS].
    pub fn new<M: ModSub>(sigma: f64, modulus: &M) -> Self {
        assert!(
            sigma.is_finite() && sigma >= 0.0,
            "invalid sigma: {} is not a finite non-negative value",
            sigma
        );

        let max_val: usize = tail_cut(sigma);
        assert!(
            max_val <= MAX_RADIUS,
            "invalid sigma: table radius {} too large (max {})",
            max_val,
            MAX_RADIUS
        );
        let radius: usize = max_val.max(1);

        let mut entries: Vec<Residue> = vec![Residue::ZERO; 2 * radius + 1];
        (0..=radius).for_each(|i| entries[radius + i] = Residue::from_u64(i as u64));
        (1..=radius).for_each(|i| {
            let neg: Residue = modulus.sub_mod(&entries[radius], &entries[radius + i]);
            entries[radius - i] = neg;
        });

        let two_variance: f64 = 2.0 * sigma * sigma;
        let weight = |x: usize| -> f64 {
            let x: f64 = x as f64;
            (-x * x / two_variance).exp()
        };

        let sum: f64 = 1.0 + 2.0 * (1..=max_val).map(weight).sum::<f64>();
        let a: f64 = 1.0 / sum;

        let mut acc: f64 = 0.0;
        let cdf: Vec<f64> = (1..=max_val)
            .map(|i| {
                acc += a * weight(i);
                acc
            })
            .collect();

        debug!(sigma, max_val, radius, a, "built discrete gaussian table");

        GaussianTable {
            sigma,
            max_val,
            radius,
            a,
            entries,
            cdf,
        }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn max_val(&self) -> usize {
        self.max_val
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Probability mass of the offset 0.
    pub fn point_mass(&self) -> f64 {
        self.a
    }

    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    pub fn get(&self, i: i64) -> Option<&Residue> {
        if i.unsigned_abs() as usize > self.radius {
            return None;
        }
        Some(&self.entries[(self.radius as i64 + i) as usize])
    }

    /// # Panics
    /// Panics if |i| > radius.
    pub fn entry(&self, i: i64) -> &Residue {
        assert!(
            i.unsigned_abs() as usize <= self.radius,
            "invalid offset: |{}| > radius={}",
            i,
            self.radius
        );
        &self.entries[(self.radius as i64 + i) as usize]
    }

    pub fn zero(&self) -> &Residue {
        self.entry(0)
    }

    pub fn one(&self) -> &Residue {
        self.entry(1)
    }

    pub fn minus_one(&self) -> &Residue {
        self.entry(-1)
    }

    /// Maps a uniform 32-bit draw to a signed offset in [-max_val, max_val].
    #[inline(always)]
    pub fn offset(&self, r: u32) -> i64 {
        cdt_sample(&self.cdf, self.a, r)
    }

    /// Iterates over (offset, residue) pairs from -radius to radius.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &Residue)> {
        let radius: i64 = self.radius as i64;
        self.entries.iter().enumerate().map(move |(idx, r)| (idx as i64 - radius, r))
    }
}
