//! Inverse-CDF sampling of the discrete Gaussian.

const U32_MAX_F64: f64 = u32::MAX as f64;

/// Returns the position of the first entry of `cdf` that is not below
/// `target`. A target beyond the last entry resolves to 0.
#[inline(always)]
pub fn cdt_search(cdf: &[f64], target: f64) -> usize {
    let idx: usize = cdf.partition_point(|c| *c < target);
    if idx == cdf.len() { 0 } else { idx }
}

/// Maps a uniform 32-bit draw `r` to a signed offset of the discrete Gaussian
/// whose mass at zero is `a` and whose positive half has cumulative
/// distribution `cdf` (`cdf[k]` is the mass of offsets 1..=k+1).
#[inline(always)]
pub fn cdt_sample(cdf: &[f64], a: f64, r: u32) -> i64 {
    let u: f64 = r as f64 / U32_MAX_F64 - 0.5;
    let half_a: f64 = a / 2.0;
    if u.abs() <= half_a {
        return 0;
    }
    let magnitude: i64 = (cdt_search(cdf, u.abs() - half_a) + 1) as i64;
    if u > 0.0 { magnitude } else { -magnitude }
}
