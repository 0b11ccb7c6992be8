//! Noise sampling for lattice-based encryption: discrete Gaussian, uniform,
//! binary, ternary and flooding vectors of three-limb residues.

pub mod cdt;
pub mod generator;
pub mod modulus;
pub mod params;
pub mod residue;
pub mod table;

pub use generator::{FLOODING_BITS, FLOODING_BYTES, NoiseGenerator};
pub use modulus::{ModSub, Modulus};
pub use params::NoiseParameters;
pub use residue::{LIMBS, RESIDUE_BYTES, Residue};
pub use table::{GaussianTable, MAX_RADIUS, TAIL_PROBABILITY};
