use itertools::izip;
use rug::{Integer, integer::Order};

/// Number of 64-bit limbs of a [Residue].
pub const LIMBS: usize = 3;

/// Size in bytes of the little-endian serialization of a [Residue].
pub const RESIDUE_BYTES: usize = LIMBS * 8;

/// An integer modulo an external modulus q, stored as three 64-bit limbs,
/// least-significant limb first.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Residue(pub [u64; LIMBS]);

impl Residue {
    pub const ZERO: Residue = Residue([0; LIMBS]);

    pub fn from_u64(x: u64) -> Self {
        Residue([x, 0, 0])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|x| *x == 0)
    }

    /// Reads the limbs from `bytes`, each limb little-endian.
    pub fn from_le_bytes(bytes: &[u8; RESIDUE_BYTES]) -> Self {
        residue_from_le(bytes)
    }

    pub fn to_le_bytes(&self) -> [u8; RESIDUE_BYTES] {
        let mut bytes: [u8; RESIDUE_BYTES] = [0; RESIDUE_BYTES];
        izip!(bytes.chunks_exact_mut(8), self.0.iter()).for_each(|(chunk, limb)| chunk.copy_from_slice(&limb.to_le_bytes()));
        bytes
    }

    pub fn to_integer(&self) -> Integer {
        Integer::from_digits(&self.0, Order::Lsf)
    }

    /// # Panics
    /// Panics if `x` is negative or needs more than 192 bits.
    pub fn from_integer(x: &Integer) -> Self {
        assert!(!x.is_negative(), "invalid integer: {} < 0", x);
        assert!(
            x.significant_bits() as usize <= LIMBS * 64,
            "invalid integer: {} bits > {}",
            x.significant_bits(),
            LIMBS * 64
        );
        let mut limbs: [u64; LIMBS] = [0; LIMBS];
        let digits: Vec<u64> = x.to_digits::<u64>(Order::Lsf);
        izip!(limbs.iter_mut(), digits.iter()).for_each(|(limb, digit)| *limb = *digit);
        Residue(limbs)
    }
}

impl From<[u64; LIMBS]> for Residue {
    fn from(limbs: [u64; LIMBS]) -> Self {
        Residue(limbs)
    }
}

#[inline(always)]
fn residue_from_le(bytes: &[u8]) -> Residue {
    let mut limbs: [u64; LIMBS] = [0; LIMBS];
    izip!(limbs.iter_mut(), bytes.chunks_exact(8)).for_each(|(limb, chunk)| {
        let mut le: [u8; 8] = [0u8; 8];
        le.copy_from_slice(chunk);
        *limb = u64::from_le_bytes(le)
    });
    Residue(limbs)
}

/// Packs consecutive [RESIDUE_BYTES]-byte chunks of `bytes` into residues.
pub fn residues_from_bytes(bytes: &[u8]) -> Vec<Residue> {
    debug_assert!(
        bytes.len() % RESIDUE_BYTES == 0,
        "invalid bytes: bytes.len()={} is not a multiple of {}",
        bytes.len(),
        RESIDUE_BYTES
    );
    bytes.chunks_exact(RESIDUE_BYTES).map(residue_from_le).collect()
}
