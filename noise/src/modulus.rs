use itertools::izip;
use rug::Integer;

use crate::residue::{LIMBS, Residue};

/// Modular subtraction on [Residue]s under a modulus owned by the implementor.
pub trait ModSub {
    /// Returns x - y mod q. Both operands must be reduced mod q.
    fn sub_mod(&self, x: &Residue, y: &Residue) -> Residue;

    /// Returns -x mod q.
    fn neg_mod(&self, x: &Residue) -> Residue {
        self.sub_mod(&Residue::ZERO, x)
    }
}

/// A modulus 0 < q < 2^192 with reference three-limb arithmetic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Modulus {
    q: Residue,
}

impl Modulus {
    /// # Panics
    /// Panics if `q` is zero.
    pub fn new(q: Residue) -> Self {
        assert!(!q.is_zero(), "invalid modulus: q=0");
        Modulus { q }
    }

    /// # Panics
    /// Panics if `q` is not in (0, 2^192).
    pub fn from_integer(q: &Integer) -> Self {
        Modulus::new(Residue::from_integer(q))
    }

    pub fn q(&self) -> &Residue {
        &self.q
    }

    pub fn is_reduced(&self, x: &Residue) -> bool {
        sub_limbs(&x.0, &self.q.0).1
    }

    /// Lifts `x` to its representative in (-q/2, q/2].
    pub fn decode_centered(&self, x: &Residue) -> Integer {
        #[cfg(debug_assertions)]
        {
            assert!(self.is_reduced(x), "invalid residue: {:?} >= q", x);
        }
        let v: Integer = x.to_integer();
        let q: Integer = self.q.to_integer();
        if Integer::from(&v << 1) > q { v - q } else { v }
    }
}

impl ModSub for Modulus {
    fn sub_mod(&self, x: &Residue, y: &Residue) -> Residue {
        #[cfg(debug_assertions)]
        {
            assert!(self.is_reduced(x), "invalid argument x: {:?} >= q", x);
            assert!(self.is_reduced(y), "invalid argument y: {:?} >= q", y);
        }
        let (diff, borrow) = sub_limbs(&x.0, &y.0);
        if borrow {
            Residue(add_limbs(&diff, &self.q.0))
        } else {
            Residue(diff)
        }
    }
}

// Returns (a - b mod 2^192, a < b).
#[inline(always)]
fn sub_limbs(a: &[u64; LIMBS], b: &[u64; LIMBS]) -> ([u64; LIMBS], bool) {
    let mut res: [u64; LIMBS] = [0; LIMBS];
    let mut borrow: bool = false;
    izip!(res.iter_mut(), a.iter(), b.iter()).for_each(|(r, a, b)| {
        let (d0, b0) = a.overflowing_sub(*b);
        let (d1, b1) = d0.overflowing_sub(borrow as u64);
        *r = d1;
        borrow = b0 | b1;
    });
    (res, borrow)
}

// Returns a + b mod 2^192.
#[inline(always)]
fn add_limbs(a: &[u64; LIMBS], b: &[u64; LIMBS]) -> [u64; LIMBS] {
    let mut res: [u64; LIMBS] = [0; LIMBS];
    let mut carry: bool = false;
    izip!(res.iter_mut(), a.iter(), b.iter()).for_each(|(r, a, b)| {
        let (s0, c0) = a.overflowing_add(*b);
        let (s1, c1) = s0.overflowing_add(carry as u64);
        *r = s1;
        carry = c0 | c1;
    });
    res
}
