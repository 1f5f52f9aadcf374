use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use num::Integer;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

pub enum ArithmeticError {
    NoInverse(BigUint, BigUint),
}

impl ArithmeticError {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ArithmeticError::NoInverse(a, n) => write!(f, "{:x} has no inverse modulo {:x}", a, n)
        }
    }
}

impl Display for ArithmeticError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Debug for ArithmeticError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Error for ArithmeticError {}

pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let (mut a, mut b) = (a.clone(), b.clone());
    while !b.is_zero() {
        let t = &a % &b;
        a = b;
        b = t;
    }
    a
}

/// Inverse of `a` modulo `n` by the extended Euclidean algorithm, in `[0, n)`.
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Result<BigUint, ArithmeticError> {
    let modulus = BigInt::from_biguint(Sign::Plus, n.clone());
    let (mut r, mut r_next) = (modulus.clone(), BigInt::from_biguint(Sign::Plus, a.clone()));
    let (mut t, mut t_next) = (BigInt::zero(), BigInt::one());
    while !r_next.is_zero() {
        let q = r.div_floor(&r_next);
        let r_new = &r - &q * &r_next;
        r = std::mem::replace(&mut r_next, r_new);
        let t_new = &t - &q * &t_next;
        t = std::mem::replace(&mut t_next, t_new);
    }
    if !r.is_one() {
        return Err(ArithmeticError::NoInverse(a.clone(), n.clone()));
    }
    Ok(t.mod_floor(&modulus).magnitude().clone())
}

/// Right-to-left square-and-multiply.
pub fn pow_mod(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    let mut r = BigUint::one() % modulus;
    let mut acc = base.clone();
    let mut q = exponent.clone();
    while !q.is_zero() {
        if q.bit(0) { r = (r * &acc) % modulus; }
        acc = (&acc * &acc) % modulus;
        q >>= 1;
    }
    r
}
