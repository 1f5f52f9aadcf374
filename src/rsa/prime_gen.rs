use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use chrono::Local;
use log::debug;
use num::Integer;
use num_bigint::BigUint;
use num_traits::One;
use crate::rsa::numtheory::pow_mod;
use crate::rsa::random::RandState;

pub enum PrimeError {
    TooFewBits(u64),
    Exhausted(u64),
}

impl PrimeError {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimeError::TooFewBits(bits) => write!(f, "Cannot generate a {} bit prime", bits),
            PrimeError::Exhausted(tries) => write!(f, "No prime found in {} tries", tries)
        }
    }
}

impl Display for PrimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Debug for PrimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Error for PrimeError {}

/// Miller-Rabin. A `true` answer is wrong with probability at most `4^-iters`.
pub fn is_prime(state: &mut RandState, n: &BigUint, iters: u32) -> bool {
    let two = BigUint::from(2u32);
    if n < &two { return false; }
    if n < &BigUint::from(4u32) { return true; }
    if n.is_even() { return false; }
    let n_minus1 = n - 1u32;
    let mut r = n_minus1.clone();
    let mut s = 0u64;
    while r.is_even() {
        r >>= 1;
        s += 1;
    }
    let witness_span = n - 3u32;
    for _ in 0..iters {
        let a = state.urandomm(&witness_span) + 2u32;
        let mut y = pow_mod(&a, &r, n);
        if y.is_one() || y == n_minus1 { continue; }
        let mut j = 1;
        while j < s && y != n_minus1 {
            y = pow_mod(&y, &two, n);
            if y.is_one() { return false; }
            j += 1;
        }
        if y != n_minus1 { return false; }
    }
    true
}

/// Draws `bits`-bit candidates until one passes [`is_prime`]. With `max_tries`
/// unset the loop only ends when a prime turns up.
pub fn make_prime(state: &mut RandState, bits: u64, iters: u32, max_tries: Option<u64>) -> Result<BigUint, PrimeError> {
    if bits < 2 { return Err(PrimeError::TooFewBits(bits)); }
    let top = BigUint::one() << (bits - 1);
    let start = Local::now().timestamp_millis();
    let mut tries = 0u64;
    loop {
        if let Some(limit) = max_tries {
            if tries >= limit {
                debug!("Failed generation in {} tries after {} ms", tries, Local::now().timestamp_millis() - start);
                return Err(PrimeError::Exhausted(limit));
            }
        }
        tries += 1;
        let mut p = state.urandomb(bits);
        if p < top { p += &top; }
        if is_prime(state, &p, iters) {
            debug!("Done {} bit generation in {} tries after {} ms", bits, tries, Local::now().timestamp_millis() - start);
            return Ok(p);
        }
    }
}
