use log::debug;
use num_bigint::BigUint;
use num_traits::One;
use crate::rsa::keys::KeyError;
use crate::rsa::numtheory::{gcd, mod_inverse};
use crate::rsa::prime_gen::make_prime;
use crate::rsa::random::RandState;

/// Smallest modulus that still leaves two bytes per block.
pub const MIN_MODULUS_BITS: u64 = 17;

#[derive(Debug, Clone)]
pub struct KeyMaterial {
    pub p: BigUint,
    pub q: BigUint,
    pub n: BigUint,
    pub e: BigUint,
}

pub fn totient(p: &BigUint, q: &BigUint) -> BigUint {
    (p - 1u32) * (q - 1u32)
}

/// Picks `p` with a bit length in `[bits/4, 3*bits/4)` and `q` with the rest plus one,
/// so that `n = p*q` has at least `bits` bits.
pub fn make_public_key(state: &mut RandState, bits: u64, iters: u32, max_tries: Option<u64>) -> Result<KeyMaterial, KeyError> {
    if bits < MIN_MODULUS_BITS { return Err(KeyError::Bits(bits)); }
    let p_bits = state.range_u64(bits / 4, 3 * bits / 4);
    let q_bits = bits + 1 - p_bits;
    debug!("prime sizes: p {} bits, q {} bits", p_bits, q_bits);
    let p = make_prime(state, p_bits, iters, max_tries)?;
    let q = make_prime(state, q_bits, iters, max_tries)?;
    let n = &p * &q;
    let f = totient(&p, &q);
    let top = BigUint::one() << (bits - 1);
    let mut e;
    loop {
        e = state.urandomb(bits);
        if e < top { e += &top; }
        if gcd(&e, &f).is_one() { break; }
    }
    Ok(KeyMaterial { p, q, n, e })
}

pub fn make_private_key(e: &BigUint, p: &BigUint, q: &BigUint) -> Result<BigUint, KeyError> {
    Ok(mod_inverse(e, &totient(p, q))?)
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use num_traits::One;
    use super::*;

    #[test]
    fn test_make_public_key() -> Result<(), Box<dyn Error>> {
        let mut state = RandState::new(4242);
        for bits in [17u64, 64, 256] {
            let k = make_public_key(&mut state, bits, 50, None)?;
            assert!(k.n.bits() >= bits, "n has {} bits, wanted {}", k.n.bits(), bits);
            assert_eq!(k.n, &k.p * &k.q);
            assert_eq!(k.e.bits(), bits);
            assert!(gcd(&k.e, &totient(&k.p, &k.q)).is_one());
        }
        Ok(())
    }

    #[test]
    fn test_make_private_key() -> Result<(), Box<dyn Error>> {
        let mut state = RandState::new(8);
        let k = make_public_key(&mut state, 128, 50, None)?;
        let d = make_private_key(&k.e, &k.p, &k.q)?;
        let f = totient(&k.p, &k.q);
        assert!(((&d * &k.e) % &f).is_one());
        Ok(())
    }

    #[test]
    fn test_make_private_key_no_inverse() {
        // totient(7, 11) = 60 shares a factor with 6
        let r = make_private_key(&BigUint::from(6u32), &BigUint::from(7u32), &BigUint::from(11u32));
        assert!(matches!(r, Err(KeyError::Arithmetic(_))));
    }

    #[test]
    fn test_too_small() {
        let mut state = RandState::new(8);
        assert!(matches!(make_public_key(&mut state, 16, 20, None), Err(KeyError::Bits(16))));
    }

    #[test]
    fn test_deterministic() -> Result<(), Box<dyn Error>> {
        let a = make_public_key(&mut RandState::new(77), 96, 20, None)?;
        let b = make_public_key(&mut RandState::new(77), 96, 20, None)?;
        assert_eq!((a.p, a.q, a.e), (b.p, b.q, b.e));
        Ok(())
    }
}
