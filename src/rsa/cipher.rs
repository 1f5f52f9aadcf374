use num_bigint::BigUint;
use crate::rsa::numtheory::pow_mod;

// Raw RSA, no padding.

pub fn encrypt(m: &BigUint, e: &BigUint, n: &BigUint) -> BigUint {
    pow_mod(m, e, n)
}

pub fn decrypt(c: &BigUint, d: &BigUint, n: &BigUint) -> BigUint {
    pow_mod(c, d, n)
}

pub fn sign(m: &BigUint, d: &BigUint, n: &BigUint) -> BigUint {
    pow_mod(m, d, n)
}

pub fn verify(m: &BigUint, s: &BigUint, e: &BigUint, n: &BigUint) -> bool {
    pow_mod(s, e, n) == *m
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use super::*;

    #[test]
    fn test_simple_data() {
        // p = 17, q = 11, e = 7, d = 23
        let (n, e, d) = (BigUint::from(187u32), BigUint::from(7u32), BigUint::from(23u32));
        let m = BigUint::from(88u32);
        let c = encrypt(&m, &e, &n);
        assert_eq!(c, BigUint::from(11u32));
        assert_eq!(decrypt(&c, &d, &n), m);
        let s = sign(&m, &d, &n);
        assert!(verify(&m, &s, &e, &n));
        assert!(!verify(&BigUint::from(89u32), &s, &e, &n));
    }
}
