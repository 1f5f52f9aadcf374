use std::path::Path;
use log::info;
use crate::rsa::cipher;
use crate::rsa::keys::*;
use crate::rsa::random::RandState;

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl KeyPair {
    /// Builds a key pair of at least `bits` modulus bits and signs `owner` with it.
    pub fn generate(state: &mut RandState, bits: u64, iters: u32, owner: &str, max_tries: Option<u64>) -> Result<Self, KeyError> {
        let u = owner_value(owner)?;
        let KeyMaterial { p, q, n, e } = make_public_key(state, bits, iters, max_tries)?;
        let d = make_private_key(&e, &p, &q)?;
        if u >= n {
            return Err(KeyError::Owner(format!("`{}' does not fit below a {} bit modulus", owner, n.bits())));
        }
        let signature = cipher::sign(&u, &d, &n);
        info!("username = {}", owner);
        info!("signature s ({} bits) = {}", signature.bits(), signature);
        info!("p ({} bits) = {}", p.bits(), p);
        info!("q ({} bits) = {}", q.bits(), q);
        info!("public modulus n ({} bits) = {}", n.bits(), n);
        info!("public exponent e ({} bits) = {}", e.bits(), e);
        info!("private key d ({} bits) = {}", d.bits(), d);
        Ok(Self {
            public: PublicKey { n: n.clone(), e, signature, owner: owner.to_string() },
            private: PrivateKey { n, d },
        })
    }

    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(public: P, private: Q) -> Result<Self, KeyError> {
        Ok(Self { public: PublicKey::load(public)?, private: PrivateKey::load(private)? })
    }

    pub fn save<P: AsRef<Path>, Q: AsRef<Path>>(&self, public: P, private: Q) -> Result<(), KeyError> {
        self.public.save(public)?;
        self.private.save(private)?;
        Ok(())
    }

    /// Checks the halves belong together and the owner signature holds.
    pub fn check(&self) -> Result<(), KeyError> {
        if self.public.n != self.private.n {
            return Err(KeyError::Mismatch("public and private moduli differ".to_string()));
        }
        if !self.public.verify_owner()? {
            return Err(KeyError::Mismatch(format!("signature of `{}' could not be verified", self.public.owner)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use num_bigint::BigUint;
    use num_traits::One;
    use super::*;
    use crate::rsa::numtheory::pow_mod;

    #[test]
    fn test_generate() -> Result<(), Box<dyn Error>> {
        let mut state = RandState::new(1234);
        let pair = KeyPair::generate(&mut state, 256, 50, "alice", None)?;
        println!("get keys: {:?}", pair);
        assert!(pair.public.n.bits() >= 256);
        assert_eq!(pair.public.n, pair.private.n);
        assert!(pair.public.verify_owner()?);
        pair.check()?;
        let m = BigUint::from(0x114514u32);
        let c = cipher::encrypt(&m, &pair.public.e, &pair.public.n);
        assert_eq!(cipher::decrypt(&c, &pair.private.d, &pair.private.n), m);
        Ok(())
    }

    #[test]
    fn test_sign_verify() -> Result<(), Box<dyn Error>> {
        let mut state = RandState::new(31337);
        let KeyPair { public, private } = KeyPair::generate(&mut state, 256, 50, "bob", None)?;
        for _ in 0..8 {
            let m = state.urandomm(&public.n);
            let s = cipher::sign(&m, &private.d, &private.n);
            assert!(cipher::verify(&m, &s, &public.e, &public.n));
            for bit in [0u64, 1, 17, 100, s.bits().saturating_sub(1)] {
                let flipped = &s ^ (BigUint::one() << bit);
                assert!(!cipher::verify(&m, &flipped, &public.e, &public.n));
            }
        }
        Ok(())
    }

    #[test]
    fn test_tampered_owner() -> Result<(), Box<dyn Error>> {
        let mut state = RandState::new(5);
        let mut pair = KeyPair::generate(&mut state, 256, 50, "carol", None)?;
        pair.public.owner = "mallory".to_string();
        assert!(!pair.public.verify_owner()?);
        assert!(matches!(pair.check(), Err(KeyError::Mismatch(_))));
        Ok(())
    }

    #[test]
    fn test_owner_too_long() {
        let mut state = RandState::new(5);
        let r = KeyPair::generate(&mut state, 64, 20, "averyveryverylongownername", None);
        assert!(matches!(r, Err(KeyError::Owner(_))));
    }

    #[test]
    fn test_deterministic() -> Result<(), Box<dyn Error>> {
        let a = KeyPair::generate(&mut RandState::new(9), 128, 20, "dave", None)?;
        let b = KeyPair::generate(&mut RandState::new(9), 128, 20, "dave", None)?;
        assert_eq!(a.public, b.public);
        assert_eq!(a.private, b.private);
        Ok(())
    }

    #[test]
    fn key_pair_save_test() -> Result<(), Box<dyn Error>> {
        let mut state = RandState::new(2048);
        let pair = KeyPair::generate(&mut state, 256, 50, "erin", None)?;
        let dir = std::env::temp_dir();
        let tag = format!("rsa-hex-pair-{}", std::process::id());
        let (pub_path, priv_path) = (dir.join(format!("{}.pub", tag)), dir.join(format!("{}.priv", tag)));
        pair.save(&pub_path, &priv_path)?;
        let loaded = KeyPair::load(&pub_path, &priv_path)?;
        std::fs::remove_file(&pub_path)?;
        std::fs::remove_file(&priv_path)?;
        assert_eq!(loaded.public, pair.public);
        assert_eq!(loaded.private, pair.private);
        loaded.check()?;
        assert_eq!(pow_mod(&owner_value("erin")?, &pair.private.d, &pair.private.n), pair.public.signature);
        Ok(())
    }
}
