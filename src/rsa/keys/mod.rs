pub mod key_gen;
pub mod key_writer;
pub mod key_reader;
pub mod key_pair;

pub use key_gen::*;
pub use key_pair::*;
pub use key_reader::*;
pub use key_writer::*;

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io;
use num_bigint::BigUint;
use crate::rsa::cipher;
use crate::rsa::numtheory::ArithmeticError;
use crate::rsa::prime_gen::PrimeError;

#[derive(Debug, Clone, PartialEq)]
pub struct PublicKey {
    pub n: BigUint,
    pub e: BigUint,
    pub signature: BigUint,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrivateKey {
    pub n: BigUint,
    pub d: BigUint,
}

impl PublicKey {
    /// Checks that `signature` is the owner name signed with the paired private key.
    pub fn verify_owner(&self) -> Result<bool, KeyError> {
        let u = owner_value(&self.owner)?;
        Ok(cipher::verify(&u, &self.signature, &self.e, &self.n))
    }
}

/// Reads `owner` as a base 62 integer: `0-9`, then `A-Z`, then `a-z`.
pub fn owner_value(owner: &str) -> Result<BigUint, KeyError> {
    if owner.is_empty() {
        return Err(KeyError::Owner("empty owner name".to_string()));
    }
    let mut v = BigUint::default();
    for c in owner.chars() {
        let digit = match c {
            '0'..='9' => c as u32 - '0' as u32,
            'A'..='Z' => c as u32 - 'A' as u32 + 10,
            'a'..='z' => c as u32 - 'a' as u32 + 36,
            _ => return Err(KeyError::Owner(format!("`{}' is not a base 62 digit in owner `{}'", c, owner)))
        };
        v = v * 62u32 + digit;
    }
    Ok(v)
}

/// Plain hex digits only; `parse_bytes` alone would take `+` and `_` too.
pub fn parse_hex(text: &str) -> Option<BigUint> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    BigUint::parse_bytes(text.as_bytes(), 16)
}

pub enum KeyError {
    ParseError(String),
    Owner(String),
    Bits(u64),
    Mismatch(String),
    Arithmetic(ArithmeticError),
    Prime(PrimeError),
    Io(io::Error),
}

impl KeyError {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyError::ParseError(s) => write!(f, "Key parse error: {}", s),
            KeyError::Owner(s) => write!(f, "Bad owner: {}", s),
            KeyError::Bits(bits) => write!(f, "Modulus of {} bits is too small, need at least {}", bits, MIN_MODULUS_BITS),
            KeyError::Mismatch(s) => write!(f, "Key mismatch: {}", s),
            KeyError::Arithmetic(e) => write!(f, "Key generation failed: {}", e),
            KeyError::Prime(e) => write!(f, "Key generation failed: {}", e),
            KeyError::Io(e) => write!(f, "Key file error: {}", e),
        }
    }
}

impl Display for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Debug for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Error for KeyError {}

impl From<io::Error> for KeyError {
    fn from(e: io::Error) -> Self {
        KeyError::Io(e)
    }
}

impl From<ArithmeticError> for KeyError {
    fn from(e: ArithmeticError) -> Self {
        KeyError::Arithmetic(e)
    }
}

impl From<PrimeError> for KeyError {
    fn from(e: PrimeError) -> Self {
        KeyError::Prime(e)
    }
}
