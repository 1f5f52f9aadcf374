use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use num_bigint::BigUint;
use crate::rsa::keys::{parse_hex, KeyError, PrivateKey, PublicKey};

/// Line oriented reader over a hex key file.
pub struct KeyReader<R: BufRead> {
    reader: R,
    line: usize,
}

impl<R: BufRead> KeyReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }

    fn next_line(&mut self, field: &str) -> Result<String, KeyError> {
        let mut buf = String::new();
        self.line += 1;
        match self.reader.read_line(&mut buf)? {
            0 => Err(KeyError::ParseError(format!("missing {} on line {}", field, self.line))),
            _ => Ok(buf.trim_end_matches(|c| c == '\n' || c == '\r').to_string())
        }
    }

    fn next_hex(&mut self, field: &str) -> Result<BigUint, KeyError> {
        let text = self.next_line(field)?;
        parse_hex(text.trim())
            .ok_or_else(|| KeyError::ParseError(format!("bad hex {} on line {}: `{}'", field, self.line, text)))
    }

    fn next_modulus(&mut self) -> Result<BigUint, KeyError> {
        let n = self.next_hex("modulus")?;
        if n < BigUint::from(2u32) {
            return Err(KeyError::ParseError(format!("modulus on line {} must be > 1", self.line)));
        }
        Ok(n)
    }

    pub fn read_public(&mut self) -> Result<PublicKey, KeyError> {
        let n = self.next_modulus()?;
        let e = self.next_hex("public exponent")?;
        let signature = self.next_hex("signature")?;
        let owner = self.next_line("owner")?;
        if owner.is_empty() {
            return Err(KeyError::ParseError(format!("empty owner on line {}", self.line)));
        }
        Ok(PublicKey { n, e, signature, owner })
    }

    pub fn read_private(&mut self) -> Result<PrivateKey, KeyError> {
        let n = self.next_modulus()?;
        let d = self.next_hex("private exponent")?;
        Ok(PrivateKey { n, d })
    }
}

impl PublicKey {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, KeyError> {
        KeyReader::new(BufReader::new(File::open(path)?)).read_public()
    }
}

impl PrivateKey {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, KeyError> {
        KeyReader::new(BufReader::new(File::open(path)?)).read_private()
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::io::Cursor;
    use num_bigint::BigUint;
    use super::*;

    #[test]
    fn test_read_public() -> Result<(), Box<dyn Error>> {
        let text = "bb\n7\n1f\nalice\n";
        let key = KeyReader::new(Cursor::new(text)).read_public()?;
        assert_eq!(key.n, BigUint::from(187u32));
        assert_eq!(key.e, BigUint::from(7u32));
        assert_eq!(key.signature, BigUint::from(31u32));
        assert_eq!(key.owner, "alice");
        Ok(())
    }

    #[test]
    fn test_read_private_crlf() -> Result<(), Box<dyn Error>> {
        let key = KeyReader::new(Cursor::new("BB\r\n17\r\n")).read_private()?;
        assert_eq!(key, PrivateKey { n: BigUint::from(187u32), d: BigUint::from(23u32) });
        Ok(())
    }

    #[test]
    fn test_truncated() {
        let r = KeyReader::new(Cursor::new("bb\n7\n")).read_public();
        match r {
            Err(KeyError::ParseError(s)) => assert!(s.contains("signature"), "{}", s),
            other => panic!("unexpected {:?}", other),
        }
        assert!(KeyReader::new(Cursor::new("")).read_private().is_err());
    }

    #[test]
    fn test_corrupt_hex() {
        let r = KeyReader::new(Cursor::new("bb\nxyz\n")).read_private();
        assert!(matches!(r, Err(KeyError::ParseError(_))));
        let r = KeyReader::new(Cursor::new("bb\n+7\n1f\nalice\n")).read_public();
        assert!(matches!(r, Err(KeyError::ParseError(_))));
        let r = KeyReader::new(Cursor::new("b_b\n17\n")).read_private();
        assert!(matches!(r, Err(KeyError::ParseError(_))));
    }

    #[test]
    fn test_degenerate_modulus() {
        match KeyReader::new(Cursor::new("0\n7\n1f\nalice\n")).read_public() {
            Err(KeyError::ParseError(s)) => assert!(s.contains("modulus"), "{}", s),
            other => panic!("unexpected {:?}", other),
        }
        let r = KeyReader::new(Cursor::new("1\n17\n")).read_private();
        assert!(matches!(r, Err(KeyError::ParseError(_))));
        assert!(KeyReader::new(Cursor::new("2\n1\n")).read_private().is_ok());
    }
}
