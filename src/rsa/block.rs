use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io;
use std::io::{BufRead, BufReader, Read, Write};
use log::debug;
use num_bigint::BigUint;
use crate::rsa::cipher;
use crate::rsa::keys::{parse_hex, PrivateKey, PublicKey};

/// Leading byte of every plaintext block, keeps leading zero bytes alive.
pub const SENTINEL: u8 = 0xFF;

pub enum BlockError {
    ModulusTooSmall(u64),
    Parse(usize, String),
    OutOfRange(usize),
    Sentinel(usize),
    Io(io::Error),
}

impl BlockError {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockError::ModulusTooSmall(bits) => write!(f, "A {} bit modulus leaves no room for a block", bits),
            BlockError::Parse(line, text) => write!(f, "Line {}: `{}' is not a hex block", line, text),
            BlockError::OutOfRange(line) => write!(f, "Line {}: block is not below the modulus", line),
            BlockError::Sentinel(line) => write!(f, "Line {}: decrypted block lacks the 0xff marker, wrong key?", line),
            BlockError::Io(e) => write!(f, "Block I/O error: {}", e),
        }
    }
}

impl Display for BlockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Debug for BlockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Error for BlockError {}

impl From<io::Error> for BlockError {
    fn from(e: io::Error) -> Self {
        BlockError::Io(e)
    }
}

/// Bytes per block, `floor((bits(n) - 1) / 8)`.
pub fn block_size(n: &BigUint) -> Result<usize, BlockError> {
    let k = (n.bits().saturating_sub(1) / 8) as usize;
    if k < 2 { return Err(BlockError::ModulusTooSmall(n.bits())); }
    Ok(k)
}

/// Fills `buf` unless the input ends first.
pub fn read_source(reader: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Encrypts `reader` into one hex line per block, returns the block count.
pub fn encrypt_stream(reader: &mut dyn Read, writer: &mut dyn Write, key: &PublicKey) -> Result<usize, BlockError> {
    let k = block_size(&key.n)?;
    debug!("block size {} bytes, {} payload", k, k - 1);
    let mut block = vec![0u8; k];
    block[0] = SENTINEL;
    let mut blocks = 0;
    loop {
        let j = read_source(reader, &mut block[1..])?;
        if j == 0 { break; }
        let m = BigUint::from_bytes_be(&block[..j + 1]);
        let c = cipher::encrypt(&m, &key.e, &key.n);
        writeln!(writer, "{:x}", c)?;
        blocks += 1;
        if j < k - 1 { break; }
    }
    writer.flush()?;
    Ok(blocks)
}

/// Reverses [`encrypt_stream`], stops at the first bad line.
pub fn decrypt_stream(reader: &mut dyn Read, writer: &mut dyn Write, key: &PrivateKey) -> Result<usize, BlockError> {
    let mut blocks = 0;
    for (i, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() { continue; }
        let c = parse_hex(text)
            .ok_or_else(|| BlockError::Parse(i + 1, text.to_string()))?;
        if c >= key.n { return Err(BlockError::OutOfRange(i + 1)); }
        let m = cipher::decrypt(&c, &key.d, &key.n).to_bytes_be();
        match m.split_first() {
            Some((&SENTINEL, payload)) => writer.write_all(payload)?,
            _ => return Err(BlockError::Sentinel(i + 1)),
        }
        blocks += 1;
    }
    writer.flush()?;
    Ok(blocks)
}
