use std::error::Error;
use std::fs::File;
use std::io;
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

pub mod block;
pub mod cipher;
pub mod config;
pub mod keys;
pub mod numtheory;
pub mod prime_gen;
pub mod random;

use config::*;
use keys::*;
use random::RandState;

/// Bytes round-tripped by `--mode test` when no input file is given.
const TEST_SOURCE_LEN: usize = 4096;

#[derive(Debug, Clone, PartialEq)]
pub enum RunMode {
    Generate,
    Encode,
    Decode,
    Test,
}

#[macro_export]
macro_rules! rsa_t {
    ($CONFIG: expr, $NAME: ident) => {
#[derive(Debug, Clone, Parser)]
pub struct $NAME {
    #[clap(short, long, value_parser, default_value = $CONFIG.mode.as_str(), help = "Run mode: generate, encode, decode, test")]
    pub mode: String,
    #[clap(short = 'n', long, value_parser, default_value = $CONFIG.public_key.as_str(), help = "Public key file")]
    pub public_key: String,
    #[clap(short = 'd', long, value_parser, default_value = $CONFIG.private_key.as_str(), help = "Private key file")]
    pub private_key: String,
    #[clap(short = 'u', long, value_parser, default_value = $CONFIG.owner.as_str(), help = "Key owner name signed into the public key, base 62 digits only")]
    pub owner: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.input.as_str(), help = "Input filename")]
    pub input: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.output.as_str(), help = "Output filename")]
    pub output: String,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.bits, help = "Minimum bits of the public modulus")]
    pub bits: u64,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.rounds, help = "Miller Rabin iterations for testing primes")]
    pub rounds: u32,
    #[clap(long, value_parser, help = "Random seed, defaults to the current time")]
    pub seed: Option<u64>,
    #[clap(long, value_parser, help = "Give up after this many prime candidates, unbounded by default")]
    pub prime_tries: Option<u64>,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.verbose, help = "Verbose output")]
    pub verbose: bool,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.silent, help = "Disable log output")]
    pub silent: bool,
}
    };
}

rsa_t!(CONFIG_DEF, RSA);

impl RSA {
    pub fn reader(&self) -> Result<Box<dyn Read>, io::Error> {
        Ok(match self.input.as_str() {
            "stdin" => Box::new(io::stdin()),
            f => Box::new(BufReader::new(File::open(f)?))
        })
    }

    pub fn writer(&self) -> Result<Box<dyn Write>, io::Error> {
        Ok(match self.output.as_str() {
            "stdout" => Box::new(BufWriter::new(io::stdout())),
            f => Box::new(BufWriter::new(File::create(f)?))
        })
    }

    pub fn run_mode(&self) -> Result<RunMode, String> {
        match self.mode.as_str() {
            "generate" => Ok(RunMode::Generate),
            "encode" => Ok(RunMode::Encode),
            "decode" => Ok(RunMode::Decode),
            "test" => Ok(RunMode::Test),
            m => Err(format!("Unknown run mode `{}'! available: generate(default), encode, decode, test", m))
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| Local::now().timestamp() as u64)
    }

    fn progress(&self) -> Result<ProgressBar, Box<dyn Error>> {
        if self.silent || self.output == "stdout" {
            return Ok(ProgressBar::hidden());
        }
        let pb = match self.input.as_str() {
            "stdin" => ProgressBar::new_spinner(),
            f => ProgressBar::new(std::fs::metadata(f)?.len()),
        };
        pb.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")?
            .progress_chars("#>-"));
        Ok(pb)
    }

    pub fn generate(&self) -> Result<KeyPair, Box<dyn Error>> {
        let mut state = RandState::new(self.seed());
        info!("random seed {}", state.seed());
        let key_pair = KeyPair::generate(&mut state, self.bits, self.rounds, &self.owner, self.prime_tries)?;
        key_pair.save(&self.public_key, &self.private_key)?;
        info!("Generated key files: {}, {}", self.public_key, self.private_key);
        Ok(key_pair)
    }

    pub fn encode(&self) -> Result<usize, Box<dyn Error>> {
        let key = PublicKey::load(&self.public_key)?;
        info!("username = {}", key.owner);
        info!("signature s ({} bits) = {}", key.signature.bits(), key.signature);
        info!("public modulus n ({} bits) = {}", key.n.bits(), key.n);
        info!("public exponent e ({} bits) = {}", key.e.bits(), key.e);
        if !key.verify_owner()? {
            return Err(Box::new(KeyError::Mismatch(format!("signature of `{}' could not be verified", key.owner))));
        }
        let pb = self.progress()?;
        let mut reader = pb.wrap_read(self.reader()?);
        let mut writer = self.writer()?;
        let blocks = block::encrypt_stream(&mut reader, &mut writer, &key)?;
        pb.finish_and_clear();
        Ok(blocks)
    }

    pub fn decode(&self) -> Result<usize, Box<dyn Error>> {
        let key = PrivateKey::load(&self.private_key)?;
        info!("n ({} bits) = {}", key.n.bits(), key.n);
        info!("d ({} bits) = {}", key.d.bits(), key.d);
        let pb = self.progress()?;
        let mut reader = pb.wrap_read(self.reader()?);
        let mut writer = self.writer()?;
        let blocks = block::decrypt_stream(&mut reader, &mut writer, &key)?;
        pb.finish_and_clear();
        Ok(blocks)
    }

    /// Loads both key files and pushes the input (or seeded noise) through the codec.
    pub fn test(&self) -> Result<usize, Box<dyn Error>> {
        let key_pair = KeyPair::load(&self.public_key, &self.private_key)?;
        key_pair.check()?;
        info!("key pair of `{}' verified, n has {} bits", key_pair.public.owner, key_pair.public.n.bits());
        let source = match self.input.as_str() {
            "stdin" => {
                let mut data = vec![0u8; TEST_SOURCE_LEN];
                RandState::new(self.seed()).fill_bytes(&mut data);
                data
            }
            _ => {
                let mut data = Vec::new();
                self.reader()?.read_to_end(&mut data)?;
                data
            }
        };
        let mut cipher_text = Vec::new();
        let blocks = block::encrypt_stream(&mut Cursor::new(&source), &mut cipher_text, &key_pair.public)?;
        let mut plain = Vec::new();
        block::decrypt_stream(&mut Cursor::new(&cipher_text), &mut plain, &key_pair.private)?;
        if plain != source {
            return Err(Box::new(KeyError::Mismatch(format!("round trip of {} bytes differs", source.len()))));
        }
        if self.output != "stdout" {
            let mut writer = self.writer()?;
            writer.write_all(&cipher_text)?;
            writer.flush()?;
        }
        info!("Test pass, {} bytes in {} blocks", source.len(), blocks);
        Ok(blocks)
    }

    pub fn run(&self) -> Result<(), Box<dyn Error>> {
        match self.run_mode()? {
            RunMode::Generate => { self.generate()?; }
            RunMode::Encode => {
                let blocks = self.encode()?;
                info!("Encrypted {} blocks", blocks);
            }
            RunMode::Decode => {
                let blocks = self.decode()?;
                if blocks == 0 { warn!("No blocks in input"); }
                info!("Decrypted {} blocks", blocks);
            }
            RunMode::Test => { self.test()?; }
        }
        Ok(())
    }
}
