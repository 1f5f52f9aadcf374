mod rsa;

pub use crate::rsa::*;

use std::error::Error;
use clap::Parser;
use log::{debug, LevelFilter};

fn main() -> Result<(), Box<dyn Error>> {
    let rsa = RSA::parse();
    let level = match (rsa.silent, rsa.verbose) {
        (true, _) => LevelFilter::Off,
        (false, true) => LevelFilter::Info,
        _ => LevelFilter::Warn,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
    debug!("Run args: {:?}", rsa);
    rsa.run()?;
    Ok(())
}
