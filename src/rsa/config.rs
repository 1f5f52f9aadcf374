use lazy_static::lazy_static;
use crate::RSA;

lazy_static! {
    pub static ref CONFIG_DEF: RSA = RSA {
        mode: String::from("generate"),
        public_key: String::from("rsa.pub"),
        private_key: String::from("rsa.priv"),
        owner: std::env::var("USER").unwrap_or_else(|_| String::from("rsa")),
        input: String::from("stdin"),
        output: String::from("stdout"),
        bits: 256,
        rounds: 50,
        seed: None,
        prime_tries: None,
        verbose: false,
        silent: false,
    };
}
