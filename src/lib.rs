//! Minimal RSA keys.
//!
//! A key is a modulus and one exponent, written as `"<modulus hex>, <exponent hex>"`.
//! [`generate_keypair`] produces a matched public/private pair, and [`RsaKey::apply`]
//! is the modular-exponentiation transform used for both encryption and decryption.
//!
//! ```
//! use rsa_key::{generate_keypair, RsaKey};
//! use num_bigint::BigInt;
//!
//! let pair = generate_keypair(256).unwrap();
//! let secret = BigInt::from(1337);
//! let c = pair.public_key.apply_to_integer(&secret).unwrap();
//! assert_eq!(pair.private_key.apply_to_integer(&c).unwrap(), secret);
//!
//! let key: RsaKey = "deadbeef, 12345".parse().unwrap();
//! assert_eq!(key.to_string(), "deadbeef, 12345");
//! ```

pub mod cli;
pub mod rsa;

pub use rsa::{
    generate_keypair, ContractViolation, FormatError, KeyGenConfig, KeyPairGenerator,
    KeySizePolicy, RsaError, RsaKey, RsaKeyPair, ValidationError, Value,
};
