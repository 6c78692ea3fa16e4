// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod codec;
pub mod error;
pub mod key;
pub mod keygen;

pub use codec::{parse_hex, parse_key, render_key, HexStyle};
pub use error::{ContractViolation, FormatError, RsaError, RsaResult, ValidationError};
pub use key::{RsaKey, Value};
pub use keygen::{
    generate_keypair, KeyGenConfig, KeyPairGenerator, KeySizePolicy, RsaKeyPair,
    DEFAULT_PRIMALITY_ROUNDS, DEFAULT_PUBLIC_EXPONENT,
};
