// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use log::{debug, info};
use num_traits::One;
use rand::{CryptoRng, RngCore};

use super::bigint::{from_u64, gcd, mod_inverse, random_prime};
use super::error::{RsaResult, ValidationError};
use super::key::RsaKey;

pub const MIN_KEY_BITS: u32 = 256;
pub const MAX_KEY_BITS: u32 = 16384;
pub const KEY_BITS_GRANULARITY: u32 = 256;

pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65537;
pub const DEFAULT_PRIMALITY_ROUNDS: usize = 20;

/// Accepted modulus sizes: multiples of `granularity` in `[min_bits, max_bits]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySizePolicy {
    pub min_bits: u32,
    pub max_bits: u32,
    pub granularity: u32,
}

impl Default for KeySizePolicy {
    fn default() -> Self {
        Self {
            min_bits: MIN_KEY_BITS,
            max_bits: MAX_KEY_BITS,
            granularity: KEY_BITS_GRANULARITY,
        }
    }
}

impl KeySizePolicy {
    /// Check a requested size; returns it as an unsigned bit count when accepted.
    pub fn validate(&self, bits: i64) -> Result<u32, ValidationError> {
        if bits < i64::from(self.min_bits) {
            return Err(ValidationError::TooSmall {
                bits,
                min: self.min_bits,
            });
        }
        if bits > i64::from(self.max_bits) {
            return Err(ValidationError::TooLarge {
                bits,
                max: self.max_bits,
            });
        }
        if self.granularity == 0 || bits % i64::from(self.granularity) != 0 {
            return Err(ValidationError::Unaligned {
                bits,
                granularity: self.granularity,
            });
        }

        // in range of u32 after the max check
        Ok(bits as u32)
    }
}

/// Configuration for key pair generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGenConfig {
    pub policy: KeySizePolicy,
    pub public_exponent: u32,
    pub primality_rounds: usize,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            policy: KeySizePolicy::default(),
            public_exponent: DEFAULT_PUBLIC_EXPONENT,
            primality_rounds: DEFAULT_PRIMALITY_ROUNDS,
        }
    }
}

impl KeyGenConfig {
    pub fn with_policy(mut self, policy: KeySizePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_public_exponent(mut self, e: u32) -> Self {
        self.public_exponent = e;
        self
    }

    pub fn with_primality_rounds(mut self, rounds: usize) -> Self {
        self.primality_rounds = rounds;
        self
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let policy = &self.policy;
        if policy.granularity == 0
            || policy.granularity % 2 != 0
            || policy.min_bits < 16
            || policy.min_bits > policy.max_bits
        {
            return Err(ValidationError::InvalidPolicy(*policy));
        }
        if self.public_exponent < 3 || self.public_exponent % 2 == 0 {
            return Err(ValidationError::InvalidPublicExponent(self.public_exponent));
        }
        if self.primality_rounds == 0 {
            return Err(ValidationError::InvalidPrimalityRounds);
        }
        Ok(())
    }
}

/// RSA Key Pair (both public and private keys)
///
/// The two keys share the modulus and are inverse transforms of each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKeyPair {
    pub public_key: RsaKey,
    pub private_key: RsaKey,
    pub bit_length: u32,
}

impl From<RsaKeyPair> for (RsaKey, RsaKey) {
    fn from(pair: RsaKeyPair) -> Self {
        (pair.public_key, pair.private_key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyPairGenerator {
    config: KeyGenConfig,
}

impl KeyPairGenerator {
    pub fn new(config: KeyGenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KeyGenConfig {
        &self.config
    }

    /// Generate a key pair with the thread-local CSPRNG
    pub fn generate(&self, bits: i64) -> RsaResult<RsaKeyPair> {
        self.generate_with_rng(bits, &mut rand::thread_rng())
    }

    /// Generate a key pair whose modulus has exactly `bits` bits.
    ///
    /// The request is validated before any randomness is drawn. Prime draws are
    /// repeated on composite candidates, equal primes or a public exponent that is
    /// not coprime with φ(n); only a failing random source ends the search early.
    pub fn generate_with_rng<R: RngCore + CryptoRng + ?Sized>(
        &self,
        bits: i64,
        rng: &mut R,
    ) -> RsaResult<RsaKeyPair> {
        self.config.validate()?;
        let bit_length = self.config.policy.validate(bits)?;

        info!("generating {bit_length}-bit RSA key pair");

        let e = from_u64(u64::from(self.config.public_exponent));
        let half_bits = bit_length / 2;
        let rounds = self.config.primality_rounds;

        let mut attempts = 0u32;
        loop {
            attempts += 1;

            // Step 1: Generate two random primes p and q
            let p = random_prime(half_bits, rounds, rng)?;
            let q = random_prime(half_bits, rounds, rng)?;

            // Ensure p != q
            if p == q {
                debug!("attempt {attempts}: drew equal primes, redrawing");
                continue;
            }

            // Step 2: Compute n = p * q
            let n = &p * &q;
            if n.bits() != u64::from(bit_length) {
                debug!("attempt {attempts}: modulus has {} bits, redrawing", n.bits());
                continue;
            }

            // Step 3: Compute φ(n) = (p-1)(q-1)
            let phi_n = (&p - 1u8) * (&q - 1u8);

            // Step 4: Verify e and φ(n) are coprime
            if !gcd(&e, &phi_n).is_one() {
                debug!("attempt {attempts}: e is not coprime with φ(n), redrawing");
                continue;
            }

            // Step 5: Compute d = e^(-1) mod φ(n)
            let Some(d) = mod_inverse(&e, &phi_n) else {
                debug!("attempt {attempts}: no modular inverse for e, redrawing");
                continue;
            };

            info!("generated {bit_length}-bit RSA key pair after {attempts} attempt(s)");

            return Ok(RsaKeyPair {
                public_key: RsaKey::new(n.clone(), e),
                private_key: RsaKey::new(n, d),
                bit_length,
            });
        }
    }
}

/// Generate RSA key pair with default settings (e = 65537)
pub fn generate_keypair(bits: i64) -> RsaResult<RsaKeyPair> {
    KeyPairGenerator::default().generate(bits)
}
