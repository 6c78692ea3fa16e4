// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Odd primes below 256, used to sieve prime candidates before Miller-Rabin
const SMALL_PRIMES: [u32; 53] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Modular exponentiation: base^exp mod modulus
///
/// A zero modulus has no residues, so the base is returned unchanged.
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_zero() {
        return base.clone();
    }
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    base.modpow(exp, modulus)
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_x = &old_x - &quotient * &x;
        old_x = std::mem::replace(&mut x, next_x);

        let next_y = &old_y - &quotient * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    (old_r, old_x, old_y)
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let m_signed = BigInt::from_biguint(Sign::Plus, m.clone());
    let a_signed = BigInt::from_biguint(Sign::Plus, a % m);
    let (gcd, x, _) = extended_gcd(&a_signed, &m_signed);

    if !gcd.is_one() {
        // Inverse doesn't exist
        return None;
    }

    x.mod_floor(&m_signed).to_biguint()
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Draw a random witness in `[2, n - 1)` from the source, for odd `n > 4`.
///
/// Reads eight bytes beyond the width of `n` before reducing.
fn random_witness<R: RngCore + ?Sized>(
    n: &RsaBigInt,
    rng: &mut R,
) -> Result<RsaBigInt, rand::Error> {
    let byte_len = ((n.bits() + 7) / 8) as usize + 8;
    let mut buf = vec![0u8; byte_len];
    rng.try_fill_bytes(&mut buf)?;

    let span = n - 3u8;
    Ok(RsaBigInt::from_bytes_be(&buf) % span + 2u8)
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime; fails only when the random source fails
pub fn is_probable_prime<R: RngCore + ?Sized>(
    n: &RsaBigInt,
    iterations: usize,
    rng: &mut R,
) -> Result<bool, rand::Error> {
    let two = RsaBigInt::from(2u8);
    if n < &two {
        return Ok(false);
    }
    if n == &two {
        return Ok(true);
    }
    if n.is_even() {
        return Ok(false);
    }

    for &p in SMALL_PRIMES.iter() {
        if n == &RsaBigInt::from(p) {
            return Ok(true);
        }
        if (n % p).is_zero() {
            return Ok(false);
        }
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    // Witness loop
    'witness: for _ in 0..iterations {
        // Pick random witness a in [2, n-1)
        let a = random_witness(n, rng)?;

        // Compute x = a^d mod n
        let mut x = a.modpow(&d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
            if x.is_one() {
                return Ok(false);
            }
        }

        // Composite
        return Ok(false);
    }

    // Probably prime
    Ok(true)
}

/// Draw a random odd candidate with exactly `bit_length` bits and the two top bits set,
/// so that the product of two such candidates has exactly `2 * bit_length` bits.
fn random_candidate<R: RngCore + ?Sized>(
    bit_length: u32,
    rng: &mut R,
) -> Result<RsaBigInt, rand::Error> {
    let byte_len = ((bit_length + 7) / 8) as usize;
    let mut buf = vec![0u8; byte_len];
    rng.try_fill_bytes(&mut buf)?;

    let excess = byte_len as u32 * 8 - bit_length;
    buf[0] &= 0xffu8 >> excess;

    let one = RsaBigInt::one();
    let top_bits = (&one << (bit_length - 1)) | (&one << (bit_length - 2));

    Ok(RsaBigInt::from_bytes_be(&buf) | top_bits | one)
}

/// Generate a random prime of specified bit length
///
/// Composite candidates are redrawn until one passes `rounds` Miller-Rabin rounds.
/// The only error is a failure of the random source itself.
pub fn random_prime<R: RngCore + CryptoRng + ?Sized>(
    bit_length: u32,
    rounds: usize,
    rng: &mut R,
) -> Result<RsaBigInt, rand::Error> {
    debug_assert!(bit_length >= 3, "prime bit length too small: {bit_length}");

    let mut draws = 0u64;
    loop {
        draws += 1;
        let candidate = random_candidate(bit_length, rng)?;

        if is_probable_prime(&candidate, rounds, rng)? {
            log::trace!("found {bit_length}-bit prime after {draws} draws");
            return Ok(candidate);
        }
    }
}
