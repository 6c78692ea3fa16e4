// RSA Key
// A (modulus, exponent) pair and the modular-exponentiation transform.
// The same type holds a public or a private exponent; encryption and
// decryption are both `apply` with the matching key.

use num_bigint::{BigInt, Sign};
use num_traits::{One, Zero};

use super::bigint::{gcd, mod_pow, RsaBigInt};
use super::codec::parse_hex;
use super::error::{ContractViolation, FormatError, RsaError};

/// Input or output of [`RsaKey::apply`]; the output has the same shape as the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(BigInt),
    /// Hex digits with an optional `0x`/`0X` prefix
    Hex(String),
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::Integer(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(BigInt::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Hex(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Hex(s)
    }
}

impl Value {
    /// Parse a decimal integer, as typed on a command line
    pub fn from_decimal(text: &str) -> Result<Self, FormatError> {
        BigInt::parse_bytes(text.trim().as_bytes(), 10)
            .map(Value::Integer)
            .ok_or_else(|| FormatError::InvalidDecimal(text.to_string()))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Hex(s) => f.write_str(s),
        }
    }
}

/// RSA key: modulus n and one exponent (e or d)
///
/// The default key has a zero modulus and exponent and is inert: `apply` returns its
/// input unchanged once the input has passed the lexical and sign checks.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct RsaKey {
    modulus: RsaBigInt,
    exponent: RsaBigInt,
}

impl RsaKey {
    /// note: not to check that `modulus` and `exponent` are a valid RSA pair
    pub fn new(modulus: RsaBigInt, exponent: RsaBigInt) -> Self {
        Self { modulus, exponent }
    }

    /// n
    pub fn modulus(&self) -> &RsaBigInt {
        &self.modulus
    }

    /// e or d
    pub fn exponent(&self) -> &RsaBigInt {
        &self.exponent
    }

    pub fn is_inert(&self) -> bool {
        self.modulus.is_zero()
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.modulus.bits()
    }

    /// `value^exponent mod modulus`
    ///
    /// Requires `0 < value < modulus` and `gcd(value, modulus) == 1`.
    pub fn apply_to_integer(&self, value: &BigInt) -> Result<BigInt, ContractViolation> {
        let m = match value.sign() {
            Sign::Plus => value.magnitude(),
            Sign::NoSign | Sign::Minus => return Err(ContractViolation::NonPositive),
        };

        if self.is_inert() {
            return Ok(value.clone());
        }

        let c = self.transform(m)?;
        Ok(BigInt::from_biguint(Sign::Plus, c))
    }

    /// Same transform over a hex string; the result echoes the input's prefix and digit case.
    ///
    /// The output has no leading zeros, so a zero-padded input does not come back padded
    /// from the inverse key. Case is read from the letters of the input: an unprefixed
    /// uppercase input whose result has no letters yields a result the inverse key reads
    /// as lowercase. A `0X` prefix keeps uppercase across digit-only results.
    pub fn apply_to_hex(&self, text: &str) -> Result<String, RsaError> {
        let (m, style) = parse_hex(text)?;

        if m.is_zero() {
            return Err(ContractViolation::NonPositive.into());
        }
        if self.is_inert() {
            return Ok(text.to_string());
        }

        let c = self.transform(&m)?;
        Ok(style.render(&c))
    }

    /// Dispatch on the shape of `value`, returning a value of the same shape
    pub fn apply(&self, value: Value) -> Result<Value, RsaError> {
        match value {
            Value::Integer(n) => Ok(Value::Integer(self.apply_to_integer(&n)?)),
            Value::Hex(s) => Ok(Value::Hex(self.apply_to_hex(&s)?)),
        }
    }

    fn transform(&self, m: &RsaBigInt) -> Result<RsaBigInt, ContractViolation> {
        if m >= &self.modulus {
            return Err(ContractViolation::NotBelowModulus);
        }
        if !gcd(m, &self.modulus).is_one() {
            return Err(ContractViolation::NotCoprime);
        }

        Ok(mod_pow(m, &self.exponent, &self.modulus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;

    // n = 61 * 53, e = 17, d = 2753
    fn textbook_pair() -> (RsaKey, RsaKey) {
        let n = from_u64(3233);
        (
            RsaKey::new(n.clone(), from_u64(17)),
            RsaKey::new(n, from_u64(2753)),
        )
    }

    #[test]
    fn test_apply_integer() {
        let (public, private) = textbook_pair();
        let c = public.apply_to_integer(&BigInt::from(65)).unwrap();
        assert_eq!(c, BigInt::from(2790));
        assert_eq!(private.apply_to_integer(&c).unwrap(), BigInt::from(65));

        // private first, then public
        let s = private.apply_to_integer(&BigInt::from(123)).unwrap();
        assert_eq!(public.apply_to_integer(&s).unwrap(), BigInt::from(123));
    }

    #[test]
    fn test_apply_contract_violations() {
        let (public, _) = textbook_pair();
        assert_eq!(
            public.apply_to_integer(&BigInt::from(0)),
            Err(ContractViolation::NonPositive)
        );
        assert_eq!(
            public.apply_to_integer(&BigInt::from(-42)),
            Err(ContractViolation::NonPositive)
        );
        assert_eq!(
            public.apply_to_integer(&BigInt::from(3233)),
            Err(ContractViolation::NotBelowModulus)
        );
        assert_eq!(
            public.apply_to_integer(&BigInt::from(61)),
            Err(ContractViolation::NotCoprime)
        );
    }

    #[test]
    fn test_apply_hex_echoes_style() {
        let (public, private) = textbook_pair();

        let c = public.apply_to_hex("0x41").unwrap();
        assert_eq!(c, "0xae6");
        assert_eq!(private.apply_to_hex(&c).unwrap(), "0x41");

        let c = public.apply_to_hex("41").unwrap();
        assert_eq!(c, "ae6");
        assert_eq!(private.apply_to_hex(&c).unwrap(), "41");

        assert_eq!(public.apply_to_hex("0X41").unwrap(), "0XAE6");
        assert_eq!(private.apply_to_hex("0XAE6").unwrap(), "0X41");
        assert_eq!(public.apply_to_hex("41").unwrap(), "ae6");
    }

    #[test]
    fn test_apply_hex_errors() {
        let (public, _) = textbook_pair();
        assert!(matches!(public.apply_to_hex("xyz"), Err(RsaError::Format(_))));
        assert!(matches!(public.apply_to_hex("0x0"), Err(RsaError::Contract(_))));
    }

    #[test]
    fn test_inert_key() {
        let key = RsaKey::default();
        assert!(key.is_inert());
        assert_eq!(
            key.apply_to_integer(&BigInt::from(1337)).unwrap(),
            BigInt::from(1337)
        );
        assert_eq!(key.apply_to_hex("0x1a2b").unwrap(), "0x1a2b");

        for bad in ["", "xyz", "123g", "0xxyz", "123!@#"] {
            let err = key.apply_to_hex(bad).unwrap_err();
            assert!(err.is_format(), "input {bad:?} gave {err}");
        }
        assert_eq!(
            key.apply_to_integer(&BigInt::from(0)),
            Err(ContractViolation::NonPositive)
        );
    }

    #[test]
    fn test_apply_value_keeps_shape() {
        let (public, _) = textbook_pair();
        assert_eq!(
            public.apply(Value::from(65i64)).unwrap(),
            Value::Integer(BigInt::from(2790))
        );
        assert_eq!(
            public.apply(Value::from("0x41")).unwrap(),
            Value::Hex("0xae6".to_string())
        );
    }

    #[test]
    fn test_value_from_decimal() {
        assert_eq!(
            Value::from_decimal("-42").unwrap(),
            Value::Integer(BigInt::from(-42))
        );
        assert!(Value::from_decimal("12a").is_err());
    }
}
