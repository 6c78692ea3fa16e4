// RSA Error Types
// Three kinds that callers react to differently, plus the umbrella error

use thiserror::Error;

use super::keygen::KeySizePolicy;

/// Lexical or structural problem in key text or a hex value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("expected exactly 2 comma separated fields, found {found}")]
    WrongFieldCount { found: usize },

    #[error("empty hex field")]
    EmptyField,

    #[error("invalid hex digit {ch:?} at index {index}")]
    InvalidHexDigit { ch: char, index: usize },

    #[error("invalid decimal integer `{0}`")]
    InvalidDecimal(String),
}

/// Key generation request rejected by policy before any prime search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("key size {bits} is below the minimum of {min} bits")]
    TooSmall { bits: i64, min: u32 },

    #[error("key size {bits} is above the maximum of {max} bits")]
    TooLarge { bits: i64, max: u32 },

    #[error("key size {bits} is not a multiple of {granularity} bits")]
    Unaligned { bits: i64, granularity: u32 },

    #[error("public exponent {0} must be odd and at least 3")]
    InvalidPublicExponent(u32),

    #[error("primality test needs at least one round")]
    InvalidPrimalityRounds,

    #[error("unusable key size policy {0:?}")]
    InvalidPolicy(KeySizePolicy),
}

/// Caller passed a value outside the domain of `apply`.
///
/// This is a programming error on the caller's side, not bad external data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("apply input must be a positive integer")]
    NonPositive,

    #[error("apply input must be less than the modulus")]
    NotBelowModulus,

    #[error("apply input must be coprime with the modulus")]
    NotCoprime,
}

#[derive(Debug, Error)]
pub enum RsaError {
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),

    #[error("random source failure: {0}")]
    RandomSource(#[from] rand::Error),
}

impl RsaError {
    pub fn is_format(&self) -> bool {
        matches!(self, RsaError::Format(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RsaError::Validation(_))
    }

    pub fn is_contract_violation(&self) -> bool {
        matches!(self, RsaError::Contract(_))
    }
}

/// Result type for RSA operations
pub type RsaResult<T> = Result<T, RsaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinct() {
        let format = RsaError::from(FormatError::EmptyField);
        let contract = RsaError::from(ContractViolation::NonPositive);
        let validation = RsaError::from(ValidationError::InvalidPrimalityRounds);

        assert!(format.is_format() && !format.is_contract_violation());
        assert!(contract.is_contract_violation() && !contract.is_format());
        assert!(validation.is_validation() && !validation.is_format());
    }

    #[test]
    fn test_error_messages() {
        let e = FormatError::InvalidHexDigit { ch: 'x', index: 0 };
        assert_eq!(e.to_string(), "invalid hex digit 'x' at index 0");

        let e = RsaError::from(ValidationError::Unaligned {
            bits: 1000,
            granularity: 256,
        });
        assert_eq!(
            e.to_string(),
            "validation error: key size 1000 is not a multiple of 256 bits"
        );
    }
}
