// RSA Key Codec
// Canonical text form of a key: "<modulus hex>, <exponent hex>"

use std::fmt;
use std::str::FromStr;

use super::bigint::RsaBigInt;
use super::error::FormatError;
use super::key::RsaKey;

/// How a hex value was written, so a result can be rendered the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HexStyle {
    /// `Some('x')` or `Some('X')` when the text carried a `0x`/`0X` prefix
    pub prefix: Option<char>,
    pub uppercase: bool,
}

impl HexStyle {
    /// Render `value` with this style: prefix echoed, digits in the recorded case,
    /// no leading zeros beyond a single `0`.
    pub fn render(&self, value: &RsaBigInt) -> String {
        let digits = if self.uppercase {
            format!("{:X}", value)
        } else {
            format!("{:x}", value)
        };

        match self.prefix {
            Some(x) => format!("0{x}{digits}"),
            None => digits,
        }
    }
}

/// Parse a hex big integer with an optional `0x`/`0X` prefix.
///
/// Surrounding whitespace is not accepted here; callers trim when their format allows it.
pub fn parse_hex(text: &str) -> Result<(RsaBigInt, HexStyle), FormatError> {
    let (prefix, digits) = match text.as_bytes() {
        [b'0', x @ (b'x' | b'X'), ..] => (Some(*x as char), &text[2..]),
        _ => (None, text),
    };
    let offset = text.len() - digits.len();

    if digits.is_empty() {
        return Err(FormatError::EmptyField);
    }

    // hex::decode reports bytes, so non-ASCII input is caught here by char
    if let Some((index, ch)) = digits.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        return Err(FormatError::InvalidHexDigit {
            ch,
            index: offset + index,
        });
    }

    // hex::decode wants whole bytes
    let padded;
    let even = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        padded.as_str()
    } else {
        digits
    };

    let bytes = hex::decode(even).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, index } => FormatError::InvalidHexDigit {
            ch: c,
            index: offset + index - (even.len() - digits.len()),
        },
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            FormatError::EmptyField
        }
    })?;

    let has_upper = digits.bytes().any(|b| matches!(b, b'A'..=b'F'));
    let has_lower = digits.bytes().any(|b| matches!(b, b'a'..=b'f'));

    // digits without letters take their case from the prefix
    let uppercase = if has_upper || has_lower {
        has_upper && !has_lower
    } else {
        prefix == Some('X')
    };

    let style = HexStyle { prefix, uppercase };

    Ok((RsaBigInt::from_bytes_be(&bytes), style))
}

/// Parse the canonical two-field text form.
///
/// Exactly one comma; each field is trimmed and may carry a `0x` prefix.
pub fn parse_key(text: &str) -> Result<RsaKey, FormatError> {
    let fields: Vec<&str> = text.split(',').collect();
    let [modulus, exponent] = fields.as_slice() else {
        return Err(FormatError::WrongFieldCount {
            found: fields.len(),
        });
    };

    let (modulus, _) = parse_hex(modulus.trim())?;
    let (exponent, _) = parse_hex(exponent.trim())?;

    Ok(RsaKey::new(modulus, exponent))
}

/// Render the canonical form: lowercase, unprefixed, one space after the comma.
pub fn render_key(key: &RsaKey) -> String {
    format!("{:x}, {:x}", key.modulus(), key.exponent())
}

impl FromStr for RsaKey {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key(s)
    }
}

impl fmt::Display for RsaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_key(self))
    }
}

impl fmt::Debug for RsaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RsaKey(\"{}\")", render_key(self))
    }
}
