use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

use crate::value::{Scalar, ScalarType};

/// Largest decimal exponent accepted when expanding `1e5`-style input.
const DECIMAL_EXPONENT_MAX: i64 = 1024;

/// Type marker carried by every canonical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    /// String scalar (`s`).
    #[serde(rename = "s")]
    String,
    /// Number scalar (`n`).
    #[serde(rename = "n")]
    Number,
    /// Boolean scalar (`b`).
    #[serde(rename = "b")]
    Boolean,
    /// Hex-binary scalar (`h`).
    #[serde(rename = "h")]
    HexBinary,
    /// Timestamp scalar (`t`).
    #[serde(rename = "t")]
    Timestamp,
    /// URI scalar (`u`).
    #[serde(rename = "u")]
    Uri,
    /// Array container (`A`).
    #[serde(rename = "A")]
    Array,
    /// Object container (`O`).
    #[serde(rename = "O")]
    Object,
}

impl TypeTag {
    /// Single-byte marker written into the canonical byte sequence.
    pub fn as_byte(self) -> u8 {
        match self {
            TypeTag::String => b's',
            TypeTag::Number => b'n',
            TypeTag::Boolean => b'b',
            TypeTag::HexBinary => b'h',
            TypeTag::Timestamp => b't',
            TypeTag::Uri => b'u',
            TypeTag::Array => b'A',
            TypeTag::Object => b'O',
        }
    }
}

impl From<ScalarType> for TypeTag {
    fn from(ty: ScalarType) -> Self {
        match ty {
            ScalarType::String => TypeTag::String,
            ScalarType::Number => TypeTag::Number,
            ScalarType::Boolean => TypeTag::Boolean,
            ScalarType::HexBinary => TypeTag::HexBinary,
            ScalarType::Timestamp => TypeTag::Timestamp,
            ScalarType::Uri => TypeTag::Uri,
        }
    }
}

/// Canonical rendering of one scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedScalar {
    /// Type marker.
    pub tag: TypeTag,
    /// Canonical text.
    pub text: String,
}

/// Error returned when a value does not fit its declared type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Runtime shape does not match the declared type.
    #[error("expected {expected} value, found {found}")]
    InvalidValue {
        /// Declared type.
        expected: ScalarType,
        /// Offending value as JSON text.
        found: String,
    },
}

/// Encodes a scalar into its canonical token text.
pub fn encode(scalar: &Scalar) -> Result<EncodedScalar, EncodeError> {
    let text = match scalar.ty {
        ScalarType::String => scalar.value.as_str().map(str::to_string),
        ScalarType::Number => match &scalar.value {
            Value::Number(n) => canonical_decimal(&n.to_string()),
            Value::String(s) => canonical_decimal(s),
            _ => None,
        },
        ScalarType::Boolean => match &scalar.value {
            Value::Bool(b) => Some(b.to_string()),
            Value::String(s) if s == "true" || s == "false" => Some(s.clone()),
            _ => None,
        },
        ScalarType::HexBinary => scalar.value.as_str().and_then(canonical_hex),
        ScalarType::Timestamp => scalar
            .value
            .as_str()
            .filter(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok())
            .map(str::to_string),
        ScalarType::Uri => scalar
            .value
            .as_str()
            .filter(|s| !s.is_empty() && !s.chars().any(char::is_whitespace))
            .map(str::to_string),
    };

    text.map(|text| EncodedScalar {
        tag: scalar.ty.into(),
        text,
    })
    .ok_or_else(|| EncodeError::InvalidValue {
        expected: scalar.ty,
        found: scalar.value.to_string(),
    })
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([+-]?)([0-9]+)(?:\.([0-9]+))?(?:[eE]([+-]?[0-9]+))?$")
            .expect("invalid regex")
    })
}

/// Renders a decimal literal in minimal positional form.
///
/// No leading zeros (other than a lone `0`), no trailing fractional zeros,
/// no exponent, and `-0` collapses to `0`.
fn canonical_decimal(input: &str) -> Option<String> {
    let caps = decimal_pattern().captures(input)?;
    let negative = &caps[1] == "-";
    let int_digits = &caps[2];
    let frac_digits = caps.get(3).map_or("", |m| m.as_str());
    let exponent: i64 = match caps.get(4) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if exponent.abs() > DECIMAL_EXPONENT_MAX {
        return None;
    }

    let digits = format!("{int_digits}{frac_digits}");
    let point = int_digits.len() as i64 + exponent;
    let (int_part, frac_part) = if point <= 0 {
        let zeros = "0".repeat(point.unsigned_abs() as usize);
        ("0".to_string(), format!("{zeros}{digits}"))
    } else if point as usize >= digits.len() {
        let zeros = "0".repeat(point as usize - digits.len());
        (format!("{digits}{zeros}"), String::new())
    } else {
        let (i, f) = digits.split_at(point as usize);
        (i.to_string(), f.to_string())
    };

    let int_part = match int_part.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if negative && !(int_part == "0" && frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    Some(out)
}

fn canonical_hex(input: &str) -> Option<String> {
    if input.len() % 2 != 0 || !input.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(input.to_ascii_lowercase())
}
