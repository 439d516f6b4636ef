//! Hash identifier construction.
//!
//! Identifiers are computed as `sha256(domain_separator || canonical_bytes)`
//! and rendered as `ni:///sha-256;<hex>?ver=<CBV version>`.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::canonicalizer::CanonicalTokenStream;
use crate::identifiers::CbvVersion;

/// Domain separator for event hash computation: `b"epcis:event-hash:v1\0"`.
const EVENT_HASH_DOMAIN_SEPARATOR: &[u8] = b"epcis:event-hash:v1\0";

/// Supported digest algorithms for hash identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlg {
    /// SHA-256.
    #[serde(rename = "sha-256")]
    Sha256,
}

impl DigestAlg {
    /// Algorithm name as written in identifiers.
    pub fn as_str(self) -> &'static str {
        match self {
            DigestAlg::Sha256 => "sha-256",
        }
    }
}

/// Error returned when an identifier cannot be produced or parsed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HashIdError {
    /// The stream carries upstream failures and must not be hashed.
    #[error("canonicalization incomplete: {issues} issue(s), first: {first}")]
    CanonicalizationIncomplete {
        /// Number of recorded issues.
        issues: usize,
        /// Message of the first issue.
        first: String,
    },
    /// Text is not a well-formed hash identifier.
    #[error("invalid hash identifier '{0}'")]
    InvalidIdentifier(String),
    /// Version token failed validation.
    #[error("invalid CBV version: {0}")]
    Version(#[from] crate::ValidationError),
}

/// Content-derived event identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashIdentifier {
    alg: DigestAlg,
    digest_hex: String,
    cbv_version: CbvVersion,
}

impl HashIdentifier {
    /// Parses the `ni:///sha-256;<hex>?ver=<version>` form.
    pub fn parse(value: &str) -> Result<Self, HashIdError> {
        let caps = identifier_pattern()
            .captures(value)
            .ok_or_else(|| HashIdError::InvalidIdentifier(value.to_string()))?;
        Ok(Self {
            alg: DigestAlg::Sha256,
            digest_hex: caps[1].to_string(),
            cbv_version: CbvVersion::parse(&caps[2])?,
        })
    }

    /// Digest algorithm.
    pub fn alg(&self) -> DigestAlg {
        self.alg
    }

    /// Lower-case hex digest (64 characters).
    pub fn digest_hex(&self) -> &str {
        &self.digest_hex
    }

    /// CBV version the identifier was generated for.
    pub fn cbv_version(&self) -> &CbvVersion {
        &self.cbv_version
    }
}

impl fmt::Display for HashIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ni:///{};{}?ver={}",
            self.alg.as_str(),
            self.digest_hex,
            self.cbv_version
        )
    }
}

impl FromStr for HashIdentifier {
    type Err = HashIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HashIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HashIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^ni:///sha-256;([0-9a-f]{64})\?ver=(\S+)$").expect("invalid regex")
    })
}

/// Hashes a complete token stream into an identifier.
///
/// Formula: `sha256(domain_separator || stream.to_bytes())`.
///
/// # Example
///
/// ```rust
/// use epcis_canonical::{
///     generate, CanonicalInput, Canonicalizer, CbvVersion, FieldValue, NamespaceContext,
/// };
///
/// let context = NamespaceContext::default();
/// let action = FieldValue::string("OBSERVE");
/// let input = CanonicalInput {
///     event_type: "ObjectEvent",
///     well_known: vec![("action", &action)],
///     extensions: vec![],
/// };
///
/// let stream = Canonicalizer::new(&context).canonicalize(&input)?;
/// let id = generate(&stream, &CbvVersion::default())?;
/// assert!(id.to_string().starts_with("ni:///sha-256;"));
/// assert!(id.to_string().ends_with("?ver=CBV2.0"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`HashIdError::CanonicalizationIncomplete`] when the stream's
/// report records any failure.
pub fn generate(
    stream: &CanonicalTokenStream,
    cbv_version: &CbvVersion,
) -> Result<HashIdentifier, HashIdError> {
    if !stream.is_complete() {
        let first = stream
            .report
            .issues
            .first()
            .map(|issue| issue.message.clone())
            .unwrap_or_else(|| "stream marked invalid".to_string());
        return Err(HashIdError::CanonicalizationIncomplete {
            issues: stream.report.issues.len(),
            first,
        });
    }
    cbv_version.validate()?;

    let mut hasher = Sha256::new();
    hasher.update(EVENT_HASH_DOMAIN_SEPARATOR);
    hasher.update(stream.to_bytes());
    let hash_bytes = hasher.finalize();

    let id = HashIdentifier {
        alg: DigestAlg::Sha256,
        digest_hex: hex::encode(hash_bytes),
        cbv_version: cbv_version.clone(),
    };
    tracing::debug!(%id, tokens = stream.tokens.len(), "generated hash identifier");
    Ok(id)
}
