//! Canonicalization and hash identifiers for EPCIS events.
//!
//! Field trees are resolved against an immutable [`NamespaceContext`],
//! encoded leaf by leaf, walked into an order-normalized token stream and
//! hashed into `ni:///sha-256;<hex>?ver=<CBV version>` identifiers.
//! Everything here is pure: no I/O and no shared mutable state.
//!
#![deny(missing_docs)]

/// Structural canonicalization into token streams.
pub mod canonicalizer;
/// Typed leaf encoding.
pub mod encoder;
/// Hash identifier generation and parsing.
pub mod hash_id;
/// Validated identifier newtypes.
pub mod identifiers;
/// Prefix resolution and namespace contexts.
pub mod namespace;
/// Diagnostics attached to token streams.
pub mod report;
/// Validation helpers used by identifier newtypes.
pub mod validation;
/// Field tree types.
pub mod value;

pub use canonicalizer::{
    CanonicalInput, CanonicalTokenStream, CanonicalizationError, Canonicalizer, Token,
};
pub use encoder::{encode, EncodeError, EncodedScalar, TypeTag};
pub use hash_id::{generate, DigestAlg, HashIdError, HashIdentifier};
pub use identifiers::{CbvVersion, TimeZoneOffset};
pub use namespace::{
    NamespaceContext, NamespaceContextBuilder, NamespaceError, ResolvedName, CBV_NS,
    DEFAULT_NAMESPACES, EPCIS_NS,
};
pub use report::{CanonicalizationReport, IssueCode, ReportIssue, ReportStatus};
pub use validation::ValidationError;
pub use value::{FieldMap, FieldValue, Scalar, ScalarType};
