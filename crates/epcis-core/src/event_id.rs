use epcis_canonical::{
    generate, CanonicalizationError, Canonicalizer, CbvVersion, HashIdError, HashIdentifier,
    NamespaceContext,
};

use crate::events::Event;

/// Computes the hash identifier of an event.
///
/// Formula: `sha256(domain_separator || canonical_bytes(event))`, rendered
/// as `ni:///sha-256;<hex>?ver=<cbv_version>`. `eventID` and `recordTime`
/// never contribute, so an event's identifier is stable once assigned.
pub fn compute_event_id(
    event: &Event,
    context: &NamespaceContext,
    cbv_version: &CbvVersion,
) -> Result<HashIdentifier, EventIdError> {
    let input = event.canonical_input();
    let stream = Canonicalizer::new(context).canonicalize(&input)?;
    Ok(generate(&stream, cbv_version)?)
}

/// Computes the identifier and writes it onto the event's identity field.
pub fn assign_event_id(
    event: &mut Event,
    context: &NamespaceContext,
    cbv_version: &CbvVersion,
) -> Result<HashIdentifier, EventIdError> {
    let id = compute_event_id(event, context, cbv_version)?;
    event.set_event_id(&id);
    Ok(id)
}

/// Checks a claimed `eventID` against the recomputed identifier.
///
/// Returns `false` when the event carries no identifier. The claimed
/// identifier's own version suffix is used, so an event hashed under an
/// older CBV release still verifies.
pub fn verify_event_id(event: &Event, context: &NamespaceContext) -> Result<bool, EventIdError> {
    let Some(claimed) = event.event_id() else {
        return Ok(false);
    };
    let claimed = HashIdentifier::parse(claimed)?;
    let expected = compute_event_id(event, context, claimed.cbv_version())?;
    let ok = expected == claimed;
    if !ok {
        tracing::debug!(%claimed, %expected, "event identifier mismatch");
    }
    Ok(ok)
}

/// Error during event ID computation.
#[derive(thiserror::Error, Debug)]
pub enum EventIdError {
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
    /// Identifier construction or parsing failed.
    #[error("hash identifier: {0}")]
    HashId(#[from] HashIdError),
}
