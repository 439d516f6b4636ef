//! EPCIS event model and event identifiers.
//!
//! This crate provides:
//! - Event types with their well-known field tables
//! - Typed sub-objects (read point, quantities, sensor reports, ...)
//! - A fluent [`EventBuilder`]
//! - EPCIS JSON / JSON-LD document ingestion
//! - Event ID computation, write-back and verification
//!
//! Core invariants:
//! - Event IDs are content-derived: `H(domain_separator || canonical_bytes(event))`
//! - `eventID` and `recordTime` never contribute to the hash
//! - Settings are passed explicitly through [`HashConfig`]; there is no global state
//!
#![deny(missing_docs)]

/// Event builder.
pub mod builder;
/// Hash settings loaded from TOML.
pub mod config;
/// Document ingestion.
pub mod document;
/// Error types for core operations.
pub mod errors;
/// Event ID computation, assignment and verification.
pub mod event_id;
/// Event types and well-known field tables.
pub mod events;
/// Structured sub-objects shared across event types.
pub mod shared;

pub use builder::EventBuilder;
pub use config::{ConfigError, HashConfig, NamespaceBinding};
pub use document::{event_from_json, DocumentError, EpcisDocument};
pub use errors::CoreError;
pub use event_id::{assign_event_id, compute_event_id, verify_event_id, EventIdError};
pub use events::{Action, Event, EventType};
pub use shared::{
    BizLocation, BizTransaction, ErrorDeclaration, PersistentDisposition, QuantityElement,
    ReadPoint, SensorElement, SensorMetadata, SensorReport, SourceDest,
};
