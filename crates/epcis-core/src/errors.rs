use thiserror::Error;

/// Core error types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Event ID computation failed.
    #[error("event ID computation failed: {0}")]
    EventId(#[from] crate::event_id::EventIdError),
    /// Document could not be read.
    #[error("invalid document: {0}")]
    Document(#[from] crate::document::DocumentError),
    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
}
