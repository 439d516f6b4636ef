//! Input loading shared by all commands.

use std::io::{self, Read};
use std::path::Path;

use epcis_canonical::{CbvVersion, ValidationError};
use epcis_core::{CoreError, EpcisDocument, HashConfig};

use crate::Source;

/// Errors raised before any event is processed.
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    /// Input file or stdin could not be read.
    #[error("failed to read {what}: {source}")]
    Read {
        /// File path or `stdin`.
        what: String,
        /// Underlying error.
        source: io::Error,
    },
    /// `--cbv-version` is malformed.
    #[error("invalid --cbv-version: {0}")]
    Version(#[from] ValidationError),
    /// Config or document rejected by the core crate.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Loads the config, applying `--cbv-version` on top.
pub fn load_config(source: &Source) -> Result<HashConfig, InputError> {
    let mut config = match &source.config {
        Some(path) => HashConfig::load(Path::new(path)).map_err(CoreError::from)?,
        None => HashConfig::default(),
    };
    if let Some(version) = &source.cbv_version {
        config.cbv_version = CbvVersion::parse(version.as_str())?;
    }
    Ok(config)
}

/// Reads the input document against the config's namespaces.
pub fn load_document(source: &Source, config: &HashConfig) -> Result<EpcisDocument, InputError> {
    let text = match &source.input {
        Some(path) => std::fs::read_to_string(path).map_err(|e| InputError::Read {
            what: path.clone(),
            source: e,
        })?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| InputError::Read {
                    what: "stdin".to_string(),
                    source: e,
                })?;
            buffer
        }
    };

    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| CoreError::from(epcis_core::DocumentError::from(e)))?;
    let builder = config
        .context_builder()
        .map_err(|e| CoreError::from(epcis_core::ConfigError::from(e)))?;
    let document = EpcisDocument::from_json_with(&value, builder).map_err(CoreError::from)?;
    tracing::info!(events = document.events.len(), "loaded input");
    Ok(document)
}
