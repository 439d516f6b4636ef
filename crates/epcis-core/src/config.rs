use std::path::Path;

use epcis_canonical::{
    CbvVersion, NamespaceContext, NamespaceContextBuilder, NamespaceError, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Hashing settings, usually read from a `epcis-hash.toml` file.
///
/// ```toml
/// cbv_version = "CBV2.0"
///
/// [[namespaces]]
/// prefix = "ext1"
/// uri = "https://example.com/ext1/"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HashConfig {
    /// Version token appended to every identifier.
    pub cbv_version: CbvVersion,
    /// Bindings applied after the built-in table, in order.
    pub namespaces: Vec<NamespaceBinding>,
}

/// One `prefix -> uri` binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceBinding {
    /// Prefix as used in qualified names.
    pub prefix: String,
    /// Namespace URI.
    pub uri: String,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            cbv_version: CbvVersion::default(),
            namespaces: Vec::new(),
        }
    }
}

impl HashConfig {
    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: HashConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            cbv_version = %config.cbv_version,
            namespaces = config.namespaces.len(),
            "loaded hash config"
        );
        Ok(config)
    }

    /// Checks the version token and every binding.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cbv_version.validate()?;
        self.context_builder()?;
        Ok(())
    }

    /// Builder holding the built-in table plus this config's bindings, ready
    /// for a document's own `@context` to be layered on top.
    pub fn context_builder(&self) -> Result<NamespaceContextBuilder, NamespaceError> {
        let mut builder = NamespaceContextBuilder::new();
        for binding in &self.namespaces {
            builder.bind(binding.prefix.as_str(), binding.uri.as_str())?;
        }
        Ok(builder)
    }

    /// Frozen context of the built-in table plus this config's bindings.
    pub fn context(&self) -> Result<NamespaceContext, NamespaceError> {
        Ok(self.context_builder()?.build())
    }
}

/// Error loading a [`HashConfig`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// Not valid TOML for this schema.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Bad `cbv_version`.
    #[error("invalid cbv_version: {0}")]
    Version(#[from] ValidationError),
    /// Bad namespace binding.
    #[error("invalid namespace binding: {0}")]
    Namespace(#[from] NamespaceError),
}
