//! Prefix to namespace URI resolution.
//!
//! A [`NamespaceContext`] is built once (built-in table first, then caller
//! bindings in listed order, last write wins) and is read-only afterwards.
//! Resolution never touches the network or the filesystem.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// EPCIS vocabulary namespace. Bare (unprefixed) names resolve here.
pub const EPCIS_NS: &str = "https://ref.gs1.org/epcis/";

/// Core Business Vocabulary namespace.
pub const CBV_NS: &str = "https://ref.gs1.org/cbv/";

/// Reserved prefixes that are always resolvable.
pub const DEFAULT_NAMESPACES: &[(&str, &str)] = &[
    ("epcis", EPCIS_NS),
    ("cbv", CBV_NS),
    ("gs1", "https://gs1.org/voc/"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("schema", "https://schema.org/"),
];

/// Errors raised while building a context or resolving names.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// Prefix is neither bound in the context nor reserved.
    #[error("unresolved prefix '{0}'")]
    UnresolvedPrefix(String),
    /// A binding has an empty prefix or an unusable URI.
    #[error("invalid namespace binding '{prefix}' -> '{uri}'")]
    InvalidNamespace {
        /// Prefix being bound.
        prefix: String,
        /// Offending URI.
        uri: String,
    },
    /// Qualified name with an empty prefix or local part.
    #[error("invalid qualified name '{0}'")]
    InvalidName(String),
}

/// A name after prefix expansion.
///
/// Ordering is by namespace URI, then local name; canonical member order
/// is derived from it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResolvedName {
    /// Full namespace URI.
    pub namespace: String,
    /// Local part.
    pub local: String,
}

impl ResolvedName {
    /// Name in the EPCIS vocabulary.
    pub fn epcis(local: impl Into<String>) -> Self {
        Self {
            namespace: EPCIS_NS.to_string(),
            local: local.into(),
        }
    }
}

impl fmt::Display for ResolvedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace, self.local)
    }
}

/// Immutable prefix -> namespace URI mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceContext {
    entries: BTreeMap<String, String>,
}

impl Default for NamespaceContext {
    fn default() -> Self {
        NamespaceContextBuilder::new().build()
    }
}

impl NamespaceContext {
    /// Built-in table followed by `overrides` in order.
    pub fn with_overrides<I, P, U>(overrides: I) -> Result<Self, NamespaceError>
    where
        I: IntoIterator<Item = (P, U)>,
        P: Into<String>,
        U: Into<String>,
    {
        let mut builder = NamespaceContextBuilder::new();
        for (prefix, uri) in overrides {
            builder.bind(prefix, uri)?;
        }
        Ok(builder.build())
    }

    /// Built-in table followed by the bindings of a JSON-LD `@context` value.
    pub fn from_json_ld(context: &Value) -> Result<Self, NamespaceError> {
        let mut builder = NamespaceContextBuilder::new();
        builder.json_ld(context)?;
        Ok(builder.build())
    }

    /// Resolves a prefix to its namespace URI.
    pub fn resolve(&self, prefix: &str) -> Result<&str, NamespaceError> {
        if let Some(uri) = self.entries.get(prefix) {
            return Ok(uri);
        }
        DEFAULT_NAMESPACES
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, uri)| *uri)
            .ok_or_else(|| NamespaceError::UnresolvedPrefix(prefix.to_string()))
    }

    /// Expands a field key into `(namespace, local)`.
    ///
    /// The key is first expanded to a full IRI:
    /// - an absolute IRI (`scheme://...` or `urn:...`) is taken as is;
    /// - `prefix:local` resolves the prefix through the context;
    /// - a bare name belongs to the EPCIS vocabulary.
    ///
    /// The IRI then splits after its last `#`, `/` or `:`, so every spelling
    /// of the same IRI yields the same name.
    pub fn resolve_name(&self, qualified: &str) -> Result<ResolvedName, NamespaceError> {
        let iri = if is_absolute_iri(qualified) {
            qualified.to_string()
        } else {
            match qualified.split_once(':') {
                Some((prefix, local)) => {
                    if prefix.is_empty() || local.is_empty() {
                        return Err(NamespaceError::InvalidName(qualified.to_string()));
                    }
                    let namespace = self.resolve(prefix)?;
                    tracing::trace!(prefix, namespace, local, "resolved prefixed name");
                    format!("{namespace}{local}")
                }
                None if qualified.is_empty() => {
                    return Err(NamespaceError::InvalidName(String::new()))
                }
                None => format!("{EPCIS_NS}{qualified}"),
            }
        };
        split_iri(&iri).ok_or_else(|| NamespaceError::InvalidName(qualified.to_string()))
    }

    /// Iterates bindings in prefix order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    /// Number of bindings, including the built-in table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context has no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates bindings before freezing them into a [`NamespaceContext`].
#[derive(Debug, Clone)]
pub struct NamespaceContextBuilder {
    entries: BTreeMap<String, String>,
}

impl Default for NamespaceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceContextBuilder {
    /// Starts from the built-in table.
    pub fn new() -> Self {
        let entries = DEFAULT_NAMESPACES
            .iter()
            .map(|(p, u)| (p.to_string(), u.to_string()))
            .collect();
        Self { entries }
    }

    /// Binds `prefix` to `uri`, replacing any earlier binding.
    pub fn bind(
        &mut self,
        prefix: impl Into<String>,
        uri: impl Into<String>,
    ) -> Result<&mut Self, NamespaceError> {
        let prefix = prefix.into();
        let uri = uri.into();
        if prefix.is_empty()
            || prefix.contains(':')
            || uri.is_empty()
            || uri.chars().any(char::is_whitespace)
        {
            return Err(NamespaceError::InvalidNamespace { prefix, uri });
        }
        self.entries.insert(prefix, uri);
        Ok(self)
    }

    /// Applies the bindings of a JSON-LD `@context` value.
    ///
    /// Strings (remote context references) are skipped. Object members bind
    /// when the value is an absolute IRI, either directly or as `@id`; keywords
    /// and term aliases are ignored.
    pub fn json_ld(&mut self, context: &Value) -> Result<&mut Self, NamespaceError> {
        match context {
            Value::Array(items) => {
                for item in items {
                    self.json_ld(item)?;
                }
            }
            Value::Object(map) => {
                for (term, definition) in map {
                    if term.starts_with('@') {
                        continue;
                    }
                    let iri = match definition {
                        Value::String(s) => Some(s.as_str()),
                        Value::Object(def) => def.get("@id").and_then(Value::as_str),
                        _ => None,
                    };
                    match iri {
                        Some(iri) if is_absolute_iri(iri) => {
                            self.bind(term.as_str(), iri)?;
                        }
                        _ => tracing::trace!(term = %term, "skipping non-prefix context term"),
                    }
                }
            }
            Value::String(remote) => {
                tracing::debug!(context = %remote, "remote context not dereferenced");
            }
            _ => {}
        }
        Ok(self)
    }

    /// Freezes the bindings.
    pub fn build(self) -> NamespaceContext {
        NamespaceContext {
            entries: self.entries,
        }
    }
}

fn is_absolute_iri(value: &str) -> bool {
    value.contains("://") || value.starts_with("urn:")
}

fn split_iri(iri: &str) -> Option<ResolvedName> {
    let split = iri.rfind(|c: char| matches!(c, '#' | '/' | ':'))? + 1;
    if split >= iri.len() {
        return None;
    }
    Some(ResolvedName {
        namespace: iri[..split].to_string(),
        local: iri[split..].to_string(),
    })
}
