use serde::Serialize;
use std::fmt;

use crate::encoder::{self, TypeTag};
use crate::namespace::{NamespaceContext, NamespaceError, ResolvedName};
use crate::report::{CanonicalizationReport, IssueCode, ReportIssue};
use crate::value::FieldValue;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    /// A key uses a prefix absent from the context and the built-in table.
    #[error("unresolved prefix '{prefix}' at {path}")]
    UnresolvedPrefix {
        /// Path of the offending key.
        path: String,
        /// Prefix that failed to resolve.
        prefix: String,
    },
    /// A key is not a well-formed qualified name.
    #[error("invalid field name '{name}' at {path}")]
    InvalidName {
        /// Path of the parent object.
        path: String,
        /// Name as written.
        name: String,
    },
    /// A value does not match its declared type.
    #[error("invalid value at {path}: {reason}")]
    InvalidValue {
        /// Path of the offending value.
        path: String,
        /// Encoder message.
        reason: String,
    },
    /// Two keys of one object expand to the same namespace and local name.
    #[error("duplicate field '{name}' at {path}")]
    DuplicateName {
        /// Path of the parent object.
        path: String,
        /// Expanded name.
        name: String,
    },
}

impl CanonicalizationError {
    fn code(&self) -> IssueCode {
        IssueCode::new(match self {
            CanonicalizationError::UnresolvedPrefix { .. } => "UnresolvedPrefix",
            CanonicalizationError::InvalidName { .. } => "InvalidName",
            CanonicalizationError::InvalidValue { .. } => "InvalidValue",
            CanonicalizationError::DuplicateName { .. } => "DuplicateName",
        })
    }

    /// Dotted path of the offending field (`root` for top-level conflicts).
    pub fn path(&self) -> &str {
        match self {
            CanonicalizationError::UnresolvedPrefix { path, .. }
            | CanonicalizationError::InvalidName { path, .. }
            | CanonicalizationError::InvalidValue { path, .. }
            | CanonicalizationError::DuplicateName { path, .. } => path,
        }
    }

    fn from_namespace(err: NamespaceError, path: &Path) -> Self {
        match err {
            NamespaceError::UnresolvedPrefix(prefix) => {
                CanonicalizationError::UnresolvedPrefix {
                    path: path.to_string(),
                    prefix,
                }
            }
            NamespaceError::InvalidName(name)
            | NamespaceError::InvalidNamespace { prefix: name, .. } => {
                CanonicalizationError::InvalidName {
                    path: path.to_string(),
                    name,
                }
            }
        }
    }
}

/// Fields of one event, as handed over by the event model.
///
/// `well_known` must already be in the declaration order of the event type;
/// `extensions` may be in any order.
#[derive(Debug, Clone)]
pub struct CanonicalInput<'a> {
    /// Event type name (e.g. `ObjectEvent`).
    pub event_type: &'a str,
    /// Well-known fields in declaration order.
    pub well_known: Vec<(&'a str, &'a FieldValue)>,
    /// Extension fields.
    pub extensions: Vec<(&'a str, &'a FieldValue)>,
}

/// One entry of the canonical token stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Nesting depth; top-level fields are 0.
    pub depth: u32,
    /// Index of the enclosing container token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    /// Expanded name; absent for array elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<ResolvedName>,
    /// Type marker.
    pub tag: TypeTag,
    /// Canonical value text; member/element count for containers.
    pub value: String,
}

/// Output of canonicalization: ordered tokens plus diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalTokenStream {
    /// Tokens in canonical order.
    pub tokens: Vec<Token>,
    /// Diagnostics; an invalid report blocks hashing.
    pub report: CanonicalizationReport,
}

impl CanonicalTokenStream {
    /// Canonical byte sequence.
    ///
    /// Per token: depth (u32 BE), parent index + 1 (u64 BE, 0 at top level),
    /// tag byte, then namespace, local name and value, each as a u64 BE
    /// length followed by UTF-8 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for token in &self.tokens {
            out.extend_from_slice(&token.depth.to_be_bytes());
            let parent = token.parent.map_or(0u64, |p| p as u64 + 1);
            out.extend_from_slice(&parent.to_be_bytes());
            out.push(token.tag.as_byte());
            let (namespace, local) = token
                .name
                .as_ref()
                .map_or(("", ""), |n| (n.namespace.as_str(), n.local.as_str()));
            for part in [namespace, local, token.value.as_str()] {
                out.extend_from_slice(&(part.len() as u64).to_be_bytes());
                out.extend_from_slice(part.as_bytes());
            }
        }
        out
    }

    /// Whether the stream may be hashed.
    pub fn is_complete(&self) -> bool {
        self.report.is_complete()
    }
}

/// Helper for building field paths in diagnostics.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer bound to one namespace context.
pub struct Canonicalizer<'c> {
    context: &'c NamespaceContext,
}

impl<'c> Canonicalizer<'c> {
    /// Creates a canonicalizer resolving names through `context`.
    pub fn new(context: &'c NamespaceContext) -> Self {
        Self { context }
    }

    /// Produces the token stream, stopping at the first failure.
    pub fn canonicalize(
        &self,
        input: &CanonicalInput<'_>,
    ) -> Result<CanonicalTokenStream, CanonicalizationError> {
        let mut walk = Walk::new(self.context, false);
        walk.run(input)?;
        Ok(walk.finish(input.event_type))
    }

    /// Produces the token stream, recording every failure in the report.
    ///
    /// Offending fields are left out of the tokens and the report is marked
    /// invalid, so the result can be inspected but never hashed.
    pub fn canonicalize_with_report(&self, input: &CanonicalInput<'_>) -> CanonicalTokenStream {
        let mut walk = Walk::new(self.context, true);
        // Collecting mode records failures instead of returning them.
        let _ = walk.run(input);
        walk.finish(input.event_type)
    }
}

struct Walk<'c> {
    context: &'c NamespaceContext,
    collect: bool,
    tokens: Vec<Token>,
    report: CanonicalizationReport,
}

type Members<'v> = Vec<(ResolvedName, &'v FieldValue, Path)>;

impl<'c> Walk<'c> {
    fn new(context: &'c NamespaceContext, collect: bool) -> Self {
        Self {
            context,
            collect,
            tokens: Vec::new(),
            report: CanonicalizationReport::default(),
        }
    }

    fn fail(&mut self, err: CanonicalizationError) -> Result<(), CanonicalizationError> {
        if !self.collect {
            return Err(err);
        }
        self.report.push_issue(ReportIssue {
            code: err.code(),
            path: err.path().to_string(),
            message: err.to_string(),
        });
        Ok(())
    }

    fn push(&mut self, token: Token) -> usize {
        self.report.raise("max_depth", u64::from(token.depth));
        self.tokens.push(token);
        self.tokens.len() - 1
    }

    fn run(&mut self, input: &CanonicalInput<'_>) -> Result<(), CanonicalizationError> {
        let root = Path::root();
        self.push(Token {
            depth: 0,
            parent: None,
            name: Some(ResolvedName::epcis("type")),
            tag: TypeTag::String,
            value: input.event_type.to_string(),
        });

        let mut seen = vec![ResolvedName::epcis("type")];
        let well_known = self.resolve_members(input.well_known.iter().copied(), &root, false)?;
        let extensions = self.resolve_members(input.extensions.iter().copied(), &root, true)?;
        self.report.bump("extension_fields", extensions.len() as u64);

        for (name, value, path) in well_known.into_iter().chain(extensions) {
            if seen.contains(&name) {
                self.fail(CanonicalizationError::DuplicateName {
                    path: root.to_string(),
                    name: name.to_string(),
                })?;
                continue;
            }
            seen.push(name.clone());
            self.emit(Some(name), value, 0, None, &path)?;
        }
        Ok(())
    }

    /// Resolves member names; sorts and deduplicates them when `sort` is set.
    fn resolve_members<'v, I>(
        &mut self,
        members: I,
        parent: &Path,
        sort: bool,
    ) -> Result<Members<'v>, CanonicalizationError>
    where
        I: Iterator<Item = (&'v str, &'v FieldValue)>,
    {
        let mut resolved = Vec::new();
        for (key, value) in members {
            let path = parent.push_field(key);
            match self.context.resolve_name(key) {
                Ok(name) => resolved.push((name, value, path)),
                Err(err) => self.fail(CanonicalizationError::from_namespace(err, &path))?,
            }
        }
        if !sort {
            return Ok(resolved);
        }

        resolved.sort_by(|a, b| a.0.cmp(&b.0));
        let mut unique: Members<'v> = Vec::with_capacity(resolved.len());
        for member in resolved {
            if unique.last().is_some_and(|last| last.0 == member.0) {
                self.fail(CanonicalizationError::DuplicateName {
                    path: parent.to_string(),
                    name: member.0.to_string(),
                })?;
                continue;
            }
            unique.push(member);
        }
        Ok(unique)
    }

    fn emit(
        &mut self,
        name: Option<ResolvedName>,
        value: &FieldValue,
        depth: u32,
        parent: Option<usize>,
        path: &Path,
    ) -> Result<(), CanonicalizationError> {
        match value {
            FieldValue::Scalar(scalar) => match encoder::encode(scalar) {
                Ok(encoded) => {
                    self.push(Token {
                        depth,
                        parent,
                        name,
                        tag: encoded.tag,
                        value: encoded.text,
                    });
                    Ok(())
                }
                Err(err) => self.fail(CanonicalizationError::InvalidValue {
                    path: path.to_string(),
                    reason: err.to_string(),
                }),
            },
            FieldValue::Array(items) => {
                let idx = self.push(Token {
                    depth,
                    parent,
                    name,
                    tag: TypeTag::Array,
                    value: items.len().to_string(),
                });
                for (i, item) in items.iter().enumerate() {
                    self.emit(None, item, depth + 1, Some(idx), &path.push_index(i))?;
                }
                Ok(())
            }
            FieldValue::Object(map) => {
                let members = self.resolve_members(map.iter(), path, true)?;
                let idx = self.push(Token {
                    depth,
                    parent,
                    name,
                    tag: TypeTag::Object,
                    value: members.len().to_string(),
                });
                for (child_name, child, child_path) in members {
                    self.emit(Some(child_name), child, depth + 1, Some(idx), &child_path)?;
                }
                Ok(())
            }
        }
    }

    fn finish(mut self, event_type: &str) -> CanonicalTokenStream {
        self.report.bump("tokens", self.tokens.len() as u64);
        tracing::debug!(
            event_type,
            tokens = self.tokens.len(),
            status = ?self.report.status,
            issues = self.report.issues.len(),
            "canonicalized event"
        );
        CanonicalTokenStream {
            tokens: self.tokens,
            report: self.report,
        }
    }
}
