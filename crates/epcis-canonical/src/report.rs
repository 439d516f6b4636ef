use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Completion status of a canonicalization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    /// Every field resolved and encoded.
    Complete,
    /// At least one field failed; the stream must not be hashed.
    Invalid,
}

/// Stable issue code emitted during canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueCode(String);

impl IssueCode {
    /// Creates a code from a literal.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Code text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single failure recorded against a field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportIssue {
    /// Stable code (`UnresolvedPrefix`, `InvalidValue`, ...).
    pub code: IssueCode,
    /// Dotted path of the offending field.
    pub path: String,
    /// Human-readable detail.
    pub message: String,
}

/// Diagnostics attached to every token stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalizationReport {
    /// Overall status.
    pub status: ReportStatus,
    /// Recorded failures, in walk order.
    pub issues: Vec<ReportIssue>,
    /// Counters such as `tokens` and `max_depth`.
    pub metrics: BTreeMap<String, u64>,
}

impl Default for CanonicalizationReport {
    fn default() -> Self {
        Self {
            status: ReportStatus::Complete,
            issues: Vec::new(),
            metrics: BTreeMap::new(),
        }
    }
}

impl CanonicalizationReport {
    /// Records an issue and marks the report invalid.
    pub fn push_issue(&mut self, issue: ReportIssue) {
        self.status = ReportStatus::Invalid;
        self.issues.push(issue);
    }

    /// Whether the stream may be hashed.
    pub fn is_complete(&self) -> bool {
        self.status == ReportStatus::Complete && self.issues.is_empty()
    }

    pub(crate) fn bump(&mut self, metric: &str, by: u64) {
        *self.metrics.entry(metric.to_string()).or_insert(0) += by;
    }

    pub(crate) fn raise(&mut self, metric: &str, value: u64) {
        let slot = self.metrics.entry(metric.to_string()).or_insert(0);
        *slot = (*slot).max(value);
    }
}
