//! Host diagnostics
//!
//! The structured error/warning objects returned to the host. Translation
//! is a presentation concern only: every error becomes exactly one
//! diagnostic, and nothing here reclassifies severity or retryability.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// One failure or note reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    /// Translates one error into one diagnostic. The error's cause chain is
    /// flattened into the detail text, one cause per paragraph, so nothing
    /// below the surface message is lost.
    pub fn from_error(summary: impl Into<String>, error: &anyhow::Error) -> Self {
        let detail = error
            .chain()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n\n");
        Self::error(summary, detail)
    }
}

/// Zero or more diagnostics attached to a lifecycle response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A response carrying exactly one error translated from `error`.
    pub fn from_error(summary: impl Into<String>, error: &anyhow::Error) -> Self {
        Self(vec![Diagnostic::from_error(summary, error)])
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.0
            .iter()
            .any(|diagnostic| diagnostic.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn one_error_becomes_one_diagnostic() {
        let error = anyhow::anyhow!("quota exceeded");
        let diagnostics = Diagnostics::from_error("performing create", &error);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.has_errors());
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.summary, "performing create");
        assert!(diagnostic.detail.contains("quota exceeded"));
    }

    #[test]
    fn cause_chains_flatten_with_blank_line_separators() {
        let error = anyhow::anyhow!("connection refused")
            .context("calling the volumes API")
            .context("creating volume demo");
        let diagnostic = Diagnostic::from_error("performing create", &error);
        assert_eq!(
            diagnostic.detail,
            "creating volume demo\n\ncalling the volumes API\n\nconnection refused"
        );
    }
}
