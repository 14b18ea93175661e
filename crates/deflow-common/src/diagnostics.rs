//! Diagnostics accumulated during a translation run.
//!
//! Every phase returns the diagnostics it produced; the run orchestrator
//! concatenates them. No phase writes to shared mutable state, so the final
//! list is deterministic for a given input.

use crate::span::Span;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

/// Classification of a non-fatal translation issue.
///
/// The set is closed: callers and tests match on these tags to assert on
/// expected failure modes, so new variants are a compatibility event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Raw node kind the wrapper layer does not recognize.
    UnsupportedConstruct,
    /// Incompatible declaration kinds share one qualified path.
    MergeConflict,
    /// Enum/namespace fusion: the namespace contribution is dropped.
    PropertyMissing,
    /// Qualified reference crosses into an unresolvable external module.
    CannotResolveModule,
    /// Qualified reference has no matching symbol at all.
    CannotResolveName,
    /// Value-kind symbol used where only a type is valid.
    TypeAsValue,
}

impl DiagnosticKind {
    /// Stable numeric code, used in human-readable rendering.
    pub const fn code(self) -> u32 {
        match self {
            DiagnosticKind::UnsupportedConstruct => 1001,
            DiagnosticKind::MergeConflict => 1002,
            DiagnosticKind::PropertyMissing => 1003,
            DiagnosticKind::CannotResolveModule => 1004,
            DiagnosticKind::CannotResolveName => 1005,
            DiagnosticKind::TypeAsValue => 1006,
        }
    }

    pub const fn category(self) -> DiagnosticCategory {
        match self {
            DiagnosticKind::UnsupportedConstruct => DiagnosticCategory::Warning,
            DiagnosticKind::MergeConflict => DiagnosticCategory::Error,
            DiagnosticKind::PropertyMissing => DiagnosticCategory::Warning,
            DiagnosticKind::CannotResolveModule => DiagnosticCategory::Error,
            DiagnosticKind::CannotResolveName => DiagnosticCategory::Error,
            DiagnosticKind::TypeAsValue => DiagnosticCategory::Error,
        }
    }
}

/// One non-fatal issue, tied to the qualified path and span it arose at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Dotted qualified path of the declaration or reference involved.
    pub path: String,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        path: impl Into<String>,
        span: Span,
        message: impl Into<String>,
    ) -> Diagnostic {
        let diagnostic = Diagnostic {
            kind,
            path: path.into(),
            span,
            message: message.into(),
        };
        tracing::debug!(
            kind = ?diagnostic.kind,
            path = %diagnostic.path,
            "recorded diagnostic: {}",
            diagnostic.message
        );
        diagnostic
    }

    pub const fn code(&self) -> u32 {
        self.kind.code()
    }

    pub const fn category(&self) -> DiagnosticCategory {
        self.kind.category()
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DF{:04} [{}] {}",
            self.code(),
            self.path,
            self.message
        )
    }
}
