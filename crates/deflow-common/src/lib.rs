//! Common types and utilities for the deflow declaration translator.
//!
//! This crate provides foundational types used across all deflow crates:
//! - Source spans (`Span`)
//! - Diagnostics (`Diagnostic`, `DiagnosticKind`, `DiagnosticCategory`)
//! - Translation options (`TranslateOptions`)
//! - Fatal errors (`FatalError`)

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Diagnostics - non-fatal issues accumulated across a translation run
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticKind};

// Options recognized by the core translation contract
pub mod options;
pub use options::TranslateOptions;

// Fatal errors - abort the run with no output
pub mod error;
pub use error::FatalError;
