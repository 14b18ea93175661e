//! Source location tracking.
//!
//! Spans are byte offsets into the source text the external parser consumed.
//! They travel with every wrapped declaration so diagnostics can point back
//! at the originating declaration even though this crate never sees the
//! source text itself.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` in the original source.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span used for synthesized declarations with no source counterpart.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    pub const fn new(start: u32, end: u32) -> Span {
        Span { start, end }
    }

    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
