//! Source spans.
//!
//! A `Span` is a half-open byte range `[start, end)` into the source file the
//! lowered code was generated from. Semantic analysis attaches spans to call
//! sites and catch clauses; the lowering passes only carry them through into
//! diagnostics and internal errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open byte range in a source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Create a new span. `end` is clamped so the span is never inverted.
    pub const fn new(start: u32, end: u32) -> Self {
        Span {
            start,
            end: if end < start { start } else { end },
        }
    }

    /// A span for synthesized code with no source location.
    pub const fn dummy() -> Self {
        Span { start: 0, end: 0 }
    }

    /// Length in bytes.
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
