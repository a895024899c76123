//! Common types and utilities for the ktjs code generator.
//!
//! This crate provides foundational types used across all ktjs crates:
//! - Source spans (`Span`)
//! - Diagnostics (`Diagnostic`, `DiagnosticBag`, `DiagnosticSeverity`)
//! - Diagnostic codes emitted by the lowering passes
//! - Centralized limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Diagnostics collected while lowering
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticSeverity};

// Centralized limits and thresholds
pub mod limits;

/// Codes for the diagnostics reported by the lowering passes.
pub mod diagnostic_codes {
    /// A catch clause follows a catch-all clause and can never run.
    pub const UNREACHABLE_CATCH_CLAUSE: u32 = 1001;
    /// The declared type of a catch clause could not be resolved.
    pub const UNRESOLVED_CATCH_TYPE: u32 = 1002;
    /// A reified type parameter was not bound to a concrete type at the call site.
    pub const REIFIED_TYPE_ARGUMENT_REQUIRED: u32 = 1003;
    /// An inline call was kept because the callee body captures a local in a closure.
    pub const INLINE_LOCAL_CAPTURED: u32 = 1004;
    /// An inline function calls itself through the chain currently being inlined.
    pub const RECURSIVE_INLINE_CALL: u32 = 1005;
}
