//! Centralized limits and thresholds for the lowering passes.
//!
//! Centralizing these values keeps the traversal engine and the inliner from
//! growing private copies with inconsistent values.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum depth the traversal engine descends into a single tree.
///
/// Deeper subtrees are left unvisited and a warning is logged. Generated code
/// never gets close; the limit only protects against pathological input such
/// as thousands of nested parentheses.
pub const MAX_TRAVERSAL_DEPTH: u32 = 500;

/// Default cap on nested inlining (an inlined body that itself contains
/// inlineable calls). Overridable through `LoweringOptions::max_inline_depth`.
pub const DEFAULT_MAX_INLINE_DEPTH: u32 = 16;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Initial capacity of the statement-context stack. One entry per nested
/// statement list currently being walked.
pub const STATEMENT_STACK_CAPACITY: usize = 32;
