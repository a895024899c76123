//! Internal-invariant violations raised by the lowering passes.
//!
//! These are pass bugs, not user errors: user-facing findings go to the
//! unit's `DiagnosticBag`. Every variant names the node kind involved and,
//! when the failure is tied to a call site or catch clause, its source span.

use ktjs_common::Span;

/// Which flavour of context an operation was attempted on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    List,
    Node,
    Lvalue,
}

impl SlotKind {
    /// Name with its article, for messages.
    pub const fn describe(self) -> &'static str {
        match self {
            SlotKind::List => "a list",
            SlotKind::Node => "a single-slot",
            SlotKind::Lvalue => "an lvalue",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InternalError {
    /// An insert/remove on a context that does not support it, or any
    /// operation on a slot that was already removed.
    ContextMisuse {
        operation: &'static str,
        slot: SlotKind,
        node_kind: &'static str,
    },
    /// A call's argument count differs from the resolved callee's parameters.
    ArityMismatch {
        callee: String,
        expected: usize,
        found: usize,
        span: Option<Span>,
    },
    /// The checker pipeline accepted a call whose callee has no body.
    MissingBody {
        callee: String,
        span: Option<Span>,
    },
    /// A rewrite produced nothing where a node was required.
    EmptyReplacement {
        node_kind: &'static str,
        span: Option<Span>,
    },
    /// An insertion point was used after its statement sequence was left.
    StaleInsertionPoint { node_kind: &'static str },
    /// A node of the wrong kind was handed to an operation.
    UnexpectedNode {
        expected: &'static str,
        found: &'static str,
        span: Option<Span>,
    },
    /// A reified type parameter had no type argument or runtime alias.
    UnboundReifiedParameter { name: String, span: Option<Span> },
    /// A parameter used as an assignment target was bound to a non-name
    /// expression.
    LvalueSubstitution {
        name: String,
        node_kind: &'static str,
    },
    /// A rewrite that must see every node stopped at the traversal depth
    /// limit.
    TraversalTooDeep { node_kind: &'static str },
}

impl InternalError {
    /// Kind of the node the failure was raised for.
    pub fn node_kind(&self) -> &'static str {
        match self {
            InternalError::ContextMisuse { node_kind, .. }
            | InternalError::EmptyReplacement { node_kind, .. }
            | InternalError::StaleInsertionPoint { node_kind }
            | InternalError::LvalueSubstitution { node_kind, .. }
            | InternalError::TraversalTooDeep { node_kind } => *node_kind,
            InternalError::ArityMismatch { .. }
            | InternalError::MissingBody { .. }
            | InternalError::UnboundReifiedParameter { .. } => "CallExpr",
            InternalError::UnexpectedNode { found, .. } => *found,
        }
    }

    /// Source location, when the failure is tied to one.
    pub fn span(&self) -> Option<Span> {
        match self {
            InternalError::ArityMismatch { span, .. }
            | InternalError::MissingBody { span, .. }
            | InternalError::EmptyReplacement { span, .. }
            | InternalError::UnexpectedNode { span, .. }
            | InternalError::UnboundReifiedParameter { span, .. } => *span,
            InternalError::ContextMisuse { .. }
            | InternalError::StaleInsertionPoint { .. }
            | InternalError::LvalueSubstitution { .. }
            | InternalError::TraversalTooDeep { .. } => None,
        }
    }
}

impl std::fmt::Display for InternalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternalError::ContextMisuse {
                operation,
                slot,
                node_kind,
            } => write!(
                f,
                "internal error: `{operation}` is not valid on {} context (node {node_kind})",
                slot.describe()
            )?,
            InternalError::ArityMismatch {
                callee,
                expected,
                found,
                ..
            } => write!(
                f,
                "internal error: call to `{callee}` passes {found} arguments, callee declares {expected}"
            )?,
            InternalError::MissingBody { callee, .. } => write!(
                f,
                "internal error: `{callee}` was accepted for inlining but has no body"
            )?,
            InternalError::EmptyReplacement { node_kind, .. } => write!(
                f,
                "internal error: rewrite of {node_kind} produced no replacement"
            )?,
            InternalError::StaleInsertionPoint { node_kind } => write!(
                f,
                "internal error: insertion point for {node_kind} used after its statement list was left"
            )?,
            InternalError::UnexpectedNode {
                expected, found, ..
            } => write!(f, "internal error: expected {expected}, found {found}")?,
            InternalError::UnboundReifiedParameter { name, .. } => write!(
                f,
                "internal error: reified type parameter `{name}` has no runtime type check"
            )?,
            InternalError::LvalueSubstitution { name, node_kind } => write!(
                f,
                "internal error: assignment target `{name}` was bound to a {node_kind}"
            )?,
            InternalError::TraversalTooDeep { node_kind } => write!(
                f,
                "internal error: traversal depth limit reached below {node_kind}"
            )?,
        }
        if let Some(span) = self.span() {
            write!(f, " at {span}")?;
        }
        Ok(())
    }
}

impl std::error::Error for InternalError {}
