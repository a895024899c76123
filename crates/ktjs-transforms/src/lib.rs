//! Tree rewrites for the ktjs code generator.
//!
//! - Traversal engine (`visitor`) over slot contexts (`context`), with a
//!   statement stack and insertion points for hoisting code
//! - Renaming of copied callee bodies (`renaming`)
//! - Function inlining (`inline`)
//! - Exception dispatch lowering for typed catch clauses (`try_lowering`)
//!   on top of the runtime type-check generator (`type_check`)
//!
//! `LoweringContext` holds the per-unit state every pass borrows.

pub mod context;
pub use context::{Context, ListContext, NodeContext};

pub mod error;
pub use error::{InternalError, SlotKind};

pub mod inline;

pub mod lowering_context;
pub use lowering_context::LoweringContext;

pub mod options;
pub use options::LoweringOptions;

pub mod renaming;
pub use renaming::{RenamingContext, RenamingResult, Substitution};

pub mod try_lowering;
pub use try_lowering::{CatchClause, ExceptionDispatchLowering, TryExpression};

pub mod type_check;
pub use type_check::{BuiltinType, ReifiedAliases, TypeCheckGenerator, TypeKind, TypeRef};

pub mod visitor;
pub use visitor::{
    InsertionPoint, JsVisitorWithContext, StatementStack, Walker, traverse,
    traverse_as_statement, traverse_checked,
};
