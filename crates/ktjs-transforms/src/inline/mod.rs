//! Function inlining.
//!
//! - `function_table`: call resolution (`CallResolver`, `FunctionTable`)
//! - `call_checkers`: the eligibility pipeline run before each inlining
//! - `decomposition`: evaluation-order preserving temporaries
//! - `inliner`: the orchestrator that inlines one call
//! - `pass`: the driver that walks a program and inlines every eligible call

pub mod call_checkers;
pub mod decomposition;
pub mod function_table;
pub mod inliner;
pub mod pass;

pub use call_checkers::{CallChecker, CallSite, CheckVerdict, CompositeCallChecker};
pub use function_table::{
    CallResolver, FunctionDefinition, FunctionTable, ResolvedCall, TypeParameterDef,
};
pub use inliner::{
    CallUsage, FunctionInliner, InapplicableReason, InlineOutcome, InlinedBody,
};
pub use pass::InlinePass;
