//! ktjs: the tree-rewriting back end of a Kotlin-to-JavaScript code
//! generator.
//!
//! The member crates do the work; this package re-exports them and adds the
//! driver-side pieces: configuration loading (`config`) and subscriber setup
//! for `tracing` (`tracing_config`).
//!
//! ```no_run
//! use ktjs::{LoweringContext, config, inline::FunctionTable};
//! # fn main() -> anyhow::Result<()> {
//! ktjs::tracing_config::init_tracing();
//! let options = config::load_options(std::path::Path::new("ktjs.json"))?;
//! let mut lowering = LoweringContext::new(options, "Main.kt");
//! let mut program = Vec::new();
//! let table = FunctionTable::new();
//! lowering.inline_program(&mut program, &table)?;
//! # Ok(())
//! # }
//! ```

pub use ktjs_ast as ast;
pub use ktjs_common as common;

pub use ktjs_ast::{JsNode, JsPrinter, NameGenerator};
pub use ktjs_common::{Diagnostic, DiagnosticBag, DiagnosticSeverity, Span};
pub use ktjs_transforms::{
    BuiltinType, CatchClause, ExceptionDispatchLowering, InternalError, LoweringContext,
    LoweringOptions, TryExpression, TypeCheckGenerator, TypeRef, inline, traverse,
};

pub mod config;
pub use config::{load_options, parse_options};

pub mod tracing_config;
