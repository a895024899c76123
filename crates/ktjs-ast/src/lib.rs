//! JavaScript target AST for the ktjs code generator.
//!
//! This crate provides:
//! - The node model (`JsNode`) produced by code generation and rewritten by
//!   the lowering passes, with builder helpers
//! - A debug printer (`JsPrinter`) that renders nodes as JavaScript text
//! - A compilation-unit scoped fresh-name generator (`NameGenerator`)
//! - Structural analyses used by the inliner (side effects, name usage,
//!   local declarations)

pub mod node;
pub use node::{JsCatchClause, JsNode, JsParam, JsProperty, JsSwitchCase};

pub mod printer;
pub use printer::JsPrinter;

pub mod names;
pub use names::NameGenerator;

pub mod analysis;
