//! Per-compilation-unit lowering state.
//!
//! One `LoweringContext` exists per unit. It owns the fresh-name generator
//! (so names stay unique across every inlining of the unit), the unit's
//! diagnostics and the reified type-parameter aliases, and lends them to
//! one pass at a time.

use crate::error::InternalError;
use crate::inline::{CallResolver, InlinePass};
use crate::options::LoweringOptions;
use crate::try_lowering::{ExceptionDispatchLowering, TryExpression};
use crate::type_check::ReifiedAliases;
use ktjs_ast::{JsNode, NameGenerator};
use ktjs_common::DiagnosticBag;

#[derive(Debug, Default)]
pub struct LoweringContext {
    pub options: LoweringOptions,
    pub names: NameGenerator,
    pub diagnostics: DiagnosticBag,
    pub aliases: ReifiedAliases,
}

impl LoweringContext {
    pub fn new(options: LoweringOptions, file_name: impl Into<String>) -> Self {
        Self {
            options,
            names: NameGenerator::new(),
            diagnostics: DiagnosticBag::with_file(file_name),
            aliases: ReifiedAliases::new(),
        }
    }

    /// Keep every name already used in `program` out of the fresh-name pool.
    /// Call this for each tree whose names must not collide with generated
    /// ones, including callee bodies defined outside the program.
    pub fn reserve_program_names(&mut self, program: &[JsNode]) {
        self.names.reserve_all_in(program);
    }

    /// Lower a try expression with typed catch clauses.
    pub fn lower_try(&mut self, try_expr: TryExpression) -> Result<JsNode, InternalError> {
        ExceptionDispatchLowering::new(&self.options, &self.aliases, &mut self.diagnostics)
            .lower(try_expr)
    }

    /// Inline every eligible call in `program`, resolving calls through
    /// `resolver`. Returns the number of calls inlined.
    pub fn inline_program(
        &mut self,
        program: &mut Vec<JsNode>,
        resolver: &dyn CallResolver,
    ) -> Result<usize, InternalError> {
        InlinePass::new(self, resolver).run(program)
    }

    /// Hand over the collected diagnostics.
    pub fn into_diagnostics(self) -> DiagnosticBag {
        self.diagnostics
    }
}
