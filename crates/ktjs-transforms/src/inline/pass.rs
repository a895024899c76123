//! Inline pass: expands calls to inline functions across a program.
//!
//! The pass is a `JsVisitorWithContext`. Calls are handled in `end_visit`,
//! after their arguments, so code hoisted out of an argument lands before
//! the code hoisted for the call itself. For each call that resolves to an
//! eligible function the pass
//!
//! 1. takes the insertion point of the enclosing statement,
//! 2. runs the checker pipeline,
//! 3. inlines nested calls in a copy of the callee body,
//! 4. calls the orchestrator with that copy,
//! 5. splices the hoisted code and replaces the call through its context.
//!
//! A call that is a whole expression statement is replaced by the inlined
//! statements. Before a statement is walked, it is rewritten when it holds
//! a call that will hoist code: side-effecting expressions evaluated ahead
//! of the call move into temporaries, and short-circuit operands, `?:`
//! branches and loop conditions holding such a call become statements (see
//! `decomposition`). The rewritten statements are walked in its place.
//! Calls left in conditionally evaluated positions (`switch` case tests,
//! `for` updates) are inlined only when nothing needs hoisting.

use crate::context::Context;
use crate::error::InternalError;
use crate::inline::call_checkers::{CallSite, CompositeCallChecker};
use crate::inline::decomposition::decompose_statement;
use crate::inline::function_table::{CallResolver, ResolvedCall};
use crate::inline::inliner::{CallUsage, FunctionInliner, InlinedBody};
use crate::lowering_context::LoweringContext;
use crate::visitor::{InsertionPoint, JsVisitorWithContext, StatementStack, traverse};
use ktjs_ast::JsNode;
use ktjs_common::DiagnosticBag;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

/// Per-node walk state, pushed in `visit` and popped in `end_visit`.
#[derive(Debug, Default)]
struct Frame {
    /// The node is evaluated only under some condition.
    conditional: bool,
    /// Conditional flag per child, in walk order, for nodes that evaluate
    /// some children conditionally.
    child_flags: SmallVec<[bool; 4]>,
    /// Children from this index on are conditional (`switch` case tests).
    conditional_from: Option<usize>,
    children_seen: usize,
    /// `call;` in statement position: the call is inlined as statements.
    statement_call: bool,
    /// For calls: how the value is used.
    usage: Option<CallUsage>,
    insertion_point: Option<InsertionPoint>,
}

pub struct InlinePass<'a> {
    lowering: &'a mut LoweringContext,
    resolver: &'a dyn CallResolver,
    checker: CompositeCallChecker,
    /// Functions whose bodies are being expanded, outermost first.
    inline_stack: Vec<String>,
    frames: Vec<Frame>,
    inlined: usize,
    error: Option<InternalError>,
}

impl<'a> InlinePass<'a> {
    pub fn new(lowering: &'a mut LoweringContext, resolver: &'a dyn CallResolver) -> Self {
        Self {
            lowering,
            resolver,
            checker: CompositeCallChecker::default_pipeline(),
            inline_stack: Vec::new(),
            frames: Vec::new(),
            inlined: 0,
            error: None,
        }
    }

    /// Replace the default checker pipeline.
    #[must_use]
    pub fn with_checker(mut self, checker: CompositeCallChecker) -> Self {
        self.checker = checker;
        self
    }

    /// Inline every eligible call in `program`. Returns the number of calls
    /// inlined, nested ones included.
    pub fn run(mut self, program: &mut Vec<JsNode>) -> Result<usize, InternalError> {
        if !self.lowering.options.inline_functions {
            debug!("inlining disabled");
            return Ok(0);
        }
        self.lowering.names.reserve_all_in(program);
        traverse(&mut self, program);
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.inlined),
        }
    }

    fn depth_exceeded(&self, callee: &str) -> bool {
        let limit = self.lowering.options.max_inline_depth as usize;
        if self.inline_stack.len() < limit {
            return false;
        }
        warn!(
            callee,
            depth = self.inline_stack.len(),
            "max inline depth reached, call kept"
        );
        true
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    /// Resolve, check and inline `call`. `None` leaves the call as is.
    fn expand(
        &mut self,
        call: &JsNode,
        usage: CallUsage,
        conditional: bool,
    ) -> Result<Option<InlinedBody>, InternalError> {
        let resolver = self.resolver;
        let Some(resolved) = resolver.resolve(call) else {
            return Ok(None);
        };
        let definition = resolved.definition;
        let eligible = run_checks(
            &self.checker,
            &self.inline_stack,
            call,
            &resolved,
            &mut self.lowering.diagnostics,
        );
        if !eligible || self.depth_exceeded(&definition.name) {
            return Ok(None);
        }
        if conditional && self.predictor().predicts(call) {
            debug!(callee = %definition.name, "call in conditional position would hoist code, kept");
            return Ok(None);
        }

        let Some(mut body) = definition.body.clone() else {
            return Err(InternalError::MissingBody {
                callee: definition.name.clone(),
                span: resolved.span,
            });
        };
        self.expand_nested(&resolved, &mut body)?;

        let lowering = &mut *self.lowering;
        let inlined = match FunctionInliner::new(
            &mut lowering.names,
            &lowering.options,
            &lowering.aliases,
        )
        .inline_with_body(call, &resolved, &body, usage)
        {
            Ok(inlined) => inlined,
            Err(InternalError::TraversalTooDeep { node_kind }) => {
                warn!(callee = %definition.name, node = node_kind, "callee body too deep to copy, call kept");
                return Ok(None);
            }
            Err(error) => return Err(error),
        };
        if conditional && inlined.hoists() {
            debug!(callee = %definition.name, "inlined body hoists code in conditional position, call kept");
            return Ok(None);
        }
        self.inlined += 1;
        Ok(Some(inlined))
    }

    /// Inline calls inside `body`, a copy of `resolved`'s body, with the
    /// callee on the inline stack. Reified type parameters refer to their
    /// check functions by the free names the body uses for them.
    fn expand_nested(
        &mut self,
        resolved: &ResolvedCall<'_>,
        body: &mut Vec<JsNode>,
    ) -> Result<(), InternalError> {
        let definition = resolved.definition;
        trace!(callee = %definition.name, depth = self.inline_stack.len(), "expanding callee body");

        self.lowering.aliases.push_scope();
        for (_, parameter) in definition.reified_parameters() {
            self.lowering
                .aliases
                .bind(parameter.name.as_str(), parameter.check_name());
        }
        self.inline_stack.push(definition.name.clone());
        let outer_frames = std::mem::take(&mut self.frames);

        traverse(self, body);

        self.frames = outer_frames;
        self.inline_stack.pop();
        self.lowering.aliases.pop_scope();
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Inline a call used as a value and replace it in place.
    fn inline_value_call(
        &mut self,
        ctx: &mut Context<'_>,
        statements: &mut StatementStack,
        frame: &Frame,
    ) -> Result<(), InternalError> {
        let Some(call) = ctx.current_node().cloned() else {
            return Ok(());
        };
        let Some(inlined) = self.expand(&call, CallUsage::Value, frame.conditional)? else {
            return Ok(());
        };
        let replacement = inlined
            .splice(frame.insertion_point, statements)?
            .ok_or(InternalError::EmptyReplacement {
                node_kind: "CallExpr",
                span: None,
            })?;
        ctx.replace_me(replacement);
        Ok(())
    }

    /// Inline the call of an expression statement and replace the statement
    /// with the inlined code.
    fn inline_statement_call(
        &mut self,
        ctx: &mut Context<'_>,
        statements: &mut StatementStack,
    ) -> Result<(), InternalError> {
        let Some(JsNode::ExpressionStatement(call)) = ctx.current_node().cloned() else {
            return Ok(());
        };
        let Some(inlined) = self.expand(&call, CallUsage::Statement, false)? else {
            return Ok(());
        };
        let mut code = inlined.into_statements();
        let Some(last) = code.pop() else {
            if ctx.can_remove() {
                ctx.remove_me();
            } else {
                ctx.replace_me(JsNode::EmptyStatement);
            }
            return Ok(());
        };
        if !code.is_empty() {
            let point = statements
                .insertion_point()
                .ok_or(InternalError::StaleInsertionPoint {
                    node_kind: "ExpressionStatement",
                })?;
            point.insert_all_before(statements, code)?;
        }
        ctx.replace_me(last);
        Ok(())
    }

    // =========================================================================
    // Decomposition
    // =========================================================================

    /// Rewrite the current statement when it holds a call that will hoist
    /// code (see `decomposition`). Returns whether it was replaced; the
    /// replacement statements are visited next.
    fn decompose(&mut self, ctx: &mut Context<'_>) -> bool {
        let Some(statement) = ctx.current_node_mut() else {
            return false;
        };
        let lowering = &mut *self.lowering;
        let predictor = HoistPredictor {
            resolver: self.resolver,
            checker: &self.checker,
            inline_stack: &self.inline_stack,
            max_depth: lowering.options.max_inline_depth as usize,
        };
        let kind = statement.kind_name();
        let Some(replacement) = decompose_statement(
            statement,
            &mut lowering.names,
            &lowering.options.temp_prefix,
            &mut |call: &JsNode| predictor.predicts(call),
        ) else {
            return false;
        };
        trace!(
            statement = kind,
            statements = replacement.len(),
            "decomposed statement"
        );
        ctx.replace_me_with_all(replacement);
        true
    }

    fn predictor(&self) -> HoistPredictor<'_> {
        HoistPredictor {
            resolver: self.resolver,
            checker: &self.checker,
            inline_stack: &self.inline_stack,
            max_depth: self.lowering.options.max_inline_depth as usize,
        }
    }

    /// Conditional flag and statement-call flag of the next child of the
    /// innermost open node.
    fn next_child_position(&mut self) -> (bool, bool) {
        let Some(parent) = self.frames.last_mut() else {
            return (false, false);
        };
        let index = parent.children_seen;
        parent.children_seen += 1;
        let conditional = parent.conditional
            || parent.child_flags.get(index).copied().unwrap_or(false)
            || parent.conditional_from.is_some_and(|from| index >= from);
        (conditional, parent.statement_call)
    }
}

/// Run the checker pipeline for `call`, reporting into `diagnostics`.
fn run_checks(
    checker: &CompositeCallChecker,
    inline_stack: &[String],
    call: &JsNode,
    resolved: &ResolvedCall<'_>,
    diagnostics: &mut DiagnosticBag,
) -> bool {
    let JsNode::CallExpr { arguments, .. } = call else {
        return false;
    };
    let site = CallSite {
        call,
        resolved,
        arguments,
        inline_stack,
    };
    checker.check(&site, diagnostics).is_eligible()
}

/// Predicts whether a call will hoist code once inlined. Used before the
/// call's arguments are walked, so checks report into a scratch bag.
///
/// A callee whose own body would inline to a single expression still hoists
/// when a call inside it does, so the prediction follows nested calls down
/// to the inline depth limit.
struct HoistPredictor<'p> {
    resolver: &'p dyn CallResolver,
    checker: &'p CompositeCallChecker,
    inline_stack: &'p [String],
    max_depth: usize,
}

impl HoistPredictor<'_> {
    fn predicts(&self, call: &JsNode) -> bool {
        self.predicts_within(call, &mut self.inline_stack.to_vec())
    }

    fn predicts_within(&self, call: &JsNode, stack: &mut Vec<String>) -> bool {
        let JsNode::CallExpr { arguments, .. } = call else {
            return false;
        };
        let Some(resolved) = self.resolver.resolve(call) else {
            return false;
        };
        let mut scratch = DiagnosticBag::new();
        if !run_checks(self.checker, stack, call, &resolved, &mut scratch)
            || stack.len() >= self.max_depth
        {
            return false;
        }
        if FunctionInliner::will_hoist(&resolved, arguments) {
            return true;
        }
        let Some(body) = &resolved.definition.body else {
            return false;
        };
        stack.push(resolved.definition.name.clone());
        let nested = body.iter().any(|node| self.hoists_within(node, stack));
        stack.pop();
        nested
    }

    /// Whether a call in `node`, outside nested functions, will hoist.
    fn hoists_within(&self, node: &JsNode, stack: &mut Vec<String>) -> bool {
        if node.is_function() {
            return false;
        }
        if matches!(node, JsNode::CallExpr { .. }) && self.predicts_within(node, stack) {
            return true;
        }
        node.children()
            .iter()
            .any(|child| self.hoists_within(child, stack))
    }
}

/// Which children of `node` are evaluated conditionally, in walk order.
fn conditional_children(node: &JsNode) -> SmallVec<[bool; 4]> {
    let mut flags = SmallVec::new();
    match node {
        JsNode::LogicalAnd { .. } | JsNode::LogicalOr { .. } => {
            flags.extend([false, true]);
        }
        JsNode::ConditionalExpr { .. } => flags.extend([false, true, true]),
        JsNode::WhileStatement { .. } => flags.extend([true, false]),
        JsNode::DoWhileStatement { .. } => flags.extend([false, true]),
        JsNode::ForStatement {
            initializer,
            condition,
            incrementor,
            ..
        } => {
            if initializer.is_some() {
                flags.push(false);
            }
            if condition.is_some() {
                flags.push(true);
            }
            if incrementor.is_some() {
                flags.push(true);
            }
            flags.push(false);
        }
        _ => {}
    }
    flags
}

impl JsVisitorWithContext for InlinePass<'_> {
    fn visit(&mut self, ctx: &mut Context<'_>, statements: &mut StatementStack) -> bool {
        if self.error.is_none()
            && matches!(ctx, Context::List(_))
            && ctx.current_node().is_some_and(JsNode::is_statement)
            && self.decompose(ctx)
        {
            return false;
        }
        let (parent_conditional, parent_statement_call) = self.next_child_position();

        let Some(node) = ctx.current_node() else {
            self.frames.push(Frame::default());
            return false;
        };
        let is_call = matches!(node, JsNode::CallExpr { .. });
        let frame = Frame {
            conditional: parent_conditional && !node.is_statement(),
            child_flags: conditional_children(node),
            conditional_from: matches!(node, JsNode::SwitchStatement { .. }).then_some(1),
            children_seen: 0,
            statement_call: matches!(node, JsNode::ExpressionStatement(inner)
                if matches!(**inner, JsNode::CallExpr { .. })),
            usage: is_call.then_some(if parent_statement_call {
                CallUsage::Statement
            } else {
                CallUsage::Value
            }),
            insertion_point: if is_call {
                statements.insertion_point()
            } else {
                None
            },
        };
        self.frames.push(frame);
        self.error.is_none()
    }

    fn end_visit(&mut self, ctx: &mut Context<'_>, statements: &mut StatementStack) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        if self.error.is_some() {
            return;
        }
        let result = if frame.usage == Some(CallUsage::Value) {
            self.inline_value_call(ctx, statements, &frame)
        } else if frame.statement_call {
            self.inline_statement_call(ctx, statements)
        } else {
            Ok(())
        };
        if let Err(error) = result {
            self.error = Some(error);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/inline_pass.rs"]
mod tests;
