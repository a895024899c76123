//! Inlining orchestrator: one call expression in, equivalent code out.
//!
//! `FunctionInliner::inline_call` binds the callee's parameters to the call
//! arguments (through temporaries where the aliasing policy requires it),
//! copies and renames the callee body, and shapes the copy for the way the
//! call's value is used:
//!
//! ```text
//! function f(x) { log(x); return x + 1; }
//!
//! var v = f(g());     =>    var x$1 = g();    // declarations
//!                           log(x$1);         // statements
//!                           var v = x$1 + 1;  // result replaces the call
//! ```
//!
//! A body that returns from a nested position becomes a labeled block that
//! assigns a result variable and breaks out of the block instead.
//!
//! The caller inserts `declarations` and `statements` before the statement
//! containing the call (see `InlinedBody::splice`); the callee definition is
//! never modified.

use crate::context::Context;
use crate::error::InternalError;
use crate::inline::function_table::ResolvedCall;
use crate::options::LoweringOptions;
use crate::renaming::{
    RenamingContext, RenamingResult, plan_argument_aliases, receiver_needs_temporary,
};
use crate::type_check::{ReifiedAliases, TypeCheckGenerator};
use crate::visitor::{InsertionPoint, JsVisitorWithContext, StatementStack, traverse_checked};
use ktjs_ast::analysis::{can_have_side_effect, contains_return};
use ktjs_ast::{JsNode, JsParam, NameGenerator};
use tracing::debug;

/// How the value of the call being inlined is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallUsage {
    /// The call is part of a larger expression.
    Value,
    /// The call is a whole expression statement; its value is discarded.
    Statement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InapplicableReason {
    /// The callee is external or abstract.
    NoBody,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InlineOutcome {
    Inlined(InlinedBody),
    /// Leave the call as an ordinary call.
    Inapplicable(InapplicableReason),
}

/// Code produced for one inlined call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InlinedBody {
    /// Temporaries for reified type checks, the receiver and arguments, in
    /// evaluation order, plus the result variable of a labeled body.
    pub declarations: Vec<JsNode>,
    /// The renamed body, minus a final `return`.
    pub statements: Vec<JsNode>,
    /// Replacement for the call expression. `None` for statement usage.
    pub result: Option<JsNode>,
}

impl InlinedBody {
    /// Whether anything must run before the replacement expression.
    pub fn hoists(&self) -> bool {
        !self.declarations.is_empty() || !self.statements.is_empty()
    }

    /// Everything to run before the replacement: declarations, then
    /// statements.
    pub fn hoisted(&mut self) -> Vec<JsNode> {
        let mut hoisted = std::mem::take(&mut self.declarations);
        hoisted.append(&mut self.statements);
        hoisted
    }

    /// Insert the hoisted code before the statement targeted by `point` and
    /// return the replacement expression.
    pub fn splice(
        mut self,
        point: Option<InsertionPoint>,
        statements: &mut StatementStack,
    ) -> Result<Option<JsNode>, InternalError> {
        if self.hoists() {
            let hoisted = self.hoisted();
            let Some(point) = point else {
                return Err(InternalError::StaleInsertionPoint {
                    node_kind: hoisted.first().map_or("<empty>", JsNode::kind_name),
                });
            };
            point.insert_all_before(statements, hoisted)?;
        }
        Ok(self.result)
    }

    /// The whole inlined code as a statement list, for statement usage.
    pub fn into_statements(mut self) -> Vec<JsNode> {
        let mut statements = self.hoisted();
        if let Some(result) = self.result
            && can_have_side_effect(&result)
        {
            statements.push(JsNode::expr_stmt(result));
        }
        statements
    }
}

pub struct FunctionInliner<'a> {
    names: &'a mut NameGenerator,
    options: &'a LoweringOptions,
    aliases: &'a ReifiedAliases,
}

impl<'a> FunctionInliner<'a> {
    pub fn new(
        names: &'a mut NameGenerator,
        options: &'a LoweringOptions,
        aliases: &'a ReifiedAliases,
    ) -> Self {
        Self {
            names,
            options,
            aliases,
        }
    }

    /// Whether inlining `resolved` with `arguments` would put any code
    /// before the replacement expression.
    pub fn will_hoist(resolved: &ResolvedCall<'_>, arguments: &[JsNode]) -> bool {
        let definition = resolved.definition;
        let Some(body) = &definition.body else {
            return false;
        };
        definition.reified_parameters().next().is_some()
            || resolved
                .receiver
                .as_ref()
                .is_some_and(|receiver| receiver_needs_temporary(receiver, body))
            || plan_argument_aliases(&definition.parameters, arguments, body).contains(&true)
            || !matches!(body.as_slice(), [] | [JsNode::ReturnStatement(_)])
    }

    /// Inline `call` using the callee body from its definition.
    pub fn inline_call(
        &mut self,
        call: &JsNode,
        resolved: &ResolvedCall<'_>,
        usage: CallUsage,
    ) -> Result<InlineOutcome, InternalError> {
        let Some(body) = &resolved.definition.body else {
            debug!(callee = %resolved.definition.name, "callee has no body, call kept");
            return Ok(InlineOutcome::Inapplicable(InapplicableReason::NoBody));
        };
        self.inline_with_body(call, resolved, body, usage)
            .map(InlineOutcome::Inlined)
    }

    /// Inline `call` using `body` in place of the definition's body (for
    /// instance a copy in which nested calls were already inlined).
    pub fn inline_with_body(
        &mut self,
        call: &JsNode,
        resolved: &ResolvedCall<'_>,
        body: &[JsNode],
        usage: CallUsage,
    ) -> Result<InlinedBody, InternalError> {
        let definition = resolved.definition;
        let JsNode::CallExpr { arguments, .. } = call else {
            return Err(InternalError::UnexpectedNode {
                expected: "CallExpr",
                found: call.kind_name(),
                span: resolved.span,
            });
        };
        if arguments.len() != definition.parameters.len() {
            return Err(InternalError::ArityMismatch {
                callee: definition.name.clone(),
                expected: definition.parameters.len(),
                found: arguments.len(),
                span: resolved.span,
            });
        }

        let mut renaming = RenamingContext::new(self.names);

        // A reified function refers to the check for `T` as the free name `isT`.
        let generator = TypeCheckGenerator::new(&self.options.runtime_namespace, self.aliases);
        for (index, parameter) in definition.reified_parameters() {
            let unbound = || InternalError::UnboundReifiedParameter {
                name: parameter.name.clone(),
                span: resolved.span,
            };
            let ty = resolved.type_arguments.get(index).ok_or_else(unbound)?;
            let check = generator
                .check(&JsNode::id("value"), ty)?
                .ok_or_else(unbound)?;
            let function = JsNode::func_expr(
                None,
                JsParam::list(&["value"]),
                vec![JsNode::ret(Some(check))],
            );
            let check_name = parameter.check_name();
            let alias = renaming.new_var(&check_name, Some(function));
            renaming.replace_name(check_name, JsNode::id(alias));
        }

        if let Some(receiver) = &resolved.receiver {
            renaming.bind_receiver(receiver.clone(), body);
        }
        renaming.alias_arguments(&definition.parameters, arguments.clone(), body);
        renaming.rename_locals(body, &definition.parameters);

        let RenamingResult {
            renamed,
            declarations,
        } = renaming.apply_rename(body)?;

        let inlined = self.shape(&definition.name, renamed, declarations, usage)?;
        debug!(
            callee = %definition.name,
            arguments = arguments.len(),
            hoisted = inlined.declarations.len() + inlined.statements.len(),
            ?usage,
            "inlined call"
        );
        Ok(inlined)
    }

    /// Turn the renamed body into statements plus a replacement value.
    fn shape(
        &mut self,
        callee: &str,
        mut statements: Vec<JsNode>,
        mut declarations: Vec<JsNode>,
        usage: CallUsage,
    ) -> Result<InlinedBody, InternalError> {
        let tail = match statements.last() {
            Some(JsNode::ReturnStatement(_)) => match statements.pop() {
                Some(JsNode::ReturnStatement(value)) => Some(value.map(|v| *v)),
                _ => None,
            },
            _ => None,
        };

        if !contains_return(&statements) {
            let result = match usage {
                CallUsage::Value => Some(tail.flatten().unwrap_or_else(JsNode::void_0)),
                CallUsage::Statement => {
                    if let Some(Some(value)) = tail
                        && can_have_side_effect(&value)
                    {
                        statements.push(JsNode::expr_stmt(value));
                    }
                    None
                }
            };
            return Ok(InlinedBody {
                declarations,
                statements,
                result,
            });
        }

        // Returns in nested positions: run the body as a labeled block.
        let label = self.names.fresh(callee);
        let result_var = match usage {
            CallUsage::Value => {
                let name = self.names.fresh(&self.options.temp_prefix);
                // Every path through the block assigns when it ends in a return.
                let init = tail.is_none().then(JsNode::void_0);
                declarations.push(JsNode::var_decl(name.as_str(), init));
                Some(name)
            }
            CallUsage::Statement => None,
        };

        let mut rewriter = ReturnRewriter {
            label: &label,
            result_var: result_var.as_deref(),
        };
        traverse_checked(&mut rewriter, &mut statements)?;
        if let Some(value) = tail {
            statements.extend(rewriter.completion(value, false));
        }

        Ok(InlinedBody {
            declarations,
            statements: vec![JsNode::labeled(label.as_str(), JsNode::block(statements))],
            result: result_var.map(JsNode::id),
        })
    }
}

// =============================================================================
// Return rewriting
// =============================================================================

/// Replaces `return e;` with `result = e; break label;` (or `e; break label;`
/// when the value is unused), leaving nested functions alone.
struct ReturnRewriter<'r> {
    label: &'r str,
    result_var: Option<&'r str>,
}

impl ReturnRewriter<'_> {
    /// Statements that complete the block with `value`.
    fn completion(&self, value: Option<JsNode>, exit: bool) -> Vec<JsNode> {
        let mut out = Vec::with_capacity(2);
        match self.result_var {
            Some(var) => out.push(JsNode::expr_stmt(JsNode::assign(
                JsNode::id(var),
                value.unwrap_or_else(JsNode::void_0),
            ))),
            None => {
                if let Some(value) = value
                    && can_have_side_effect(&value)
                {
                    out.push(JsNode::expr_stmt(value));
                }
            }
        }
        if exit {
            out.push(JsNode::break_to(self.label));
        }
        out
    }
}

impl JsVisitorWithContext for ReturnRewriter<'_> {
    fn visit(&mut self, ctx: &mut Context<'_>, _statements: &mut StatementStack) -> bool {
        let value = match ctx.current_node() {
            Some(node) if node.is_function() => return false,
            Some(JsNode::ReturnStatement(value)) => value.as_deref().cloned(),
            _ => return true,
        };
        let mut replacement = self.completion(value, true);
        if ctx.can_insert() {
            let last = replacement.pop().unwrap_or(JsNode::EmptyStatement);
            for node in replacement {
                ctx.insert_before(node);
            }
            ctx.replace_me(last);
        } else {
            ctx.replace_me(JsNode::from_statements(replacement));
        }
        false
    }
}

#[cfg(test)]
#[path = "../../tests/inliner.rs"]
mod tests;
