//! Exception dispatch lowering.
//!
//! JavaScript has a single untyped `catch`, so a source `try` with typed
//! catch clauses becomes one `catch` binding the thrown value and a chain of
//! runtime type tests, first match wins:
//!
//! ```text
//! try { risky(); }                    try {
//! catch (e: TypeA) { a(); }             risky();
//! catch (e: Throwable) { all(); }     } catch (e) {
//! catch (e: TypeB) { b(); }             if (Kotlin.isType(e, TypeA)) {
//!                                           a();
//!                                       } else {
//!                                           all();
//!                                       }
//!                                     }
//! ```
//!
//! A clause of the root exception type catches everything: it becomes the
//! final `else` and any clause after it is dropped with a warning. Without
//! such a clause the final `else` rethrows. Clauses whose parameter is named
//! differently from the first one start by aliasing the bound variable.

use crate::error::InternalError;
use crate::options::LoweringOptions;
use crate::type_check::{ReifiedAliases, TypeCheckGenerator, TypeRef};
use ktjs_ast::{JsCatchClause, JsNode};
use ktjs_common::diagnostic_codes::{UNREACHABLE_CATCH_CLAUSE, UNRESOLVED_CATCH_TYPE};
use ktjs_common::{DiagnosticBag, Span};
use tracing::debug;

/// A typed catch clause after code generation of its body.
#[derive(Clone, Debug, PartialEq)]
pub struct CatchClause {
    pub parameter: String,
    /// `None` when semantic analysis could not resolve the type.
    pub type_ref: Option<TypeRef>,
    pub body: Vec<JsNode>,
    pub span: Span,
}

impl CatchClause {
    pub fn new(parameter: impl Into<String>, type_ref: TypeRef, body: Vec<JsNode>) -> Self {
        Self {
            parameter: parameter.into(),
            type_ref: Some(type_ref),
            body,
            span: Span::dummy(),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TryExpression {
    pub try_block: Vec<JsNode>,
    pub catch_clauses: Vec<CatchClause>,
    pub finally_block: Option<Vec<JsNode>>,
    pub span: Span,
}

pub struct ExceptionDispatchLowering<'a> {
    options: &'a LoweringOptions,
    aliases: &'a ReifiedAliases,
    diagnostics: &'a mut DiagnosticBag,
}

impl<'a> ExceptionDispatchLowering<'a> {
    pub fn new(
        options: &'a LoweringOptions,
        aliases: &'a ReifiedAliases,
        diagnostics: &'a mut DiagnosticBag,
    ) -> Self {
        Self {
            options,
            aliases,
            diagnostics,
        }
    }

    pub fn lower(&mut self, try_expr: TryExpression) -> Result<JsNode, InternalError> {
        let TryExpression {
            try_block,
            catch_clauses,
            finally_block,
            span,
        } = try_expr;

        let Some(bound) = catch_clauses.first().map(|c| c.parameter.clone()) else {
            return Ok(match finally_block {
                Some(finally_block) => JsNode::try_stmt(try_block, None, Some(finally_block)),
                None => JsNode::Block(try_block),
            });
        };

        let options = self.options;
        let generator = TypeCheckGenerator::new(&options.runtime_namespace, self.aliases);
        let subject = JsNode::id(bound.as_str());
        let mut branches = Vec::new();
        let mut fallback: Option<Vec<JsNode>> = None;

        for clause in catch_clauses {
            let CatchClause {
                parameter,
                type_ref,
                body,
                span: clause_span,
            } = clause;
            let type_name = type_ref
                .as_ref()
                .map_or_else(|| "<unresolved>".to_string(), TypeRef::display_name);

            if fallback.is_some() {
                debug!(
                    parameter = %parameter,
                    ty = %type_name,
                    span = %clause_span,
                    "dropping catch clause after catch-all"
                );
                self.diagnostics.warning(
                    clause_span,
                    format!(
                        "catch clause for `{type_name}` is unreachable: an earlier clause catches every exception"
                    ),
                    UNREACHABLE_CATCH_CLAUSE,
                );
                continue;
            }

            let Some(ty) = type_ref else {
                debug!(
                    parameter = %parameter,
                    span = %clause_span,
                    "dropping catch clause with unresolved type"
                );
                self.diagnostics.error(
                    clause_span,
                    format!("cannot resolve the type of catch parameter `{parameter}`"),
                    UNRESOLVED_CATCH_TYPE,
                );
                continue;
            };

            let body = alias_parameter(&parameter, &bound, body);
            if ty.is_class(&options.throwable_name) {
                fallback = Some(body);
                continue;
            }

            let check = generator
                .check(&subject, &ty)
                .map_err(|err| attach_span(err, clause_span))?;
            match check {
                Some(check) => branches.push((check, body)),
                None => {
                    debug!(
                        parameter = %parameter,
                        ty = %type_name,
                        "dropping catch clause with unchecked type"
                    );
                    self.diagnostics.error(
                        clause_span,
                        format!("cannot check for instance of `{type_name}` at runtime"),
                        UNRESOLVED_CATCH_TYPE,
                    );
                }
            }
        }

        debug!(
            bound = %bound,
            branches = branches.len(),
            catch_all = fallback.is_some(),
            span = %span,
            "lowered catch dispatch"
        );

        let rethrow = || vec![JsNode::throw(JsNode::id(bound.as_str()))];
        let dispatch = if branches.is_empty() {
            fallback.unwrap_or_else(rethrow)
        } else {
            let mut otherwise = JsNode::Block(fallback.unwrap_or_else(rethrow));
            for (check, body) in branches.into_iter().rev() {
                otherwise = JsNode::if_stmt(check, JsNode::Block(body), Some(otherwise));
            }
            vec![otherwise]
        };

        Ok(JsNode::try_stmt(
            try_block,
            Some(JsCatchClause::new(bound.as_str(), dispatch)),
            finally_block,
        ))
    }
}

/// Prefix `var parameter = bound;` when the clause names its parameter
/// differently from the bound variable.
fn alias_parameter(parameter: &str, bound: &str, mut body: Vec<JsNode>) -> Vec<JsNode> {
    if parameter != bound {
        body.insert(0, JsNode::var_decl(parameter, Some(JsNode::id(bound))));
    }
    body
}

fn attach_span(err: InternalError, span: Span) -> InternalError {
    match err {
        InternalError::UnboundReifiedParameter { name, span: None } => {
            InternalError::UnboundReifiedParameter {
                name,
                span: Some(span),
            }
        }
        other => other,
    }
}
