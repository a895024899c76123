//! Call-site eligibility checks.
//!
//! Before a call is inlined it goes through a `CompositeCallChecker`: an
//! ordered list of independent checks. Every check runs (so every finding is
//! reported), each may add diagnostics, and any single veto leaves the call
//! as an ordinary call. Order only affects the order of diagnostics.

use crate::inline::function_table::ResolvedCall;
use crate::type_check::TypeKind;
use ktjs_ast::JsNode;
use ktjs_ast::analysis::{can_have_side_effect, captured_in_closure};
use ktjs_common::DiagnosticBag;
use ktjs_common::diagnostic_codes::{
    INLINE_LOCAL_CAPTURED, RECURSIVE_INLINE_CALL, REIFIED_TYPE_ARGUMENT_REQUIRED,
};
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckVerdict {
    Eligible,
    Veto,
}

impl CheckVerdict {
    pub const fn is_eligible(self) -> bool {
        matches!(self, CheckVerdict::Eligible)
    }
}

/// Everything a check may look at.
pub struct CallSite<'a> {
    pub call: &'a JsNode,
    pub resolved: &'a ResolvedCall<'a>,
    pub arguments: &'a [JsNode],
    /// Names of the functions currently being inlined, outermost first.
    pub inline_stack: &'a [String],
}

impl CallSite<'_> {
    fn callee(&self) -> &str {
        &self.resolved.definition.name
    }

    fn span(&self) -> ktjs_common::Span {
        self.resolved.span.unwrap_or_default()
    }
}

pub trait CallChecker {
    fn name(&self) -> &'static str;
    fn check(&self, site: &CallSite<'_>, diagnostics: &mut DiagnosticBag) -> CheckVerdict;
}

// =============================================================================
// Concrete checks
// =============================================================================

/// The callee is marked inline and has a body to copy.
pub struct InlineBodyChecker;

impl CallChecker for InlineBodyChecker {
    fn name(&self) -> &'static str {
        "inline-body"
    }

    fn check(&self, site: &CallSite<'_>, _diagnostics: &mut DiagnosticBag) -> CheckVerdict {
        let definition = site.resolved.definition;
        if definition.inline && definition.body.is_some() {
            CheckVerdict::Eligible
        } else {
            CheckVerdict::Veto
        }
    }
}

/// A function already being inlined is not expanded again inside itself.
pub struct RecursionChecker;

impl CallChecker for RecursionChecker {
    fn name(&self) -> &'static str {
        "recursion"
    }

    fn check(&self, site: &CallSite<'_>, diagnostics: &mut DiagnosticBag) -> CheckVerdict {
        if !site.inline_stack.iter().any(|name| name == site.callee()) {
            return CheckVerdict::Eligible;
        }
        diagnostics.warning(
            site.span(),
            format!(
                "recursive call to inline function `{}` is left as a call",
                site.callee()
            ),
            RECURSIVE_INLINE_CALL,
        );
        CheckVerdict::Veto
    }
}

/// Every reified type parameter is bound to a type that can be tested at
/// runtime: a concrete type, or a reified parameter of the caller.
pub struct ReifiedTypeArgumentChecker;

impl CallChecker for ReifiedTypeArgumentChecker {
    fn name(&self) -> &'static str {
        "reified-type-argument"
    }

    fn check(&self, site: &CallSite<'_>, diagnostics: &mut DiagnosticBag) -> CheckVerdict {
        let mut verdict = CheckVerdict::Eligible;
        for (index, parameter) in site.resolved.definition.reified_parameters() {
            let message = match site.resolved.type_arguments.get(index) {
                None => format!(
                    "no type argument for reified type parameter `{}` of `{}`",
                    parameter.name,
                    site.callee()
                ),
                Some(argument) => match &argument.kind {
                    TypeKind::TypeParameter {
                        name,
                        reified: false,
                    } => format!(
                        "cannot use `{name}` as reified type parameter `{}` of `{}`: use a class instead",
                        parameter.name,
                        site.callee()
                    ),
                    _ => continue,
                },
            };
            diagnostics.error(site.span(), message, REIFIED_TYPE_ARGUMENT_REQUIRED);
            verdict = CheckVerdict::Veto;
        }
        verdict
    }
}

/// A side-effecting argument is not inlined into a body where a nested
/// function captures its parameter.
pub struct CaptureChecker;

impl CallChecker for CaptureChecker {
    fn name(&self) -> &'static str {
        "capture"
    }

    fn check(&self, site: &CallSite<'_>, diagnostics: &mut DiagnosticBag) -> CheckVerdict {
        let definition = site.resolved.definition;
        let Some(body) = &definition.body else {
            return CheckVerdict::Eligible;
        };
        let mut verdict = CheckVerdict::Eligible;
        for (parameter, argument) in definition.parameters.iter().zip(site.arguments) {
            if can_have_side_effect(argument) && captured_in_closure(body, parameter) {
                diagnostics.warning(
                    site.span(),
                    format!(
                        "parameter `{parameter}` of `{}` is captured by a closure and bound to an expression with side effects; call is not inlined",
                        site.callee()
                    ),
                    INLINE_LOCAL_CAPTURED,
                );
                verdict = CheckVerdict::Veto;
            }
        }
        verdict
    }
}

// =============================================================================
// Pipeline
// =============================================================================

#[derive(Default)]
pub struct CompositeCallChecker {
    checkers: Vec<Box<dyn CallChecker>>,
}

impl CompositeCallChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body, recursion, reified type arguments, capture.
    pub fn default_pipeline() -> Self {
        Self::new()
            .with(InlineBodyChecker)
            .with(RecursionChecker)
            .with(ReifiedTypeArgumentChecker)
            .with(CaptureChecker)
    }

    pub fn push(&mut self, checker: impl CallChecker + 'static) {
        self.checkers.push(Box::new(checker));
    }

    #[must_use]
    pub fn with(mut self, checker: impl CallChecker + 'static) -> Self {
        self.push(checker);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.checkers.iter().map(|c| c.name()).collect()
    }

    /// Run every check; the call is eligible only if none vetoes it.
    pub fn check(&self, site: &CallSite<'_>, diagnostics: &mut DiagnosticBag) -> CheckVerdict {
        let mut verdict = CheckVerdict::Eligible;
        for checker in &self.checkers {
            if checker.check(site, diagnostics) == CheckVerdict::Veto {
                trace!(checker = checker.name(), callee = site.callee(), "call vetoed");
                verdict = CheckVerdict::Veto;
            }
        }
        verdict
    }
}

#[cfg(test)]
#[path = "../../tests/call_checkers.rs"]
mod tests;
