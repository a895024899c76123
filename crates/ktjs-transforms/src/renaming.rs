//! Renaming context for copying a callee body into a call site.
//!
//! A `RenamingContext` collects substitutions (parameter to argument,
//! local to fresh local, label to fresh label, `this` to receiver) and the
//! temporaries that must be declared before the copied body runs. Applying
//! it clones the body and rewrites the clone; the callee definition is never
//! touched, so every call site gets a copy that shares no nodes with any
//! other.
//!
//! Nested functions inside the copied body are alpha-renamed as well: their
//! parameters and locals get fresh names, so a substituted argument can
//! never be captured by an inner binding of the same name.

use crate::context::Context;
use crate::error::InternalError;
use crate::visitor::{JsVisitorWithContext, StatementStack, traverse_checked};
use ktjs_ast::analysis::{
    can_have_side_effect, collect_local_declarations, count_references, count_this_references,
    is_constant, is_trivially_copyable, read_after_side_effect,
};
use ktjs_ast::{JsNode, JsParam, NameGenerator};
use rustc_hash::FxHashMap;

/// What a name is replaced with.
#[derive(Clone, Debug, PartialEq)]
pub enum Substitution {
    /// An expression copied to every use site. Never valid as an
    /// assignment target unless it is itself a name.
    Expression(JsNode),
    /// Another variable name.
    Name(String),
}

impl Substitution {
    fn to_node(&self) -> JsNode {
        match self {
            Substitution::Expression(expr) => expr.clone(),
            Substitution::Name(name) => JsNode::id(name.as_str()),
        }
    }
}

/// Output of `RenamingContext::apply_rename`.
#[derive(Clone, Debug, PartialEq)]
pub struct RenamingResult {
    /// The rewritten copy of the body.
    pub renamed: Vec<JsNode>,
    /// `var` declarations for temporaries, in evaluation order. They must run
    /// before `renamed`.
    pub declarations: Vec<JsNode>,
}

pub struct RenamingContext<'n> {
    names: &'n mut NameGenerator,
    substitutions: FxHashMap<String, Substitution>,
    labels: FxHashMap<String, String>,
    declarations: Vec<JsNode>,
    this_replacement: Option<JsNode>,
}

impl<'n> RenamingContext<'n> {
    pub fn new(names: &'n mut NameGenerator) -> Self {
        Self {
            names,
            substitutions: FxHashMap::default(),
            labels: FxHashMap::default(),
            declarations: Vec::new(),
            this_replacement: None,
        }
    }

    /// Replace every free occurrence of `name` with `replacement`.
    pub fn replace_name(&mut self, name: impl Into<String>, replacement: JsNode) {
        let substitution = match replacement {
            JsNode::Identifier(target) => Substitution::Name(target),
            other => Substitution::Expression(other),
        };
        self.substitutions.insert(name.into(), substitution);
    }

    /// Give local `name` a fresh name and return it.
    pub fn rename_local(&mut self, name: &str) -> String {
        let fresh = self.names.fresh(name);
        self.substitutions
            .insert(name.to_string(), Substitution::Name(fresh.clone()));
        fresh
    }

    /// Give label `label` a fresh name and return it.
    pub fn rename_label(&mut self, label: &str) -> String {
        let fresh = self.names.fresh(label);
        self.labels.insert(label.to_string(), fresh.clone());
        fresh
    }

    /// Declare a temporary initialized with `init` and return its name.
    pub fn new_var(&mut self, base: &str, init: Option<JsNode>) -> String {
        let name = self.names.fresh(base);
        self.declarations.push(JsNode::var_decl(name.as_str(), init));
        name
    }

    /// Bind `this` in the copied body to `receiver`, evaluating the
    /// receiver exactly once.
    pub fn bind_receiver(&mut self, receiver: JsNode, body: &[JsNode]) {
        if receiver_needs_temporary(&receiver, body) {
            let name = self.new_var("receiver", Some(receiver));
            self.this_replacement = Some(JsNode::id(name));
        } else if count_this_references(body) > 0 {
            self.this_replacement = Some(receiver);
        }
    }

    /// Bind each parameter to its argument, through a temporary where
    /// substituting the argument expression directly would change how often
    /// or in which order it is evaluated.
    pub fn alias_arguments(&mut self, params: &[String], args: Vec<JsNode>, body: &[JsNode]) {
        let plan = plan_argument_aliases(params, &args, body);
        for ((param, arg), alias) in params.iter().zip(args).zip(plan) {
            if alias {
                let temp = self.new_var(param, Some(arg));
                self.substitutions
                    .insert(param.clone(), Substitution::Name(temp));
            } else {
                self.replace_name(param.as_str(), arg);
            }
        }
    }

    /// Give every variable and label declared in `body`'s own scope a fresh
    /// name. Parameters are left to `alias_arguments`.
    pub fn rename_locals(&mut self, body: &[JsNode], params: &[String]) {
        let locals = collect_local_declarations(body);
        for name in &locals.variables {
            if !params.contains(name) {
                self.rename_local(name);
            }
        }
        for label in &locals.labels {
            self.rename_label(label);
        }
    }

    /// Temporaries declared so far.
    pub fn declarations(&self) -> &[JsNode] {
        &self.declarations
    }

    /// Copy `body` and apply every substitution to the copy.
    pub fn apply_rename(self, body: &[JsNode]) -> Result<RenamingResult, InternalError> {
        let mut renamed = body.to_vec();
        let mut renamer = Renamer {
            scopes: vec![self.substitutions],
            labels: vec![self.labels],
            names: self.names,
            this_replacement: self.this_replacement,
            function_depth: 0,
            open: Vec::new(),
            error: None,
        };
        traverse_checked(&mut renamer, &mut renamed)?;
        if let Some(error) = renamer.error {
            return Err(error);
        }
        Ok(RenamingResult {
            renamed,
            declarations: self.declarations,
        })
    }
}

/// Whether binding `this` to `receiver` in `body` needs a temporary: the
/// receiver has side effects, or is non-trivial and used more than once.
pub fn receiver_needs_temporary(receiver: &JsNode, body: &[JsNode]) -> bool {
    can_have_side_effect(receiver)
        || (count_this_references(body) > 1 && !is_trivially_copyable(receiver))
}

/// For each argument, whether it must be evaluated into a temporary.
///
/// A temporary is needed when the parameter is assigned or redeclared in the
/// body, when the argument has side effects, when a non-trivial argument is
/// read more than once, when a later argument has side effects that
/// could change this one's value, or when the body may change the
/// argument's value before reading the parameter.
pub fn plan_argument_aliases(params: &[String], args: &[JsNode], body: &[JsNode]) -> Vec<bool> {
    let locals = collect_local_declarations(body);
    let mut plan = vec![false; args.len()];
    let mut later_impure = false;
    for (i, arg) in args.iter().enumerate().rev() {
        let impure = can_have_side_effect(arg);
        if let Some(param) = params.get(i) {
            let usage = count_references(body, param);
            plan[i] = usage.writes > 0
                || locals.variables.contains(param)
                || impure
                || (usage.reads > 1 && !is_trivially_copyable(arg))
                || (!is_constant(arg)
                    && (later_impure || read_after_side_effect(body, param)));
        }
        later_impure |= impure;
    }
    plan
}

// =============================================================================
// Renamer
// =============================================================================

struct Renamer<'n> {
    /// Innermost last; index 0 holds the call-site substitutions.
    scopes: Vec<FxHashMap<String, Substitution>>,
    labels: Vec<FxHashMap<String, String>>,
    names: &'n mut NameGenerator,
    this_replacement: Option<JsNode>,
    function_depth: usize,
    /// One entry per visited node still open: whether it opened a scope.
    open: Vec<bool>,
    error: Option<InternalError>,
}

impl Renamer<'_> {
    fn lookup(&self, name: &str) -> Option<&Substitution> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn lookup_label(&self, label: &str) -> Option<&String> {
        self.labels.iter().rev().find_map(|scope| scope.get(label))
    }

    /// New name for a declaration site, if it is renamed.
    fn declared_name(&self, name: &str) -> Option<String> {
        match self.lookup(name)? {
            Substitution::Name(renamed) => Some(renamed.clone()),
            Substitution::Expression(JsNode::Identifier(renamed)) => Some(renamed.clone()),
            Substitution::Expression(_) => None,
        }
    }

    /// Open a scope for a nested function, renaming its parameters and own
    /// locals (and its own name for a named function expression).
    fn enter_function(
        &mut self,
        own_name: Option<&mut String>,
        params: &mut [JsParam],
        body: &[JsNode],
    ) {
        let mut scope = FxHashMap::default();
        let mut labels = FxHashMap::default();
        if let Some(own_name) = own_name {
            let fresh = self.names.fresh(own_name);
            scope.insert(own_name.clone(), Substitution::Name(fresh.clone()));
            *own_name = fresh;
        }
        for param in params.iter_mut() {
            let fresh = self.names.fresh(&param.name);
            scope.insert(param.name.clone(), Substitution::Name(fresh.clone()));
            param.name = fresh;
        }
        let locals = collect_local_declarations(body);
        for name in locals.variables {
            if !scope.contains_key(&name) {
                let fresh = self.names.fresh(&name);
                scope.insert(name, Substitution::Name(fresh));
            }
        }
        for label in locals.labels {
            let fresh = self.names.fresh(&label);
            labels.insert(label, fresh);
        }
        self.scopes.push(scope);
        self.labels.push(labels);
        self.function_depth += 1;
        if let Some(opened) = self.open.last_mut() {
            *opened = true;
        }
    }

    fn substitute(&mut self, ctx: &mut Context<'_>) {
        let replacement = match ctx.current_node() {
            Some(JsNode::Identifier(name)) => match self.lookup(name) {
                Some(Substitution::Expression(expr))
                    if ctx.is_lvalue() && expr.as_identifier().is_none() =>
                {
                    self.error = Some(InternalError::LvalueSubstitution {
                        name: name.clone(),
                        node_kind: expr.kind_name(),
                    });
                    None
                }
                Some(substitution) => Some(substitution.to_node()),
                None => None,
            },
            Some(JsNode::This) if self.function_depth == 0 => self.this_replacement.clone(),
            _ => None,
        };
        if let Some(replacement) = replacement {
            ctx.replace_me(replacement);
        }
    }
}

impl JsVisitorWithContext for Renamer<'_> {
    fn visit(&mut self, ctx: &mut Context<'_>, _statements: &mut StatementStack) -> bool {
        self.open.push(false);
        if self.error.is_some() {
            return false;
        }
        let Some(node) = ctx.current_node() else {
            return false;
        };

        match node {
            JsNode::Identifier(_) | JsNode::This => {
                self.substitute(ctx);
                return false;
            }
            JsNode::FunctionDecl { name, .. } => {
                let outer = self.declared_name(name);
                if let Some(JsNode::FunctionDecl {
                    name,
                    parameters,
                    body,
                }) = ctx.current_node_mut()
                {
                    if let Some(outer) = outer {
                        *name = outer;
                    }
                    self.enter_function(None, parameters, body);
                }
            }
            JsNode::FunctionExpr { .. } => {
                if let Some(JsNode::FunctionExpr {
                    name,
                    parameters,
                    body,
                }) = ctx.current_node_mut()
                {
                    self.enter_function(name.as_mut(), parameters, body);
                }
            }
            JsNode::VarDecl { name, .. } => {
                if let Some(renamed) = self.declared_name(name)
                    && let Some(JsNode::VarDecl { name, .. }) = ctx.current_node_mut()
                {
                    *name = renamed;
                }
            }
            JsNode::TryStatement {
                catch_clause: Some(clause),
                ..
            } => {
                if let Some(renamed) = self.declared_name(&clause.param)
                    && let Some(JsNode::TryStatement {
                        catch_clause: Some(clause),
                        ..
                    }) = ctx.current_node_mut()
                {
                    clause.param = renamed;
                }
            }
            JsNode::LabeledStatement { label, .. }
            | JsNode::BreakStatement(Some(label))
            | JsNode::ContinueStatement(Some(label)) => {
                if let Some(renamed) = self.lookup_label(label).cloned() {
                    match ctx.current_node_mut() {
                        Some(JsNode::LabeledStatement { label, .. })
                        | Some(JsNode::BreakStatement(Some(label)))
                        | Some(JsNode::ContinueStatement(Some(label))) => *label = renamed,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        true
    }

    fn end_visit(&mut self, _ctx: &mut Context<'_>, _statements: &mut StatementStack) {
        if self.open.pop().unwrap_or(false) {
            self.scopes.pop();
            self.labels.pop();
            self.function_depth -= 1;
        }
    }
}

#[cfg(test)]
#[path = "../tests/renaming.rs"]
mod tests;
