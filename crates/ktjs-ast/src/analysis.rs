//! Structural analyses over the JavaScript target AST.
//!
//! These are conservative, syntax-only questions the inliner asks before it
//! rewrites a callee body:
//! - can evaluating this expression be observed (`can_have_side_effect`)?
//! - how often is a parameter read or assigned (`count_references`)?
//! - which names does a function body declare in its own scope
//!   (`collect_local_declarations`)?
//!
//! "Own scope" means the function body minus any nested function: a nested
//! function expression or declaration opens a new scope and its locals are
//! not the enclosing function's locals.

use crate::node::{JsNode, is_assignment_operator, is_update_operator};
use indexmap::IndexSet;
use rustc_hash::FxHashSet;

// =============================================================================
// Side effects
// =============================================================================

/// Whether evaluating `node` may have an observable effect.
///
/// Calls, `new`, assignments and `++`/`--` are impure. Property reads are
/// treated as pure (getters are not modelled). Statements are always impure.
pub fn can_have_side_effect(node: &JsNode) -> bool {
    match node {
        JsNode::NumericLiteral(_)
        | JsNode::StringLiteral(_)
        | JsNode::BooleanLiteral(_)
        | JsNode::NullLiteral
        | JsNode::Undefined
        | JsNode::Identifier(_)
        | JsNode::This
        | JsNode::FunctionExpr { .. } => false,
        JsNode::BinaryExpr {
            left,
            operator,
            right,
        } => {
            is_assignment_operator(operator)
                || can_have_side_effect(left)
                || can_have_side_effect(right)
        }
        JsNode::PrefixUnaryExpr { operator, operand } => {
            is_update_operator(operator) || operator == "delete" || can_have_side_effect(operand)
        }
        JsNode::PostfixUnaryExpr { .. } | JsNode::CallExpr { .. } | JsNode::NewExpr { .. } => {
            true
        }
        JsNode::PropertyAccess { .. }
        | JsNode::ElementAccess { .. }
        | JsNode::ConditionalExpr { .. }
        | JsNode::Parenthesized(_)
        | JsNode::CommaExpr(_)
        | JsNode::ArrayLiteral(_)
        | JsNode::ObjectLiteral(_)
        | JsNode::LogicalOr { .. }
        | JsNode::LogicalAnd { .. } => node.children().iter().any(|c| can_have_side_effect(c)),
        _ => true,
    }
}

/// Literals and `this`, whose evaluation can be moved or repeated freely.
pub fn is_constant(node: &JsNode) -> bool {
    node.is_literal() || matches!(node, JsNode::This | JsNode::FunctionExpr { .. })
}

/// Expressions cheap enough to duplicate at every use instead of binding a
/// temporary: literals, identifiers and `this`.
pub fn is_trivially_copyable(node: &JsNode) -> bool {
    node.is_literal() || matches!(node, JsNode::Identifier(_) | JsNode::This)
}

// =============================================================================
// Name usage
// =============================================================================

/// How a name is used within a subtree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NameUsage {
    pub reads: usize,
    pub writes: usize,
}

impl NameUsage {
    pub const fn total(&self) -> usize {
        self.reads + self.writes
    }

    pub const fn is_unused(&self) -> bool {
        self.reads == 0 && self.writes == 0
    }
}

/// Count reads and writes of `name` in `nodes`, skipping nested scopes that
/// shadow it.
///
/// `x = v` is a write, `x += v` and `x++` are both a read and a write, and
/// `var x = v` is a write.
pub fn count_references(nodes: &[JsNode], name: &str) -> NameUsage {
    let mut usage = NameUsage::default();
    for node in nodes {
        count_in(node, name, &mut usage);
    }
    usage
}

fn count_in(node: &JsNode, name: &str, usage: &mut NameUsage) {
    match node {
        JsNode::Identifier(n) => {
            if n == name {
                usage.reads += 1;
            }
        }
        JsNode::BinaryExpr {
            left,
            operator,
            right,
        } if is_assignment_operator(operator) && left.as_identifier() == Some(name) => {
            usage.writes += 1;
            if operator != "=" {
                usage.reads += 1;
            }
            count_in(right, name, usage);
        }
        JsNode::PrefixUnaryExpr { operator, operand }
        | JsNode::PostfixUnaryExpr { operand, operator }
            if is_update_operator(operator) && operand.as_identifier() == Some(name) =>
        {
            usage.writes += 1;
            usage.reads += 1;
        }
        JsNode::VarDecl {
            name: declared,
            initializer,
        } => {
            if declared == name && initializer.is_some() {
                usage.writes += 1;
            }
            if let Some(init) = initializer {
                count_in(init, name, usage);
            }
        }
        JsNode::FunctionExpr {
            name: own_name,
            parameters,
            body,
        } => {
            let shadowed = own_name.as_deref() == Some(name)
                || parameters.iter().any(|p| p.name == name)
                || declares_in_own_scope(body, name);
            if !shadowed {
                for stmt in body {
                    count_in(stmt, name, usage);
                }
            }
        }
        JsNode::FunctionDecl {
            parameters, body, ..
        } => {
            let shadowed =
                parameters.iter().any(|p| p.name == name) || declares_in_own_scope(body, name);
            if !shadowed {
                for stmt in body {
                    count_in(stmt, name, usage);
                }
            }
        }
        JsNode::TryStatement {
            try_block,
            catch_clause,
            finally_block,
        } => {
            count_in(try_block, name, usage);
            if let Some(clause) = catch_clause
                && clause.param != name
            {
                for stmt in &clause.body {
                    count_in(stmt, name, usage);
                }
            }
            if let Some(finally_block) = finally_block {
                count_in(finally_block, name, usage);
            }
        }
        _ => {
            for child in node.children() {
                count_in(child, name, usage);
            }
        }
    }
}

/// Count `this` references outside nested functions (which rebind `this`).
pub fn count_this_references(nodes: &[JsNode]) -> usize {
    fn count(node: &JsNode) -> usize {
        match node {
            JsNode::This => 1,
            node if node.is_function() => 0,
            node => node.children().iter().map(|c| count(c)).sum(),
        }
    }
    nodes.iter().map(count).sum()
}

/// Whether a nested function inside `body` refers to `name` as declared in
/// `body`'s scope.
pub fn captured_in_closure(body: &[JsNode], name: &str) -> bool {
    fn visit(node: &JsNode, name: &str) -> bool {
        if node.is_function() {
            return count_references(std::slice::from_ref(node), name).total() > 0;
        }
        node.children().iter().any(|c| visit(c, name))
    }
    body.iter().any(|n| visit(n, name))
}

/// Whether `nodes` contain a `return` outside nested functions.
pub fn contains_return(nodes: &[JsNode]) -> bool {
    fn visit(node: &JsNode) -> bool {
        match node {
            JsNode::ReturnStatement(_) => true,
            node if node.is_function() => false,
            node => node.children().iter().any(|c| visit(c)),
        }
    }
    nodes.iter().any(visit)
}

/// Whether a read of `name` in `nodes` may run after an observable effect
/// in `nodes`.
///
/// Effects are calls, `new`, `delete` and writes to anything but a name
/// declared in `nodes`' own scope. A read in a loop counts when the loop has
/// an effect anywhere, since the next iteration reads again. A read inside a
/// nested function counts when `nodes` have any effect at all.
pub fn read_after_side_effect(nodes: &[JsNode], name: &str) -> bool {
    let locals = collect_local_declarations(nodes).variables;
    let mut order = EffectOrder {
        name,
        locals: &locals,
        effect_seen: false,
        deferred_read: false,
        found: false,
    };
    for node in nodes {
        order.visit(node);
    }
    order.found || (order.deferred_read && order.effect_seen)
}

struct EffectOrder<'a> {
    name: &'a str,
    locals: &'a IndexSet<String>,
    effect_seen: bool,
    deferred_read: bool,
    found: bool,
}

impl EffectOrder<'_> {
    fn read(&mut self) {
        if self.effect_seen {
            self.found = true;
        }
    }

    fn is_local(&self, target: &JsNode) -> bool {
        target
            .as_identifier()
            .is_some_and(|n| self.locals.contains(n))
    }

    fn visit(&mut self, node: &JsNode) {
        match node {
            JsNode::Identifier(n) => {
                if n == self.name {
                    self.read();
                }
            }
            node if node.is_function() => {
                if count_references(std::slice::from_ref(node), self.name).reads > 0 {
                    self.deferred_read = true;
                }
            }
            JsNode::BinaryExpr {
                left,
                operator,
                right,
            } if is_assignment_operator(operator) => {
                match left.as_identifier() {
                    // The old value of `x op= v` is read before `v` runs.
                    Some(target) => {
                        if operator != "=" && target == self.name {
                            self.read();
                        }
                    }
                    None => self.visit(left),
                }
                self.visit(right);
                if !self.is_local(left) {
                    self.effect_seen = true;
                }
            }
            JsNode::PrefixUnaryExpr { operator, operand }
            | JsNode::PostfixUnaryExpr { operator, operand } => {
                self.visit(operand);
                if operator == "delete" || (is_update_operator(operator) && !self.is_local(operand))
                {
                    self.effect_seen = true;
                }
            }
            JsNode::CallExpr { .. } | JsNode::NewExpr { .. } => {
                for child in node.children() {
                    self.visit(child);
                }
                self.effect_seen = true;
            }
            JsNode::WhileStatement { .. }
            | JsNode::DoWhileStatement { .. }
            | JsNode::ForStatement { .. } => {
                for child in node.children() {
                    self.visit(child);
                }
                if self.effect_seen && count_references(std::slice::from_ref(node), self.name).reads > 0
                {
                    self.found = true;
                }
            }
            _ => {
                for child in node.children() {
                    self.visit(child);
                }
            }
        }
    }
}

// =============================================================================
// Declarations
// =============================================================================

/// Names declared in a function body's own scope, in first-declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalDeclarations {
    /// `var` names, nested function declaration names and catch parameters
    pub variables: IndexSet<String>,
    /// Statement labels
    pub labels: IndexSet<String>,
}

pub fn collect_local_declarations(body: &[JsNode]) -> LocalDeclarations {
    let mut decls = LocalDeclarations::default();
    for node in body {
        collect_in(node, &mut decls);
    }
    decls
}

fn collect_in(node: &JsNode, decls: &mut LocalDeclarations) {
    match node {
        JsNode::VarDecl { name, initializer } => {
            decls.variables.insert(name.clone());
            if let Some(init) = initializer {
                collect_in(init, decls);
            }
        }
        JsNode::FunctionDecl { name, .. } => {
            decls.variables.insert(name.clone());
        }
        JsNode::FunctionExpr { .. } => {}
        JsNode::TryStatement { catch_clause, .. } => {
            if let Some(clause) = catch_clause {
                decls.variables.insert(clause.param.clone());
            }
            for child in node.children() {
                collect_in(child, decls);
            }
        }
        JsNode::LabeledStatement { label, statement } => {
            decls.labels.insert(label.clone());
            collect_in(statement, decls);
        }
        _ => {
            for child in node.children() {
                collect_in(child, decls);
            }
        }
    }
}

fn declares_in_own_scope(body: &[JsNode], name: &str) -> bool {
    collect_local_declarations(body).variables.contains(name)
}

/// Every identifier, declared name, parameter and label in `nodes`,
/// including those inside nested functions.
pub fn collect_all_names(nodes: &[JsNode]) -> FxHashSet<String> {
    fn visit(node: &JsNode, out: &mut FxHashSet<String>) {
        match node {
            JsNode::Identifier(name) | JsNode::VarDecl { name, .. } => {
                out.insert(name.clone());
            }
            JsNode::FunctionDecl {
                name, parameters, ..
            } => {
                out.insert(name.clone());
                out.extend(parameters.iter().map(|p| p.name.clone()));
            }
            JsNode::FunctionExpr {
                name, parameters, ..
            } => {
                out.extend(name.iter().cloned());
                out.extend(parameters.iter().map(|p| p.name.clone()));
            }
            JsNode::TryStatement {
                catch_clause: Some(clause),
                ..
            } => {
                out.insert(clause.param.clone());
            }
            JsNode::LabeledStatement { label, .. } => {
                out.insert(label.clone());
            }
            _ => {}
        }
        for child in node.children() {
            visit(child, out);
        }
    }
    let mut out = FxHashSet::default();
    for node in nodes {
        visit(node, &mut out);
    }
    out
}

#[cfg(test)]
#[path = "../tests/analysis.rs"]
mod tests;
