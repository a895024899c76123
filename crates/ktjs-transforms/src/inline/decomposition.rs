//! Expression decomposition ahead of inlining.
//!
//! Inlining a call whose body needs statements moves those statements in
//! front of the statement containing the call. Anything in that statement
//! that JavaScript evaluates *before* the call would then run after the
//! hoisted code, so side-effecting expressions to the left of the call are
//! first moved into temporaries:
//!
//! ```text
//! var v = g() + f(1);      =>    var tmp$1 = g();
//!                                var v = tmp$1 + f(1);   // f's body can now be hoisted
//! ```
//!
//! Only the statement's evaluation spine is searched for such calls: the
//! parts evaluated unconditionally and in order. A hoisting call in a
//! conditionally evaluated part is reached by turning that part into
//! statements first:
//!
//! ```text
//! var v = a && f(1);       =>    var tmp$1 = a;
//!                                if (tmp$1) tmp$1 = f(1);
//!                                var v = tmp$1;
//!
//! while (f(1)) body;       =>    while (true) { if (!f(1)) break; body; }
//! ```
//!
//! The result is a list of statements that replaces the original one and
//! is walked again, so the calls moved into new statements are inlined
//! there. Case tests of `switch`, `for` updates and the condition of a
//! `do`/`while` whose body uses `continue` are not rewritten.

use ktjs_ast::analysis::can_have_side_effect;
use ktjs_ast::node::is_assignment_operator;
use ktjs_ast::{JsNode, NameGenerator};
use smallvec::SmallVec;

/// Rewrite `statement` so that every call `will_hoist` accepts sits on the
/// spine of its own statement with nothing effectful evaluated before it.
///
/// Returns the statements replacing `statement`, in order, or `None` when
/// no rewrite was needed. On `Some`, `statement` is left as `;`.
pub fn decompose_statement(
    statement: &mut JsNode,
    names: &mut NameGenerator,
    temp_prefix: &str,
    will_hoist: &mut dyn FnMut(&JsNode) -> bool,
) -> Option<Vec<JsNode>> {
    let mut decomposer = Decomposer {
        names,
        temp_prefix,
        will_hoist,
        declarations: Vec::new(),
        changed: false,
    };
    if let Some(rewritten) = decomposer.rewrite_statement(statement) {
        *statement = rewritten;
    } else {
        decomposer.decompose(statement);
        if !decomposer.changed && decomposer.declarations.is_empty() {
            return None;
        }
    }
    let mut replacement = decomposer.declarations;
    replacement.push(std::mem::replace(statement, JsNode::EmptyStatement));
    Some(replacement)
}

/// Whether a call satisfying `will_hoist` is on `node`'s spine or in a
/// conditional operand that decomposition can turn into statements.
pub fn has_hoisting_call(
    node: &mut JsNode,
    will_hoist: &mut dyn FnMut(&JsNode) -> bool,
) -> bool {
    if matches!(node, JsNode::CallExpr { .. }) && will_hoist(node) {
        return true;
    }
    let in_conditional = match node {
        JsNode::LogicalAnd { right, .. } | JsNode::LogicalOr { right, .. } => {
            has_hoisting_call(right, will_hoist)
        }
        JsNode::ConditionalExpr {
            when_true,
            when_false,
            ..
        } => has_hoisting_call(when_true, will_hoist) || has_hoisting_call(when_false, will_hoist),
        _ => false,
    };
    in_conditional
        || spine_children(node)
            .into_iter()
            .any(|child| has_hoisting_call(child, will_hoist))
}

struct Decomposer<'a, 'h> {
    names: &'a mut NameGenerator,
    temp_prefix: &'a str,
    will_hoist: &'h mut dyn FnMut(&JsNode) -> bool,
    /// Statements to run before the rewritten one.
    declarations: Vec<JsNode>,
    /// The statement itself changed shape without adding declarations.
    changed: bool,
}

impl Decomposer<'_, '_> {
    /// Statement forms rewritten as a whole: a short-circuit or `?:`
    /// expression statement, and loops whose condition hoists.
    fn rewrite_statement(&mut self, statement: &mut JsNode) -> Option<JsNode> {
        let rewrite = match statement {
            JsNode::ExpressionStatement(expr) => self.hoists_conditionally(expr),
            JsNode::WhileStatement { condition, .. }
            | JsNode::ForStatement {
                condition: Some(condition),
                ..
            } => has_hoisting_call(condition, self.will_hoist),
            // `continue` would skip a condition moved to the end of the body.
            JsNode::DoWhileStatement { body, condition } => {
                !contains_continue(body) && has_hoisting_call(condition, self.will_hoist)
            }
            _ => false,
        };
        if !rewrite {
            return None;
        }
        let rewritten = match std::mem::replace(statement, JsNode::EmptyStatement) {
            JsNode::ExpressionStatement(expr) => branch_statement(*expr),
            JsNode::WhileStatement { condition, body } => JsNode::while_stmt(
                JsNode::BooleanLiteral(true),
                exit_unless_then(*condition, *body),
            ),
            JsNode::ForStatement {
                initializer,
                condition,
                incrementor,
                body,
            } => JsNode::ForStatement {
                initializer,
                condition: None,
                incrementor,
                body: Box::new(match condition {
                    Some(condition) => exit_unless_then(*condition, *body),
                    None => *body,
                }),
            },
            JsNode::DoWhileStatement { body, condition } => {
                let mut statements = into_statement_list(*body);
                statements.push(exit_unless(*condition));
                JsNode::DoWhileStatement {
                    body: Box::new(JsNode::Block(statements)),
                    condition: Box::new(JsNode::BooleanLiteral(true)),
                }
            }
            other => other,
        };
        Some(rewritten)
    }

    fn decompose(&mut self, node: &mut JsNode) {
        if self.rewrite_conditional(node) {
            return;
        }
        if let JsNode::VarDeclList(decls) = node {
            // Earlier declarators may write names a later initializer reads,
            // so they run as statements of their own before it.
            let target = decls
                .iter_mut()
                .position(|decl| has_hoisting_call(decl, self.will_hoist));
            if let Some(target) = target
                && target > 0
            {
                self.declarations.extend(decls.drain(..target));
                self.changed = true;
                if decls.len() == 1
                    && let Some(single) = decls.pop()
                {
                    *node = single;
                }
            }
        }

        let mut children = spine_children(node);
        let Some(target) = children
            .iter_mut()
            .position(|child| has_hoisting_call(child, self.will_hoist))
        else {
            return;
        };
        for child in children.iter_mut().take(target) {
            if can_have_side_effect(child) {
                self.extract(child);
            }
        }
        self.decompose(&mut *children[target]);
    }

    fn extract(&mut self, slot: &mut JsNode) {
        let name = self.names.fresh(self.temp_prefix);
        let value = std::mem::replace(slot, JsNode::id(name.as_str()));
        self.declarations.push(JsNode::var_decl(name, Some(value)));
    }

    fn hoists_conditionally(&mut self, node: &mut JsNode) -> bool {
        match node {
            JsNode::LogicalAnd { right, .. } | JsNode::LogicalOr { right, .. } => {
                has_hoisting_call(right, self.will_hoist)
            }
            JsNode::ConditionalExpr {
                when_true,
                when_false,
                ..
            } => {
                has_hoisting_call(when_true, self.will_hoist)
                    || has_hoisting_call(when_false, self.will_hoist)
            }
            _ => false,
        }
    }

    /// Replace a short-circuit or `?:` value whose conditional operand
    /// hoists with a temporary assigned by an `if`.
    fn rewrite_conditional(&mut self, node: &mut JsNode) -> bool {
        if !self.hoists_conditionally(node) {
            return false;
        }
        let temp = self.names.fresh(self.temp_prefix);
        let assign = |value: JsNode| JsNode::expr_stmt(JsNode::assign(JsNode::id(temp.as_str()), value));
        match std::mem::replace(node, JsNode::id(temp.as_str())) {
            JsNode::LogicalAnd { left, right } => {
                self.declarations.push(JsNode::var_decl(temp.as_str(), Some(*left)));
                self.declarations.push(JsNode::if_stmt(
                    JsNode::id(temp.as_str()),
                    assign(*right),
                    None,
                ));
            }
            JsNode::LogicalOr { left, right } => {
                self.declarations.push(JsNode::var_decl(temp.as_str(), Some(*left)));
                self.declarations.push(JsNode::if_stmt(
                    JsNode::not(JsNode::id(temp.as_str())),
                    assign(*right),
                    None,
                ));
            }
            JsNode::ConditionalExpr {
                condition,
                when_true,
                when_false,
            } => {
                self.declarations.push(JsNode::var_decl(temp.as_str(), None));
                self.declarations.push(JsNode::if_stmt(
                    *condition,
                    assign(*when_true),
                    Some(assign(*when_false)),
                ));
            }
            other => {
                *node = other;
                return false;
            }
        }
        true
    }
}

/// `a && b;` as `if (a) b;`, `a || b;` as `if (!a) b;` and `c ? t : f;` as
/// `if (c) t; else f;`.
fn branch_statement(expr: JsNode) -> JsNode {
    match expr {
        JsNode::LogicalAnd { left, right } => {
            JsNode::if_stmt(*left, JsNode::expr_stmt(*right), None)
        }
        JsNode::LogicalOr { left, right } => {
            JsNode::if_stmt(JsNode::not(*left), JsNode::expr_stmt(*right), None)
        }
        JsNode::ConditionalExpr {
            condition,
            when_true,
            when_false,
        } => JsNode::if_stmt(
            *condition,
            JsNode::expr_stmt(*when_true),
            Some(JsNode::expr_stmt(*when_false)),
        ),
        other => JsNode::expr_stmt(other),
    }
}

/// `if (!condition) break;`
fn exit_unless(condition: JsNode) -> JsNode {
    JsNode::if_stmt(JsNode::not(condition), JsNode::BreakStatement(None), None)
}

/// Loop body that leaves the loop when `condition` fails, then runs `body`.
fn exit_unless_then(condition: JsNode, body: JsNode) -> JsNode {
    let mut statements = vec![exit_unless(condition)];
    statements.extend(into_statement_list(body));
    JsNode::Block(statements)
}

fn into_statement_list(statement: JsNode) -> Vec<JsNode> {
    match statement {
        JsNode::Block(statements) => statements,
        JsNode::EmptyStatement => Vec::new(),
        other => vec![other],
    }
}

/// Whether `node` contains `continue` outside nested functions.
fn contains_continue(node: &JsNode) -> bool {
    match node {
        JsNode::ContinueStatement(_) => true,
        node if node.is_function() => false,
        node => node.children().iter().any(|child| contains_continue(child)),
    }
}

/// Child slots evaluated unconditionally, in evaluation order.
fn spine_children(node: &mut JsNode) -> SmallVec<[&mut JsNode; 4]> {
    let mut out: SmallVec<[&mut JsNode; 4]> = SmallVec::new();
    match node {
        JsNode::BinaryExpr {
            left,
            operator,
            right,
        } => {
            // Assignment targets stay in place; only the value is on the spine.
            if !is_assignment_operator(operator) {
                out.push(left);
            }
            out.push(right);
        }
        JsNode::PrefixUnaryExpr { operand, .. } | JsNode::PostfixUnaryExpr { operand, .. } => {
            out.push(operand);
        }
        JsNode::CallExpr { callee, arguments } | JsNode::NewExpr { callee, arguments } => {
            // Keep `o.m` together so the call still binds `this` to `o`.
            match callee.as_mut() {
                JsNode::PropertyAccess { object, .. } => out.push(object),
                JsNode::ElementAccess { object, index } => {
                    out.push(object);
                    out.push(index);
                }
                callee => out.push(callee),
            }
            out.extend(arguments.iter_mut());
        }
        JsNode::PropertyAccess { object, .. } => out.push(object),
        JsNode::ElementAccess { object, index } => {
            out.push(object);
            out.push(index);
        }
        JsNode::LogicalOr { left, .. } | JsNode::LogicalAnd { left, .. } => out.push(left),
        JsNode::ConditionalExpr { condition, .. } => out.push(condition),
        JsNode::Parenthesized(inner)
        | JsNode::ExpressionStatement(inner)
        | JsNode::ThrowStatement(inner)
        | JsNode::ReturnStatement(Some(inner))
        | JsNode::VarDecl {
            initializer: Some(inner),
            ..
        } => out.push(inner),
        JsNode::CommaExpr(items) | JsNode::ArrayLiteral(items) | JsNode::VarDeclList(items) => {
            out.extend(items.iter_mut());
        }
        JsNode::ObjectLiteral(props) => out.extend(props.iter_mut().map(|p| &mut p.value)),
        JsNode::IfStatement { condition, .. } => out.push(condition),
        JsNode::SwitchStatement { expression, .. } => out.push(expression),
        JsNode::ForStatement {
            initializer: Some(init),
            ..
        } => out.push(init),
        _ => {}
    }
    out
}

#[cfg(test)]
#[path = "../../tests/decomposition.rs"]
mod tests;
