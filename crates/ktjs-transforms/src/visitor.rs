//! Traversal engine with in-place editing.
//!
//! `Walker` drives a `JsVisitorWithContext` over a tree. For every child slot
//! it builds the matching `Context` (list, single slot or lvalue), calls
//! `visit`, descends into the occupant unless the visitor declined, removed
//! or replaced it, and finally calls `end_visit` unless the slot was removed.
//!
//! # Statement positions
//!
//! Single statement slots (`if` branches, loop bodies, labeled statements)
//! are walked as one-element statement lists so a visitor can expand a
//! statement into several. Afterwards the list is collapsed back: one
//! statement is stored unwrapped, several are wrapped in a block, none
//! becomes `;`.
//!
//! # Statement stack
//!
//! Every statement list being walked pushes a frame on the `StatementStack`.
//! A visitor deep inside an expression asks the stack for an
//! `InsertionPoint`, which targets the statement of the innermost list that
//! contains the current node. Nodes inserted through it are spliced in
//! immediately before that statement once the walker finishes with it.
//!
//! ```text
//! var a = f(g());        // visiting g(): the insertion point targets this
//!                        // statement; hoisted nodes land above it
//! ```

use crate::context::{Context, ListContext};
use crate::error::{InternalError, SlotKind};
use ktjs_ast::JsNode;
use ktjs_ast::node::{is_assignment_operator, is_update_operator};
use ktjs_common::limits::{MAX_TRAVERSAL_DEPTH, STATEMENT_STACK_CAPACITY};
use tracing::warn;

/// Callbacks invoked by `Walker`.
pub trait JsVisitorWithContext {
    /// Called before the children of the current node. Return `false` to
    /// skip them. Children are also skipped when the node was removed or
    /// replaced.
    fn visit(&mut self, _ctx: &mut Context<'_>, _statements: &mut StatementStack) -> bool {
        true
    }

    /// Called after the children, unless the node was removed.
    fn end_visit(&mut self, _ctx: &mut Context<'_>, _statements: &mut StatementStack) {}
}

// =============================================================================
// Statement stack
// =============================================================================

#[derive(Debug)]
struct StatementFrame {
    id: u64,
    /// Incremented for every element of the list, so an insertion point
    /// taken for one statement cannot be used for the next.
    element: u64,
    pending: Vec<JsNode>,
}

/// Innermost-last stack of the statement lists currently being walked.
#[derive(Debug)]
pub struct StatementStack {
    frames: Vec<StatementFrame>,
    next_id: u64,
}

impl Default for StatementStack {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementStack {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(STATEMENT_STACK_CAPACITY),
            next_id: 0,
        }
    }

    /// Number of enclosing statement lists.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Handle on the statement of the innermost list that contains the node
    /// being visited, or `None` outside any statement list.
    pub fn insertion_point(&self) -> Option<InsertionPoint> {
        self.frames.last().map(|frame| InsertionPoint {
            frame_id: frame.id,
            element: frame.element,
        })
    }

    fn push_frame(&mut self) {
        self.next_id += 1;
        self.frames.push(StatementFrame {
            id: self.next_id,
            element: 0,
            pending: Vec::new(),
        });
    }

    fn pop_frame(&mut self) {
        self.frames.pop();
    }

    fn begin_element(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.element += 1;
        }
    }

    fn take_pending(&mut self) -> Vec<JsNode> {
        self.frames
            .last_mut()
            .map(|frame| std::mem::take(&mut frame.pending))
            .unwrap_or_default()
    }
}

/// A position just before one statement of a statement list.
///
/// Obtained from `StatementStack::insertion_point` while the statement (or
/// something inside it) is being visited. Only valid until the walker moves
/// on to the next statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertionPoint {
    frame_id: u64,
    element: u64,
}

impl InsertionPoint {
    /// Insert `nodes` immediately before the target statement, in order.
    /// Nodes inserted this way are not visited by the current walk.
    pub fn insert_all_before(
        &self,
        statements: &mut StatementStack,
        nodes: Vec<JsNode>,
    ) -> Result<(), InternalError> {
        let frame = statements
            .frames
            .iter_mut()
            .rev()
            .find(|frame| frame.id == self.frame_id)
            .filter(|frame| frame.element == self.element);
        let Some(frame) = frame else {
            return Err(InternalError::StaleInsertionPoint {
                node_kind: nodes.first().map_or("<empty>", JsNode::kind_name),
            });
        };
        frame.pending.extend(nodes);
        Ok(())
    }
}

// =============================================================================
// Walker
// =============================================================================

/// Drives one visitor over one tree. Not reentrant: a visitor that needs to
/// walk a detached subtree creates a new `Walker` for it.
pub struct Walker<'v, V: JsVisitorWithContext + ?Sized> {
    visitor: &'v mut V,
    statements: StatementStack,
    depth: u32,
    /// Kind of the first node whose children were skipped at the depth limit.
    truncated: Option<&'static str>,
}

impl<'v, V: JsVisitorWithContext + ?Sized> Walker<'v, V> {
    pub fn new(visitor: &'v mut V) -> Self {
        Self {
            visitor,
            statements: StatementStack::new(),
            depth: 0,
            truncated: None,
        }
    }

    /// Kind of the first node left unvisited at the depth limit, if any.
    pub const fn truncated(&self) -> Option<&'static str> {
        self.truncated
    }

    /// Walk a single-value slot.
    pub fn accept(&mut self, slot: &mut JsNode) {
        self.walk_slot(slot, SlotKind::Node);
    }

    /// Walk an assignment-target slot.
    pub fn accept_lvalue(&mut self, slot: &mut JsNode) {
        self.walk_slot(slot, SlotKind::Lvalue);
    }

    /// Walk an expression list (arguments, array elements).
    pub fn accept_list(&mut self, list: &mut Vec<JsNode>) {
        self.walk_list(list, false);
    }

    /// Walk a statement list, pushing a statement-stack frame for it.
    pub fn accept_statement_list(&mut self, list: &mut Vec<JsNode>) {
        self.walk_list(list, true);
    }

    /// Walk a statement slot: the statement may grow into several
    /// (wrapped in a block) or disappear (`;`).
    pub fn accept_statement(&mut self, slot: &mut JsNode) {
        let mut list = vec![std::mem::replace(slot, JsNode::EmptyStatement)];
        self.walk_list(&mut list, true);
        *slot = JsNode::from_statements(list);
    }

    fn walk_slot(&mut self, slot: &mut JsNode, kind: SlotKind) {
        let descend = {
            let mut ctx = match kind {
                SlotKind::Lvalue => Context::lvalue(slot),
                SlotKind::Node | SlotKind::List => Context::node(slot),
            };
            let proceed = self.visitor.visit(&mut ctx, &mut self.statements);
            proceed && !ctx.was_replaced()
        };
        if descend {
            self.walk_children(slot);
        }
        let mut ctx = match kind {
            SlotKind::Lvalue => Context::lvalue(slot),
            SlotKind::Node | SlotKind::List => Context::node(slot),
        };
        self.visitor.end_visit(&mut ctx, &mut self.statements);
    }

    fn walk_list(&mut self, list: &mut Vec<JsNode>, statement_list: bool) {
        if statement_list {
            self.statements.push_frame();
        }

        let mut index = 0;
        while index < list.len() {
            if statement_list {
                self.statements.begin_element();
            }

            let (descend, mut cursor, mut removed, mut inserted_after) = {
                let mut ctx = Context::list(list, index);
                let proceed = self.visitor.visit(&mut ctx, &mut self.statements);
                let replaced = ctx.was_replaced();
                let (cursor, removed, after) = ctx.list_cursor().unwrap_or((index, false, 0));
                (proceed && !replaced && !removed, cursor, removed, after)
            };

            if descend {
                self.walk_children(&mut list[cursor]);
            }

            if !removed {
                let mut ctx =
                    Context::List(ListContext::resume(list, cursor, inserted_after));
                self.visitor.end_visit(&mut ctx, &mut self.statements);
                if let Some((c, r, after)) = ctx.list_cursor() {
                    cursor = c;
                    removed = r;
                    inserted_after = after;
                }
            }

            if statement_list {
                let pending = self.statements.take_pending();
                if !pending.is_empty() {
                    let count = pending.len();
                    list.splice(cursor..cursor, pending);
                    cursor += count;
                }
            }

            index = cursor + usize::from(!removed) + inserted_after;
        }

        if statement_list {
            self.statements.pop_frame();
        }
    }

    fn walk_children(&mut self, node: &mut JsNode) {
        if self.depth >= MAX_TRAVERSAL_DEPTH {
            warn!(
                node = node.kind_name(),
                depth = self.depth,
                "traversal depth limit reached, subtree left unvisited"
            );
            self.truncated.get_or_insert(node.kind_name());
            return;
        }
        self.depth += 1;

        match node {
            JsNode::BinaryExpr {
                left,
                operator,
                right,
            } => {
                let kind = if is_assignment_operator(operator) {
                    SlotKind::Lvalue
                } else {
                    SlotKind::Node
                };
                self.walk_slot(left, kind);
                self.walk_slot(right, SlotKind::Node);
            }
            JsNode::PrefixUnaryExpr { operator, operand }
            | JsNode::PostfixUnaryExpr { operand, operator } => {
                let kind = if is_update_operator(operator) {
                    SlotKind::Lvalue
                } else {
                    SlotKind::Node
                };
                self.walk_slot(operand, kind);
            }
            JsNode::CallExpr { callee, arguments } | JsNode::NewExpr { callee, arguments } => {
                self.walk_slot(callee, SlotKind::Node);
                self.walk_list(arguments, false);
            }
            JsNode::PropertyAccess { object, .. } => self.walk_slot(object, SlotKind::Node),
            JsNode::ElementAccess { object, index } => {
                self.walk_slot(object, SlotKind::Node);
                self.walk_slot(index, SlotKind::Node);
            }
            JsNode::ConditionalExpr {
                condition,
                when_true,
                when_false,
            } => {
                self.walk_slot(condition, SlotKind::Node);
                self.walk_slot(when_true, SlotKind::Node);
                self.walk_slot(when_false, SlotKind::Node);
            }
            JsNode::Parenthesized(inner)
            | JsNode::ExpressionStatement(inner)
            | JsNode::ThrowStatement(inner) => self.walk_slot(inner, SlotKind::Node),
            JsNode::CommaExpr(items) | JsNode::ArrayLiteral(items) | JsNode::VarDeclList(items) => {
                self.walk_list(items, false);
            }
            JsNode::Block(statements) => self.walk_list(statements, true),
            JsNode::ObjectLiteral(props) => {
                for prop in props {
                    self.walk_slot(&mut prop.value, SlotKind::Node);
                }
            }
            JsNode::FunctionExpr { body, .. } | JsNode::FunctionDecl { body, .. } => {
                self.walk_list(body, true);
            }
            JsNode::LogicalOr { left, right } | JsNode::LogicalAnd { left, right } => {
                self.walk_slot(left, SlotKind::Node);
                self.walk_slot(right, SlotKind::Node);
            }
            JsNode::VarDecl {
                initializer: Some(init),
                ..
            }
            | JsNode::ReturnStatement(Some(init)) => self.walk_slot(init, SlotKind::Node),
            JsNode::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => {
                self.walk_slot(condition, SlotKind::Node);
                self.accept_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.accept_statement(else_branch);
                }
            }
            JsNode::SwitchStatement { expression, cases } => {
                self.walk_slot(expression, SlotKind::Node);
                for case in cases {
                    if let Some(test) = &mut case.test {
                        self.walk_slot(test, SlotKind::Node);
                    }
                    self.walk_list(&mut case.statements, true);
                }
            }
            JsNode::ForStatement {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                for slot in [initializer, condition, incrementor].into_iter().flatten() {
                    self.walk_slot(slot, SlotKind::Node);
                }
                self.accept_statement(body);
            }
            JsNode::WhileStatement { condition, body } => {
                self.walk_slot(condition, SlotKind::Node);
                self.accept_statement(body);
            }
            JsNode::DoWhileStatement { body, condition } => {
                self.accept_statement(body);
                self.walk_slot(condition, SlotKind::Node);
            }
            JsNode::TryStatement {
                try_block,
                catch_clause,
                finally_block,
            } => {
                self.walk_slot(try_block, SlotKind::Node);
                if let Some(clause) = catch_clause {
                    self.walk_list(&mut clause.body, true);
                }
                if let Some(finally_block) = finally_block {
                    self.walk_slot(finally_block, SlotKind::Node);
                }
            }
            JsNode::LabeledStatement { statement, .. } => self.accept_statement(statement),
            _ => {}
        }

        self.depth -= 1;
    }
}

/// Walk a program's top-level statement list.
pub fn traverse<V: JsVisitorWithContext + ?Sized>(visitor: &mut V, program: &mut Vec<JsNode>) {
    Walker::new(visitor).accept_statement_list(program);
}

/// Walk a statement list like `traverse`, failing when some subtree was
/// left unvisited at the depth limit. For rewrites whose output is wrong
/// unless every node was seen.
pub fn traverse_checked<V: JsVisitorWithContext + ?Sized>(
    visitor: &mut V,
    program: &mut Vec<JsNode>,
) -> Result<(), InternalError> {
    let mut walker = Walker::new(visitor);
    walker.accept_statement_list(program);
    match walker.truncated() {
        Some(node_kind) => Err(InternalError::TraversalTooDeep { node_kind }),
        None => Ok(()),
    }
}

/// Walk `statement` in statement position and return the single statement
/// it became (a block when the visitor expanded it, `;` when it removed it).
pub fn traverse_as_statement<V: JsVisitorWithContext + ?Sized>(
    visitor: &mut V,
    statement: JsNode,
) -> JsNode {
    let mut slot = statement;
    Walker::new(visitor).accept_statement(&mut slot);
    slot
}

#[cfg(test)]
#[path = "../tests/visitor.rs"]
mod tests;
