//! Traversal contexts.
//!
//! A `Context` is the capability handed to a visitor for the slot it is
//! currently looking at. What the visitor may do depends on the slot:
//!
//! | operation        | list | single slot | lvalue |
//! |------------------|------|-------------|--------|
//! | `replace_me`     | yes  | yes         | yes    |
//! | `replace_me_with_all` | yes | no     | no     |
//! | `insert_before`  | yes  | no          | no     |
//! | `insert_after`   | yes  | no          | no     |
//! | `remove_me`      | yes  | no          | no     |
//!
//! Unsupported operations are pass bugs and panic immediately with an
//! `InternalError::ContextMisuse` message.
//!
//! List contexts keep an explicit cursor over the owned vector:
//! - `insert_before` places the node at the cursor and advances it, so the
//!   inserted node is never visited as "current";
//! - `insert_after` places nodes after the current one, in call order; the
//!   walker steps over them, so they are not visited during this pass;
//! - `remove_me` deletes the current node; the node that slides into the
//!   cursor position is visited next;
//! - `replace_me_with_all` swaps the current node for a sequence that is
//!   visited next, first node first.

use crate::error::{InternalError, SlotKind};
use ktjs_ast::JsNode;

/// Cursor over one element of an owned statement or expression list.
#[derive(Debug)]
pub struct ListContext<'a> {
    list: &'a mut Vec<JsNode>,
    index: usize,
    removed: bool,
    replaced: bool,
    inserted_after: usize,
}

/// A single-value slot such as `PropertyAccess::object`.
#[derive(Debug)]
pub struct NodeContext<'a> {
    slot: &'a mut JsNode,
    replaced: bool,
}

#[derive(Debug)]
pub enum Context<'a> {
    List(ListContext<'a>),
    Node(NodeContext<'a>),
    /// A single-value slot that is an assignment target.
    Lvalue(NodeContext<'a>),
}

impl<'a> ListContext<'a> {
    pub fn new(list: &'a mut Vec<JsNode>, index: usize) -> Self {
        Self {
            list,
            index,
            removed: false,
            replaced: false,
            inserted_after: 0,
        }
    }

    /// Reopen the cursor for `end_visit`, remembering the nodes `visit`
    /// already placed after the current one.
    pub(crate) fn resume(list: &'a mut Vec<JsNode>, index: usize, inserted_after: usize) -> Self {
        Self {
            inserted_after,
            ..Self::new(list, index)
        }
    }

    /// Cursor position of the current node (after any `insert_before`).
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of nodes placed after the current one by `insert_after`.
    pub const fn inserted_after(&self) -> usize {
        self.inserted_after
    }
}

impl<'a> NodeContext<'a> {
    pub fn new(slot: &'a mut JsNode) -> Self {
        Self {
            slot,
            replaced: false,
        }
    }
}

impl<'a> Context<'a> {
    pub fn list(list: &'a mut Vec<JsNode>, index: usize) -> Self {
        Context::List(ListContext::new(list, index))
    }

    pub fn node(slot: &'a mut JsNode) -> Self {
        Context::Node(NodeContext::new(slot))
    }

    pub fn lvalue(slot: &'a mut JsNode) -> Self {
        Context::Lvalue(NodeContext::new(slot))
    }

    pub const fn slot_kind(&self) -> SlotKind {
        match self {
            Context::List(_) => SlotKind::List,
            Context::Node(_) => SlotKind::Node,
            Context::Lvalue(_) => SlotKind::Lvalue,
        }
    }

    pub const fn can_insert(&self) -> bool {
        matches!(self, Context::List(_))
    }

    pub const fn can_remove(&self) -> bool {
        matches!(self, Context::List(_))
    }

    pub const fn is_lvalue(&self) -> bool {
        matches!(self, Context::Lvalue(_))
    }

    /// The node occupying the slot, or `None` once it has been removed.
    pub fn current_node(&self) -> Option<&JsNode> {
        match self {
            Context::List(ctx) if ctx.removed => None,
            Context::List(ctx) => ctx.list.get(ctx.index),
            Context::Node(ctx) | Context::Lvalue(ctx) => Some(&*ctx.slot),
        }
    }

    pub fn current_node_mut(&mut self) -> Option<&mut JsNode> {
        match self {
            Context::List(ctx) if ctx.removed => None,
            Context::List(ctx) => ctx.list.get_mut(ctx.index),
            Context::Node(ctx) | Context::Lvalue(ctx) => Some(&mut *ctx.slot),
        }
    }

    pub const fn was_removed(&self) -> bool {
        match self {
            Context::List(ctx) => ctx.removed,
            Context::Node(_) | Context::Lvalue(_) => false,
        }
    }

    pub const fn was_replaced(&self) -> bool {
        match self {
            Context::List(ctx) => ctx.replaced,
            Context::Node(ctx) | Context::Lvalue(ctx) => ctx.replaced,
        }
    }

    /// Insert `node` before the current one and advance past it.
    pub fn insert_before(&mut self, node: JsNode) {
        match self {
            Context::List(ctx) => {
                ctx.list.insert(ctx.index, node);
                ctx.index += 1;
            }
            _ => self.misuse("insert_before"),
        }
    }

    /// Insert `node` after the current one (and after earlier `insert_after`
    /// nodes). It is not visited during the current pass.
    pub fn insert_after(&mut self, node: JsNode) {
        match self {
            Context::List(ctx) => {
                let pos = ctx.index + usize::from(!ctx.removed) + ctx.inserted_after;
                ctx.list.insert(pos, node);
                ctx.inserted_after += 1;
            }
            _ => self.misuse("insert_after"),
        }
    }

    pub fn remove_me(&mut self) {
        match self {
            Context::List(ctx) if !ctx.removed => {
                ctx.list.remove(ctx.index);
                ctx.removed = true;
            }
            _ => self.misuse("remove_me"),
        }
    }

    /// Put `node` in the slot. The replacement is not traversed.
    pub fn replace_me(&mut self, node: JsNode) {
        match self {
            Context::List(ctx) if !ctx.removed => {
                ctx.list[ctx.index] = node;
                ctx.replaced = true;
            }
            Context::Node(ctx) | Context::Lvalue(ctx) => {
                *ctx.slot = node;
                ctx.replaced = true;
            }
            Context::List(_) => self.misuse("replace_me"),
        }
    }

    /// Replace the current node with `nodes`. Unlike `replace_me`, the
    /// replacements are visited next, starting with the first.
    pub fn replace_me_with_all(&mut self, nodes: Vec<JsNode>) {
        match self {
            Context::List(ctx) if !ctx.removed => {
                ctx.list.splice(ctx.index..=ctx.index, nodes);
                ctx.removed = true;
            }
            _ => self.misuse("replace_me_with_all"),
        }
    }

    /// Cursor state of a list context: `(index, removed, inserted_after)`.
    pub(crate) fn list_cursor(&self) -> Option<(usize, bool, usize)> {
        match self {
            Context::List(ctx) => Some((ctx.index, ctx.removed, ctx.inserted_after)),
            Context::Node(_) | Context::Lvalue(_) => None,
        }
    }

    fn misuse(&self, operation: &'static str) -> ! {
        let error = InternalError::ContextMisuse {
            operation,
            slot: self.slot_kind(),
            node_kind: self.current_node().map_or("<removed>", JsNode::kind_name),
        };
        panic!("{error}");
    }
}

#[cfg(test)]
#[path = "../tests/context.rs"]
mod tests;
