//! JavaScript target AST
//!
//! Code generation produces trees of `JsNode`; the lowering passes
//! (inlining, exception dispatch) rewrite them in place. Every node is owned
//! by exactly one parent slot, and `Clone` is a structural deep copy: a
//! cloned subtree shares nothing with the original, so a pass may rewrite a
//! copy without disturbing the tree it came from.
//!
//! # Child slots
//!
//! Children live in three kinds of slots, which the traversal engine maps to
//! its context variants:
//! - ordered lists (`Block` statements, call arguments, array elements)
//! - single-value slots (`PropertyAccess::object`, `IfStatement::condition`)
//! - assignment targets (the left side of `x = ...`, the operand of `x++`)
//!
//! # Example
//!
//! ```ignore
//! // var x = foo(1);
//! let decl = JsNode::var_decl("x", Some(JsNode::call(JsNode::id("foo"), vec![JsNode::number("1")])));
//! ```

use smallvec::SmallVec;

/// Node of the JavaScript target tree
#[derive(Debug, Clone, PartialEq)]
pub enum JsNode {
    // =========================================================================
    // Literals
    // =========================================================================
    /// Numeric literal: `42`, `3.14`
    NumericLiteral(String),

    /// String literal: `"hello"`
    StringLiteral(String),

    /// Boolean literal: `true`, `false`
    BooleanLiteral(bool),

    /// Null literal: `null`
    NullLiteral,

    /// Undefined: `void 0`
    Undefined,

    // =========================================================================
    // Names
    // =========================================================================
    /// Identifier: `foo`, `tmp$1`
    Identifier(String),

    /// This keyword
    This,

    // =========================================================================
    // Expressions
    // =========================================================================
    /// Binary expression: `left op right` (including assignments)
    BinaryExpr {
        left: Box<Self>,
        operator: String,
        right: Box<Self>,
    },

    /// Unary prefix expression: `!x`, `-x`, `++x`, `typeof x`
    PrefixUnaryExpr {
        operator: String,
        operand: Box<Self>,
    },

    /// Unary postfix expression: `x++`, `x--`
    PostfixUnaryExpr {
        operand: Box<Self>,
        operator: String,
    },

    /// Call expression: `callee(args)`
    CallExpr {
        callee: Box<Self>,
        arguments: Vec<Self>,
    },

    /// New expression: `new Callee(args)`
    NewExpr {
        callee: Box<Self>,
        arguments: Vec<Self>,
    },

    /// Property access: `object.property`
    PropertyAccess { object: Box<Self>, property: String },

    /// Element access: `object[index]`
    ElementAccess { object: Box<Self>, index: Box<Self> },

    /// Conditional expression: `cond ? then : else`
    ConditionalExpr {
        condition: Box<Self>,
        when_true: Box<Self>,
        when_false: Box<Self>,
    },

    /// Parenthesized expression: `(expr)`
    Parenthesized(Box<Self>),

    /// Comma expression: `a, b, c`
    CommaExpr(Vec<Self>),

    /// Array literal: `[a, b, c]`
    ArrayLiteral(Vec<Self>),

    /// Object literal: `{ key: value, ... }`
    ObjectLiteral(Vec<JsProperty>),

    /// Function expression: `function name(params) { body }`
    FunctionExpr {
        name: Option<String>,
        parameters: Vec<JsParam>,
        body: Vec<Self>,
    },

    /// Logical OR: `left || right`
    LogicalOr { left: Box<Self>, right: Box<Self> },

    /// Logical AND: `left && right`
    LogicalAnd { left: Box<Self>, right: Box<Self> },

    // =========================================================================
    // Statements
    // =========================================================================
    /// Variable declaration: `var x = value;`
    VarDecl {
        name: String,
        initializer: Option<Box<Self>>,
    },

    /// Multiple variable declarations: `var a = 1, b = 2;`
    VarDeclList(Vec<Self>),

    /// Expression statement: `expr;`
    ExpressionStatement(Box<Self>),

    /// Return statement: `return expr;`
    ReturnStatement(Option<Box<Self>>),

    /// If statement: `if (cond) then else other`
    IfStatement {
        condition: Box<Self>,
        then_branch: Box<Self>,
        else_branch: Option<Box<Self>>,
    },

    /// Block statement: `{ statements }`
    Block(Vec<Self>),

    /// Empty statement: `;`
    EmptyStatement,

    /// Switch statement
    SwitchStatement {
        expression: Box<Self>,
        cases: Vec<JsSwitchCase>,
    },

    /// For statement: `for (init; cond; incr) body`
    ForStatement {
        initializer: Option<Box<Self>>,
        condition: Option<Box<Self>>,
        incrementor: Option<Box<Self>>,
        body: Box<Self>,
    },

    /// While statement: `while (cond) body`
    WhileStatement {
        condition: Box<Self>,
        body: Box<Self>,
    },

    /// Do-while statement: `do body while (cond);`
    DoWhileStatement {
        body: Box<Self>,
        condition: Box<Self>,
    },

    /// Try statement: `try { block } catch (e) { handler } finally { finalizer }`
    ///
    /// `try_block` and `finally_block` always hold a `Block`.
    TryStatement {
        try_block: Box<Self>,
        catch_clause: Option<JsCatchClause>,
        finally_block: Option<Box<Self>>,
    },

    /// Throw statement: `throw expr;`
    ThrowStatement(Box<Self>),

    /// Break statement: `break;` or `break label;`
    BreakStatement(Option<String>),

    /// Continue statement: `continue;` or `continue label;`
    ContinueStatement(Option<String>),

    /// Labeled statement: `label: stmt`
    LabeledStatement { label: String, statement: Box<Self> },

    // =========================================================================
    // Declarations
    // =========================================================================
    /// Function declaration: `function name(params) { body }`
    FunctionDecl {
        name: String,
        parameters: Vec<JsParam>,
        body: Vec<Self>,
    },
}

/// Property in an object literal
#[derive(Debug, Clone, PartialEq)]
pub struct JsProperty {
    pub key: String,
    pub value: JsNode,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsParam {
    pub name: String,
}

/// Switch case
#[derive(Debug, Clone, PartialEq)]
pub struct JsSwitchCase {
    pub test: Option<JsNode>, // None for default case
    pub statements: Vec<JsNode>,
}

/// Catch clause. The target language binds exactly one exception variable.
#[derive(Debug, Clone, PartialEq)]
pub struct JsCatchClause {
    pub param: String,
    pub body: Vec<JsNode>,
}

// =========================================================================
// Operator classification
// =========================================================================

/// Whether `op` is an assignment operator (`=`, `+=`, `??=`, ...).
pub fn is_assignment_operator(op: &str) -> bool {
    matches!(
        op,
        "=" | "+="
            | "-="
            | "*="
            | "/="
            | "%="
            | "**="
            | "<<="
            | ">>="
            | ">>>="
            | "&="
            | "|="
            | "^="
            | "&&="
            | "||="
            | "??="
    )
}

/// Whether `op` is `++` or `--`.
pub fn is_update_operator(op: &str) -> bool {
    matches!(op, "++" | "--")
}

// =========================================================================
// Introspection
// =========================================================================

impl JsNode {
    /// Name of the variant, used in traces and internal error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::NumericLiteral(_) => "NumericLiteral",
            Self::StringLiteral(_) => "StringLiteral",
            Self::BooleanLiteral(_) => "BooleanLiteral",
            Self::NullLiteral => "NullLiteral",
            Self::Undefined => "Undefined",
            Self::Identifier(_) => "Identifier",
            Self::This => "This",
            Self::BinaryExpr { .. } => "BinaryExpr",
            Self::PrefixUnaryExpr { .. } => "PrefixUnaryExpr",
            Self::PostfixUnaryExpr { .. } => "PostfixUnaryExpr",
            Self::CallExpr { .. } => "CallExpr",
            Self::NewExpr { .. } => "NewExpr",
            Self::PropertyAccess { .. } => "PropertyAccess",
            Self::ElementAccess { .. } => "ElementAccess",
            Self::ConditionalExpr { .. } => "ConditionalExpr",
            Self::Parenthesized(_) => "Parenthesized",
            Self::CommaExpr(_) => "CommaExpr",
            Self::ArrayLiteral(_) => "ArrayLiteral",
            Self::ObjectLiteral(_) => "ObjectLiteral",
            Self::FunctionExpr { .. } => "FunctionExpr",
            Self::LogicalOr { .. } => "LogicalOr",
            Self::LogicalAnd { .. } => "LogicalAnd",
            Self::VarDecl { .. } => "VarDecl",
            Self::VarDeclList(_) => "VarDeclList",
            Self::ExpressionStatement(_) => "ExpressionStatement",
            Self::ReturnStatement(_) => "ReturnStatement",
            Self::IfStatement { .. } => "IfStatement",
            Self::Block(_) => "Block",
            Self::EmptyStatement => "EmptyStatement",
            Self::SwitchStatement { .. } => "SwitchStatement",
            Self::ForStatement { .. } => "ForStatement",
            Self::WhileStatement { .. } => "WhileStatement",
            Self::DoWhileStatement { .. } => "DoWhileStatement",
            Self::TryStatement { .. } => "TryStatement",
            Self::ThrowStatement(_) => "ThrowStatement",
            Self::BreakStatement(_) => "BreakStatement",
            Self::ContinueStatement(_) => "ContinueStatement",
            Self::LabeledStatement { .. } => "LabeledStatement",
            Self::FunctionDecl { .. } => "FunctionDecl",
        }
    }

    /// Whether this node is a statement (or a declaration in statement position).
    pub const fn is_statement(&self) -> bool {
        matches!(
            self,
            Self::VarDecl { .. }
                | Self::VarDeclList(_)
                | Self::ExpressionStatement(_)
                | Self::ReturnStatement(_)
                | Self::IfStatement { .. }
                | Self::Block(_)
                | Self::EmptyStatement
                | Self::SwitchStatement { .. }
                | Self::ForStatement { .. }
                | Self::WhileStatement { .. }
                | Self::DoWhileStatement { .. }
                | Self::TryStatement { .. }
                | Self::ThrowStatement(_)
                | Self::BreakStatement(_)
                | Self::ContinueStatement(_)
                | Self::LabeledStatement { .. }
                | Self::FunctionDecl { .. }
        )
    }

    /// Whether this node introduces a new function scope.
    pub const fn is_function(&self) -> bool {
        matches!(self, Self::FunctionExpr { .. } | Self::FunctionDecl { .. })
    }

    /// Literal values: numbers, strings, booleans, `null` and `void 0`.
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::NumericLiteral(_)
                | Self::StringLiteral(_)
                | Self::BooleanLiteral(_)
                | Self::NullLiteral
                | Self::Undefined
        )
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Direct children in evaluation order, without descending into them.
    ///
    /// Catch and switch-case bodies are included; names held as plain
    /// strings (declaration names, labels) are not nodes and are skipped.
    pub fn children(&self) -> SmallVec<[&JsNode; 4]> {
        let mut out: SmallVec<[&JsNode; 4]> = SmallVec::new();
        match self {
            Self::BinaryExpr { left, right, .. }
            | Self::LogicalOr { left, right }
            | Self::LogicalAnd { left, right } => {
                out.push(left);
                out.push(right);
            }
            Self::PrefixUnaryExpr { operand, .. } | Self::PostfixUnaryExpr { operand, .. } => {
                out.push(operand);
            }
            Self::CallExpr { callee, arguments } | Self::NewExpr { callee, arguments } => {
                out.push(callee);
                out.extend(arguments.iter());
            }
            Self::PropertyAccess { object, .. } => out.push(object),
            Self::ElementAccess { object, index } => {
                out.push(object);
                out.push(index);
            }
            Self::ConditionalExpr {
                condition,
                when_true,
                when_false,
            } => {
                out.push(condition);
                out.push(when_true);
                out.push(when_false);
            }
            Self::Parenthesized(inner)
            | Self::ExpressionStatement(inner)
            | Self::ThrowStatement(inner) => out.push(inner),
            Self::CommaExpr(items)
            | Self::ArrayLiteral(items)
            | Self::VarDeclList(items)
            | Self::Block(items) => out.extend(items.iter()),
            Self::ObjectLiteral(props) => out.extend(props.iter().map(|p| &p.value)),
            Self::FunctionExpr { body, .. } | Self::FunctionDecl { body, .. } => {
                out.extend(body.iter());
            }
            Self::VarDecl { initializer, .. } => out.extend(initializer.as_deref()),
            Self::ReturnStatement(value) => out.extend(value.as_deref()),
            Self::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => {
                out.push(condition);
                out.push(then_branch);
                out.extend(else_branch.as_deref());
            }
            Self::SwitchStatement { expression, cases } => {
                out.push(expression);
                for case in cases {
                    out.extend(case.test.as_ref());
                    out.extend(case.statements.iter());
                }
            }
            Self::ForStatement {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                out.extend(initializer.as_deref());
                out.extend(condition.as_deref());
                out.extend(incrementor.as_deref());
                out.push(body);
            }
            Self::WhileStatement { condition, body } => {
                out.push(condition);
                out.push(body);
            }
            Self::DoWhileStatement { body, condition } => {
                out.push(body);
                out.push(condition);
            }
            Self::TryStatement {
                try_block,
                catch_clause,
                finally_block,
            } => {
                out.push(try_block);
                if let Some(clause) = catch_clause {
                    out.extend(clause.body.iter());
                }
                out.extend(finally_block.as_deref());
            }
            Self::LabeledStatement { statement, .. } => out.push(statement),
            Self::NumericLiteral(_)
            | Self::StringLiteral(_)
            | Self::BooleanLiteral(_)
            | Self::NullLiteral
            | Self::Undefined
            | Self::Identifier(_)
            | Self::This
            | Self::EmptyStatement
            | Self::BreakStatement(_)
            | Self::ContinueStatement(_) => {}
        }
        out
    }

    /// Wrap an expression as a statement; statements are returned unchanged.
    pub fn into_statement(self) -> Self {
        if self.is_statement() {
            self
        } else {
            Self::expr_stmt(self)
        }
    }

    /// Collapse a statement sequence into one statement: none becomes `;`,
    /// exactly one is returned unwrapped, several are wrapped in a block.
    pub fn from_statements(mut statements: Vec<Self>) -> Self {
        match statements.len() {
            0 => Self::EmptyStatement,
            1 => statements.pop().unwrap_or(Self::EmptyStatement),
            _ => Self::Block(statements),
        }
    }
}

// =========================================================================
// Builder helpers
// =========================================================================

impl JsNode {
    /// Create an identifier node
    pub fn id(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// Create a string literal
    pub fn string(s: impl Into<String>) -> Self {
        Self::StringLiteral(s.into())
    }

    /// Create a numeric literal
    pub fn number(n: impl Into<String>) -> Self {
        Self::NumericLiteral(n.into())
    }

    /// Create a call expression
    pub fn call(callee: Self, args: Vec<Self>) -> Self {
        Self::CallExpr {
            callee: Box::new(callee),
            arguments: args,
        }
    }

    /// Create a `new` expression
    pub fn new_expr(callee: Self, args: Vec<Self>) -> Self {
        Self::NewExpr {
            callee: Box::new(callee),
            arguments: args,
        }
    }

    /// Create a property access
    pub fn prop(object: Self, property: impl Into<String>) -> Self {
        Self::PropertyAccess {
            object: Box::new(object),
            property: property.into(),
        }
    }

    /// Create a property access chain from a dotted path: `a.b.c`
    pub fn dotted(path: &str) -> Self {
        let mut parts = path.split('.');
        let first = parts.next().unwrap_or_default();
        parts.fold(Self::id(first), |object, part| Self::prop(object, part))
    }

    /// Create an element access
    pub fn elem(object: Self, index: Self) -> Self {
        Self::ElementAccess {
            object: Box::new(object),
            index: Box::new(index),
        }
    }

    /// Create a binary expression
    pub fn binary(left: Self, op: impl Into<String>, right: Self) -> Self {
        Self::BinaryExpr {
            left: Box::new(left),
            operator: op.into(),
            right: Box::new(right),
        }
    }

    /// Create an assignment expression
    pub fn assign(target: Self, value: Self) -> Self {
        Self::binary(target, "=", value)
    }

    /// Create a prefix unary expression
    pub fn prefix(op: impl Into<String>, operand: Self) -> Self {
        Self::PrefixUnaryExpr {
            operator: op.into(),
            operand: Box::new(operand),
        }
    }

    /// Create a postfix unary expression
    pub fn postfix(operand: Self, op: impl Into<String>) -> Self {
        Self::PostfixUnaryExpr {
            operand: Box::new(operand),
            operator: op.into(),
        }
    }

    /// Create `!expr`
    pub fn not(operand: Self) -> Self {
        Self::prefix("!", operand)
    }

    /// Create `typeof expr`
    pub fn type_of(operand: Self) -> Self {
        Self::prefix("typeof", operand)
    }

    /// Create a conditional expression
    pub fn conditional(condition: Self, when_true: Self, when_false: Self) -> Self {
        Self::ConditionalExpr {
            condition: Box::new(condition),
            when_true: Box::new(when_true),
            when_false: Box::new(when_false),
        }
    }

    /// Create a comma expression
    pub const fn comma(items: Vec<Self>) -> Self {
        Self::CommaExpr(items)
    }

    /// Create a var declaration
    pub fn var_decl(name: impl Into<String>, init: Option<Self>) -> Self {
        Self::VarDecl {
            name: name.into(),
            initializer: init.map(Box::new),
        }
    }

    /// Create a return statement
    pub fn ret(expr: Option<Self>) -> Self {
        Self::ReturnStatement(expr.map(Box::new))
    }

    /// Create a throw statement
    pub fn throw(expr: Self) -> Self {
        Self::ThrowStatement(Box::new(expr))
    }

    /// Create an if statement
    pub fn if_stmt(condition: Self, then_branch: Self, else_branch: Option<Self>) -> Self {
        Self::IfStatement {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        }
    }

    /// Create a while statement
    pub fn while_stmt(condition: Self, body: Self) -> Self {
        Self::WhileStatement {
            condition: Box::new(condition),
            body: Box::new(body),
        }
    }

    /// Create a labeled statement
    pub fn labeled(label: impl Into<String>, statement: Self) -> Self {
        Self::LabeledStatement {
            label: label.into(),
            statement: Box::new(statement),
        }
    }

    /// Create `break label;`
    pub fn break_to(label: impl Into<String>) -> Self {
        Self::BreakStatement(Some(label.into()))
    }

    /// Create a try statement
    pub fn try_stmt(
        try_block: Vec<Self>,
        catch_clause: Option<JsCatchClause>,
        finally_block: Option<Vec<Self>>,
    ) -> Self {
        Self::TryStatement {
            try_block: Box::new(Self::Block(try_block)),
            catch_clause,
            finally_block: finally_block.map(|stmts| Box::new(Self::Block(stmts))),
        }
    }

    /// Create a function expression
    pub const fn func_expr(name: Option<String>, params: Vec<JsParam>, body: Vec<Self>) -> Self {
        Self::FunctionExpr {
            name,
            parameters: params,
            body,
        }
    }

    /// Create a function declaration
    pub fn func_decl(name: impl Into<String>, params: Vec<JsParam>, body: Vec<Self>) -> Self {
        Self::FunctionDecl {
            name: name.into(),
            parameters: params,
            body,
        }
    }

    /// Create `this` reference
    pub const fn this() -> Self {
        Self::This
    }

    /// Create `void 0`
    pub const fn void_0() -> Self {
        Self::Undefined
    }

    /// Wrap in parentheses
    pub fn paren(self) -> Self {
        Self::Parenthesized(Box::new(self))
    }

    /// Create a block
    pub const fn block(stmts: Vec<Self>) -> Self {
        Self::Block(stmts)
    }

    /// Create an expression statement
    pub fn expr_stmt(expr: Self) -> Self {
        Self::ExpressionStatement(Box::new(expr))
    }

    /// Create an object literal
    pub const fn object(props: Vec<JsProperty>) -> Self {
        Self::ObjectLiteral(props)
    }

    /// Create an array literal
    pub const fn array(elements: Vec<Self>) -> Self {
        Self::ArrayLiteral(elements)
    }

    /// Create logical OR
    pub fn logical_or(left: Self, right: Self) -> Self {
        Self::LogicalOr {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create logical AND
    pub fn logical_and(left: Self, right: Self) -> Self {
        Self::LogicalAnd {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl JsParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Parameters from plain names.
    pub fn list<S: AsRef<str>>(names: &[S]) -> Vec<Self> {
        names.iter().map(|n| Self::new(n.as_ref())).collect()
    }
}

impl JsProperty {
    pub fn init(key: impl Into<String>, value: JsNode) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl JsCatchClause {
    pub fn new(param: impl Into<String>, body: Vec<JsNode>) -> Self {
        Self {
            param: param.into(),
            body,
        }
    }
}

#[cfg(test)]
#[path = "../tests/node.rs"]
mod tests;
