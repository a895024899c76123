//! Debug printer for the JavaScript target AST.
//!
//! Renders `JsNode` trees as JavaScript text. Used by tests to assert on
//! readable output and by `trace!` logging in the lowering passes; production
//! serialization lives outside this crate.
//!
//! Parentheses are inserted from operator precedence, so a tree built as
//! `binary(binary(a, "+", b), "*", c)` prints as `(a + b) * c` without an
//! explicit `Parenthesized` node.

use crate::node::{JsNode, JsParam, JsProperty, is_assignment_operator};

// =============================================================================
// Precedence
// =============================================================================

const PREC_COMMA: u8 = 1;
const PREC_ASSIGNMENT: u8 = 2;
const PREC_CONDITIONAL: u8 = 3;
const PREC_LOGICAL_OR: u8 = 4;
const PREC_LOGICAL_AND: u8 = 5;
const PREC_BITWISE_OR: u8 = 6;
const PREC_BITWISE_XOR: u8 = 7;
const PREC_BITWISE_AND: u8 = 8;
const PREC_EQUALITY: u8 = 9;
const PREC_RELATIONAL: u8 = 10;
const PREC_SHIFT: u8 = 11;
const PREC_ADDITIVE: u8 = 12;
const PREC_MULTIPLICATIVE: u8 = 13;
const PREC_EXPONENT: u8 = 14;
const PREC_PREFIX: u8 = 15;
const PREC_POSTFIX: u8 = 16;
const PREC_CALL: u8 = 17;
const PREC_PRIMARY: u8 = 18;

fn binary_precedence(op: &str) -> u8 {
    match op {
        "," => PREC_COMMA,
        "||" | "??" => PREC_LOGICAL_OR,
        "&&" => PREC_LOGICAL_AND,
        "|" => PREC_BITWISE_OR,
        "^" => PREC_BITWISE_XOR,
        "&" => PREC_BITWISE_AND,
        "==" | "!=" | "===" | "!==" => PREC_EQUALITY,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => PREC_RELATIONAL,
        "<<" | ">>" | ">>>" => PREC_SHIFT,
        "+" | "-" => PREC_ADDITIVE,
        "*" | "/" | "%" => PREC_MULTIPLICATIVE,
        "**" => PREC_EXPONENT,
        op if is_assignment_operator(op) => PREC_ASSIGNMENT,
        _ => PREC_ADDITIVE,
    }
}

fn precedence(node: &JsNode) -> u8 {
    match node {
        JsNode::BinaryExpr { operator, .. } => binary_precedence(operator),
        JsNode::CommaExpr(_) => PREC_COMMA,
        JsNode::ConditionalExpr { .. } => PREC_CONDITIONAL,
        JsNode::LogicalOr { .. } => PREC_LOGICAL_OR,
        JsNode::LogicalAnd { .. } => PREC_LOGICAL_AND,
        JsNode::PrefixUnaryExpr { .. } | JsNode::Undefined => PREC_PREFIX,
        JsNode::PostfixUnaryExpr { .. } => PREC_POSTFIX,
        JsNode::CallExpr { .. }
        | JsNode::NewExpr { .. }
        | JsNode::PropertyAccess { .. }
        | JsNode::ElementAccess { .. } => PREC_CALL,
        _ => PREC_PRIMARY,
    }
}

/// An expression statement may not start with `function` or `{`.
fn starts_with_function_or_object(node: &JsNode) -> bool {
    match node {
        JsNode::FunctionExpr { .. } | JsNode::ObjectLiteral(_) => true,
        JsNode::BinaryExpr { left, .. }
        | JsNode::LogicalOr { left, .. }
        | JsNode::LogicalAnd { left, .. } => starts_with_function_or_object(left),
        JsNode::CallExpr { callee, .. } => starts_with_function_or_object(callee),
        JsNode::PropertyAccess { object, .. } | JsNode::ElementAccess { object, .. } => {
            starts_with_function_or_object(object)
        }
        JsNode::PostfixUnaryExpr { operand, .. } => starts_with_function_or_object(operand),
        JsNode::ConditionalExpr { condition, .. } => starts_with_function_or_object(condition),
        JsNode::CommaExpr(items) => items.first().is_some_and(starts_with_function_or_object),
        _ => false,
    }
}

fn is_identifier_name(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

// =============================================================================
// Printer
// =============================================================================

/// Renders JavaScript AST nodes to text with four-space indentation.
pub struct JsPrinter {
    output: String,
    indent_level: u32,
    indent_str: &'static str,
}

impl Default for JsPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsPrinter {
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(256),
            indent_level: 0,
            indent_str: "    ",
        }
    }

    /// Render a single node. Expressions print without a trailing `;`.
    pub fn emit_to_string(node: &JsNode) -> String {
        let mut printer = Self::new();
        printer.emit_node(node);
        printer.finish()
    }

    /// Render a statement sequence, one statement per line.
    pub fn emit_statements(statements: &[JsNode]) -> String {
        let mut printer = Self::new();
        for (i, stmt) in statements.iter().enumerate() {
            if i > 0 {
                printer.write_line();
            }
            printer.emit_node(stmt);
        }
        printer.finish()
    }

    pub fn finish(self) -> String {
        self.output
    }

    pub fn emit_node(&mut self, node: &JsNode) {
        if node.is_statement() {
            self.emit_statement(node);
        } else {
            self.emit_expression(node, PREC_COMMA);
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn emit_statement(&mut self, node: &JsNode) {
        match node {
            JsNode::VarDecl { .. } => {
                self.write("var ");
                self.emit_declarator(node);
                self.write(";");
            }
            JsNode::VarDeclList(decls) => {
                self.write("var ");
                for (i, decl) in decls.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_declarator(decl);
                }
                self.write(";");
            }
            JsNode::ExpressionStatement(expr) => {
                if starts_with_function_or_object(expr) {
                    self.write("(");
                    self.emit_expression(expr, PREC_COMMA);
                    self.write(")");
                } else {
                    self.emit_expression(expr, PREC_COMMA);
                }
                self.write(";");
            }
            JsNode::ReturnStatement(value) => {
                self.write("return");
                if let Some(value) = value {
                    self.write(" ");
                    self.emit_expression(value, PREC_COMMA);
                }
                self.write(";");
            }
            JsNode::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => {
                self.write("if (");
                self.emit_expression(condition, PREC_COMMA);
                self.write(") ");
                self.emit_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.write(" else ");
                    self.emit_statement(else_branch);
                }
            }
            JsNode::Block(stmts) => self.emit_block(stmts),
            JsNode::EmptyStatement => self.write(";"),
            JsNode::SwitchStatement { expression, cases } => {
                self.write("switch (");
                self.emit_expression(expression, PREC_COMMA);
                self.write(") {");
                self.write_line();
                self.increase_indent();
                for case in cases {
                    self.write_indent();
                    if let Some(test) = &case.test {
                        self.write("case ");
                        self.emit_expression(test, PREC_COMMA);
                        self.write(":");
                    } else {
                        self.write("default:");
                    }
                    self.write_line();
                    self.increase_indent();
                    for stmt in &case.statements {
                        self.write_indent();
                        self.emit_statement(stmt);
                        self.write_line();
                    }
                    self.decrease_indent();
                }
                self.decrease_indent();
                self.write_indent();
                self.write("}");
            }
            JsNode::ForStatement {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                self.write("for (");
                if let Some(init) = initializer {
                    match &**init {
                        JsNode::VarDecl { .. } => {
                            self.write("var ");
                            self.emit_declarator(init);
                        }
                        JsNode::VarDeclList(decls) => {
                            self.write("var ");
                            for (i, decl) in decls.iter().enumerate() {
                                if i > 0 {
                                    self.write(", ");
                                }
                                self.emit_declarator(decl);
                            }
                        }
                        other => self.emit_expression(other, PREC_COMMA),
                    }
                }
                self.write(";");
                if let Some(condition) = condition {
                    self.write(" ");
                    self.emit_expression(condition, PREC_COMMA);
                }
                self.write(";");
                if let Some(incrementor) = incrementor {
                    self.write(" ");
                    self.emit_expression(incrementor, PREC_COMMA);
                }
                self.write(") ");
                self.emit_statement(body);
            }
            JsNode::WhileStatement { condition, body } => {
                self.write("while (");
                self.emit_expression(condition, PREC_COMMA);
                self.write(") ");
                self.emit_statement(body);
            }
            JsNode::DoWhileStatement { body, condition } => {
                self.write("do ");
                self.emit_statement(body);
                self.write(" while (");
                self.emit_expression(condition, PREC_COMMA);
                self.write(");");
            }
            JsNode::TryStatement {
                try_block,
                catch_clause,
                finally_block,
            } => {
                self.write("try ");
                self.emit_statement(try_block);
                if let Some(clause) = catch_clause {
                    self.write(" catch (");
                    self.write(&clause.param);
                    self.write(") ");
                    self.emit_block(&clause.body);
                }
                if let Some(finally_block) = finally_block {
                    self.write(" finally ");
                    self.emit_statement(finally_block);
                }
            }
            JsNode::ThrowStatement(expr) => {
                self.write("throw ");
                self.emit_expression(expr, PREC_COMMA);
                self.write(";");
            }
            JsNode::BreakStatement(label) => self.emit_jump("break", label.as_deref()),
            JsNode::ContinueStatement(label) => self.emit_jump("continue", label.as_deref()),
            JsNode::LabeledStatement { label, statement } => {
                self.write(label);
                self.write(": ");
                self.emit_statement(statement);
            }
            JsNode::FunctionDecl {
                name,
                parameters,
                body,
            } => {
                self.write("function ");
                self.write(name);
                self.emit_parameters(parameters);
                self.write(" ");
                self.emit_block(body);
            }
            expr => {
                self.emit_expression(expr, PREC_COMMA);
                self.write(";");
            }
        }
    }

    fn emit_block(&mut self, stmts: &[JsNode]) {
        if stmts.is_empty() {
            self.write("{ }");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for stmt in stmts {
            self.write_indent();
            self.emit_statement(stmt);
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    /// `name = init` without the `var` keyword.
    fn emit_declarator(&mut self, node: &JsNode) {
        if let JsNode::VarDecl { name, initializer } = node {
            self.write(name);
            if let Some(init) = initializer {
                self.write(" = ");
                self.emit_expression(init, PREC_ASSIGNMENT);
            }
        } else {
            self.emit_expression(node, PREC_ASSIGNMENT);
        }
    }

    fn emit_jump(&mut self, keyword: &str, label: Option<&str>) {
        self.write(keyword);
        if let Some(label) = label {
            self.write(" ");
            self.write(label);
        }
        self.write(";");
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn emit_expression(&mut self, node: &JsNode, min_precedence: u8) {
        if precedence(node) < min_precedence {
            self.write("(");
            self.emit_expression_inner(node);
            self.write(")");
        } else {
            self.emit_expression_inner(node);
        }
    }

    fn emit_expression_inner(&mut self, node: &JsNode) {
        match node {
            JsNode::NumericLiteral(n) => self.write(n),
            JsNode::StringLiteral(s) => {
                self.write("\"");
                self.write_escaped(s);
                self.write("\"");
            }
            JsNode::BooleanLiteral(b) => self.write(if *b { "true" } else { "false" }),
            JsNode::NullLiteral => self.write("null"),
            JsNode::Undefined => self.write("void 0"),
            JsNode::Identifier(name) => self.write(name),
            JsNode::This => self.write("this"),
            JsNode::BinaryExpr {
                left,
                operator,
                right,
            } => {
                let prec = binary_precedence(operator);
                let right_assoc = prec == PREC_ASSIGNMENT || prec == PREC_EXPONENT;
                let (left_min, right_min) = if right_assoc {
                    (prec + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                self.emit_expression(left, left_min);
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit_expression(right, right_min);
            }
            JsNode::PrefixUnaryExpr { operator, operand } => {
                self.write(operator);
                if operator.chars().all(char::is_alphabetic) {
                    self.write(" ");
                }
                self.emit_expression(operand, PREC_PREFIX);
            }
            JsNode::PostfixUnaryExpr { operand, operator } => {
                self.emit_expression(operand, PREC_CALL);
                self.write(operator);
            }
            JsNode::CallExpr { callee, arguments } => {
                self.emit_expression(callee, PREC_CALL);
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(")");
            }
            JsNode::NewExpr { callee, arguments } => {
                self.write("new ");
                self.emit_expression(callee, PREC_CALL);
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(")");
            }
            JsNode::PropertyAccess { object, property } => {
                self.emit_expression(object, PREC_CALL);
                self.write(".");
                self.write(property);
            }
            JsNode::ElementAccess { object, index } => {
                self.emit_expression(object, PREC_CALL);
                self.write("[");
                self.emit_expression(index, PREC_COMMA);
                self.write("]");
            }
            JsNode::ConditionalExpr {
                condition,
                when_true,
                when_false,
            } => {
                self.emit_expression(condition, PREC_LOGICAL_OR);
                self.write(" ? ");
                self.emit_expression(when_true, PREC_ASSIGNMENT);
                self.write(" : ");
                self.emit_expression(when_false, PREC_ASSIGNMENT);
            }
            JsNode::Parenthesized(inner) => {
                self.write("(");
                self.emit_expression(inner, PREC_COMMA);
                self.write(")");
            }
            JsNode::CommaExpr(items) => self.emit_comma_separated(items),
            JsNode::ArrayLiteral(items) => {
                self.write("[");
                self.emit_comma_separated(items);
                self.write("]");
            }
            JsNode::ObjectLiteral(props) => self.emit_object(props),
            JsNode::FunctionExpr {
                name,
                parameters,
                body,
            } => {
                self.write("function ");
                if let Some(name) = name {
                    self.write(name);
                }
                self.emit_parameters(parameters);
                self.write(" ");
                self.emit_block(body);
            }
            JsNode::LogicalOr { left, right } => {
                self.emit_expression(left, PREC_LOGICAL_OR);
                self.write(" || ");
                self.emit_expression(right, PREC_LOGICAL_OR + 1);
            }
            JsNode::LogicalAnd { left, right } => {
                self.emit_expression(left, PREC_LOGICAL_AND);
                self.write(" && ");
                self.emit_expression(right, PREC_LOGICAL_AND + 1);
            }
            stmt => self.emit_statement(stmt),
        }
    }

    fn emit_object(&mut self, props: &[JsProperty]) {
        if props.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{ ");
        for (i, prop) in props.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if is_identifier_name(&prop.key) {
                self.write(&prop.key);
            } else {
                self.write("\"");
                self.write_escaped(&prop.key);
                self.write("\"");
            }
            self.write(": ");
            self.emit_expression(&prop.value, PREC_ASSIGNMENT);
        }
        self.write(" }");
    }

    fn emit_comma_separated(&mut self, nodes: &[JsNode]) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expression(node, PREC_ASSIGNMENT);
        }
    }

    fn emit_parameters(&mut self, params: &[JsParam]) {
        self.write("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&param.name);
        }
        self.write(")");
    }

    // =========================================================================
    // Output helpers
    // =========================================================================

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_escaped(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                _ => self.output.push(c),
            }
        }
    }

    fn write_line(&mut self) {
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_str);
        }
    }

    const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

#[cfg(test)]
#[path = "../tests/printer.rs"]
mod tests;
