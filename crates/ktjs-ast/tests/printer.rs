use super::*;
use crate::node::JsCatchClause;

#[test]
fn test_emit_literals() {
    assert_eq!(JsPrinter::emit_to_string(&JsNode::number("42")), "42");
    assert_eq!(
        JsPrinter::emit_to_string(&JsNode::string("hello")),
        "\"hello\""
    );
    assert_eq!(
        JsPrinter::emit_to_string(&JsNode::string("a\"b\n")),
        "\"a\\\"b\\n\""
    );
    assert_eq!(
        JsPrinter::emit_to_string(&JsNode::BooleanLiteral(true)),
        "true"
    );
    assert_eq!(JsPrinter::emit_to_string(&JsNode::NullLiteral), "null");
    assert_eq!(JsPrinter::emit_to_string(&JsNode::Undefined), "void 0");
    assert_eq!(JsPrinter::emit_to_string(&JsNode::this()), "this");
}

#[test]
fn test_emit_binary_precedence() {
    let sum = JsNode::binary(JsNode::id("a"), "+", JsNode::id("b"));
    let product = JsNode::binary(sum.clone(), "*", JsNode::id("c"));
    assert_eq!(JsPrinter::emit_to_string(&product), "(a + b) * c");

    let right_nested = JsNode::binary(JsNode::id("a"), "-", sum);
    assert_eq!(JsPrinter::emit_to_string(&right_nested), "a - (a + b)");

    let chain = JsNode::assign(
        JsNode::id("x"),
        JsNode::assign(JsNode::id("y"), JsNode::number("1")),
    );
    assert_eq!(JsPrinter::emit_to_string(&chain), "x = y = 1");
}

#[test]
fn test_emit_comma_inside_arguments_is_parenthesized() {
    let call = JsNode::call(
        JsNode::id("f"),
        vec![JsNode::comma(vec![JsNode::id("a"), JsNode::id("b")])],
    );
    assert_eq!(JsPrinter::emit_to_string(&call), "f((a, b))");
}

#[test]
fn test_emit_unary_and_type_tests() {
    let check = JsNode::binary(
        JsNode::type_of(JsNode::id("e")),
        "===",
        JsNode::string("string"),
    );
    assert_eq!(
        JsPrinter::emit_to_string(&check),
        "typeof e === \"string\""
    );
    assert_eq!(
        JsPrinter::emit_to_string(&JsNode::not(JsNode::paren(check))),
        "!(typeof e === \"string\")"
    );
    assert_eq!(
        JsPrinter::emit_to_string(&JsNode::postfix(JsNode::id("i"), "++")),
        "i++"
    );
}

#[test]
fn test_emit_conditional_and_logical() {
    let cond = JsNode::conditional(
        JsNode::logical_or(JsNode::id("a"), JsNode::id("b")),
        JsNode::id("c"),
        JsNode::id("d"),
    );
    assert_eq!(JsPrinter::emit_to_string(&cond), "a || b ? c : d");

    let and_of_or = JsNode::logical_and(
        JsNode::logical_or(JsNode::id("a"), JsNode::id("b")),
        JsNode::id("c"),
    );
    assert_eq!(JsPrinter::emit_to_string(&and_of_or), "(a || b) && c");
}

#[test]
fn test_emit_var_decl() {
    assert_eq!(
        JsPrinter::emit_to_string(&JsNode::var_decl("x", None)),
        "var x;"
    );
    assert_eq!(
        JsPrinter::emit_to_string(&JsNode::var_decl("y", Some(JsNode::number("42")))),
        "var y = 42;"
    );
    let list = JsNode::VarDeclList(vec![
        JsNode::var_decl("a", Some(JsNode::number("1"))),
        JsNode::var_decl("b", None),
    ]);
    assert_eq!(JsPrinter::emit_to_string(&list), "var a = 1, b;");
}

#[test]
fn test_emit_if_else_chain() {
    let stmt = JsNode::if_stmt(
        JsNode::id("a"),
        JsNode::block(vec![JsNode::expr_stmt(JsNode::call(JsNode::id("f"), vec![]))]),
        Some(JsNode::block(vec![JsNode::throw(JsNode::id("e"))])),
    );
    assert_eq!(
        JsPrinter::emit_to_string(&stmt),
        "if (a) {\n    f();\n} else {\n    throw e;\n}"
    );
}

#[test]
fn test_emit_try_catch_finally() {
    let stmt = JsNode::try_stmt(
        vec![JsNode::expr_stmt(JsNode::call(JsNode::id("risky"), vec![]))],
        Some(JsCatchClause::new("e", vec![JsNode::throw(JsNode::id("e"))])),
        Some(vec![JsNode::expr_stmt(JsNode::call(JsNode::id("cleanup"), vec![]))]),
    );
    assert_eq!(
        JsPrinter::emit_to_string(&stmt),
        "try {\n    risky();\n} catch (e) {\n    throw e;\n} finally {\n    cleanup();\n}"
    );
}

#[test]
fn test_emit_function_decl_and_expr() {
    let decl = JsNode::func_decl(
        "foo",
        JsParam::list(&["x"]),
        vec![JsNode::ret(Some(JsNode::id("x")))],
    );
    assert_eq!(
        JsPrinter::emit_to_string(&decl),
        "function foo(x) {\n    return x;\n}"
    );

    let expr = JsNode::func_expr(None, vec![], vec![]);
    assert_eq!(JsPrinter::emit_to_string(&expr), "function () { }");
}

#[test]
fn test_emit_iife_statement_is_wrapped() {
    let iife = JsNode::expr_stmt(JsNode::call(JsNode::func_expr(None, vec![], vec![]), vec![]));
    assert_eq!(JsPrinter::emit_to_string(&iife), "(function () { }());");
}

#[test]
fn test_emit_labeled_block() {
    let stmt = JsNode::labeled(
        "f$1",
        JsNode::block(vec![JsNode::break_to("f$1")]),
    );
    assert_eq!(
        JsPrinter::emit_to_string(&stmt),
        "f$1: {\n    break f$1;\n}"
    );
}

#[test]
fn test_emit_object_literal_keys() {
    let obj = JsNode::object(vec![
        JsProperty::init("a", JsNode::number("1")),
        JsProperty::init("not valid", JsNode::number("2")),
    ]);
    assert_eq!(
        JsPrinter::emit_to_string(&obj),
        "{ a: 1, \"not valid\": 2 }"
    );
    assert_eq!(JsPrinter::emit_to_string(&JsNode::object(vec![])), "{}");
}

#[test]
fn test_emit_statements_joins_lines() {
    let out = JsPrinter::emit_statements(&[
        JsNode::var_decl("a", Some(JsNode::number("1"))),
        JsNode::expr_stmt(JsNode::id("a")),
    ]);
    assert_eq!(out, "var a = 1;\na;");
}
