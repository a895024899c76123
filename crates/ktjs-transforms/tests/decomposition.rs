use super::*;
use ktjs_ast::JsPrinter;

fn call(name: &str, args: Vec<JsNode>) -> JsNode {
    JsNode::call(JsNode::id(name), args)
}

/// Calls to `f` are the ones that will hoist.
fn hoists_f(node: &JsNode) -> bool {
    matches!(node, JsNode::CallExpr { callee, .. } if callee.as_identifier() == Some("f"))
}

/// The replacement statements, or `None` when the statement was left alone.
fn decompose(mut statement: JsNode) -> Option<String> {
    let mut names = NameGenerator::new();
    let replacement = decompose_statement(&mut statement, &mut names, "tmp", &mut hoists_f)?;
    assert_eq!(statement, JsNode::EmptyStatement);
    Some(JsPrinter::emit_statements(&replacement))
}

#[test]
fn test_left_operand_with_side_effect_is_extracted() {
    let statement = JsNode::var_decl(
        "v",
        Some(JsNode::binary(
            call("g", vec![]),
            "+",
            call("f", vec![JsNode::number("1")]),
        )),
    );
    assert_eq!(
        decompose(statement).as_deref(),
        Some("var tmp$1 = g();\nvar v = tmp$1 + f(1);")
    );
}

#[test]
fn test_pure_siblings_stay_in_place() {
    let statement = JsNode::expr_stmt(call(
        "h",
        vec![JsNode::id("a"), JsNode::number("2"), call("f", vec![])],
    ));
    assert_eq!(decompose(statement), None);
}

#[test]
fn test_earlier_arguments_extracted_in_order() {
    let statement = JsNode::expr_stmt(call(
        "h",
        vec![call("g", vec![]), call("k", vec![]), call("f", vec![]), call("later", vec![])],
    ));
    assert_eq!(
        decompose(statement).as_deref(),
        Some("var tmp$1 = g();\nvar tmp$2 = k();\nh(tmp$1, tmp$2, f(), later());")
    );
}

#[test]
fn test_method_receiver_keeps_this_binding() {
    let statement = JsNode::expr_stmt(JsNode::call(
        JsNode::prop(call("make", vec![]), "run"),
        vec![call("f", vec![])],
    ));
    assert_eq!(
        decompose(statement).as_deref(),
        Some("var tmp$1 = make();\ntmp$1.run(f());")
    );
}

#[test]
fn test_nested_target_extracts_at_every_level() {
    // g() runs before k(f()), and m() runs before f() inside it.
    let statement = JsNode::ret(Some(JsNode::binary(
        call("g", vec![]),
        "*",
        call("k", vec![call("m", vec![]), call("f", vec![])]),
    )));
    assert_eq!(
        decompose(statement).as_deref(),
        Some("var tmp$1 = g();\nvar tmp$2 = m();\nreturn tmp$1 * k(tmp$2, f());")
    );
}

#[test]
fn test_assignment_target_is_not_extracted() {
    let statement = JsNode::expr_stmt(JsNode::assign(
        JsNode::prop(JsNode::id("o"), "p"),
        call("f", vec![]),
    ));
    assert_eq!(decompose(statement), None);
}

#[test]
fn test_conditional_operands_are_reachable() {
    let mut and = JsNode::logical_and(call("g", vec![]), call("f", vec![]));
    assert!(has_hoisting_call(&mut and, &mut hoists_f));
    let mut branch = JsNode::conditional(JsNode::id("c"), JsNode::number("1"), call("f", vec![]));
    assert!(has_hoisting_call(&mut branch, &mut hoists_f));
    let mut lambda = JsNode::func_expr(None, vec![], vec![JsNode::expr_stmt(call("f", vec![]))]);
    assert!(!has_hoisting_call(&mut lambda, &mut hoists_f));
}

#[test]
fn test_short_circuit_value_becomes_temporary() {
    let statement = JsNode::var_decl(
        "v",
        Some(JsNode::binary(
            call("g", vec![]),
            "+",
            JsNode::logical_and(JsNode::id("a"), call("f", vec![])),
        )),
    );
    assert_eq!(
        decompose(statement).as_deref(),
        Some("var tmp$1 = g();\nvar tmp$2 = a;\nif (tmp$2) tmp$2 = f();\nvar v = tmp$1 + tmp$2;")
    );
}

#[test]
fn test_conditional_value_becomes_if_else() {
    let statement = JsNode::ret(Some(JsNode::conditional(
        JsNode::id("c"),
        call("f", vec![]),
        JsNode::number("0"),
    )));
    assert_eq!(
        decompose(statement).as_deref(),
        Some("var tmp$1;\nif (c) tmp$1 = f(); else tmp$1 = 0;\nreturn tmp$1;")
    );
}

#[test]
fn test_short_circuit_statement_becomes_if() {
    let or = JsNode::expr_stmt(JsNode::logical_or(call("g", vec![]), call("f", vec![])));
    assert_eq!(decompose(or).as_deref(), Some("if (!g()) f();"));

    // Only the left operand hoists: the spine handles it.
    let left = JsNode::expr_stmt(JsNode::logical_and(call("f", vec![]), call("g", vec![])));
    assert_eq!(decompose(left), None);
}

#[test]
fn test_while_condition_moves_into_body() {
    let statement = JsNode::while_stmt(
        JsNode::logical_and(JsNode::id("a"), call("f", vec![])),
        JsNode::block(vec![JsNode::expr_stmt(call("work", vec![]))]),
    );
    assert_eq!(
        decompose(statement).as_deref(),
        Some("while (true) {\n    if (!(a && f())) break;\n    work();\n}")
    );
}

#[test]
fn test_do_while_with_continue_is_left_alone() {
    let statement = JsNode::DoWhileStatement {
        body: Box::new(JsNode::if_stmt(
            JsNode::id("skip"),
            JsNode::ContinueStatement(None),
            None,
        )),
        condition: Box::new(call("f", vec![])),
    };
    assert_eq!(decompose(statement), None);
}

#[test]
fn test_earlier_declarators_become_statements() {
    let statement = JsNode::VarDeclList(vec![
        JsNode::var_decl("a", Some(JsNode::number("1"))),
        JsNode::var_decl("b", Some(call("g", vec![]))),
        JsNode::var_decl("c", Some(call("f", vec![JsNode::id("a")]))),
        JsNode::var_decl("d", Some(call("h", vec![]))),
    ]);
    assert_eq!(
        decompose(statement).as_deref(),
        Some("var a = 1;\nvar b = g();\nvar c = f(a), d = h();")
    );

    let single = JsNode::VarDeclList(vec![
        JsNode::var_decl("a", Some(JsNode::number("1"))),
        JsNode::var_decl("c", Some(call("f", vec![JsNode::id("a")]))),
    ]);
    assert_eq!(
        decompose(single).as_deref(),
        Some("var a = 1;\nvar c = f(a);")
    );
}
