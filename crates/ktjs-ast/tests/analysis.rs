use super::*;
use crate::node::{JsCatchClause, JsParam};

fn call(name: &str) -> JsNode {
    JsNode::call(JsNode::id(name), vec![])
}

#[test]
fn test_side_effects() {
    assert!(!can_have_side_effect(&JsNode::number("1")));
    assert!(!can_have_side_effect(&JsNode::id("x")));
    assert!(!can_have_side_effect(&JsNode::binary(
        JsNode::id("x"),
        "+",
        JsNode::prop(JsNode::id("o"), "p")
    )));
    assert!(can_have_side_effect(&call("f")));
    assert!(can_have_side_effect(&JsNode::binary(
        JsNode::id("x"),
        "+",
        call("f")
    )));
    assert!(can_have_side_effect(&JsNode::assign(
        JsNode::id("x"),
        JsNode::number("1")
    )));
    assert!(can_have_side_effect(&JsNode::postfix(JsNode::id("i"), "++")));
    assert!(!can_have_side_effect(&JsNode::func_expr(
        None,
        vec![],
        vec![JsNode::expr_stmt(call("f"))]
    )));
}

#[test]
fn test_trivially_copyable() {
    assert!(is_trivially_copyable(&JsNode::id("x")));
    assert!(is_trivially_copyable(&JsNode::string("s")));
    assert!(!is_trivially_copyable(&JsNode::prop(JsNode::id("o"), "p")));
    assert!(is_constant(&JsNode::this()));
    assert!(!is_constant(&JsNode::id("x")));
}

#[test]
fn test_count_references_reads_and_writes() {
    let body = vec![
        JsNode::expr_stmt(JsNode::assign(
            JsNode::id("x"),
            JsNode::binary(JsNode::id("x"), "+", JsNode::number("1")),
        )),
        JsNode::expr_stmt(JsNode::binary(JsNode::id("x"), "+=", JsNode::number("2"))),
        JsNode::ret(Some(JsNode::id("x"))),
    ];
    assert_eq!(
        count_references(&body, "x"),
        NameUsage {
            reads: 3,
            writes: 2
        }
    );
    assert!(count_references(&body, "y").is_unused());
}

#[test]
fn test_count_references_respects_shadowing() {
    let shadowing = JsNode::func_expr(
        None,
        JsParam::list(&["x"]),
        vec![JsNode::ret(Some(JsNode::id("x")))],
    );
    let capturing = JsNode::func_expr(None, vec![], vec![JsNode::ret(Some(JsNode::id("x")))]);
    let local_shadow = JsNode::func_expr(
        None,
        vec![],
        vec![
            JsNode::var_decl("x", Some(JsNode::number("0"))),
            JsNode::ret(Some(JsNode::id("x"))),
        ],
    );
    assert_eq!(count_references(&[shadowing], "x").total(), 0);
    assert_eq!(count_references(&[local_shadow], "x").total(), 0);
    assert_eq!(count_references(&[capturing], "x").reads, 1);
}

#[test]
fn test_catch_parameter_shadows() {
    let stmt = JsNode::try_stmt(
        vec![JsNode::expr_stmt(JsNode::id("e"))],
        Some(JsCatchClause::new("e", vec![JsNode::throw(JsNode::id("e"))])),
        None,
    );
    assert_eq!(count_references(&[stmt], "e").reads, 1);
}

#[test]
fn test_this_references_stop_at_functions() {
    let body = vec![
        JsNode::expr_stmt(JsNode::prop(JsNode::this(), "a")),
        JsNode::expr_stmt(JsNode::func_expr(
            None,
            vec![],
            vec![JsNode::ret(Some(JsNode::this()))],
        )),
    ];
    assert_eq!(count_this_references(&body), 1);
}

#[test]
fn test_collect_local_declarations() {
    let body = vec![
        JsNode::var_decl("a", None),
        JsNode::if_stmt(
            JsNode::id("c"),
            JsNode::block(vec![JsNode::var_decl("b", None)]),
            None,
        ),
        JsNode::func_decl("inner", vec![], vec![JsNode::var_decl("hidden", None)]),
        JsNode::labeled("loop", JsNode::block(vec![])),
        JsNode::try_stmt(vec![], Some(JsCatchClause::new("err", vec![])), None),
    ];
    let decls = collect_local_declarations(&body);
    let vars: Vec<&str> = decls.variables.iter().map(String::as_str).collect();
    assert_eq!(vars, vec!["a", "b", "inner", "err"]);
    let labels: Vec<&str> = decls.labels.iter().map(String::as_str).collect();
    assert_eq!(labels, vec!["loop"]);
}

#[test]
fn test_captured_in_closure() {
    let body = vec![JsNode::expr_stmt(JsNode::call(
        JsNode::id("run"),
        vec![JsNode::func_expr(
            None,
            vec![],
            vec![JsNode::ret(Some(JsNode::id("p")))],
        )],
    ))];
    assert!(captured_in_closure(&body, "p"));
    assert!(!captured_in_closure(&body, "q"));
    assert!(!captured_in_closure(
        &[JsNode::ret(Some(JsNode::id("p")))],
        "p"
    ));
}

#[test]
fn test_contains_return_ignores_nested_functions() {
    let nested = vec![JsNode::expr_stmt(JsNode::func_expr(
        None,
        vec![],
        vec![JsNode::ret(None)],
    ))];
    assert!(!contains_return(&nested));
    let direct = vec![JsNode::if_stmt(JsNode::id("c"), JsNode::ret(None), None)];
    assert!(contains_return(&direct));
}

#[test]
fn test_read_after_side_effect_follows_evaluation_order() {
    // a = 5; return x;
    let write_then_read = vec![
        JsNode::expr_stmt(JsNode::assign(JsNode::id("a"), JsNode::number("5"))),
        JsNode::ret(Some(JsNode::id("x"))),
    ];
    assert!(read_after_side_effect(&write_then_read, "x"));

    // return x + f();
    let read_then_call = vec![JsNode::ret(Some(JsNode::binary(
        JsNode::id("x"),
        "+",
        call("f"),
    )))];
    assert!(!read_after_side_effect(&read_then_call, "x"));

    // var t = 1; t = 2; return x;
    let local_write = vec![
        JsNode::var_decl("t", Some(JsNode::number("1"))),
        JsNode::expr_stmt(JsNode::assign(JsNode::id("t"), JsNode::number("2"))),
        JsNode::ret(Some(JsNode::id("x"))),
    ];
    assert!(!read_after_side_effect(&local_write, "x"));
}

#[test]
fn test_read_after_side_effect_in_loops_and_closures() {
    // while (x) f();
    let looped = vec![JsNode::while_stmt(
        JsNode::id("x"),
        JsNode::expr_stmt(call("f")),
    )];
    assert!(read_after_side_effect(&looped, "x"));

    // var g = function () { return x; }; f();
    let deferred = vec![
        JsNode::var_decl(
            "g",
            Some(JsNode::func_expr(
                None,
                vec![],
                vec![JsNode::ret(Some(JsNode::id("x")))],
            )),
        ),
        JsNode::expr_stmt(call("f")),
    ];
    assert!(read_after_side_effect(&deferred, "x"));
}
