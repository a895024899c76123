//! Whole-program printer output through the public API.

use ktjs_ast::{JsCatchClause, JsNode, JsParam, JsPrinter};

#[test]
fn prints_nested_function_with_loop_and_switch() {
    let body = vec![
        JsNode::var_decl("total", Some(JsNode::number("0"))),
        JsNode::ForStatement {
            initializer: Some(Box::new(JsNode::var_decl("i", Some(JsNode::number("0"))))),
            condition: Some(Box::new(JsNode::binary(
                JsNode::id("i"),
                "<",
                JsNode::prop(JsNode::id("xs"), "length"),
            ))),
            incrementor: Some(Box::new(JsNode::postfix(JsNode::id("i"), "++"))),
            body: Box::new(JsNode::block(vec![JsNode::SwitchStatement {
                expression: Box::new(JsNode::elem(JsNode::id("xs"), JsNode::id("i"))),
                cases: vec![
                    ktjs_ast::JsSwitchCase {
                        test: Some(JsNode::number("0")),
                        statements: vec![JsNode::ContinueStatement(None)],
                    },
                    ktjs_ast::JsSwitchCase {
                        test: None,
                        statements: vec![JsNode::expr_stmt(JsNode::binary(
                            JsNode::id("total"),
                            "+=",
                            JsNode::elem(JsNode::id("xs"), JsNode::id("i")),
                        ))],
                    },
                ],
            }])),
        },
        JsNode::ret(Some(JsNode::id("total"))),
    ];
    let func = JsNode::func_decl("sum", JsParam::list(&["xs"]), body);

    let expected = "\
function sum(xs) {
    var total = 0;
    for (var i = 0; i < xs.length; i++) {
        switch (xs[i]) {
            case 0:
                continue;
            default:
                total += xs[i];
        }
    }
    return total;
}";
    assert_eq!(JsPrinter::emit_to_string(&func), expected);
}

#[test]
fn prints_catch_dispatch_chain() {
    let chain = JsNode::if_stmt(
        JsNode::call(
            JsNode::prop(JsNode::id("Kotlin"), "isType"),
            vec![JsNode::id("e"), JsNode::id("TypeA")],
        ),
        JsNode::block(vec![JsNode::expr_stmt(JsNode::call(
            JsNode::id("handleA"),
            vec![],
        ))]),
        Some(JsNode::block(vec![JsNode::throw(JsNode::id("e"))])),
    );
    let stmt = JsNode::try_stmt(
        vec![JsNode::expr_stmt(JsNode::call(JsNode::id("risky"), vec![]))],
        Some(JsCatchClause::new("e", vec![chain])),
        None,
    );
    let expected = "\
try {
    risky();
} catch (e) {
    if (Kotlin.isType(e, TypeA)) {
        handleA();
    } else {
        throw e;
    }
}";
    assert_eq!(JsPrinter::emit_to_string(&stmt), expected);
}
