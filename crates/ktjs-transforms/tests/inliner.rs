use super::*;
use crate::inline::function_table::{FunctionDefinition, TypeParameterDef};
use crate::type_check::{BuiltinType, TypeRef};
use ktjs_ast::JsPrinter;

fn resolved(definition: &FunctionDefinition) -> ResolvedCall<'_> {
    ResolvedCall {
        definition,
        type_arguments: Vec::new(),
        receiver: None,
        span: None,
    }
}

fn inline(
    definition: &FunctionDefinition,
    arguments: Vec<JsNode>,
    usage: CallUsage,
) -> Result<InlinedBody, InternalError> {
    inline_resolved(&resolved(definition), arguments, usage)
}

fn inline_resolved(
    resolved: &ResolvedCall<'_>,
    arguments: Vec<JsNode>,
    usage: CallUsage,
) -> Result<InlinedBody, InternalError> {
    let mut names = NameGenerator::new();
    let options = LoweringOptions::default();
    let aliases = ReifiedAliases::new();
    let call = JsNode::call(JsNode::id(resolved.definition.name.as_str()), arguments);
    let mut inliner = FunctionInliner::new(&mut names, &options, &aliases);
    match inliner.inline_call(&call, resolved, usage)? {
        InlineOutcome::Inlined(body) => Ok(body),
        InlineOutcome::Inapplicable(reason) => panic!("not inlined: {reason:?}"),
    }
}

fn hoisted_text(body: &InlinedBody) -> String {
    let mut all = body.declarations.clone();
    all.extend(body.statements.iter().cloned());
    JsPrinter::emit_statements(&all)
}

fn result_text(body: &InlinedBody) -> String {
    body.result
        .as_ref()
        .map(JsPrinter::emit_to_string)
        .unwrap_or_default()
}

#[test]
fn test_single_return_inlines_as_expression() {
    let def = FunctionDefinition::new(
        "two",
        &[],
        vec![JsNode::ret(Some(JsNode::binary(
            JsNode::number("1"),
            "+",
            JsNode::number("1"),
        )))],
    )
    .inline();
    let body = inline(&def, vec![], CallUsage::Value).unwrap();
    assert!(!body.hoists());
    assert_eq!(result_text(&body), "1 + 1");
}

#[test]
fn test_side_effecting_argument_evaluated_once() {
    let def = FunctionDefinition::new(
        "f",
        &["x"],
        vec![JsNode::ret(Some(JsNode::binary(
            JsNode::id("x"),
            "+",
            JsNode::id("x"),
        )))],
    )
    .inline();
    let body = inline(
        &def,
        vec![JsNode::call(JsNode::id("sideEffect"), vec![])],
        CallUsage::Value,
    )
    .unwrap();
    assert_eq!(body.declarations.len(), 1);
    assert_eq!(hoisted_text(&body), "var x$1 = sideEffect();");
    assert_eq!(result_text(&body), "x$1 + x$1");
}

#[test]
fn test_preceding_statements_are_hoisted() {
    let def = FunctionDefinition::new(
        "f",
        &["x"],
        vec![
            JsNode::expr_stmt(JsNode::call(JsNode::id("log"), vec![JsNode::id("x")])),
            JsNode::ret(Some(JsNode::binary(JsNode::id("x"), "+", JsNode::number("1")))),
        ],
    )
    .inline();

    let value = inline(&def, vec![JsNode::number("4")], CallUsage::Value).unwrap();
    assert_eq!(hoisted_text(&value), "log(4);");
    assert_eq!(result_text(&value), "4 + 1");

    // The pure return value is dropped when the call is a statement.
    let statement = inline(&def, vec![JsNode::number("4")], CallUsage::Statement).unwrap();
    assert_eq!(statement.result, None);
    assert_eq!(
        JsPrinter::emit_statements(&statement.into_statements()),
        "log(4);"
    );

    // `log` may change `a`, so the later read uses the value from the call.
    let variable = inline(&def, vec![JsNode::id("a")], CallUsage::Value).unwrap();
    assert_eq!(hoisted_text(&variable), "var x$1 = a;\nlog(x$1);");
    assert_eq!(result_text(&variable), "x$1 + 1");
}

#[test]
fn test_argument_read_after_body_write_is_captured_first() {
    // function f(x) { a = 5; return x; }  called as f(a)
    let def = FunctionDefinition::new(
        "f",
        &["x"],
        vec![
            JsNode::expr_stmt(JsNode::assign(JsNode::id("a"), JsNode::number("5"))),
            JsNode::ret(Some(JsNode::id("x"))),
        ],
    )
    .inline();
    let body = inline(&def, vec![JsNode::id("a")], CallUsage::Value).unwrap();
    assert_eq!(hoisted_text(&body), "var x$1 = a;\na = 5;");
    assert_eq!(result_text(&body), "x$1");

    // A constant argument is unaffected by the write.
    let constant = inline(&def, vec![JsNode::number("1")], CallUsage::Value).unwrap();
    assert_eq!(hoisted_text(&constant), "a = 5;");
    assert_eq!(result_text(&constant), "1");
}

#[test]
fn test_body_without_return_has_undefined_value() {
    let def = FunctionDefinition::new(
        "f",
        &[],
        vec![JsNode::expr_stmt(JsNode::call(JsNode::id("work"), vec![]))],
    )
    .inline();
    let body = inline(&def, vec![], CallUsage::Value).unwrap();
    assert_eq!(hoisted_text(&body), "work();");
    assert_eq!(result_text(&body), "void 0");
}

#[test]
fn test_nested_return_becomes_labeled_block() {
    let def = FunctionDefinition::new(
        "f",
        &["x"],
        vec![
            JsNode::if_stmt(
                JsNode::id("x"),
                JsNode::ret(Some(JsNode::number("1"))),
                None,
            ),
            JsNode::ret(Some(JsNode::number("2"))),
        ],
    )
    .inline();
    let body = inline(&def, vec![JsNode::id("c")], CallUsage::Value).unwrap();
    assert_eq!(
        hoisted_text(&body),
        "var tmp$1;\nf$1: {\n    if (c) {\n        tmp$1 = 1;\n        break f$1;\n    }\n    tmp$1 = 2;\n}"
    );
    assert_eq!(result_text(&body), "tmp$1");
}

#[test]
fn test_nested_return_in_statement_position_only_breaks() {
    let def = FunctionDefinition::new(
        "f",
        &["x"],
        vec![
            JsNode::if_stmt(
                JsNode::id("x"),
                JsNode::ret(Some(JsNode::call(JsNode::id("log"), vec![JsNode::number("1")]))),
                None,
            ),
            JsNode::expr_stmt(JsNode::call(JsNode::id("other"), vec![])),
        ],
    )
    .inline();
    let body = inline(&def, vec![JsNode::id("c")], CallUsage::Statement).unwrap();
    assert!(body.declarations.is_empty());
    assert_eq!(
        JsPrinter::emit_statements(&body.into_statements()),
        "f$1: {\n    if (c) {\n        log(1);\n        break f$1;\n    }\n    other();\n}"
    );
}

#[test]
fn test_fall_through_result_starts_undefined() {
    let def = FunctionDefinition::new(
        "f",
        &["x"],
        vec![JsNode::if_stmt(
            JsNode::id("x"),
            JsNode::ret(Some(JsNode::number("1"))),
            None,
        )],
    )
    .inline();
    let body = inline(&def, vec![JsNode::id("c")], CallUsage::Value).unwrap();
    assert_eq!(JsPrinter::emit_to_string(&body.declarations[0]), "var tmp$1 = void 0;");
}

#[test]
fn test_callee_body_is_not_modified() {
    let def = FunctionDefinition::new(
        "f",
        &["x"],
        vec![
            JsNode::var_decl("y", Some(JsNode::id("x"))),
            JsNode::ret(Some(JsNode::id("y"))),
        ],
    )
    .inline();
    let before = def.clone();
    let body = inline(&def, vec![JsNode::number("7")], CallUsage::Value).unwrap();
    assert_eq!(def, before);
    assert_eq!(hoisted_text(&body), "var y$1 = 7;");
    assert_eq!(result_text(&body), "y$1");
}

#[test]
fn test_external_callee_is_inapplicable() {
    let def = FunctionDefinition::external("ext", &["a"]).inline();
    let mut names = NameGenerator::new();
    let options = LoweringOptions::default();
    let aliases = ReifiedAliases::new();
    let call = JsNode::call(JsNode::id("ext"), vec![JsNode::id("z")]);
    let outcome = FunctionInliner::new(&mut names, &options, &aliases)
        .inline_call(&call, &resolved(&def), CallUsage::Value)
        .unwrap();
    assert_eq!(
        outcome,
        InlineOutcome::Inapplicable(InapplicableReason::NoBody)
    );
}

#[test]
fn test_arity_mismatch_is_internal_error() {
    let def = FunctionDefinition::new("f", &["x"], vec![]).inline();
    let err = inline(
        &def,
        vec![JsNode::number("1"), JsNode::number("2")],
        CallUsage::Value,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        InternalError::ArityMismatch {
            expected: 1,
            found: 2,
            ..
        }
    ));
    assert_eq!(err.node_kind(), "CallExpr");
}

#[test]
fn test_reified_parameter_gets_check_function() {
    let def = FunctionDefinition::new(
        "isA",
        &["v"],
        vec![JsNode::ret(Some(JsNode::call(
            JsNode::id("isT"),
            vec![JsNode::id("v")],
        )))],
    )
    .inline()
    .with_type_parameters(vec![TypeParameterDef::reified("T")]);
    let resolved = ResolvedCall {
        type_arguments: vec![TypeRef::builtin(BuiltinType::String)],
        ..resolved(&def)
    };
    let body = inline_resolved(&resolved, vec![JsNode::id("s")], CallUsage::Value).unwrap();
    assert_eq!(
        hoisted_text(&body),
        "var isT$1 = function (value) {\n    return typeof value === \"string\";\n};"
    );
    assert_eq!(result_text(&body), "isT$1(s)");
}

#[test]
fn test_missing_reified_argument_is_internal_error() {
    let def = FunctionDefinition::new("isA", &[], vec![])
        .inline()
        .with_type_parameters(vec![TypeParameterDef::reified("T")]);
    let err = inline(&def, vec![], CallUsage::Value).unwrap_err();
    assert_eq!(
        err,
        InternalError::UnboundReifiedParameter {
            name: "T".to_string(),
            span: None
        }
    );
}

#[test]
fn test_receiver_binds_this() {
    let def = FunctionDefinition::new(
        "getX",
        &[],
        vec![JsNode::ret(Some(JsNode::prop(JsNode::this(), "x")))],
    )
    .inline()
    .with_receiver();
    let resolved = ResolvedCall {
        receiver: Some(JsNode::id("obj")),
        ..resolved(&def)
    };
    let body = inline_resolved(&resolved, vec![], CallUsage::Value).unwrap();
    assert!(!body.hoists());
    assert_eq!(result_text(&body), "obj.x");
}

#[test]
fn test_will_hoist_prediction() {
    let simple = FunctionDefinition::new(
        "f",
        &["x"],
        vec![JsNode::ret(Some(JsNode::binary(
            JsNode::id("x"),
            "+",
            JsNode::id("x"),
        )))],
    )
    .inline();
    assert!(!FunctionInliner::will_hoist(
        &resolved(&simple),
        &[JsNode::id("a")]
    ));
    assert!(FunctionInliner::will_hoist(
        &resolved(&simple),
        &[JsNode::call(JsNode::id("g"), vec![])]
    ));

    let with_statements = FunctionDefinition::new(
        "h",
        &[],
        vec![
            JsNode::expr_stmt(JsNode::call(JsNode::id("work"), vec![])),
            JsNode::ret(None),
        ],
    )
    .inline();
    assert!(FunctionInliner::will_hoist(&resolved(&with_statements), &[]));
}
