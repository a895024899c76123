use super::*;
use ktjs_ast::JsPrinter;

fn render_check(ty: &TypeRef) -> String {
    let aliases = ReifiedAliases::new();
    let generator = TypeCheckGenerator::new("Kotlin", &aliases);
    let check = generator
        .check(&JsNode::id("v"), ty)
        .expect("no internal error")
        .expect("checkable type");
    JsPrinter::emit_to_string(&check)
}

#[test]
fn test_builtin_checks() {
    let cases = [
        (BuiltinType::String, "typeof v === \"string\""),
        (BuiltinType::Boolean, "typeof v === \"boolean\""),
        (BuiltinType::Long, "v instanceof Kotlin.Long"),
        (BuiltinType::Number, "Kotlin.isNumber(v)"),
        (BuiltinType::Char, "Kotlin.isChar(v)"),
        (BuiltinType::Int, "typeof v === \"number\""),
        (BuiltinType::Double, "typeof v === \"number\""),
        (BuiltinType::Any, "v != null"),
    ];
    for (builtin, expected) in cases {
        assert_eq!(render_check(&TypeRef::builtin(builtin)), expected, "{builtin:?}");
    }
}

#[test]
fn test_class_check_uses_runtime_helper() {
    let ty = TypeRef::class("foo.TypeA", "_.foo.TypeA");
    assert_eq!(render_check(&ty), "Kotlin.isType(v, _.foo.TypeA)");
}

#[test]
fn test_nullable_short_circuits_on_null() {
    let ty = TypeRef::builtin(BuiltinType::String).nullable();
    assert_eq!(render_check(&ty), "v == null || typeof v === \"string\"");
    assert_eq!(
        render_check(&TypeRef::builtin(BuiltinType::Any).nullable()),
        "true"
    );
}

#[test]
fn test_reified_parameter_uses_alias() {
    let mut aliases = ReifiedAliases::new();
    aliases.push_scope();
    aliases.bind("T", "isT$1");
    aliases.push_scope();
    aliases.bind("U", "isU$1");
    assert_eq!(aliases.lookup("T"), Some("isT$1"));

    let generator = TypeCheckGenerator::new("Kotlin", &aliases);
    let check = generator
        .check(&JsNode::id("v"), &TypeRef::type_parameter("T", true))
        .expect("bound")
        .expect("reified");
    assert_eq!(JsPrinter::emit_to_string(&check), "isT$1(v)");

    aliases.pop_scope();
    assert_eq!(aliases.lookup("U"), None);
    assert_eq!(aliases.depth(), 1);
}

#[test]
fn test_unbound_reified_parameter_is_an_error() {
    let aliases = ReifiedAliases::new();
    let generator = TypeCheckGenerator::new("Kotlin", &aliases);
    let err = generator
        .check(&JsNode::id("v"), &TypeRef::type_parameter("T", true))
        .expect_err("no alias");
    assert_eq!(
        err,
        InternalError::UnboundReifiedParameter {
            name: "T".to_string(),
            span: None,
        }
    );
}

#[test]
fn test_plain_type_parameter_is_not_checkable() {
    let aliases = ReifiedAliases::new();
    let generator = TypeCheckGenerator::new("Kotlin", &aliases);
    let check = generator
        .check(&JsNode::id("v"), &TypeRef::type_parameter("T", false))
        .expect("no internal error");
    assert!(check.is_none());
}

#[test]
fn test_lower_is_negated() {
    let aliases = ReifiedAliases::new();
    let generator = TypeCheckGenerator::new("Kotlin", &aliases);
    let mut names = NameGenerator::new();
    let lowered = generator
        .lower_is(
            JsNode::id("x"),
            &TypeRef::builtin(BuiltinType::Int),
            true,
            &mut names,
            "tmp",
        )
        .expect("no internal error")
        .expect("checkable");
    assert!(lowered.temporaries.is_empty());
    assert_eq!(
        JsPrinter::emit_to_string(&lowered.expression),
        "!(typeof x === \"number\")"
    );
}

#[test]
fn test_lower_is_nullable_binds_impure_subject_once() {
    let aliases = ReifiedAliases::new();
    let generator = TypeCheckGenerator::new("Kotlin", &aliases);
    let mut names = NameGenerator::new();
    let lowered = generator
        .lower_is(
            JsNode::call(JsNode::id("get"), vec![]),
            &TypeRef::builtin(BuiltinType::String).nullable(),
            false,
            &mut names,
            "tmp",
        )
        .expect("no internal error")
        .expect("checkable");
    assert_eq!(lowered.temporaries, vec!["tmp$1".to_string()]);
    assert_eq!(
        JsPrinter::emit_to_string(&lowered.expression),
        "tmp$1 = get(), tmp$1 == null || typeof tmp$1 === \"string\""
    );
    assert_eq!(
        JsPrinter::emit_statements(&lowered.declarations()),
        "var tmp$1;"
    );
}

#[test]
fn test_unsafe_cast() {
    let aliases = ReifiedAliases::new();
    let generator = TypeCheckGenerator::new("Kotlin", &aliases);
    let mut names = NameGenerator::new();
    let ty = TypeRef::class("foo.A", "A");

    let lowered = generator
        .lower_unsafe_cast(JsNode::call(JsNode::id("get"), vec![]), &ty, &mut names, "tmp")
        .expect("no internal error");
    assert_eq!(
        JsPrinter::emit_to_string(&lowered.expression),
        "(tmp$1 = get(), Kotlin.isType(tmp$1, A)) ? tmp$1 : Kotlin.throwCCE()"
    );

    let simple = generator
        .lower_unsafe_cast(JsNode::id("y"), &ty, &mut names, "tmp")
        .expect("no internal error");
    assert!(simple.temporaries.is_empty());
    assert_eq!(
        JsPrinter::emit_to_string(&simple.expression),
        "Kotlin.isType(y, A) ? y : Kotlin.throwCCE()"
    );

    let unchecked = generator
        .lower_unsafe_cast(
            JsNode::id("y"),
            &TypeRef::type_parameter("T", false),
            &mut names,
            "tmp",
        )
        .expect("no internal error");
    assert_eq!(unchecked.expression, JsNode::id("y"));
}

#[test]
fn test_display_name() {
    assert_eq!(
        TypeRef::builtin(BuiltinType::String).nullable().display_name(),
        "String?"
    );
    assert_eq!(TypeRef::class("foo.A", "A").display_name(), "foo.A");
    assert!(TypeRef::class("kotlin.Throwable", "Error").is_class("kotlin.Throwable"));
}
