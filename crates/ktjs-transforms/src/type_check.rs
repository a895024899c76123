//! Runtime type checks.
//!
//! Turns a (value, type) pair into a boolean JavaScript expression, and
//! builds the two type-test expressions on top of it: `is` checks and
//! unsafe casts. Used by catch dispatch and by inlined bodies that test
//! against a reified type parameter.

use crate::error::InternalError;
use ktjs_ast::analysis::is_trivially_copyable;
use ktjs_ast::{JsNode, NameGenerator};
use rustc_hash::FxHashMap;

/// Source-language types with a dedicated JavaScript representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    String,
    Boolean,
    Long,
    Number,
    Char,
    Int,
    Short,
    Byte,
    Float,
    Double,
    Any,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Builtin(BuiltinType),
    /// A user-declared class or interface.
    Class {
        /// Fully-qualified source name, e.g. `foo.TypeA`.
        name: String,
        /// Dotted JavaScript path of the constructor, e.g. `_.foo.TypeA`.
        js_name: String,
    },
    TypeParameter { name: String, reified: bool },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub kind: TypeKind,
    pub nullable: bool,
}

impl TypeRef {
    pub const fn builtin(builtin: BuiltinType) -> Self {
        Self {
            kind: TypeKind::Builtin(builtin),
            nullable: false,
        }
    }

    pub fn class(name: impl Into<String>, js_name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Class {
                name: name.into(),
                js_name: js_name.into(),
            },
            nullable: false,
        }
    }

    pub fn type_parameter(name: impl Into<String>, reified: bool) -> Self {
        Self {
            kind: TypeKind::TypeParameter {
                name: name.into(),
                reified,
            },
            nullable: false,
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Source-level name, for diagnostics.
    pub fn display_name(&self) -> String {
        let base = match &self.kind {
            TypeKind::Builtin(builtin) => format!("{builtin:?}"),
            TypeKind::Class { name, .. } | TypeKind::TypeParameter { name, .. } => name.clone(),
        };
        if self.nullable { format!("{base}?") } else { base }
    }

    /// Whether this is the class named `fq_name` (nullability ignored).
    pub fn is_class(&self, fq_name: &str) -> bool {
        matches!(&self.kind, TypeKind::Class { name, .. } if name == fq_name)
    }
}

// =============================================================================
// Reified aliases
// =============================================================================

/// Reified type parameter name to the name of a variable holding its
/// one-argument check function. Scoped: an inlined body binds its own
/// aliases on top of the enclosing function's.
#[derive(Debug, Default)]
pub struct ReifiedAliases {
    scopes: Vec<FxHashMap<String, String>>,
}

impl ReifiedAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Bind `type_parameter` in the innermost scope, opening one if needed.
    pub fn bind(&mut self, type_parameter: impl Into<String>, alias: impl Into<String>) {
        if self.scopes.is_empty() {
            self.push_scope();
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(type_parameter.into(), alias.into());
        }
    }

    pub fn lookup(&self, type_parameter: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(type_parameter))
            .map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

// =============================================================================
// Generator
// =============================================================================

/// A type test together with the temporaries it assigns.
#[derive(Clone, Debug, PartialEq)]
pub struct LoweredTypeTest {
    pub expression: JsNode,
    /// Names that must be declared (`var tmp;`) in the enclosing function.
    pub temporaries: Vec<String>,
}

impl LoweredTypeTest {
    fn plain(expression: JsNode) -> Self {
        Self {
            expression,
            temporaries: Vec::new(),
        }
    }

    /// `var` declarations for the temporaries.
    pub fn declarations(&self) -> Vec<JsNode> {
        self.temporaries
            .iter()
            .map(|name| JsNode::var_decl(name.as_str(), None))
            .collect()
    }
}

pub struct TypeCheckGenerator<'a> {
    runtime_namespace: &'a str,
    aliases: &'a ReifiedAliases,
}

impl<'a> TypeCheckGenerator<'a> {
    pub const fn new(runtime_namespace: &'a str, aliases: &'a ReifiedAliases) -> Self {
        Self {
            runtime_namespace,
            aliases,
        }
    }

    fn runtime(&self, member: &str) -> JsNode {
        JsNode::prop(JsNode::dotted(self.runtime_namespace), member)
    }

    /// Boolean expression testing `subject` against `ty`, or `None` when the
    /// type cannot be tested at runtime (a type parameter that is not
    /// reified).
    ///
    /// `subject` is copied into the result, twice for nullable types; pass a
    /// side-effect-free expression.
    pub fn check(&self, subject: &JsNode, ty: &TypeRef) -> Result<Option<JsNode>, InternalError> {
        if ty.nullable && ty.kind == TypeKind::Builtin(BuiltinType::Any) {
            return Ok(Some(JsNode::BooleanLiteral(true)));
        }
        let Some(check) = self.check_non_null(subject, &ty.kind)? else {
            return Ok(None);
        };
        if ty.nullable {
            let is_null = JsNode::binary(subject.clone(), "==", JsNode::NullLiteral);
            return Ok(Some(JsNode::logical_or(is_null, check)));
        }
        Ok(Some(check))
    }

    fn check_non_null(
        &self,
        subject: &JsNode,
        kind: &TypeKind,
    ) -> Result<Option<JsNode>, InternalError> {
        let type_of = |name: &str| {
            JsNode::binary(JsNode::type_of(subject.clone()), "===", JsNode::string(name))
        };
        let check = match kind {
            TypeKind::Builtin(builtin) => match builtin {
                BuiltinType::String => type_of("string"),
                BuiltinType::Boolean => type_of("boolean"),
                BuiltinType::Long => {
                    JsNode::binary(subject.clone(), "instanceof", self.runtime("Long"))
                }
                BuiltinType::Number => {
                    JsNode::call(self.runtime("isNumber"), vec![subject.clone()])
                }
                BuiltinType::Char => JsNode::call(self.runtime("isChar"), vec![subject.clone()]),
                BuiltinType::Int
                | BuiltinType::Short
                | BuiltinType::Byte
                | BuiltinType::Float
                | BuiltinType::Double => type_of("number"),
                BuiltinType::Any => JsNode::binary(subject.clone(), "!=", JsNode::NullLiteral),
            },
            TypeKind::Class { js_name, .. } => JsNode::call(
                self.runtime("isType"),
                vec![subject.clone(), JsNode::dotted(js_name)],
            ),
            TypeKind::TypeParameter {
                name,
                reified: true,
            } => {
                let Some(alias) = self.aliases.lookup(name) else {
                    return Err(InternalError::UnboundReifiedParameter {
                        name: name.clone(),
                        span: None,
                    });
                };
                JsNode::call(JsNode::id(alias), vec![subject.clone()])
            }
            TypeKind::TypeParameter { reified: false, .. } => return Ok(None),
        };
        Ok(Some(check))
    }

    /// `subject is ty` (or `!is` when `negated`). The subject is evaluated
    /// once: when the check mentions it twice and it is not trivially
    /// copyable it is assigned to a temporary first.
    pub fn lower_is(
        &self,
        subject: JsNode,
        ty: &TypeRef,
        negated: bool,
        names: &mut NameGenerator,
        temp_prefix: &str,
    ) -> Result<Option<LoweredTypeTest>, InternalError> {
        let mut lowered = if ty.nullable && !is_trivially_copyable(&subject) {
            let temp = names.fresh(temp_prefix);
            let Some(check) = self.check(&JsNode::id(temp.as_str()), ty)? else {
                return Ok(None);
            };
            LoweredTypeTest {
                expression: JsNode::comma(vec![
                    JsNode::assign(JsNode::id(temp.as_str()), subject),
                    check,
                ]),
                temporaries: vec![temp],
            }
        } else {
            let Some(check) = self.check(&subject, ty)? else {
                return Ok(None);
            };
            LoweredTypeTest::plain(check)
        };
        if negated {
            lowered.expression = JsNode::not(lowered.expression);
        }
        Ok(Some(lowered))
    }

    /// `subject as ty`: the value when the check passes, otherwise a call to
    /// the runtime's class-cast failure. A type that cannot be checked at
    /// runtime leaves the subject unchanged.
    pub fn lower_unsafe_cast(
        &self,
        subject: JsNode,
        ty: &TypeRef,
        names: &mut NameGenerator,
        temp_prefix: &str,
    ) -> Result<LoweredTypeTest, InternalError> {
        let throw_cce = JsNode::call(self.runtime("throwCCE"), vec![]);
        if is_trivially_copyable(&subject) {
            return Ok(match self.check(&subject, ty)? {
                Some(check) => {
                    LoweredTypeTest::plain(JsNode::conditional(check, subject, throw_cce))
                }
                None => LoweredTypeTest::plain(subject),
            });
        }

        let temp = names.fresh(temp_prefix);
        let reference = JsNode::id(temp.as_str());
        let Some(check) = self.check(&reference, ty)? else {
            return Ok(LoweredTypeTest::plain(subject));
        };
        let test = JsNode::comma(vec![JsNode::assign(reference.clone(), subject), check]);
        Ok(LoweredTypeTest {
            expression: JsNode::conditional(test, reference, throw_cce),
            temporaries: vec![temp],
        })
    }
}

#[cfg(test)]
#[path = "../tests/type_check.rs"]
mod tests;
