//! Call resolution for the inline pass.
//!
//! Semantic analysis is not part of this crate; the pass only needs to know,
//! for a call node, which function it targets and with which type arguments.
//! `CallResolver` is that seam. `FunctionTable` is the plain implementation:
//! a map from function name to definition, resolving calls by callee name.

use crate::type_check::TypeRef;
use ktjs_ast::JsNode;
use ktjs_common::Span;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParameterDef {
    pub name: String,
    pub reified: bool,
}

impl TypeParameterDef {
    pub fn reified(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reified: true,
        }
    }

    /// Base name for the variable holding this parameter's check function.
    pub fn check_name(&self) -> String {
        format!("is{}", self.name)
    }
}

/// What the inliner needs to know about a callee.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub parameters: Vec<String>,
    /// `None` for external or abstract functions.
    pub body: Option<Vec<JsNode>>,
    pub inline: bool,
    pub type_parameters: Vec<TypeParameterDef>,
    /// Called as `receiver.name(...)`, with `this` bound to the receiver.
    pub has_receiver: bool,
}

impl FunctionDefinition {
    pub fn new(name: impl Into<String>, parameters: &[&str], body: Vec<JsNode>) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.iter().map(|p| (*p).to_string()).collect(),
            body: Some(body),
            inline: false,
            type_parameters: Vec::new(),
            has_receiver: false,
        }
    }

    /// A function known only by signature.
    pub fn external(name: impl Into<String>, parameters: &[&str]) -> Self {
        Self {
            body: None,
            ..Self::new(name, parameters, Vec::new())
        }
    }

    #[must_use]
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    #[must_use]
    pub fn with_type_parameters(mut self, type_parameters: Vec<TypeParameterDef>) -> Self {
        self.type_parameters = type_parameters;
        self
    }

    #[must_use]
    pub fn with_receiver(mut self) -> Self {
        self.has_receiver = true;
        self
    }

    pub fn reified_parameters(&self) -> impl Iterator<Item = (usize, &TypeParameterDef)> {
        self.type_parameters
            .iter()
            .enumerate()
            .filter(|(_, tp)| tp.reified)
    }
}

/// A call matched to its target.
#[derive(Clone, Debug)]
pub struct ResolvedCall<'d> {
    pub definition: &'d FunctionDefinition,
    /// One entry per type parameter of the definition, when known.
    pub type_arguments: Vec<TypeRef>,
    /// Receiver expression for calls of the form `receiver.name(...)`.
    pub receiver: Option<JsNode>,
    pub span: Option<Span>,
}

pub trait CallResolver {
    /// Resolve `call` (a `CallExpr`) to its target, or `None` when the
    /// target is unknown.
    fn resolve(&self, call: &JsNode) -> Option<ResolvedCall<'_>>;
}

#[derive(Debug, Default)]
pub struct FunctionTable {
    functions: FxHashMap<String, FunctionDefinition>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: FunctionDefinition) {
        self.functions.insert(definition.name.clone(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Register every top-level function declaration of `program`; those
    /// named in `inline_names` are marked inline.
    pub fn from_program(program: &[JsNode], inline_names: &FxHashSet<String>) -> Self {
        let mut table = Self::new();
        for node in program {
            if let JsNode::FunctionDecl {
                name,
                parameters,
                body,
            } = node
            {
                table.register(FunctionDefinition {
                    name: name.clone(),
                    parameters: parameters.iter().map(|p| p.name.clone()).collect(),
                    body: Some(body.clone()),
                    inline: inline_names.contains(name),
                    type_parameters: Vec::new(),
                    has_receiver: false,
                });
            }
        }
        table
    }
}

impl CallResolver for FunctionTable {
    fn resolve(&self, call: &JsNode) -> Option<ResolvedCall<'_>> {
        let JsNode::CallExpr { callee, .. } = call else {
            return None;
        };
        let (definition, receiver) = match callee.as_ref() {
            JsNode::Identifier(name) => (self.get(name)?, None),
            JsNode::PropertyAccess { object, property } => {
                let definition = self.get(property)?;
                if !definition.has_receiver {
                    return None;
                }
                (definition, Some(object.as_ref().clone()))
            }
            _ => return None,
        };
        if definition.has_receiver != receiver.is_some() {
            return None;
        }
        Some(ResolvedCall {
            definition,
            type_arguments: Vec::new(),
            receiver,
            span: None,
        })
    }
}
