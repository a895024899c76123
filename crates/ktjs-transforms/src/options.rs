//! Options controlling the lowering passes.
//!
//! Read from the `lowering` section of a project configuration file, with
//! camelCase keys and every field defaulted:
//!
//! ```json
//! { "inlineFunctions": true, "maxInlineDepth": 16, "runtimeNamespace": "Kotlin" }
//! ```

use ktjs_common::limits::DEFAULT_MAX_INLINE_DEPTH;
use serde::{Deserialize, Deserializer, Serialize};

/// Accepts both `true` and `"true"`, since hand-written configuration files
/// are not always careful about quoting.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoweringOptions {
    /// Master switch for the inline pass.
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub inline_functions: bool,
    /// Nested inlining (an inlined body that itself contains inlineable
    /// calls) stops at this depth.
    pub max_inline_depth: u32,
    /// Runtime helper object for type checks (`Kotlin.isType`, ...).
    pub runtime_namespace: String,
    /// Fully-qualified name of the root exception type. A catch clause of
    /// this type catches everything.
    pub throwable_name: String,
    /// Base name for synthesized temporaries.
    pub temp_prefix: String,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            inline_functions: true,
            max_inline_depth: DEFAULT_MAX_INLINE_DEPTH,
            runtime_namespace: "Kotlin".to_string(),
            throwable_name: "kotlin.Throwable".to_string(),
            temp_prefix: "tmp".to_string(),
        }
    }
}

impl LoweringOptions {
    /// Parse options from a JSON document. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
#[path = "../tests/options.rs"]
mod tests;
