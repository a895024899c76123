//! Project configuration loading.
//!
//! A configuration file is a JSON object whose `lowering` section holds the
//! [`LoweringOptions`]. The section and every key in it are optional:
//!
//! ```json
//! {
//!   "lowering": {
//!     "inlineFunctions": true,
//!     "maxInlineDepth": 8,
//!     "runtimeNamespace": "Kotlin"
//!   }
//! }
//! ```

use anyhow::{Context, Result, bail};
use ktjs_transforms::LoweringOptions;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectConfig {
    #[serde(default)]
    lowering: Option<LoweringOptions>,
}

/// Parse a configuration document and return its lowering options.
pub fn parse_options(source: &str) -> Result<LoweringOptions> {
    let value: serde_json::Value =
        serde_json::from_str(source).context("failed to parse configuration JSON")?;
    if !value.is_object() {
        bail!("configuration must be a JSON object");
    }
    let config: ProjectConfig =
        serde_json::from_value(value).context("invalid `lowering` section")?;
    Ok(config.lowering.unwrap_or_default())
}

/// Read and parse the configuration file at `path`.
pub fn load_options(path: &Path) -> Result<LoweringOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration: {}", path.display()))?;
    let options = parse_options(&source)
        .with_context(|| format!("failed to load configuration: {}", path.display()))?;
    debug!(
        path = %path.display(),
        inline_functions = options.inline_functions,
        max_inline_depth = options.max_inline_depth,
        "loaded lowering options"
    );
    Ok(options)
}
