//! Fresh-name generation for one compilation unit.
//!
//! Every temporary and every renamed local produced while lowering a
//! compilation unit comes from the same `NameGenerator`, so names stay unique
//! across all inlinings of that unit. Generated names take the form
//! `base$N`; `$N` suffixes already on the base are stripped first, so
//! renaming an already-renamed local yields `x$2` rather than `x$1$1`.
//!
//! The generator is owned by the unit's lowering context and lent out by
//! `&mut` to one renaming operation at a time.

use crate::analysis::collect_all_names;
use crate::node::JsNode;
use rustc_hash::{FxHashMap, FxHashSet};

/// Base used when the caller supplies an empty base name.
const DEFAULT_BASE: &str = "tmp";

#[derive(Debug, Default)]
pub struct NameGenerator {
    /// Next suffix per stem
    counters: FxHashMap<String, u32>,
    /// Every name that must not be produced: names present in the unit plus
    /// every name handed out so far
    reserved: FxHashSet<String>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a name as taken.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.reserved.insert(name.into());
    }

    /// Mark every identifier, declaration and label appearing in `nodes` as
    /// taken, including names inside nested functions.
    pub fn reserve_all_in(&mut self, nodes: &[JsNode]) {
        self.reserved.extend(collect_all_names(nodes));
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    /// Produce a name that has not been produced or reserved before.
    pub fn fresh(&mut self, base: &str) -> String {
        let stem = match strip_generated_suffix(base) {
            "" => DEFAULT_BASE,
            stem => stem,
        };
        let counter = self.counters.entry(stem.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{stem}${counter}");
            if !self.reserved.contains(&candidate) {
                self.reserved.insert(candidate.clone());
                return candidate;
            }
        }
    }
}

/// `x$3` -> `x`; names without a numeric `$` suffix are returned unchanged.
fn strip_generated_suffix(name: &str) -> &str {
    match name.rfind('$') {
        Some(pos)
            if pos + 1 < name.len() && name[pos + 1..].bytes().all(|b| b.is_ascii_digit()) =>
        {
            &name[..pos]
        }
        _ => name,
    }
}

#[cfg(test)]
#[path = "../tests/names.rs"]
mod tests;
