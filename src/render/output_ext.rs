//! Output extension resolution.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::document::extname_of;

/// Which converter extension wins when several converters declare one.
///
/// This is a heuristic. The default assumes the chain ends with exactly one
/// pass-through converter (the identity converter) and picks the extension
/// declared just before it. Chains of three or more meaningful converters should
/// not rely on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionPolicy {
    First,
    #[default]
    SecondToLast,
    Last,
}

impl ExtensionPolicy {
    /// Pick from at least two candidates.
    fn pick<'a>(self, candidates: &[&'a str]) -> Option<&'a str> {
        match self {
            ExtensionPolicy::First => candidates.first().copied(),
            ExtensionPolicy::SecondToLast => {
                candidates.len().checked_sub(2).and_then(|idx| candidates.get(idx)).copied()
            }
            ExtensionPolicy::Last => candidates.last().copied(),
        }
    }
}

/// Resolve the extension a document is written with.
///
/// 1. A permalink not ending in `/` with a non-empty extension wins.
/// 2. Otherwise the non-empty converter extensions decide: a single candidate is
///    used as is, several go through `policy`.
/// 3. With no candidate at all, `fallback` (the input extension) is used.
pub fn resolve_output_ext(
    permalink: Option<&str>,
    converter_exts: &[String],
    policy: ExtensionPolicy,
    fallback: &str,
) -> String {
    if let Some(permalink) = permalink {
        if !permalink.ends_with('/') {
            let ext = extname_of(Path::new(permalink));
            if !ext.is_empty() {
                return ext;
            }
        }
    }

    let candidates: Vec<&str> =
        converter_exts.iter().map(String::as_str).filter(|ext| !ext.is_empty()).collect();
    let picked = match candidates.as_slice() {
        [] => None,
        [only] => Some(*only),
        many => policy.pick(many),
    };
    picked.unwrap_or(fallback).to_string()
}
