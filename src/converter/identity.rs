//! Pass-through converter.

use anyhow::Result;

use super::{Converter, Priority};

/// Matches every extension and returns content unchanged.
///
/// Its output extension is the input extension, so it never changes where a
/// document is written on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl Converter for IdentityConverter {
    fn name(&self) -> &str {
        "Identity"
    }

    fn priority(&self) -> Priority {
        Priority::Lowest
    }

    fn matches(&self, _ext: &str) -> bool {
        true
    }

    fn output_ext(&self, ext: &str) -> String {
        ext.to_string()
    }

    fn convert(&self, content: &str) -> Result<String> {
        Ok(content.to_string())
    }
}
