//! Content converters.
//!
//! A [`Converter`] turns content of one format into another (Markdown into HTML,
//! for example). The [`ConverterRegistry`] selects the converters that apply to a
//! document's extension and orders them by [`Priority`], highest first. Converters
//! with equal priority keep their registration order, so selection is deterministic
//! for a given registry state.
//!
//! Two converters ship with the crate:
//!
//! - [`MarkdownConverter`]: Markdown to HTML with pulldown-cmark
//! - [`IdentityConverter`]: matches everything and passes content through untouched

pub mod identity;
pub mod markdown;

pub use identity::IdentityConverter;
pub use markdown::MarkdownConverter;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::SiteConfig;

/// Converter ordering. Higher priorities run first.
///
/// Displays, parses and serializes as the lowercase names in [`Priority::ALL`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub enum Priority {
    Lowest,
    Low,
    #[default]
    Normal,
    High,
    Highest,
}

impl Priority {
    /// Every priority, lowest first.
    pub const ALL: [Priority; 5] =
        [Priority::Lowest, Priority::Low, Priority::Normal, Priority::High, Priority::Highest];

    pub const fn as_str(self) -> &'static str {
        match self {
            Priority::Lowest => "lowest",
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Highest => "highest",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Priority::ALL.into_iter().find(|priority| priority.as_str() == s).ok_or_else(|| {
            let names: Vec<&str> = Priority::ALL.iter().map(|p| p.as_str()).collect();
            anyhow!("Unknown converter priority '{s}', expected one of: {}", names.join(", "))
        })
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

impl TryFrom<String> for Priority {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A pluggable content transformer.
///
/// Extensions passed to [`matches`](Converter::matches) and
/// [`output_ext`](Converter::output_ext) include the leading dot.
pub trait Converter: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    fn priority(&self) -> Priority {
        Priority::Normal
    }

    /// Whether this converter handles `ext`.
    fn matches(&self, ext: &str) -> bool;

    /// Extension produced for input `ext`; empty when the converter has no opinion.
    fn output_ext(&self, ext: &str) -> String;

    /// Transform `content`.
    ///
    /// # Errors
    ///
    /// Any failure aborts the render of the current document.
    fn convert(&self, content: &str) -> Result<String>;

    /// Markup expected before highlighted code blocks.
    fn highlighter_prefix(&self) -> &str {
        ""
    }

    /// Markup expected after highlighted code blocks.
    fn highlighter_suffix(&self) -> &str {
        ""
    }
}

/// Ordered set of registered converters.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: Vec<Arc<dyn Converter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in Markdown and identity converters.
    pub fn with_defaults(config: &SiteConfig) -> Self {
        let mut registry = Self::new();
        registry.register(MarkdownConverter::from_config(config));
        registry.register(IdentityConverter);
        registry
    }

    pub fn register<C: Converter + 'static>(&mut self, converter: C) {
        self.register_arc(Arc::new(converter));
    }

    pub fn register_arc(&mut self, converter: Arc<dyn Converter>) {
        tracing::debug!(
            "Registered converter {} (priority {})",
            converter.name(),
            converter.priority()
        );
        self.converters.push(converter);
    }

    /// Converters matching `ext`, highest priority first.
    pub fn matching(&self, ext: &str) -> Vec<Arc<dyn Converter>> {
        let mut matched: Vec<Arc<dyn Converter>> =
            self.converters.iter().filter(|converter| converter.matches(ext)).cloned().collect();
        // stable sort keeps registration order within a priority
        matched.sort_by(|a, b| b.priority().cmp(&a.priority()));
        matched
    }

    pub fn names(&self) -> Vec<&str> {
        self.converters.iter().map(|converter| converter.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry").field("converters", &self.names()).finish()
    }
}
