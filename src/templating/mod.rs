//! Template engine abstraction and the Tera-backed implementation.
//!
//! The render pipeline only depends on the [`TemplateEngine`] and [`Template`]
//! traits: parse a body once, inspect its non-fatal [`TemplateWarning`]s, then
//! render it against a [`Payload`] and a [`RenderInfo`]. [`TeraEngine`] is the
//! implementation used by the CLI.
//!
//! # Template Context
//!
//! Templates see the payload keys as top-level variables:
//!
//! - `page`: the document's front matter plus computed fields (`url`, `content`, ...)
//! - `site`: site configuration, including `site.related_posts`
//! - `paginator`: only present for paginated documents
//! - `content`, `layout`: only present while a layout is being rendered
//! - `highlighter_prefix`, `highlighter_suffix`
//!
//! # Literal Blocks
//!
//! Content inside a ```` ```literal ```` fence is protected from rendering and
//! emitted as a plain code fence:
//!
//! ````markdown
//! ```literal
//! {{ page.title }}
//! ```
//! ````
//!
//! An unclosed fence is reported as a parse warning and left in place.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jrender::render::{Payload, RenderInfo};
//! use jrender::templating::{TemplateEngine, TeraEngine};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), jrender::templating::TemplateError> {
//! let engine = TeraEngine::new(true);
//! let template = engine.parse("Hello {{ page.title }}", "index.md")?;
//!
//! let mut payload = Payload::new();
//! payload.insert("page", json!({ "title": "Hi" }));
//! let info = RenderInfo::new(json!({}), json!({ "title": "Hi" }));
//!
//! assert_eq!(template.render(&payload, &info)?, "Hello Hi");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod filters;
pub mod renderer;
pub mod utils;

pub use error::{ErrorLocation, TemplateError};
pub use renderer::{TeraEngine, TeraTemplate};
pub use utils::deep_merge_json;

use crate::render::{Payload, RenderInfo};

/// A non-fatal problem found while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateWarning {
    pub message: String,
    /// 1-indexed line in the template body
    pub line: Option<usize>,
}

/// Parses template bodies into executable templates.
pub trait TemplateEngine: Send + Sync {
    /// Parse `body`. `path` is used for error locations only.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::SyntaxError`] when the body cannot be parsed.
    fn parse(&self, body: &str, path: &str) -> Result<Box<dyn Template>, TemplateError>;
}

/// A parsed template.
pub trait Template {
    /// Warnings collected while parsing.
    fn warnings(&self) -> &[TemplateWarning];

    /// Execute the template.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] on any execution failure.
    fn render(&self, payload: &Payload, info: &RenderInfo) -> Result<String, TemplateError>;
}
