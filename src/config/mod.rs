//! Site configuration
//!
//! A site is configured by a single TOML file, `_config.toml` at the site root by
//! default. Every key is optional; a missing file yields [`SiteConfig::default`].
//!
//! ```toml
//! title = "My Blog"
//! url = "https://example.com"
//! baseurl = "/blog"
//! layouts_dir = "_layouts"
//! markdown_ext = ["md", "markdown"]
//!
//! [render]
//! templating = true
//! output_ext_policy = "second-to-last"
//!
//! [markdown]
//! highlighter_prefix = ""
//! highlighter_suffix = ""
//!
//! # Any other key is exposed to templates as `site.<key>`
//! author = "Jane"
//! ```
//!
//! # Modules
//!
//! - `site` - [`SiteConfig`] and its sections
//! - `parser` - Generic TOML parsing with file path context

pub mod parser;
pub mod site;

pub use parser::parse_config;
pub use site::{CONFIG_FILE_NAME, MarkdownConfig, RenderConfig, SiteConfig};
