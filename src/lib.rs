//! jrender - a Jekyll-style document render pipeline
//!
//! jrender takes a source document (front matter plus body), renders the body's
//! template directives against a payload of site and page data, pipes the result
//! through the matching converters (markdown to HTML, identity for everything
//! else) and wraps it in a chain of layouts.
//!
//! # Pipeline
//!
//! 1. **Payload**: `site`, `page`, `paginator`, `highlighter_prefix`/`suffix`,
//!    plus `site.related_posts` for posts ([`render::PayloadBuilder`])
//! 2. **Pre-render hooks** ([`hooks`])
//! 3. **Templating** of the body with Tera ([`templating`])
//! 4. **Conversion** through every matching converter, by priority ([`converter`])
//! 5. **Post-convert hooks**
//! 6. **Layouts**, innermost first, cycles stopped after one pass ([`render::CompositionState`])
//! 7. **Post-render hooks**
//!
//! Every layout applied to a written document is recorded as a dependency of that
//! document ([`regenerator`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use jrender::config::SiteConfig;
//! use jrender::document::{Document, Layout, LayoutMap};
//! use jrender::site::Site;
//!
//! let layouts = LayoutMap::new().with(Layout::new("default", "<div>{{ content }}</div>"));
//! let site = Site::new(SiteConfig::default()).with_layouts(layouts);
//!
//! let mut doc = Document::new("hello.html", "Hello {{ page.title }}")
//!     .with_field("title", "Hi")
//!     .with_field("layout", "default");
//! assert_eq!(site.render(&mut doc)?, "<div>Hello Hi</div>");
//! # Ok::<(), jrender::core::RenderError>(())
//! ```
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - Site configuration (`_config.toml`)
//! - [`converter`] - Converter trait, registry, markdown and identity converters
//! - [`core`] - Render errors and diagnostics
//! - [`document`] - Documents, front matter and layouts
//! - [`hooks`] - Render lifecycle hooks
//! - [`regenerator`] - Document to layout dependency tracking
//! - [`render`] - Payload construction, output extension, layout composition
//! - [`site`] - The site aggregate and loading from disk
//! - [`templating`] - Template engine abstraction backed by Tera

pub mod cli;
pub mod config;
pub mod converter;
pub mod core;
pub mod document;
pub mod hooks;
pub mod regenerator;
pub mod render;
pub mod site;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
