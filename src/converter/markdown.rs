//! Markdown to HTML with pulldown-cmark.

use anyhow::Result;
use pulldown_cmark::{Options, Parser, html::push_html};

use super::Converter;
use crate::config::SiteConfig;

/// Converts Markdown documents to HTML.
///
/// Uses the GFM extensions (tables, strikethrough, task lists) and kramdown
/// style header ids (`## Intro {#intro}`). Raw HTML passes through unchanged.
#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    extensions: Vec<String>,
    highlighter_prefix: String,
    highlighter_suffix: String,
}

impl MarkdownConverter {
    /// Converter for `extensions` (with or without leading dots).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            highlighter_prefix: String::new(),
            highlighter_suffix: String::new(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.markdown_ext).with_highlighter(
            config.markdown.highlighter_prefix.clone(),
            config.markdown.highlighter_suffix.clone(),
        )
    }

    pub fn with_highlighter(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.highlighter_prefix = prefix.into();
        self.highlighter_suffix = suffix.into();
        self
    }
}

impl Converter for MarkdownConverter {
    fn name(&self) -> &str {
        "Markdown"
    }

    fn matches(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.');
        self.extensions.iter().any(|md_ext| md_ext.eq_ignore_ascii_case(ext))
    }

    fn output_ext(&self, _ext: &str) -> String {
        ".html".to_string()
    }

    fn convert(&self, content: &str) -> Result<String> {
        let options = Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_TABLES
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(content, options);

        let mut html = String::with_capacity(content.len() * 2);
        push_html(&mut html, parser);
        Ok(html)
    }

    fn highlighter_prefix(&self) -> &str {
        &self.highlighter_prefix
    }

    fn highlighter_suffix(&self) -> &str {
        &self.highlighter_suffix
    }
}
