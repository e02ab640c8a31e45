//! Site-wide configuration loaded from `_config.toml`.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::parser::parse_config;
use crate::render::ExtensionPolicy;

/// Default configuration file name, looked up at the site root.
pub const CONFIG_FILE_NAME: &str = "_config.toml";

fn default_layouts_dir() -> PathBuf {
    PathBuf::from("_layouts")
}

fn default_markdown_ext() -> Vec<String> {
    ["markdown", "mkdown", "mkdn", "mkd", "md"].iter().map(ToString::to_string).collect()
}

const fn default_true() -> bool {
    true
}

/// Site configuration.
///
/// Unknown top-level keys are kept in [`SiteConfig::extra`] and exposed to
/// templates under `site.*`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title, exposed as `site.title`
    #[serde(default)]
    pub title: Option<String>,

    /// Absolute site URL used by the `absolute_url` filter
    #[serde(default)]
    pub url: String,

    /// Path prefix used by the `relative_url` filter
    #[serde(default)]
    pub baseurl: String,

    /// Directory holding layout templates, relative to the site root
    #[serde(default = "default_layouts_dir")]
    pub layouts_dir: PathBuf,

    /// Extensions (without the leading dot) handled by the markdown converter
    #[serde(default = "default_markdown_ext")]
    pub markdown_ext: Vec<String>,

    /// Render pipeline settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Markdown converter settings
    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// Everything else in the file
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Whether template directives are executed at all
    #[serde(default = "default_true")]
    pub templating: bool,

    /// Tie-break used when several converters declare an output extension
    #[serde(default)]
    pub output_ext_policy: ExtensionPolicy,

    /// Fail on variables that are not set instead of rendering them empty
    #[serde(default)]
    pub strict_variables: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            templating: true,
            output_ext_policy: ExtensionPolicy::default(),
            strict_variables: false,
        }
    }
}

/// `[markdown]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Markup emitted before highlighted code blocks
    #[serde(default)]
    pub highlighter_prefix: String,

    /// Markup emitted after highlighted code blocks
    #[serde(default)]
    pub highlighter_suffix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: None,
            url: String::new(),
            baseurl: String::new(),
            layouts_dir: default_layouts_dir(),
            markdown_ext: default_markdown_ext(),
            render: RenderConfig::default(),
            markdown: MarkdownConfig::default(),
            extra: Map::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from an explicit file.
    pub fn load(path: &Path) -> Result<Self> {
        parse_config(path)
    }

    /// Load configuration for a site rooted at `source`.
    ///
    /// An explicit `path` must exist. Without one, `<source>/_config.toml` is read
    /// when present and defaults are used otherwise.
    pub fn discover(source: &Path, path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            return Self::load(path);
        }

        let default_path = source.join(CONFIG_FILE_NAME);
        if default_path.is_file() {
            tracing::debug!("Loading site config from {}", default_path.display());
            Self::load(&default_path)
        } else {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, source.display());
            Ok(Self::default())
        }
    }

    /// Whether `ext` (with or without its leading dot) is a markdown extension.
    pub fn is_markdown_ext(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.');
        self.markdown_ext.iter().any(|md_ext| md_ext.eq_ignore_ascii_case(ext))
    }

    /// Template-visible projection of the configuration, exposed as `site`.
    ///
    /// `related_posts` is always present and null; renders of posts overwrite it.
    pub fn to_site_value(&self) -> Value {
        let mut site = self.extra.clone();
        if let Some(title) = &self.title {
            site.insert("title".to_string(), Value::String(title.clone()));
        }
        site.insert("url".to_string(), Value::String(self.url.clone()));
        site.insert("baseurl".to_string(), Value::String(self.baseurl.clone()));
        site.insert("related_posts".to_string(), Value::Null);
        Value::Object(site)
    }
}
