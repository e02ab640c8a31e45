//! Source documents and layouts.
//!
//! A [`Document`] is one unit of site content: its front matter, its raw body, and
//! the bits of site state the render pipeline reads (collection membership,
//! pagination, related posts). The pipeline only ever writes the rendered-content
//! and output fields.
//!
//! A [`Layout`] is a named wrapper template. Layouts point at their parent through
//! the `layout` front matter key, forming a chain that may be misconfigured into a
//! cycle. See [`LayoutRegistry`] for lookup.

pub mod frontmatter;
pub mod layout;

pub use frontmatter::{ParsedFrontmatter, parse_frontmatter};
pub use layout::{Layout, LayoutChain, LayoutMap, LayoutRegistry};

use anyhow::Result;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Collection label whose members receive `site.related_posts`.
pub const POSTS_COLLECTION: &str = "posts";

/// Layout name that explicitly opts out of layout wrapping.
pub const NO_LAYOUT: &str = "none";

/// What kind of content unit a document is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentKind {
    /// Standalone page
    #[default]
    Page,
    /// Member of a named collection (see [`Document::collection`])
    CollectionItem,
    /// Excerpt of another document; never warns about missing layouts
    Excerpt,
}

/// A source content unit.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path relative to the site root (used in logs and URLs)
    pub relative_path: PathBuf,
    /// Source path (used for dependency tracking)
    pub path: PathBuf,
    /// File extension including the leading dot, e.g. `.md`
    pub extname: String,
    /// Raw body, front matter removed
    pub content: String,
    /// Front matter
    pub data: Map<String, Value>,
    pub kind: DocumentKind,
    /// Collection label, e.g. `posts`
    pub collection: Option<String>,
    /// Template-visible pagination object
    pub pager: Option<Value>,
    /// Related-content list exposed as `site.related_posts` for posts
    pub related_posts: Vec<Value>,
    /// Whether the document is written to the output directory
    pub write: bool,
    /// Body after template rendering, set by [`crate::render::Renderer::run`]
    pub rendered_content: Option<String>,
    /// Final output after conversion and layouts
    pub output: Option<String>,
}

impl Document {
    /// Create a page from a relative path and a body without front matter.
    pub fn new(relative_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        let extname = extname_of(&relative_path);
        Self {
            path: relative_path.clone(),
            relative_path,
            extname,
            content: content.into(),
            data: Map::new(),
            kind: DocumentKind::Page,
            collection: None,
            pager: None,
            related_posts: Vec::new(),
            write: true,
            rendered_content: None,
            output: None,
        }
    }

    /// Create a page from raw file content, splitting off its front matter.
    ///
    /// # Errors
    ///
    /// Returns an error if the front matter is malformed.
    pub fn parse(
        relative_path: impl Into<PathBuf>,
        path: impl Into<PathBuf>,
        raw: &str,
    ) -> Result<Self> {
        let relative_path = relative_path.into();
        let parsed = parse_frontmatter(raw, &relative_path)?;
        Ok(Self::new(relative_path, parsed.content).with_path(path).with_data(parsed.data))
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Set a single front matter key.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Make the document a member of `label`.
    pub fn with_collection(mut self, label: impl Into<String>) -> Self {
        self.collection = Some(label.into());
        self.kind = DocumentKind::CollectionItem;
        self
    }

    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_pager(mut self, pager: Value) -> Self {
        self.pager = Some(pager);
        self
    }

    pub fn with_related_posts(mut self, related_posts: Vec<Value>) -> Self {
        self.related_posts = related_posts;
        self
    }

    pub fn with_write(mut self, write: bool) -> Self {
        self.write = write;
        self
    }

    /// Layout requested in front matter, if it is a string.
    pub fn layout_name(&self) -> Option<&str> {
        self.data.get("layout").and_then(Value::as_str)
    }

    /// Whether front matter declares a `layout` key at all (even a non-string one).
    pub fn declares_layout(&self) -> bool {
        self.data.get("layout").is_some_and(|value| !value.is_null())
    }

    /// Whether the document explicitly opts out of layouts.
    pub fn no_layout(&self) -> bool {
        self.layout_name() == Some(NO_LAYOUT)
    }

    pub fn permalink(&self) -> Option<&str> {
        self.data.get("permalink").and_then(Value::as_str)
    }

    pub fn is_excerpt(&self) -> bool {
        self.kind == DocumentKind::Excerpt
    }

    /// Whether the document belongs to the `posts` collection.
    pub fn is_post(&self) -> bool {
        self.kind == DocumentKind::CollectionItem
            && self.collection.as_deref() == Some(POSTS_COLLECTION)
    }

    pub fn is_yaml_file(&self) -> bool {
        matches!(self.extname.to_ascii_lowercase().as_str(), ".yml" | ".yaml")
    }

    /// Whether template directives in the body should be executed.
    ///
    /// False when front matter sets `render_with_liquid: false`, for YAML files,
    /// and for bodies without any template construct.
    pub fn render_with_liquid(&self) -> bool {
        self.allows_liquid() && has_template_construct(&self.content)
    }

    /// Whether template directives may run at all, regardless of the body.
    pub fn allows_liquid(&self) -> bool {
        self.data.get("render_with_liquid") != Some(&Value::Bool(false)) && !self.is_yaml_file()
    }

    /// Whether the output is wrapped in layouts.
    ///
    /// False for YAML files, for `layout: none` and when no layout is declared.
    pub fn place_in_layout(&self) -> bool {
        !self.is_yaml_file() && !self.no_layout() && self.declares_layout()
    }

    /// Public URL of the rendered document.
    ///
    /// The permalink wins when set. Otherwise the relative path with its extension
    /// replaced by `output_ext`; a trailing `index.html` collapses to its directory.
    pub fn url(&self, output_ext: &str) -> String {
        if let Some(permalink) = self.permalink() {
            return permalink.to_string();
        }

        let path = self.relative_path.with_extension(output_ext.trim_start_matches('.'));
        let mut url = format!("/{}", path.to_string_lossy().replace('\\', "/"));
        if url.ends_with("/index.html") {
            url.truncate(url.len() - "index.html".len());
        }
        url
    }

    /// Template-visible projection, exposed as `page`.
    ///
    /// Front matter plus computed fields; computed fields win on conflicts.
    pub fn to_liquid(&self, output_ext: &str) -> Value {
        let mut page = self.data.clone();
        let relative_path = self.relative_path.to_string_lossy().replace('\\', "/");
        page.insert("content".to_string(), Value::String(self.content.clone()));
        page.insert("path".to_string(), Value::String(relative_path.clone()));
        page.insert("relative_path".to_string(), Value::String(relative_path));
        page.insert("url".to_string(), Value::String(self.url(output_ext)));
        page.insert("output_ext".to_string(), Value::String(output_ext.to_string()));
        if let Some(collection) = &self.collection {
            page.insert("collection".to_string(), Value::String(collection.clone()));
        }
        Value::Object(page)
    }

    /// Relative path as displayed in logs and errors.
    pub fn display_path(&self) -> String {
        self.relative_path.to_string_lossy().replace('\\', "/")
    }
}

/// Extension of `path` including the leading dot, or an empty string.
pub fn extname_of(path: &Path) -> String {
    path.extension().map(|ext| format!(".{}", ext.to_string_lossy())).unwrap_or_default()
}

/// Whether `content` contains a template tag or output construct.
pub fn has_template_construct(content: &str) -> bool {
    content.contains("{{") || content.contains("{%")
}
