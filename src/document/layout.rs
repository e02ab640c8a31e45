//! Layout templates and the layout registry.

use anyhow::Result;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use super::frontmatter::parse_frontmatter;

/// A named wrapper template.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Registry key (the file stem for layouts loaded from disk)
    pub name: String,
    /// Source path, recorded as a dependency of every written document it wraps
    pub path: PathBuf,
    /// Path relative to the site root, reported in template errors
    pub relative_path: PathBuf,
    /// Template body, front matter removed
    pub content: String,
    /// Front matter, merged into `payload.layout` during composition
    pub data: Map<String, Value>,
}

impl Layout {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let relative_path = PathBuf::from("_layouts").join(format!("{name}.html"));
        Self {
            path: relative_path.clone(),
            relative_path,
            name,
            content: content.into(),
            data: Map::new(),
        }
    }

    /// Build a layout from raw file content.
    ///
    /// # Errors
    ///
    /// Returns an error if the front matter is malformed.
    pub fn parse(
        name: impl Into<String>,
        relative_path: impl Into<PathBuf>,
        path: impl Into<PathBuf>,
        raw: &str,
    ) -> Result<Self> {
        let relative_path = relative_path.into();
        let parsed = parse_frontmatter(raw, &relative_path)?;
        Ok(Self {
            name: name.into(),
            path: path.into(),
            relative_path,
            content: parsed.content,
            data: parsed.data,
        })
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Wrap this layout in `parent`.
    pub fn with_parent(self, parent: impl Into<String>) -> Self {
        self.with_field("layout", parent.into())
    }

    /// Name of the parent layout, if any.
    pub fn parent_name(&self) -> Option<&str> {
        self.data.get("layout").and_then(Value::as_str)
    }
}

/// Lookup of layouts by name.
pub trait LayoutRegistry {
    fn get(&self, name: &str) -> Option<&Layout>;

    /// Registered names in a stable order.
    fn names(&self) -> Vec<&str>;
}

/// A layout chain as seen from one starting layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutChain {
    /// Layouts in application order, innermost first
    pub layouts: Vec<String>,
    /// Parent name that closed a cycle
    pub cycle_at: Option<String>,
    /// Parent name that is not registered
    pub missing: Option<String>,
}

/// In-memory layout registry ordered by name.
#[derive(Debug, Clone, Default)]
pub struct LayoutMap {
    layouts: BTreeMap<String, Layout>,
}

impl LayoutMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layout, replacing any previous one with the same name.
    pub fn insert(&mut self, layout: Layout) -> Option<Layout> {
        self.layouts.insert(layout.name.clone(), layout)
    }

    pub fn with(mut self, layout: Layout) -> Self {
        self.insert(layout);
        self
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layout> {
        self.layouts.values()
    }

    /// Follow parent links from `start`, stopping at the first repeated or missing name.
    pub fn chain(&self, start: &str) -> LayoutChain {
        let mut chain = LayoutChain {
            layouts: Vec::new(),
            cycle_at: None,
            missing: None,
        };
        let mut visited = HashSet::new();
        let mut next = Some(start);

        while let Some(name) = next {
            if !visited.insert(name) {
                chain.cycle_at = Some(name.to_string());
                break;
            }
            let Some(layout) = self.layouts.get(name) else {
                chain.missing = Some(name.to_string());
                break;
            };
            chain.layouts.push(layout.name.clone());
            next = layout.parent_name();
        }

        chain
    }
}

impl LayoutRegistry for LayoutMap {
    fn get(&self, name: &str) -> Option<&Layout> {
        self.layouts.get(name)
    }

    fn names(&self) -> Vec<&str> {
        self.layouts.keys().map(String::as_str).collect()
    }
}

impl FromIterator<Layout> for LayoutMap {
    fn from_iter<I: IntoIterator<Item = Layout>>(iter: I) -> Self {
        let mut map = Self::new();
        for layout in iter {
            map.insert(layout);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layout_with_parent() {
        let layout = Layout::parse(
            "post",
            "_layouts/post.html",
            "/site/_layouts/post.html",
            "---\nlayout: default\nwide: true\n---\n<article>{{ content }}</article>",
        )
        .unwrap();

        assert_eq!(layout.parent_name(), Some("default"));
        assert_eq!(layout.data["wide"], true);
        assert!(layout.content.contains("<article>"));
    }

    #[test]
    fn test_registry_lookup_and_names() {
        let map: LayoutMap = vec![
            Layout::new("post", "{{ content }}"),
            Layout::new("default", "{{ content }}"),
        ]
        .into_iter()
        .collect();

        assert!(map.get("post").is_some());
        assert!(map.get("missing").is_none());
        assert_eq!(map.names(), vec!["default", "post"]);
    }

    #[test]
    fn test_chain_stops_at_cycle() {
        let map = LayoutMap::new()
            .with(Layout::new("a", "").with_parent("b"))
            .with(Layout::new("b", "").with_parent("a"));

        let chain = map.chain("a");
        assert_eq!(chain.layouts, vec!["a", "b"]);
        assert_eq!(chain.cycle_at.as_deref(), Some("a"));
        assert!(chain.missing.is_none());
    }

    #[test]
    fn test_chain_reports_missing_parent() {
        let map = LayoutMap::new().with(Layout::new("post", "").with_parent("base"));

        let chain = map.chain("post");
        assert_eq!(chain.layouts, vec!["post"]);
        assert_eq!(chain.missing.as_deref(), Some("base"));
    }
}
