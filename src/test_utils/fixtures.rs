//! On-disk and in-memory site fixtures.

use anyhow::{Context, Result};
use std::path::Path;
use tempfile::TempDir;

use crate::config::CONFIG_FILE_NAME;
use crate::document::{Layout, LayoutMap};

/// A throwaway site directory.
#[derive(Debug)]
pub struct SiteFixture {
    dir: TempDir,
}

impl SiteFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new().context("Failed to create temp site directory")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `_config.toml`.
    pub fn with_config(self, toml: &str) -> Result<Self> {
        self.with_file(CONFIG_FILE_NAME, toml)
    }

    /// Write `_layouts/<name>.html`.
    pub fn with_layout(self, name: &str, raw: &str) -> Result<Self> {
        self.with_file(&format!("_layouts/{name}.html"), raw)
    }

    /// Write any file below the site root, creating parent directories.
    pub fn with_file(self, relative: &str, contents: &str) -> Result<Self> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(self)
    }
}

/// `post` wrapped by `default`, the common two-level blog setup.
pub fn sample_layouts() -> LayoutMap {
    LayoutMap::new()
        .with(
            Layout::new("post", "<article>{{ content }}</article>")
                .with_parent("default")
                .with_field("kind", "post"),
        )
        .with(
            Layout::new("default", "<html><body>{{ content }}</body></html>")
                .with_field("kind", "page")
                .with_field("lang", "en"),
        )
}
