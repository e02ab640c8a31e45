//! Loading a site and its documents from disk.
//!
//! Layouts are every file under the layouts directory; a layout's name is its
//! path below that directory without the extension (`_layouts/post.html` is
//! `post`). Documents under a `_<label>` directory belong to the `<label>`
//! collection.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Component, Path, PathBuf};

use super::Site;
use crate::config::SiteConfig;
use crate::document::{Document, Layout, LayoutMap, POSTS_COLLECTION};

/// Number of entries exposed as `site.related_posts`.
const RELATED_POSTS_LIMIT: usize = 10;

/// Load the configuration and layouts of the site rooted at `source`.
///
/// # Errors
///
/// Returns an error if the configuration or a layout cannot be read.
pub async fn load_site(source: &Path, config_path: Option<&Path>) -> Result<Site> {
    let config = SiteConfig::discover(source, config_path)?;
    let layouts_dir = source.join(&config.layouts_dir);
    let layouts = load_layouts(source, &layouts_dir).await?;

    tracing::debug!("Loaded {} layout(s) from {}", layouts.len(), layouts_dir.display());
    Ok(Site::new(config).with_source(source).with_layouts(layouts))
}

/// Read every layout under `layouts_dir`.
///
/// A missing directory yields an empty registry.
///
/// # Errors
///
/// Returns an error if a layout file cannot be read or has malformed front matter.
pub async fn load_layouts(source: &Path, layouts_dir: &Path) -> Result<LayoutMap> {
    let mut layouts = LayoutMap::new();
    if !layouts_dir.is_dir() {
        tracing::debug!("No layouts directory at {}", layouts_dir.display());
        return Ok(layouts);
    }

    for path in list_files(layouts_dir) {
        let Some(name) = layout_name(layouts_dir, &path) else {
            continue;
        };
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read layout: {}", path.display()))?;
        let relative_path = path.strip_prefix(source).unwrap_or(&path).to_path_buf();

        let layout = Layout::parse(name, relative_path, &path, &raw)?;
        if let Some(previous) = layouts.insert(layout) {
            tracing::warn!(
                "Layout '{}' defined more than once, {} is ignored",
                previous.name,
                previous.path.display()
            );
        }
    }

    Ok(layouts)
}

/// Read the document at `path` (absolute, below the site root, or relative to it).
///
/// Posts also get their `related_posts`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or has malformed front matter.
pub async fn load_document(site: &Site, path: &Path) -> Result<Document> {
    let full_path = site.resolve_path(path);

    let raw = tokio::fs::read_to_string(&full_path)
        .await
        .with_context(|| format!("Failed to read document: {}", full_path.display()))?;

    let relative_path = site.relative_path(&full_path);
    let mut document = Document::parse(&relative_path, &full_path, &raw)?;
    if let Some(label) = collection_label(&relative_path) {
        document = document.with_collection(label);
    }

    if document.is_post() {
        let related = related_posts(site, &full_path).await?;
        document = document.with_related_posts(related);
    }

    Ok(document)
}

/// The most recent other posts, newest first by file name.
async fn related_posts(site: &Site, post_path: &Path) -> Result<Vec<Value>> {
    let posts_dir = site.source.join(format!("_{POSTS_COLLECTION}"));
    if !posts_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut candidates: Vec<PathBuf> = list_files(&posts_dir)
        .into_iter()
        .filter(|path| !same_file(path, post_path))
        .collect();
    candidates.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
    candidates.truncate(RELATED_POSTS_LIMIT);

    let mut related = Vec::with_capacity(candidates.len());
    for path in candidates {
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read post: {}", path.display()))?;
        let post = Document::parse(site.relative_path(&path), &path, &raw)?
            .with_collection(POSTS_COLLECTION);
        related.push(post.to_liquid(&site.output_ext_for(&post)));
    }
    Ok(related)
}

fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Layout name: path below the layouts directory without its extension.
fn layout_name(layouts_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(layouts_dir).ok()?.with_extension("");
    let name = relative.to_string_lossy().replace('\\', "/");
    (!name.is_empty()).then_some(name)
}

/// Collection of a document from its first path component (`_posts` is `posts`).
fn collection_label(relative_path: &Path) -> Option<String> {
    let Some(Component::Normal(first)) = relative_path.components().next() else {
        return None;
    };
    // a bare file name has no directory to derive a collection from
    if relative_path.components().count() < 2 {
        return None;
    }
    let first = first.to_string_lossy();
    first.strip_prefix('_').filter(|label| !label.is_empty()).map(ToString::to_string)
}
