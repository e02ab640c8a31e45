//! Layout chains: nesting, cycles, missing layouts and layout data.

use jrender::config::SiteConfig;
use jrender::core::Diagnostic;
use jrender::document::{Document, Layout, LayoutMap};
use jrender::regenerator::Regenerator;
use jrender::render::Renderer;
use jrender::site::Site;
use jrender::test_utils::sample_layouts;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn site_with(layouts: LayoutMap) -> Site {
    Site::new(SiteConfig::default()).with_layouts(layouts)
}

#[test]
fn test_no_layout_leaves_content_unchanged() {
    let site = site_with(sample_layouts());
    let mut doc = Document::new("plain.html", "<p>as is</p>");

    assert_eq!(site.render(&mut doc).unwrap(), "<p>as is</p>");

    let mut opted_out = Document::new("plain.html", "<p>as is</p>").with_field("layout", "none");
    let mut renderer = Renderer::new(&site, &mut opted_out);
    assert_eq!(renderer.render_document().unwrap(), "<p>as is</p>");
    assert!(renderer.diagnostics().is_empty());
}

#[test]
fn test_nested_layouts_apply_innermost_first() {
    let site = site_with(sample_layouts());
    let mut doc = Document::new("_posts/a.html", "Hi").with_field("layout", "post");

    assert_eq!(
        site.render(&mut doc).unwrap(),
        "<html><body><article>Hi</article></body></html>"
    );
}

#[test]
fn test_layout_cycle_applies_each_layout_once() {
    let layouts = LayoutMap::new()
        .with(Layout::new("a", "A[{{ content }}]").with_parent("b"))
        .with(Layout::new("b", "B[{{ content }}]").with_parent("a"));
    let site = site_with(layouts);
    let mut doc = Document::new("loop.html", "x").with_field("layout", "a");

    assert_eq!(site.render(&mut doc).unwrap(), "B[A[x]]");
}

#[test]
fn test_self_referencing_layout_terminates() {
    let layouts = LayoutMap::new().with(Layout::new("me", "<{{ content }}>").with_parent("me"));
    let site = site_with(layouts);
    let mut doc = Document::new("self.html", "x").with_field("layout", "me");

    assert_eq!(site.render(&mut doc).unwrap(), "<x>");
}

#[test]
fn test_inner_layout_data_wins_over_outer() {
    let layouts = LayoutMap::new()
        .with(
            Layout::new("post", "{{ content }}")
                .with_parent("default")
                .with_field("kind", "post"),
        )
        .with(
            Layout::new("default", "{{ layout.kind }}/{{ layout.lang }}: {{ content }}")
                .with_field("kind", "page")
                .with_field("lang", "en"),
        );
    let site = site_with(layouts);
    let mut doc = Document::new("a.html", "body").with_field("layout", "post");

    assert_eq!(site.render(&mut doc).unwrap(), "post/en: body");
}

#[test]
fn test_missing_parent_stops_the_chain() {
    let layouts = LayoutMap::new().with(Layout::new("post", "[{{ content }}]").with_parent("gone"));
    let site = site_with(layouts);
    let mut doc = Document::new("a.html", "x").with_field("layout", "post");

    let mut renderer = Renderer::new(&site, &mut doc);
    assert_eq!(renderer.render_document().unwrap(), "[x]");
    assert!(renderer.diagnostics().is_empty());
}

#[test]
fn test_missing_layout_is_a_warning_not_an_error() {
    let site = site_with(sample_layouts());
    let mut doc = Document::new("about.html", "About").with_field("layout", "psot");

    let mut renderer = Renderer::new(&site, &mut doc);
    let output = renderer.render_document().unwrap();

    assert_eq!(output, "About");
    let diagnostics = renderer.into_diagnostics().into_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    match &diagnostics[0] {
        Diagnostic::MissingLayout {
            layout,
            document,
            suggestions,
        } => {
            assert_eq!(layout, "psot");
            assert_eq!(document, "about.html");
            assert_eq!(suggestions, &vec!["post".to_string()]);
        }
        other => panic!("expected missing layout, got {other:?}"),
    }
}

#[test]
fn test_layouts_become_dependencies_of_written_documents() {
    let regenerator = Arc::new(Regenerator::new());
    let site = site_with(sample_layouts()).with_tracker(regenerator.clone());

    let mut doc = Document::new("_posts/a.html", "Hi").with_field("layout", "post");
    site.render(&mut doc).unwrap();

    assert_eq!(
        regenerator.dependencies_of(Path::new("_posts/a.html")),
        vec![PathBuf::from("_layouts/default.html"), PathBuf::from("_layouts/post.html")]
    );
    assert_eq!(
        regenerator.dependents_of(Path::new("_layouts/default.html")),
        vec![PathBuf::from("_posts/a.html")]
    );

    // rendering again does not duplicate edges
    site.render(&mut doc).unwrap();
    assert_eq!(regenerator.edge_count(), 2);
}

#[test]
fn test_override_registry_replaces_site_layouts() {
    let site = site_with(sample_layouts());
    let custom = LayoutMap::new().with(Layout::new("post", "<custom>{{ content }}</custom>"));
    let mut doc = Document::new("a.html", "x").with_field("layout", "post");

    let output = Renderer::new(&site, &mut doc).with_layouts(&custom).render_document().unwrap();
    assert_eq!(output, "<custom>x</custom>");
}
