//! Payload construction, templating and full document renders.

use jrender::config::SiteConfig;
use jrender::core::RenderError;
use jrender::document::{Document, DocumentKind, Layout, LayoutMap};
use jrender::render::Renderer;
use jrender::site::Site;
use jrender::templating::TemplateError;
use jrender::test_utils::init_test_logging;
use serde_json::json;

fn site() -> Site {
    Site::new(SiteConfig::default())
}

#[test]
fn test_html_document_wrapped_in_default_layout() {
    init_test_logging(None);
    let layouts = LayoutMap::new().with(Layout::new("default", "<div>{{ content }}</div>"));
    let site = site().with_layouts(layouts);
    let mut doc = Document::new("hello.html", "Hello {{ page.title }}")
        .with_field("title", "Hi")
        .with_field("layout", "default");

    let output = site.render(&mut doc).unwrap();

    assert_eq!(output, "<div>Hello Hi</div>");
    assert_eq!(doc.rendered_content.as_deref(), Some("Hello Hi"));
    assert_eq!(doc.output.as_deref(), Some("<div>Hello Hi</div>"));
}

#[test]
fn test_run_then_place_in_layouts() {
    let layouts = LayoutMap::new().with(Layout::new("default", "<div>{{ content }}</div>"));
    let site = site().with_layouts(layouts);
    let mut doc = Document::new("hello.html", "Hello {{ page.title }}")
        .with_field("title", "Hi")
        .with_field("layout", "default");

    let mut renderer = Renderer::new(&site, &mut doc);
    let mut state = renderer.run().unwrap();
    let output = renderer.place_in_layouts("Hello Hi", &mut state.payload, &state.info).unwrap();

    assert_eq!(output, "<div>Hello Hi</div>");
    assert_eq!(state.payload.get("content"), Some(&json!("Hello Hi")));
}

#[test]
fn test_markdown_document_converted_then_wrapped() {
    let layouts = LayoutMap::new().with(Layout::new("default", "<main>{{ content }}</main>"));
    let site = site().with_layouts(layouts);
    let mut doc = Document::parse(
        "about.md",
        "/site/about.md",
        "---\ntitle: About\nlayout: default\n---\n# {{ page.title }}\n\nSome *text*.\n",
    )
    .unwrap();

    let output = site.render(&mut doc).unwrap();
    assert_eq!(output, "<main><h1>About</h1>\n<p>Some <em>text</em>.</p>\n</main>");
}

#[test]
fn test_related_posts_only_for_posts() {
    let site = site();
    let related = vec![json!({ "title": "Older" })];

    let mut post = Document::new("_posts/2024-01-02-new.md", "")
        .with_collection("posts")
        .with_related_posts(related.clone());
    let payload = Renderer::new(&site, &mut post).build_payload().unwrap();
    assert_eq!(payload.pointer("site.related_posts"), Some(&json!(related)));

    // same site, next document: nothing from the previous render leaks in
    let mut page = Document::new("about.md", "").with_related_posts(related);
    let payload = Renderer::new(&site, &mut page).build_payload().unwrap();
    assert_eq!(payload.pointer("site.related_posts"), Some(&json!(null)));

    let mut recipe = Document::new("_recipes/soup.md", "").with_collection("recipes");
    let payload = Renderer::new(&site, &mut recipe).build_payload().unwrap();
    assert_eq!(payload.pointer("site.related_posts"), Some(&json!(null)));
}

#[test]
fn test_paginator_only_when_paginated() {
    let site = site();

    let mut plain = Document::new("index.html", "");
    let payload = Renderer::new(&site, &mut plain).build_payload().unwrap();
    assert!(!payload.contains_key("paginator"));

    let mut paged = Document::new("index.html", "{{ paginator.page }}/{{ paginator.total_pages }}")
        .with_pager(json!({ "page": 2, "total_pages": 5 }));
    let output = site.render(&mut paged).unwrap();
    assert_eq!(output, "2/5");
}

#[test]
fn test_output_extension_cases() {
    let site = site();

    let mut html = Document::new("page.html", "");
    assert_eq!(Renderer::new(&site, &mut html).output_ext(), ".html");

    let mut markdown = Document::new("post.md", "");
    let renderer = Renderer::new(&site, &mut markdown);
    let names: Vec<&str> = renderer.converters().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Markdown", "Identity"]);
    assert_eq!(renderer.output_ext(), ".html");

    let mut feed = Document::new("feed.md", "").with_field("permalink", "/a/b.json");
    assert_eq!(Renderer::new(&site, &mut feed).output_ext(), ".json");

    let mut css = Document::new("style.css", "");
    assert_eq!(Renderer::new(&site, &mut css).output_ext(), ".css");
}

#[test]
fn test_page_variables_in_payload() {
    let site = site();
    let mut doc = Document::new("blog/index.md", "").with_field("title", "Blog");

    let payload = Renderer::new(&site, &mut doc).build_payload().unwrap();
    assert_eq!(payload.pointer("page.title"), Some(&json!("Blog")));
    assert_eq!(payload.pointer("page.url"), Some(&json!("/blog/")));
    assert_eq!(payload.get("highlighter_prefix"), Some(&json!("")));
    assert_eq!(payload.get("highlighter_suffix"), Some(&json!("")));
}

#[test]
fn test_yaml_documents_are_neither_templated_nor_wrapped() {
    let layouts = LayoutMap::new().with(Layout::new("default", "<div>{{ content }}</div>"));
    let site = site().with_layouts(layouts);
    let mut doc = Document::new("_data/nav.yml", "title: {{ not.rendered }}\n")
        .with_field("layout", "default");

    let output = site.render(&mut doc).unwrap();
    assert_eq!(output, "title: {{ not.rendered }}\n");
}

#[test]
fn test_render_with_liquid_false_keeps_directives() {
    let site = site();
    let mut doc = Document::new("snippet.html", "{% raw %}{{ x }}{% endraw %} {{ y }}")
        .with_field("render_with_liquid", false);

    let output = site.render(&mut doc).unwrap();
    assert_eq!(output, "{% raw %}{{ x }}{% endraw %} {{ y }}");
}

#[test]
fn test_raw_blocks_survive_templating() {
    let site = site();
    let mut doc = Document::new("page.html", "{{ page.title }}\n```literal\n{{ kept }}\n```\n")
        .with_field("title", "T");

    let output = site.render(&mut doc).unwrap();
    assert!(output.starts_with("T\n"));
    assert!(output.contains("{{ kept }}"));
}

#[test]
fn test_undefined_variables_render_empty() {
    let layouts = LayoutMap::new()
        .with(Layout::new("default", r#"<meta content="{{ page.description }}">{{ content }}"#));
    let site = site().with_layouts(layouts);
    let mut doc = Document::new("index.html", "Page {{ paginator.page }}|{{ page.title }}")
        .with_field("title", "Home")
        .with_field("layout", "default");

    let output = site.render(&mut doc).unwrap();
    assert_eq!(output, r#"<meta content="">Page |Home"#);
}

#[test]
fn test_undefined_variable_is_an_error_when_strict() {
    let mut config = SiteConfig::default();
    config.render.strict_variables = true;
    let site = Site::new(config);
    let mut doc = Document::new("broken.html", "{{ missing_value }}");

    let err = site.render(&mut doc).unwrap_err();
    match &err {
        RenderError::Template {
            path,
            source,
        } => {
            assert_eq!(path, "broken.html");
            assert!(matches!(source, TemplateError::VariableNotFound { .. }));
        }
        other => panic!("expected template error, got {other:?}"),
    }
    assert!(doc.output.is_none());
}

#[test]
fn test_markdown_header_ids_survive_templating() {
    let site = site();
    let mut doc = Document::new("a.md", "## Intro {#intro}\n\n{{ page.path }}\n\n## More {#more}\n");

    let output = site.render(&mut doc).unwrap();
    assert!(output.contains(r#"<h2 id="intro">Intro</h2>"#), "{output}");
    assert!(output.contains(r#"<h2 id="more">More</h2>"#), "{output}");
    assert!(output.contains("<p>a.md</p>"), "{output}");
}

#[test]
fn test_syntax_error_reports_document_path() {
    let site = site();
    let mut doc = Document::new("bad.html", "{% if %}");

    let err = site.render(&mut doc).unwrap_err();
    assert_eq!(err.kind(), "TemplateRenderError");
    assert!(err.to_string().contains("bad.html"));
}

#[test]
fn test_excerpt_renders_without_warnings() {
    let site = site();
    let mut doc = Document::new("_posts/a.html", "Short")
        .with_kind(DocumentKind::Excerpt)
        .with_field("layout", "post");

    let mut renderer = Renderer::new(&site, &mut doc);
    assert_eq!(renderer.render_document().unwrap(), "Short");
    assert!(renderer.diagnostics().is_empty());
}

#[test]
fn test_relative_url_filter_uses_baseurl() {
    let mut config = SiteConfig::default();
    config.baseurl = "/blog".to_string();
    config.url = "https://example.com".to_string();
    let site = Site::new(config);

    let mut doc = Document::new(
        "links.html",
        "{{ \"/css/site.css\" | relative_url }} {{ \"feed.xml\" | absolute_url }}",
    );
    let output = site.render(&mut doc).unwrap();
    assert_eq!(output, "/blog/css/site.css https://example.com/blog/feed.xml");
}
