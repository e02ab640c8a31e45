//! Converter selection, ordering and failure.

use jrender::config::SiteConfig;
use jrender::converter::{ConverterRegistry, Priority};
use jrender::core::RenderError;
use jrender::document::Document;
use jrender::render::{ExtensionPolicy, Renderer};
use jrender::site::Site;
use jrender::test_utils::StubConverter;

fn site_with(converters: ConverterRegistry) -> Site {
    Site::new(SiteConfig::default()).with_converters(converters)
}

#[test]
fn test_converters_run_in_priority_order() {
    let first = StubConverter::new("first")
        .matching(".txt")
        .with_priority(Priority::High)
        .wrapping("(", ")");
    let second = StubConverter::new("second").matching(".txt").wrapping("[", "]");
    let unrelated = StubConverter::new("unrelated").matching(".md");

    let mut registry = ConverterRegistry::new();
    registry.register(second.clone());
    registry.register(first.clone());
    registry.register(unrelated.clone());
    let site = site_with(registry);

    let mut doc = Document::new("note.txt", "x");
    assert_eq!(site.render(&mut doc).unwrap(), "[(x)]");
    assert_eq!(first.calls(), vec!["x"]);
    assert_eq!(second.calls(), vec!["(x)"]);
    assert!(unrelated.calls().is_empty());
}

#[test]
fn test_equal_priority_keeps_registration_order() {
    let a = StubConverter::new("a").wrapping("a(", ")");
    let b = StubConverter::new("b").wrapping("b(", ")");

    let mut registry = ConverterRegistry::new();
    registry.register(a);
    registry.register(b);
    let site = site_with(registry);

    let mut doc = Document::new("x.txt", "x");
    let renderer = Renderer::new(&site, &mut doc);
    assert_eq!(renderer.convert("x").unwrap(), "b(a(x))");
}

#[test]
fn test_failing_converter_stops_the_chain() {
    let before = StubConverter::new("before")
        .with_priority(Priority::High)
        .wrapping("<bad>", "</bad>");
    let failing = StubConverter::new("failing").failing_on("<bad>");
    let after = StubConverter::new("after").with_priority(Priority::Low);

    let mut registry = ConverterRegistry::new();
    registry.register(after.clone());
    registry.register(failing.clone());
    registry.register(before.clone());
    let site = site_with(registry);

    let mut doc = Document::new("page.txt", "content");
    let err = site.render(&mut doc).unwrap_err();

    match &err {
        RenderError::Conversion {
            converter,
            document,
            ..
        } => {
            assert_eq!(converter, "failing");
            assert_eq!(document, "page.txt");
        }
        other => panic!("expected conversion error, got {other:?}"),
    }
    assert_eq!(before.calls(), vec!["content"]);
    assert_eq!(failing.calls(), vec!["<bad>content</bad>"]);
    assert!(after.calls().is_empty());
    assert!(doc.output.is_none());
}

#[test]
fn test_no_converter_is_an_error() {
    let site = site_with(ConverterRegistry::new());
    let mut doc = Document::new("orphan.xyz", "x");

    let err = site.render(&mut doc).unwrap_err();
    assert!(matches!(err, RenderError::NoConverterAvailable { ref extname, .. } if extname == ".xyz"));
}

#[test]
fn test_output_ext_policy_is_configurable() {
    let converters = || {
        let mut registry = ConverterRegistry::new();
        registry.register(
            StubConverter::new("a").with_priority(Priority::High).with_output_ext(".a"),
        );
        registry.register(StubConverter::new("b").with_output_ext(".b"));
        registry.register(
            StubConverter::new("c").with_priority(Priority::Low).with_output_ext(".c"),
        );
        registry
    };

    let ext_with = |policy: ExtensionPolicy| {
        let mut config = SiteConfig::default();
        config.render.output_ext_policy = policy;
        let site = Site::new(config).with_converters(converters());
        let mut doc = Document::new("in.src", "");
        Renderer::new(&site, &mut doc).output_ext().to_string()
    };

    assert_eq!(ext_with(ExtensionPolicy::First), ".a");
    assert_eq!(ext_with(ExtensionPolicy::SecondToLast), ".b");
    assert_eq!(ext_with(ExtensionPolicy::Last), ".c");
}

#[test]
fn test_highlighter_markers_come_from_first_converter() {
    let mut config = SiteConfig::default();
    config.markdown.highlighter_prefix = "<figure>".to_string();
    config.markdown.highlighter_suffix = "</figure>".to_string();
    let site = Site::new(config);

    let mut doc = Document::new("code.md", "{{ highlighter_prefix }}x{{ highlighter_suffix }}");
    Renderer::new(&site, &mut doc).run().unwrap();
    assert_eq!(doc.rendered_content.as_deref(), Some("<figure>x</figure>"));
}
