//! Lifecycle hooks observed through full renders.

use anyhow::anyhow;
use jrender::config::SiteConfig;
use jrender::core::RenderError;
use jrender::document::{Document, Layout, LayoutMap};
use jrender::hooks::{HookEvent, HookRegistry, HookScope};
use jrender::site::Site;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn site_with(hooks: HookRegistry) -> Site {
    let layouts = LayoutMap::new().with(Layout::new("default", "<main>{{ content }}</main>"));
    Site::new(SiteConfig::default()).with_layouts(layouts).with_hooks(hooks)
}

#[test]
fn test_hooks_fire_in_pipeline_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut hooks = HookRegistry::new();
    for event in [HookEvent::PreRender, HookEvent::PostConvert, HookEvent::PostRender] {
        let seen = seen.clone();
        hooks.register(event, move |ctx| {
            seen.lock().unwrap().push(format!("{}:{}", ctx.event, ctx.content));
            Ok(())
        });
    }
    let site = site_with(hooks);

    let mut doc = Document::new("a.md", "*hi*").with_field("layout", "default");
    site.render(&mut doc).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "pre_render:*hi*".to_string(),
            "post_convert:<p><em>hi</em></p>\n".to_string(),
            "post_render:<main><p><em>hi</em></p>\n</main>".to_string(),
        ]
    );
}

#[test]
fn test_pre_render_hook_extends_payload() {
    let mut hooks = HookRegistry::new();
    hooks.register(HookEvent::PreRender, |ctx| {
        ctx.payload.set_path("site.greeting", json!("Howdy"));
        Ok(())
    });
    let site = site_with(hooks);

    let mut doc = Document::new("a.html", "{{ site.greeting }}");
    assert_eq!(site.render(&mut doc).unwrap(), "Howdy");
}

#[test]
fn test_post_render_hook_rewrites_output() {
    let mut hooks = HookRegistry::new();
    hooks.register(HookEvent::PostRender, |ctx| {
        ctx.content.push_str("<!-- built -->");
        Ok(())
    });
    let site = site_with(hooks);

    let mut doc = Document::new("a.html", "x").with_field("layout", "default");
    assert_eq!(site.render(&mut doc).unwrap(), "<main>x</main><!-- built -->");
    assert_eq!(doc.output.as_deref(), Some("<main>x</main><!-- built -->"));
}

#[test]
fn test_scoped_hooks_only_touch_their_documents() {
    let mut hooks = HookRegistry::new();
    hooks.register_scoped(HookEvent::PostConvert, HookScope::Posts, |ctx| {
        *ctx.content = ctx.content.to_uppercase();
        Ok(())
    });
    let site = site_with(hooks);

    let mut post = Document::new("_posts/a.html", "post").with_collection("posts");
    assert_eq!(site.render(&mut post).unwrap(), "POST");

    let mut page = Document::new("a.html", "page");
    assert_eq!(site.render(&mut page).unwrap(), "page");
}

#[test]
fn test_failing_hook_aborts_render() {
    let mut hooks = HookRegistry::new();
    hooks.register(HookEvent::PostConvert, |_ctx| Err(anyhow!("refusing")));
    let site = site_with(hooks);

    let mut doc = Document::new("a.html", "x");
    let err = site.render(&mut doc).unwrap_err();

    assert!(matches!(
        err,
        RenderError::Hook {
            event: HookEvent::PostConvert,
            ..
        }
    ));
    assert!(doc.output.is_none());
}
