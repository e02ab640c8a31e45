//! Command-line tests against sites on disk.

use assert_cmd::Command;
use jrender::test_utils::SiteFixture;
use predicates::prelude::*;

fn jrender() -> Command {
    let mut cmd = Command::cargo_bin("jrender").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("JRENDER_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn blog() -> SiteFixture {
    SiteFixture::new()
        .unwrap()
        .with_config("title = \"Blog\"\nbaseurl = \"/blog\"\n")
        .unwrap()
        .with_layout("default", "<html>{{ site.title }}|{{ content }}</html>")
        .unwrap()
        .with_layout("post", "---\nlayout: default\n---\n<article>{{ content }}</article>")
        .unwrap()
        .with_file("_posts/2024-01-01-first.md", "---\ntitle: First\nlayout: post\n---\nOne")
        .unwrap()
        .with_file(
            "_posts/2024-02-01-second.md",
            "---\ntitle: Second\nlayout: post\n---\n{% for p in site.related_posts %}{{ p.title }}{% endfor %}",
        )
        .unwrap()
        .with_file("about.md", "---\ntitle: About\nlayout: defualt\n---\nHello {{ page.title }}")
        .unwrap()
}

#[test]
fn test_render_markdown_post_through_layouts() {
    let site = blog();

    jrender()
        .args(["render", "_posts/2024-01-01-first.md", "--source"])
        .arg(site.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<html>Blog|<article><p>One</p>"))
        .stdout(predicate::str::ends_with("</article></html>"));
}

#[test]
fn test_render_post_sees_related_posts() {
    let site = blog();

    jrender()
        .args(["render", "_posts/2024-02-01-second.md", "--source"])
        .arg(site.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>First</p>"));
}

#[test]
fn test_liquid_only_skips_conversion_and_layouts() {
    let site = blog();

    jrender()
        .args(["render", "about.md", "--liquid-only", "--source"])
        .arg(site.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello About"))
        .stdout(predicate::str::contains("<p>").not());
}

#[test]
fn test_missing_layout_warns_with_suggestion() {
    let site = blog();

    jrender()
        .args(["render", "about.md", "--source"])
        .arg(site.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>Hello About</p>"))
        .stderr(predicate::str::contains("Did you mean: default?"));
}

#[test]
fn test_render_writes_output_file_and_dependencies() {
    let site = blog();
    let out = site.path().join("_site/first.html");

    jrender()
        .args(["render", "_posts/2024-01-01-first.md", "--show-dependencies", "--source"])
        .arg(site.path())
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Depends on:"))
        .stderr(predicate::str::contains("post.html"));

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("<html>Blog|<article><p>One</p>"));
    assert!(written.ends_with("</article></html>"));
}

#[test]
fn test_template_error_exits_nonzero() {
    let site = SiteFixture::new().unwrap().with_file("bad.html", "{% if %}").unwrap();

    jrender()
        .args(["render", "bad.html", "--source"])
        .arg(site.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("bad.html"));
}

#[test]
fn test_missing_document_exits_nonzero() {
    let site = blog();

    jrender()
        .args(["render", "nope.md", "--source"])
        .arg(site.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read document"));
}

#[test]
fn test_layouts_lists_chains() {
    let site = blog()
        .with_layout("a", "---\nlayout: b\n---\n{{ content }}")
        .unwrap()
        .with_layout("b", "---\nlayout: a\n---\n{{ content }}")
        .unwrap();

    jrender()
        .args(["layouts", "--source"])
        .arg(site.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("post -> default"))
        .stdout(predicate::str::contains("a -> b -> a (cycle)"));
}

#[test]
fn test_layouts_without_layout_directory() {
    let site = SiteFixture::new().unwrap();

    jrender()
        .args(["layouts", "--source"])
        .arg(site.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No layouts found"));
}
