//! URL filters for site templates.
//!
//! - `relative_url`: prefixes a path with the site `baseurl`
//!   (`{{ "/about/" | relative_url }}` renders `/blog/about/` for `baseurl = "/blog"`)
//! - `absolute_url`: like `relative_url`, additionally prefixed with the site `url`
//!
//! Inputs that already carry a scheme (`https://...`) pass through unchanged.
//! Both filters read the `site` register of the current render, so they are
//! registered per render rather than once per engine.

use serde_json::Value;
use std::collections::HashMap;
use tera::Tera;

fn has_scheme(input: &str) -> bool {
    input.contains("://") || input.starts_with("mailto:") || input.starts_with("//")
}

/// Join `baseurl` and `input` with exactly one slash between them.
pub fn relative_url(baseurl: &str, input: &str) -> String {
    if has_scheme(input) {
        return input.to_string();
    }
    let base = baseurl.trim_end_matches('/');
    let base = if base.is_empty() || base.starts_with('/') {
        base.to_string()
    } else {
        format!("/{base}")
    };
    let path = input.trim_start_matches('/');
    format!("{base}/{path}")
}

/// `relative_url` prefixed with the site `url`.
pub fn absolute_url(url: &str, baseurl: &str, input: &str) -> String {
    if has_scheme(input) {
        return input.to_string();
    }
    format!("{}{}", url.trim_end_matches('/'), relative_url(baseurl, input))
}

fn input_str<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    match value {
        Value::String(s) => Ok(s),
        Value::Null => Ok(""),
        _ => Err(tera::Error::msg(format!("{filter} filter requires a string input"))),
    }
}

pub fn create_relative_url_filter(baseurl: String) -> impl tera::Filter + 'static {
    move |value: &Value, _args: &HashMap<String, Value>| -> tera::Result<Value> {
        let input = input_str(value, "relative_url")?;
        Ok(Value::String(relative_url(&baseurl, input)))
    }
}

pub fn create_absolute_url_filter(url: String, baseurl: String) -> impl tera::Filter + 'static {
    move |value: &Value, _args: &HashMap<String, Value>| -> tera::Result<Value> {
        let input = input_str(value, "absolute_url")?;
        Ok(Value::String(absolute_url(&url, &baseurl, input)))
    }
}

/// Register both URL filters using `site.url` and `site.baseurl`.
pub fn register_url_filters(tera: &mut Tera, site: &Value) {
    let field = |key: &str| site.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
    let url = field("url");
    let baseurl = field("baseurl");

    tera.register_filter("relative_url", create_relative_url_filter(baseurl.clone()));
    tera.register_filter("absolute_url", create_absolute_url_filter(url, baseurl));
}
