//! Template rendering with Tera.
//!
//! [`TeraEngine`] parses a body once into a [`TeraTemplate`]. Rendering clones the
//! parsed Tera instance, registers the URL filters for the current `site`, and
//! executes the template against the payload. Autoescaping is off: layouts and
//! converted content are HTML and must be emitted verbatim.
//!
//! Variables that are not set render as empty unless the engine is strict. Tera
//! has no lenient mode, so a lenient render sets each missing path to null and
//! renders again.
//!
//! `{#` is plain text in site content (kramdown header ids such as
//! `## Intro {#intro}`), so it is hidden from Tera and put back afterwards.

use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use super::error::{ErrorLocation, TemplateError};
use super::utils::format_value_as_kv;
use super::{Template, TemplateEngine, TemplateWarning, filters};
use crate::render::{Payload, RenderInfo};

/// Name the single template is registered under inside its Tera instance.
const TEMPLATE_NAME: &str = "__jrender_template";

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Depth limit when listing available variables for error reports.
const MAX_VARIABLE_DEPTH: usize = 3;

/// Stand-in for `{#` while Tera sees the body.
const COMMENT_OPEN_PLACEHOLDER: &str = "__JRENDER_HASH_BRACE__";

/// Upper bound on missing variables nulled out during one lenient render.
const MAX_UNDEFINED_VARIABLES: usize = 64;

/// Template engine backed by Tera.
#[derive(Debug, Clone, Copy)]
pub struct TeraEngine {
    enabled: bool,
    strict_variables: bool,
}

impl TeraEngine {
    /// Create an engine. With `enabled = false` every template renders its body
    /// unchanged.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            strict_variables: false,
        }
    }

    /// Fail on variables that are not set instead of rendering them empty.
    pub fn with_strict_variables(mut self, strict: bool) -> Self {
        self.strict_variables = strict;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_strict(&self) -> bool {
        self.strict_variables
    }
}

impl Default for TeraEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TemplateEngine for TeraEngine {
    fn parse(&self, body: &str, path: &str) -> Result<Box<dyn Template>, TemplateError> {
        if !self.enabled {
            tracing::debug!("Templating disabled, {} passes through", path);
            return Ok(Box::new(TeraTemplate {
                tera: None,
                source: body.to_string(),
                placeholders: Vec::new(),
                warnings: Vec::new(),
                path: path.to_string(),
                strict_variables: self.strict_variables,
            }));
        }

        let mut protected = protect_literal_blocks(body);
        protected.content = protected.content.replace("{#", COMMENT_OPEN_PLACEHOLDER);

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(TEMPLATE_NAME, &protected.content)
            .map_err(|e| parse_tera_error(&e, &protected.content, None, path))?;

        Ok(Box::new(TeraTemplate {
            tera: Some(tera),
            source: protected.content,
            placeholders: protected.placeholders,
            warnings: protected.warnings,
            path: path.to_string(),
            strict_variables: self.strict_variables,
        }))
    }
}

/// A parsed Tera template.
pub struct TeraTemplate {
    /// `None` when templating is disabled
    tera: Option<Tera>,
    /// Body as handed to Tera (literal blocks replaced by placeholders)
    source: String,
    placeholders: Vec<(String, String)>,
    warnings: Vec<TemplateWarning>,
    path: String,
    strict_variables: bool,
}

impl std::fmt::Debug for TeraTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeraTemplate")
            .field("path", &self.path)
            .field("enabled", &self.tera.is_some())
            .field("literal_blocks", &self.placeholders.len())
            .field("warnings", &self.warnings)
            .field("strict_variables", &self.strict_variables)
            .finish()
    }
}

impl Template for TeraTemplate {
    fn warnings(&self) -> &[TemplateWarning] {
        &self.warnings
    }

    fn render(&self, payload: &Payload, info: &RenderInfo) -> Result<String, TemplateError> {
        let Some(parsed) = &self.tera else {
            return Ok(self.source.clone());
        };

        let mut tera = parsed.clone();
        filters::register_url_filters(&mut tera, &info.site);

        let mut context = self.context_for(payload)?;
        tracing::debug!("Rendering {} with context", self.path);
        log_context_as_kv(&context);

        let mut payload = payload.clone();
        let mut nulled: HashSet<String> = HashSet::new();
        loop {
            let error = match tera.render(TEMPLATE_NAME, &context) {
                Ok(rendered) => {
                    let rendered = rendered.replace(COMMENT_OPEN_PLACEHOLDER, "{#");
                    return Ok(restore_literal_blocks(&rendered, &self.placeholders));
                }
                Err(error) => error,
            };

            // a variable that still fails after being nulled is out of reach
            // (a loop variable's field, for example), so report it
            let retry = if self.strict_variables || nulled.len() >= MAX_UNDEFINED_VARIABLES {
                None
            } else {
                missing_variable(&error)
                    .filter(|variable| can_set_null(&payload, variable))
                    .filter(|variable| nulled.insert(variable.clone()))
            };
            let Some(variable) = retry else {
                return Err(parse_tera_error(&error, &self.source, Some(&context), &self.path));
            };

            tracing::debug!("Variable '{}' is not set in {}, rendering it empty", variable, self.path);
            payload.set_path(&variable, serde_json::Value::Null);
            context = self.context_for(&payload)?;
        }
    }
}

impl TeraTemplate {
    fn context_for(&self, payload: &Payload) -> Result<TeraContext, TemplateError> {
        TeraContext::from_serialize(payload).map_err(|e| TemplateError::RenderFailed {
            message: format_tera_error(&e),
            location: Box::new(ErrorLocation::new(Some(self.path.clone()))),
        })
    }
}

/// Whether `variable` can be set to null without replacing a non-null value on its path.
fn can_set_null(payload: &Payload, variable: &str) -> bool {
    let mut prefix = String::new();
    for key in variable.split('.') {
        if key.is_empty() || key.contains(['[', ']']) {
            return false;
        }
        if !prefix.is_empty() {
            match payload.pointer(&prefix) {
                None | Some(serde_json::Value::Object(_) | serde_json::Value::Null) => {}
                Some(_) => return false,
            }
            prefix.push('.');
        }
        prefix.push_str(key);
    }
    true
}

/// Body with literal blocks swapped for placeholders.
#[derive(Debug, Default)]
pub(crate) struct ProtectedContent {
    pub content: String,
    /// `(placeholder, original block)` pairs
    pub placeholders: Vec<(String, String)>,
    pub warnings: Vec<TemplateWarning>,
}

/// Replace ```` ```literal ```` fenced blocks with placeholders Tera will not touch.
pub(crate) fn protect_literal_blocks(content: &str) -> ProtectedContent {
    let mut protected = ProtectedContent {
        content: String::with_capacity(content.len()),
        ..ProtectedContent::default()
    };

    let mut open_fence: Option<(usize, &str)> = None;
    let mut current_block = String::new();

    for (idx, line) in content.split_inclusive('\n').enumerate() {
        let trimmed = line.trim();

        if open_fence.is_none() && trimmed.starts_with("```literal") {
            open_fence = Some((idx + 1, line));
            current_block.clear();
        } else if let Some((_, fence_line)) = open_fence.filter(|_| trimmed.starts_with("```")) {
            open_fence = None;

            let placeholder = format!("__JRENDER_LITERAL_BLOCK_{}__", protected.placeholders.len());
            protected.content.push_str(&placeholder);
            protected.content.push_str(line_ending(line));

            tracing::debug!(
                "Protected literal fence with placeholder {} ({} bytes)",
                placeholder,
                current_block.len()
            );
            let replacement = format!("```{}{}```", line_ending(fence_line), current_block);
            current_block.clear();
            protected.placeholders.push((placeholder, replacement));
        } else if open_fence.is_some() {
            current_block.push_str(line);
        } else {
            protected.content.push_str(line);
        }
    }

    // unclosed fence goes back as regular content
    if let Some((line_number, fence_line)) = open_fence {
        protected.warnings.push(TemplateWarning {
            message: "Unclosed literal fence, treating it as regular content".to_string(),
            line: Some(line_number),
        });
        protected.content.push_str(fence_line);
        protected.content.push_str(&current_block);
    }

    protected
}

/// `\r\n`, `\n` or nothing, whichever ends `line`.
fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// Put literal blocks back, wrapped in plain code fences.
pub(crate) fn restore_literal_blocks(content: &str, placeholders: &[(String, String)]) -> String {
    let mut result = content.to_string();
    for (placeholder, fenced) in placeholders {
        result = result.replace(placeholder, fenced);
    }
    result
}

/// Parse a Tera error into a structured [`TemplateError`].
///
/// `context` is `None` for parse failures.
fn parse_tera_error(
    error: &tera::Error,
    source: &str,
    context: Option<&TeraContext>,
    path: &str,
) -> TemplateError {
    let line_number = extract_line_from_tera_error(error);
    let context_lines = line_number
        .map(|line| extract_context_lines(source, line, 3))
        .filter(|lines| !lines.is_empty());

    let location = Box::new(ErrorLocation {
        file_path: Some(path.to_string()),
        line_number,
        context_lines,
    });

    let Some(context) = context else {
        return TemplateError::SyntaxError {
            message: format_tera_error(error),
            location,
        };
    };

    if let Some(variable) = missing_variable(error) {
        let available_variables = extract_available_variables(context);
        let suggestions = find_similar_variables(&variable, &available_variables);
        return TemplateError::VariableNotFound {
            variable,
            available_variables: Box::new(available_variables),
            suggestions: Box::new(suggestions),
            location,
        };
    }

    TemplateError::RenderFailed {
        message: format_tera_error(error),
        location,
    }
}

/// Name of the variable a render failed on, if that is what failed.
fn missing_variable(error: &tera::Error) -> Option<String> {
    error_chain(error).iter().find_map(|msg| extract_variable_name(msg))
}

fn error_chain(error: &tera::Error) -> Vec<String> {
    use std::error::Error;

    let mut messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        messages.push(err.to_string());
        current = err.source();
    }
    messages
}

/// Extract variable name from "Variable `foo` not found" message
fn extract_variable_name(error_msg: &str) -> Option<String> {
    let re = Regex::new(r"Variable `([^`]+)` not found").ok()?;
    re.captures(error_msg).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
}

/// Dotted paths of every variable in the context, a few levels deep.
fn extract_available_variables(context: &TeraContext) -> Vec<String> {
    fn walk(prefix: &str, value: &serde_json::Value, depth: usize, out: &mut BTreeSet<String>) {
        out.insert(prefix.to_string());
        if depth >= MAX_VARIABLE_DEPTH {
            return;
        }
        if let serde_json::Value::Object(map) = value {
            for (key, child) in map {
                walk(&format!("{prefix}.{key}"), child, depth + 1, out);
            }
        }
    }

    let mut vars = BTreeSet::new();
    if let serde_json::Value::Object(map) = context.clone().into_json() {
        for (key, value) in &map {
            walk(key, value, 1, &mut vars);
        }
    }
    vars.into_iter().collect()
}

/// Find similar variable names using Levenshtein distance
fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
    let mut scored: Vec<_> = available.iter().map(|var| (var, levenshtein(target, var))).collect();
    scored.sort_by_key(|(_, dist)| *dist);

    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(var, _)| var.clone())
        .collect()
}

/// Lines around `error_line` (1-indexed) with their line numbers.
fn extract_context_lines(
    content: &str,
    error_line: usize,
    context_size: usize,
) -> Vec<(usize, String)> {
    let lines: Vec<&str> = content.lines().collect();
    if error_line == 0 || error_line > lines.len() {
        return Vec::new();
    }

    let start = error_line.saturating_sub(context_size + 1);
    let end = (error_line + context_size).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(idx, line)| (start + idx + 1, (*line).to_string()))
        .collect()
}

/// Extract line number from Tera error message
///
/// Tera includes line:column information in parse error messages, e.g. `--> 3:7`.
fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
    let error_msg = format!("{error:?}");
    let re = Regex::new(r"(\d+):(\d+)").ok()?;
    re.captures(&error_msg)
        .and_then(|caps| caps.get(1))
        .and_then(|line| line.as_str().parse::<usize>().ok())
}

/// Format a Tera error chain, hiding the internal template name.
pub fn format_tera_error(error: &tera::Error) -> String {
    let messages: Vec<String> = error_chain(error)
        .into_iter()
        .map(|msg| {
            msg.replace(&format!("while rendering '{TEMPLATE_NAME}'"), "")
                .replace(&format!("Failed to render '{TEMPLATE_NAME}'"), "")
                .replace(&format!("Failed to parse \"{TEMPLATE_NAME}\""), "")
                .replace(&format!("Failed to parse '{TEMPLATE_NAME}'"), "")
                .replace(&format!("'{TEMPLATE_NAME}'"), "template")
                .trim()
                .to_string()
        })
        .filter(|msg| !msg.is_empty())
        .collect();

    if messages.is_empty() {
        "Template error (no details available)".to_string()
    } else {
        messages.join("\n  → ")
    }
}

/// Log the template context as key-value pairs at debug level.
fn log_context_as_kv(context: &TeraContext) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    let json = context.clone().into_json();
    for line in format_value_as_kv(&json).lines() {
        tracing::debug!("{}", line);
    }
}
