//! Structured template errors with source locations.

use std::fmt::Write as _;
use thiserror::Error;

/// A template parse or execution failure.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The template could not be parsed.
    #[error("Template syntax error: {message}")]
    SyntaxError {
        message: String,
        location: Box<ErrorLocation>,
    },

    /// Rendering referenced a variable that the payload does not define.
    #[error("Template variable not found: '{variable}'")]
    VariableNotFound {
        variable: String,
        available_variables: Box<Vec<String>>,
        suggestions: Box<Vec<String>>,
        location: Box<ErrorLocation>,
    },

    /// Rendering failed for any other reason (filters, type errors, bad payload).
    #[error("Template rendering failed: {message}")]
    RenderFailed {
        message: String,
        location: Box<ErrorLocation>,
    },
}

/// Where a template error happened.
#[derive(Debug, Clone, Default)]
pub struct ErrorLocation {
    /// Template path, when the engine was given one
    pub file_path: Option<String>,
    /// 1-indexed line, when the engine reports one
    pub line_number: Option<usize>,
    /// Source lines around the error as `(line number, text)`
    pub context_lines: Option<Vec<(usize, String)>>,
}

impl ErrorLocation {
    pub fn new(file_path: Option<String>) -> Self {
        Self {
            file_path,
            ..Self::default()
        }
    }
}

impl TemplateError {
    pub fn location(&self) -> &ErrorLocation {
        match self {
            TemplateError::SyntaxError {
                location,
                ..
            }
            | TemplateError::VariableNotFound {
                location,
                ..
            }
            | TemplateError::RenderFailed {
                location,
                ..
            } => location,
        }
    }

    /// One-line description naming the template path.
    ///
    /// `fallback_path` is used when the error carries no path of its own.
    pub fn format_at(&self, fallback_path: &str) -> String {
        let location = self.location();
        let path = location.file_path.as_deref().unwrap_or(fallback_path);
        match location.line_number {
            Some(line) => format!("{self} in {path} (line {line})"),
            None => format!("{self} in {path}"),
        }
    }

    /// Generate a user-friendly multi-line report with context and suggestions.
    pub fn format_with_context(&self) -> String {
        match self {
            TemplateError::VariableNotFound {
                variable,
                available_variables,
                suggestions,
                location,
            } => format_variable_not_found_error(
                variable,
                available_variables,
                suggestions,
                location,
            ),
            TemplateError::SyntaxError {
                message,
                location,
            } => format_syntax_error(message, location),
            TemplateError::RenderFailed {
                message,
                location,
            } => format_render_failed_error(message, location),
        }
    }
}

fn push_location(msg: &mut String, location: &ErrorLocation) {
    if let Some(path) = &location.file_path {
        let _ = writeln!(msg, "Template: {path}");
    }
    if let Some(line) = location.line_number {
        let _ = writeln!(msg, "Line: {line}");
    }
    if let Some(lines) = &location.context_lines {
        msg.push('\n');
        for (number, text) in lines {
            let marker = if Some(*number) == location.line_number {
                ">"
            } else {
                " "
            };
            let _ = writeln!(msg, "{marker} {number:>4} | {text}");
        }
    }
    msg.push('\n');
}

fn format_variable_not_found_error(
    variable: &str,
    available_variables: &[String],
    suggestions: &[String],
    location: &ErrorLocation,
) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Variable Not Found\n\n");
    let _ = writeln!(msg, "Variable: {variable}");
    push_location(&mut msg, location);

    if !suggestions.is_empty() {
        msg.push_str("Did you mean one of these?\n");
        for suggestion in suggestions {
            let _ = writeln!(msg, "  - {suggestion}");
        }
        msg.push('\n');
    }

    if !available_variables.is_empty() {
        msg.push_str("Available variables in this context:\n");

        let mut grouped = std::collections::BTreeMap::new();
        for var in available_variables {
            let prefix = var.split('.').next().unwrap_or(var);
            grouped.entry(prefix).or_insert_with(Vec::new).push(var.as_str());
        }

        for (prefix, vars) in grouped.iter().take(5) {
            if vars.len() <= 3 {
                for var in vars {
                    let _ = writeln!(msg, "  {var}");
                }
            } else {
                let _ = writeln!(msg, "  {prefix}.*  ({} variables)", vars.len());
            }
        }

        if grouped.len() > 5 {
            let _ = writeln!(msg, "  ... and {} more", grouped.len() - 5);
        }
        msg.push('\n');
    }

    msg.push_str("SUGGESTION: Guard optional values with `default`, e.g. ");
    msg.push_str("{{ page.subtitle | default(value=\"\") }}\n");
    msg
}

fn format_syntax_error(message: &str, location: &ErrorLocation) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Syntax Error\n\n");
    let _ = writeln!(msg, "Error: {message}");
    push_location(&mut msg, location);

    msg.push_str("SUGGESTION: Check template syntax for unclosed tags or invalid expressions.\n");
    msg.push_str("Common issues:\n");
    msg.push_str("  - Unclosed {{ }} or {% %} delimiters\n");
    msg.push_str("  - Invalid filter names\n");
    msg.push_str("  - Missing quotes around string values\n");
    msg
}

fn format_render_failed_error(message: &str, location: &ErrorLocation) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Rendering Failed\n\n");
    let _ = writeln!(msg, "Error: {message}");
    push_location(&mut msg, location);
    msg
}
