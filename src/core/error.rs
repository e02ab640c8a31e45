//! Error handling for the render pipeline
//!
//! [`RenderError`] enumerates every fatal condition a render can hit. Each variant
//! keeps the identity of the document (and converter or hook, where relevant) so the
//! caller can report it without re-deriving context. Underlying failures are preserved
//! as the error [`source`](std::error::Error::source).
//!
//! [`ErrorContext`] wraps a message with optional details and a suggestion and is the
//! way the CLI presents failures to users.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::hooks::HookEvent;
use crate::templating::TemplateError;

/// Boxed error produced by pluggable collaborators (converters, hooks).
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal render failures.
///
/// All variants abort the current document. Nothing is retried and no partial
/// output is returned.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A converter failed while transforming content.
    #[error("{converter} encountered an error while converting '{document}'")]
    Conversion {
        /// Name of the failing converter
        converter: String,
        /// Relative path of the document being converted
        document: String,
        /// Underlying converter failure
        source: BoxedError,
    },

    /// Template parsing or execution failed.
    #[error("Liquid exception in '{path}': {source}")]
    Template {
        /// Path reported for the failing template (layout path or document path)
        path: String,
        /// Structured template error
        source: TemplateError,
    },

    /// Highlighter markers were requested but no converter matches the document.
    #[error("No converter available for '{document}' (extension '{extname}')")]
    NoConverterAvailable {
        /// Relative path of the document
        document: String,
        /// Extension that nothing matched
        extname: String,
    },

    /// A registered hook returned an error.
    #[error("{event} hook failed for '{document}'")]
    Hook {
        /// Event being triggered
        event: HookEvent,
        /// Relative path of the document
        document: String,
        /// Underlying hook failure
        source: BoxedError,
    },
}

impl RenderError {
    /// Short label for the error kind, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderError::Conversion {
                ..
            } => "ConversionError",
            RenderError::Template {
                ..
            } => "TemplateRenderError",
            RenderError::NoConverterAvailable {
                ..
            } => "NoConverterAvailable",
            RenderError::Hook {
                ..
            } => "HookError",
        }
    }
}

/// Error wrapper with user-facing details and a suggestion.
///
/// # Examples
///
/// ```rust,no_run
/// use jrender::core::ErrorContext;
///
/// let context = ErrorContext::new("Layout directory not found")
///     .with_suggestion("Create a _layouts directory or set layouts_dir in _config.toml")
///     .with_details("Looked for layouts under ./_layouts");
///
/// context.display();
/// ```
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Primary error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Walks the error chain looking for pipeline errors first, then falls back to
/// I/O errors, then to the plain error message with its causes.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let mut current_error: &dyn std::error::Error = error.as_ref();
    loop {
        if let Some(render_error) = current_error.downcast_ref::<RenderError>() {
            return create_render_error_context(&error, render_error);
        }

        if let Some(template_error) = current_error.downcast_ref::<TemplateError>() {
            return ErrorContext::new(template_error.to_string())
                .with_details(template_error.format_with_context())
                .with_suggestion("Check your template syntax and variable names");
        }

        match current_error.source() {
            Some(source) => current_error = source,
            None => break,
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::NotFound {
            return ErrorContext::new(error.to_string())
                .with_suggestion("Check that the file or directory exists and the path is correct");
        }
    }

    let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    let context = ErrorContext::new(error.to_string());
    if causes.is_empty() {
        context
    } else {
        context.with_details(causes.join("\n  → "))
    }
}

fn create_render_error_context(error: &anyhow::Error, render_error: &RenderError) -> ErrorContext {
    match render_error {
        RenderError::Conversion {
            source,
            ..
        } => ErrorContext::new(render_error.to_string())
            .with_details(source.to_string())
            .with_suggestion("Fix the document content or the converter configuration"),
        RenderError::Template {
            source,
            ..
        } => ErrorContext::new(render_error.to_string())
            .with_details(source.format_with_context())
            .with_suggestion("Check your template syntax and variable names"),
        RenderError::NoConverterAvailable {
            ..
        } => ErrorContext::new(render_error.to_string()).with_suggestion(
            "Register a converter for this extension or keep the identity converter enabled",
        ),
        RenderError::Hook {
            source,
            ..
        } => ErrorContext::new(error.to_string()).with_details(source.to_string()),
    }
}
