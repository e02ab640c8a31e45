//! Non-fatal render diagnostics.
//!
//! Warnings never stop a render. They are logged through `tracing` where they are
//! detected and pushed into a [`DiagnosticCollector`] so that a batch driver can
//! summarize them after the fact.

use std::fmt;

/// A non-fatal problem found while rendering a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The template engine reported a warning while parsing a template.
    TemplateWarning {
        /// Template path the warning belongs to
        path: String,
        /// Warning text from the engine
        message: String,
        /// 1-indexed line, when the engine knows it
        line: Option<usize>,
    },

    /// A document asked for a layout that is not registered.
    MissingLayout {
        /// Requested layout name
        layout: String,
        /// Relative path of the requesting document
        document: String,
        /// Registered layouts with similar names
        suggestions: Vec<String>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::TemplateWarning {
                path,
                message,
                line,
            } => match line {
                Some(line) => write!(f, "{message} in {path} (line {line})"),
                None => write!(f, "{message} in {path}"),
            },
            Diagnostic::MissingLayout {
                layout,
                document,
                suggestions,
            } => {
                write!(f, "Layout '{layout}' requested in {document} does not exist.")?;
                if !suggestions.is_empty() {
                    write!(f, " Did you mean: {}?", suggestions.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// Ordered collection of diagnostics for a single render.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics in the order they were reported.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Missing-layout warnings only.
    pub fn missing_layouts(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| matches!(d, Diagnostic::MissingLayout { .. }))
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Consume the collector and return the diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
