//! A scriptable converter for pipeline tests.

use anyhow::{Result, bail};
use std::sync::{Arc, Mutex, PoisonError};

use crate::converter::{Converter, Priority};

/// Converter whose matching, output extension and failures are set by the test.
///
/// Every input it sees is recorded, so tests can assert which converters ran.
#[derive(Debug, Clone)]
pub struct StubConverter {
    name: String,
    priority: Priority,
    extensions: Vec<String>,
    output_ext: String,
    wrap: (String, String),
    fail_on: Option<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubConverter {
    /// Stub matching every extension, producing no output extension.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: Priority::Normal,
            extensions: Vec::new(),
            output_ext: String::new(),
            wrap: (String::new(), String::new()),
            fail_on: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Only match `ext` (repeatable).
    pub fn matching(mut self, ext: impl Into<String>) -> Self {
        self.extensions.push(ext.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_output_ext(mut self, ext: impl Into<String>) -> Self {
        self.output_ext = ext.into();
        self
    }

    /// Surround converted content with `open` and `close`.
    pub fn wrapping(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.wrap = (open.into(), close.into());
        self
    }

    /// Fail whenever the input contains `needle`.
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_on = Some(needle.into());
        self
    }

    /// Inputs seen so far. Clones share the same record.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Converter for StubConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn matches(&self, ext: &str) -> bool {
        self.extensions.is_empty() || self.extensions.iter().any(|e| e == ext)
    }

    fn output_ext(&self, _ext: &str) -> String {
        self.output_ext.clone()
    }

    fn convert(&self, content: &str) -> Result<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(content.to_string());
        if let Some(needle) = &self.fail_on {
            if content.contains(needle.as_str()) {
                bail!("{} refused input containing '{}'", self.name, needle);
            }
        }
        Ok(format!("{}{}{}", self.wrap.0, content, self.wrap.1))
    }
}
