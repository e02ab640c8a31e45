//! Layout composition state machine.
//!
//! Composition walks from a document's layout to its parent, then to that
//! layout's parent, wrapping the previous output each time. The walk stops when
//! the next layout is missing or was already applied in this run, so a
//! misconfigured chain such as `a -> b -> a` terminates after `a` and `b`.

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::document::{Layout, LayoutRegistry};
use crate::templating::deep_merge_json;

/// State of one composition run.
#[derive(Debug)]
pub struct CompositionState<'l> {
    layout: Option<&'l Layout>,
    visited: HashSet<String>,
    output: String,
    layout_data: Value,
    cycle_at: Option<String>,
}

impl<'l> CompositionState<'l> {
    /// Start with `content` as the output and `start` as the first layout.
    pub fn begin(
        registry: &'l dyn LayoutRegistry,
        start: Option<&str>,
        content: impl Into<String>,
    ) -> Self {
        let layout = start.and_then(|name| registry.get(name));
        let mut visited = HashSet::new();
        if let Some(layout) = layout {
            visited.insert(layout.name.clone());
        }
        Self {
            layout,
            visited,
            output: content.into(),
            layout_data: Value::Object(Map::new()),
            cycle_at: None,
        }
    }

    /// Layout to apply next, if any.
    pub fn current(&self) -> Option<&'l Layout> {
        self.layout
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Accumulated layout metadata (`payload.layout`).
    pub fn layout_data(&self) -> &Value {
        &self.layout_data
    }

    /// Merge `layout`'s front matter into the accumulated metadata.
    ///
    /// Keys already accumulated from inner layouts keep their values.
    pub fn merge_layout_data(&mut self, layout: &Layout) -> &Value {
        let data = std::mem::take(&mut self.layout_data);
        self.layout_data = deep_merge_json(Value::Object(layout.data.clone()), &data);
        &self.layout_data
    }

    /// Replace the output with the result of applying the current layout.
    pub fn record_output(&mut self, output: String) {
        self.output = output;
    }

    /// Move to the parent of the current layout.
    ///
    /// Returns the new current layout, or `None` when the chain ended because the
    /// parent is missing or was already applied.
    pub fn advance(&mut self, registry: &'l dyn LayoutRegistry) -> Option<&'l Layout> {
        let next = self.layout.and_then(Layout::parent_name).and_then(|name| registry.get(name));
        self.layout = match next {
            Some(layout) if !self.visited.insert(layout.name.clone()) => {
                tracing::debug!("Layout cycle detected at '{}', stopping", layout.name);
                self.cycle_at = Some(layout.name.clone());
                None
            }
            other => other,
        };
        self.layout
    }

    /// Name of the layout that closed a cycle, if the walk stopped on one.
    pub fn cycle_at(&self) -> Option<&str> {
        self.cycle_at.as_deref()
    }

    /// Names of the layouts entered so far.
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    pub fn into_output(self) -> String {
        self.output
    }
}
