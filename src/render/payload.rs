//! Template payload and its per-render builder.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::converter::Converter;
use crate::core::RenderError;
use crate::document::Document;

/// Variables visible to templates during one render.
///
/// A payload is always built fresh for each document. The site-wide base is
/// cloned, never shared, so nothing written during one render can leak into the
/// next.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Look up a dotted path such as `site.related_posts`.
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = self.0.get(parts.next()?)?;
        parts.try_fold(first, |value, key| value.get(key))
    }

    /// Set a dotted path, creating (or replacing non-object) intermediate mappings.
    pub fn set_path(&mut self, path: &str, value: Value) {
        let mut keys: Vec<&str> = path.split('.').collect();
        let Some(last) = keys.pop() else {
            return;
        };

        let mut current = &mut self.0;
        for key in keys {
            let entry = current.entry(key.to_string()).or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(map) = entry else {
                return;
            };
            current = map;
        }
        current.insert(last.to_string(), value);
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Assembles the payload for one document from a site-wide base.
///
/// Steps run in a fixed order: `page`, `paginator`, `site.related_posts`, then
/// the highlighter markers.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    payload: Payload,
}

impl PayloadBuilder {
    /// Start from a copy of `base`.
    pub fn new(base: Payload) -> Self {
        Self {
            payload: base,
        }
    }

    /// Run every step for `document`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NoConverterAvailable`] when `converters` is empty.
    pub fn build(
        self,
        document: &Document,
        output_ext: &str,
        converters: &[Arc<dyn Converter>],
    ) -> Result<Payload, RenderError> {
        Ok(self
            .page(document, output_ext)
            .paginator(document)
            .related_posts(document)
            .highlighter(document, converters)?
            .finish())
    }

    /// `page`: the document's template projection.
    pub fn page(mut self, document: &Document, output_ext: &str) -> Self {
        self.payload.insert("page", document.to_liquid(output_ext));
        self
    }

    /// `paginator`: only set when the document is paginated.
    pub fn paginator(mut self, document: &Document) -> Self {
        if let Some(pager) = &document.pager {
            self.payload.insert("paginator", pager.clone());
        }
        self
    }

    /// `site.related_posts`: the document's related posts for posts, null otherwise.
    ///
    /// Always written, so a base payload reused across documents never carries a
    /// previous post's list.
    pub fn related_posts(mut self, document: &Document) -> Self {
        let value = if document.is_post() {
            Value::Array(document.related_posts.clone())
        } else {
            Value::Null
        };
        self.payload.set_path("site.related_posts", value);
        self
    }

    /// `highlighter_prefix` and `highlighter_suffix` from the first converter.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NoConverterAvailable`] when `converters` is empty.
    pub fn highlighter(
        mut self,
        document: &Document,
        converters: &[Arc<dyn Converter>],
    ) -> Result<Self, RenderError> {
        let first = converters.first().ok_or_else(|| RenderError::NoConverterAvailable {
            document: document.display_path(),
            extname: document.extname.clone(),
        })?;
        self.payload
            .insert("highlighter_prefix", Value::String(first.highlighter_prefix().to_string()));
        self.payload
            .insert("highlighter_suffix", Value::String(first.highlighter_suffix().to_string()));
        Ok(self)
    }

    pub fn finish(self) -> Payload {
        self.payload
    }
}
