//! Render lifecycle hooks.
//!
//! Hooks are callbacks fired at fixed points of a document render:
//!
//! - [`HookEvent::PreRender`]: after the payload is built, before templates run
//! - [`HookEvent::PostConvert`]: after converters ran, before layouts
//! - [`HookEvent::PostRender`]: after layouts, on the final output
//!
//! Each hook receives a [`HookContext`] with the document, the render payload and
//! the content buffer for the current stage. Hooks may mutate the payload and the
//! buffer. A hook error aborts the render.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::core::RenderError;
use crate::document::{Document, DocumentKind};
use crate::render::Payload;

/// Points in the render pipeline where hooks fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookEvent {
    PreRender,
    PostConvert,
    PostRender,
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookEvent::PreRender => "pre_render",
            HookEvent::PostConvert => "post_convert",
            HookEvent::PostRender => "post_render",
        };
        f.write_str(name)
    }
}

/// Which documents a hook applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookScope {
    #[default]
    All,
    /// Standalone pages
    Pages,
    /// Collection members of any collection
    Documents,
    /// Members of the `posts` collection
    Posts,
}

impl HookScope {
    pub fn applies_to(&self, document: &Document) -> bool {
        match self {
            HookScope::All => true,
            HookScope::Pages => document.kind == DocumentKind::Page,
            HookScope::Documents => document.kind == DocumentKind::CollectionItem,
            HookScope::Posts => document.is_post(),
        }
    }
}

/// Arguments handed to a hook.
pub struct HookContext<'a> {
    pub event: HookEvent,
    pub document: &'a Document,
    pub payload: &'a mut Payload,
    /// Raw content for `pre_render`, converted content for `post_convert`,
    /// final output for `post_render`
    pub content: &'a mut String,
}

type HookFn = Box<dyn Fn(&mut HookContext<'_>) -> Result<()> + Send + Sync>;

struct RegisteredHook {
    scope: HookScope,
    hook: HookFn,
}

/// Hooks by event, fired in registration order.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<HookEvent, Vec<RegisteredHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook for every document.
    pub fn register<F>(&mut self, event: HookEvent, hook: F)
    where
        F: Fn(&mut HookContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.register_scoped(event, HookScope::All, hook);
    }

    /// Register a hook for documents in `scope`.
    pub fn register_scoped<F>(&mut self, event: HookEvent, scope: HookScope, hook: F)
    where
        F: Fn(&mut HookContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.hooks.entry(event).or_default().push(RegisteredHook {
            scope,
            hook: Box::new(hook),
        });
    }

    /// Number of hooks registered for `event`.
    pub fn count(&self, event: HookEvent) -> usize {
        self.hooks.get(&event).map_or(0, Vec::len)
    }

    /// Fire every hook for `event` that applies to `document`.
    ///
    /// # Errors
    ///
    /// Stops at the first failing hook and returns [`RenderError::Hook`].
    pub fn trigger(
        &self,
        event: HookEvent,
        document: &Document,
        payload: &mut Payload,
        content: &mut String,
    ) -> Result<(), RenderError> {
        let Some(hooks) = self.hooks.get(&event) else {
            return Ok(());
        };

        let mut context = HookContext {
            event,
            document,
            payload,
            content,
        };
        for registered in hooks.iter().filter(|h| h.scope.applies_to(document)) {
            (registered.hook)(&mut context).map_err(|e| RenderError::Hook {
                event,
                document: document.display_path(),
                source: e.into(),
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<String, usize> =
            self.hooks.iter().map(|(event, hooks)| (event.to_string(), hooks.len())).collect();
        f.debug_struct("HookRegistry").field("hooks", &counts).finish()
    }
}
