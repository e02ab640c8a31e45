//! The document render pipeline.
//!
//! A render goes through these stages, all driven by [`Renderer`]:
//!
//! 1. **Payload**: [`PayloadBuilder`] derives the template variables from the site
//!    base payload and the document.
//! 2. **Pre-render hooks** may adjust the payload and the raw content.
//! 3. **Templating**: the body is rendered when the document allows it.
//! 4. **Conversion**: matched converters run in priority order, each one feeding
//!    the next.
//! 5. **Layouts**: [`CompositionState`] walks the layout chain, re-rendering each
//!    layout body with the previous output as `content`.
//! 6. **Post-render hooks** see the final output.
//!
//! Fatal errors ([`crate::core::RenderError`]) abort the document and are returned
//! unchanged. Non-fatal problems are logged and collected as
//! [`crate::core::Diagnostic`]s on the renderer.

pub mod composition;
pub mod output_ext;
pub mod payload;
pub mod renderer;

pub use composition::CompositionState;
pub use output_ext::{ExtensionPolicy, resolve_output_ext};
pub use payload::{Payload, PayloadBuilder};
pub use renderer::{Renderer, RunState};

use serde_json::Value;

/// Execution registers handed to the template engine, built fresh per render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderInfo {
    /// The `site` payload entry
    pub site: Value,
    /// The `page` payload entry
    pub page: Value,
}

impl RenderInfo {
    pub fn new(site: Value, page: Value) -> Self {
        Self {
            site,
            page,
        }
    }

    /// Registers for `payload` as it stands.
    pub fn from_payload(payload: &Payload) -> Self {
        Self::new(
            payload.get("site").cloned().unwrap_or(Value::Null),
            payload.get("page").cloned().unwrap_or(Value::Null),
        )
    }
}
