//! Per-document render orchestration.

use serde_json::{Map, Value};
use std::cell::OnceCell;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::composition::CompositionState;
use super::output_ext::resolve_output_ext;
use super::payload::{Payload, PayloadBuilder};
use super::RenderInfo;
use crate::converter::Converter;
use crate::core::{Diagnostic, DiagnosticCollector, RenderError};
use crate::document::{Document, LayoutRegistry, has_template_construct};
use crate::hooks::HookEvent;
use crate::site::Site;
use crate::templating::TemplateError;

/// Maximum number of similarly named layouts suggested for a missing layout.
const MAX_LAYOUT_SUGGESTIONS: usize = 3;

/// Payload and registers produced by [`Renderer::run`].
#[derive(Debug, Clone)]
pub struct RunState {
    pub payload: Payload,
    pub info: RenderInfo,
}

/// Renders one document against a site.
///
/// Converters and the output extension are resolved once, on first use, and stay
/// fixed for the lifetime of the renderer.
pub struct Renderer<'a> {
    site: &'a Site,
    document: &'a mut Document,
    payload: Option<Payload>,
    layouts: Option<&'a dyn LayoutRegistry>,
    converters: OnceCell<Vec<Arc<dyn Converter>>>,
    output_ext: OnceCell<String>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Renderer<'a> {
    pub fn new(site: &'a Site, document: &'a mut Document) -> Self {
        Self {
            site,
            document,
            payload: None,
            layouts: None,
            converters: OnceCell::new(),
            output_ext: OnceCell::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Use `payload` as the base instead of the site payload.
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Look layouts up in `layouts` instead of the site registry.
    pub fn with_layouts(mut self, layouts: &'a dyn LayoutRegistry) -> Self {
        self.layouts = Some(layouts);
        self
    }

    pub fn document(&self) -> &Document {
        &*self.document
    }

    pub fn diagnostics(&self) -> &DiagnosticCollector {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> DiagnosticCollector {
        self.diagnostics
    }

    /// Converters matching the document, highest priority first.
    pub fn converters(&self) -> &[Arc<dyn Converter>] {
        self.converters.get_or_init(|| self.site.converters.matching(&self.document.extname))
    }

    /// Extension the document is written with.
    pub fn output_ext(&self) -> &str {
        self.output_ext.get_or_init(|| {
            let extname = &self.document.extname;
            let exts: Vec<String> =
                self.converters().iter().map(|converter| converter.output_ext(extname)).collect();
            resolve_output_ext(
                self.document.permalink(),
                &exts,
                self.site.config.render.output_ext_policy,
                extname,
            )
        })
    }

    /// Build the payload for this document.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NoConverterAvailable`] when no converter matches.
    pub fn build_payload(&self) -> Result<Payload, RenderError> {
        let base = self.payload.clone().unwrap_or_else(|| self.site.site_payload());
        PayloadBuilder::new(base).build(&*self.document, self.output_ext(), self.converters())
    }

    /// Pipe `content` through every matched converter in order.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Conversion`] for the first converter that fails;
    /// later converters are not attempted.
    pub fn convert(&self, content: &str) -> Result<String, RenderError> {
        self.converters().iter().try_fold(content.to_string(), |output, converter| {
            converter.convert(&output).map_err(|e| {
                let document = self.document.display_path();
                error!(
                    "Conversion error: {} encountered an error while converting '{}':",
                    converter.name(),
                    document
                );
                error!("  {e:#}");
                RenderError::Conversion {
                    converter: converter.name().to_string(),
                    document,
                    source: e.into(),
                }
            })
        })
    }

    /// Parse and render `body`, logging parse warnings.
    ///
    /// `path` names the template in warnings and errors.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] on any parse or execution failure.
    pub fn render_template(
        &mut self,
        body: &str,
        payload: &Payload,
        info: &RenderInfo,
        path: &str,
    ) -> Result<String, RenderError> {
        let template =
            self.site.engine.parse(body, path).map_err(|e| template_failure(e, path))?;

        for warning in template.warnings() {
            let diagnostic = Diagnostic::TemplateWarning {
                path: path.to_string(),
                message: warning.message.clone(),
                line: warning.line,
            };
            warn!("Liquid Warning: {}", diagnostic);
            self.diagnostics.add(diagnostic);
        }

        template.render(payload, info).map_err(|e| template_failure(e, path))
    }

    /// Build the payload, fire `pre_render` hooks and render the document body.
    ///
    /// The body (rendered, or as adjusted by hooks when templating does not apply)
    /// is stored in [`Document::rendered_content`].
    ///
    /// # Errors
    ///
    /// Propagates payload, hook and template failures.
    pub fn run(&mut self) -> Result<RunState, RenderError> {
        let path = self.document.display_path();
        debug!("Rendering: {}", path);

        let mut payload = self.build_payload()?;

        debug!("Pre-Render Hooks: {}", path);
        let mut content = self.document.content.clone();
        self.site.hooks.trigger(
            HookEvent::PreRender,
            &*self.document,
            &mut payload,
            &mut content,
        )?;

        let info = RenderInfo::from_payload(&payload);

        if self.document.allows_liquid() && has_template_construct(&content) {
            debug!("Rendering Liquid: {}", path);
            content = self.render_template(&content, &payload, &info, &path)?;
        }

        self.document.rendered_content = Some(content);
        Ok(RunState {
            payload,
            info,
        })
    }

    /// Wrap `content` in the document's layout chain.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] when a layout fails to render.
    pub fn place_in_layouts(
        &mut self,
        content: &str,
        payload: &mut Payload,
        info: &RenderInfo,
    ) -> Result<String, RenderError> {
        let site: &'a Site = self.site;
        let layouts: &'a dyn LayoutRegistry = self.layouts.unwrap_or(&site.layouts);

        let requested = self.document.layout_name().map(ToString::to_string);
        let mut state = CompositionState::begin(layouts, requested.as_deref(), content);

        if state.current().is_none() && self.document.declares_layout() && !self.document.is_excerpt()
        {
            self.warn_missing_layout(layouts);
        }

        payload.insert("layout", Value::Object(Map::new()));

        while let Some(layout) = state.current() {
            let layout_path = layout.relative_path.to_string_lossy().replace('\\', "/");
            debug!("Rendering Layout: {} ({})", self.document.display_path(), layout_path);

            payload.insert("content", Value::String(state.output().to_string()));
            payload.insert("layout", state.merge_layout_data(layout).clone());

            let output = self.render_template(&layout.content, payload, info, &layout_path)?;
            state.record_output(output);

            if self.document.write {
                site.tracker.add_dependency(&self.document.path, &layout.path);
            }

            state.advance(layouts);
        }

        Ok(state.into_output())
    }

    /// Render the document completely and store the result in [`Document::output`].
    ///
    /// Runs [`run`](Self::run), converts the body, fires `post_convert`, applies
    /// layouts (unless the document opts out) and fires `post_render`.
    ///
    /// # Errors
    ///
    /// Propagates the first fatal error of any stage.
    pub fn render_document(&mut self) -> Result<String, RenderError> {
        let RunState {
            mut payload,
            info,
        } = self.run()?;
        let path = self.document.display_path();

        let rendered = self.document.rendered_content.clone().unwrap_or_default();
        let mut output = self.convert(&rendered)?;

        debug!("Post-Convert Hooks: {}", path);
        self.site.hooks.trigger(
            HookEvent::PostConvert,
            &*self.document,
            &mut payload,
            &mut output,
        )?;
        payload.set_path("page.content", Value::String(output.clone()));

        if self.document.place_in_layout() {
            output = self.place_in_layouts(&output, &mut payload, &info)?;
        }

        debug!("Post-Render Hooks: {}", path);
        self.site.hooks.trigger(
            HookEvent::PostRender,
            &*self.document,
            &mut payload,
            &mut output,
        )?;

        self.document.output = Some(output.clone());
        Ok(output)
    }

    fn warn_missing_layout(&mut self, layouts: &dyn LayoutRegistry) {
        let layout = match self.document.data.get("layout") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => other.to_string(),
            None => return,
        };

        let mut scored: Vec<(&str, usize)> = layouts
            .names()
            .into_iter()
            .map(|name| (name, strsim::levenshtein(&layout, name)))
            .filter(|(_, distance)| *distance <= layout.len().max(3) / 2)
            .collect();
        scored.sort_by_key(|(_, distance)| *distance);
        let suggestions: Vec<String> = scored
            .into_iter()
            .take(MAX_LAYOUT_SUGGESTIONS)
            .map(|(name, _)| name.to_string())
            .collect();

        let diagnostic = Diagnostic::MissingLayout {
            layout,
            document: self.document.display_path(),
            suggestions,
        };
        warn!("Build Warning: {}", diagnostic);
        self.diagnostics.add(diagnostic);
    }
}

fn template_failure(error: TemplateError, path: &str) -> RenderError {
    error!("Liquid Exception: {}", error.format_at(path));
    RenderError::Template {
        path: path.to_string(),
        source: error,
    }
}
