//! The site aggregate: configuration plus every collaborator a render needs.

pub mod loader;

pub use loader::{load_document, load_layouts, load_site};

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::converter::ConverterRegistry;
use crate::core::RenderError;
use crate::document::{Document, LayoutMap};
use crate::hooks::HookRegistry;
use crate::regenerator::{DependencyTracker, Regenerator};
use crate::render::{Payload, Renderer, resolve_output_ext};
use crate::templating::{TemplateEngine, TeraEngine};

/// A site ready to render documents.
pub struct Site {
    /// Site root
    pub source: PathBuf,
    pub config: SiteConfig,
    pub converters: ConverterRegistry,
    pub layouts: LayoutMap,
    pub engine: Box<dyn TemplateEngine>,
    pub hooks: HookRegistry,
    pub tracker: Arc<dyn DependencyTracker>,
}

impl Site {
    /// Site with the default converters, no layouts and a fresh [`Regenerator`].
    pub fn new(config: SiteConfig) -> Self {
        Self {
            source: PathBuf::from("."),
            converters: ConverterRegistry::with_defaults(&config),
            layouts: LayoutMap::new(),
            engine: Box::new(
                TeraEngine::new(config.render.templating)
                    .with_strict_variables(config.render.strict_variables),
            ),
            hooks: HookRegistry::new(),
            tracker: Arc::new(Regenerator::new()),
            config,
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_layouts(mut self, layouts: LayoutMap) -> Self {
        self.layouts = layouts;
        self
    }

    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = converters;
        self
    }

    pub fn with_engine(mut self, engine: impl TemplateEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_tracker(mut self, tracker: Arc<dyn DependencyTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    /// Base payload shared by every render: `site` only.
    pub fn site_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("site", self.config.to_site_value());
        payload
    }

    /// Output extension for `document` without setting up a render.
    pub fn output_ext_for(&self, document: &Document) -> String {
        let exts: Vec<String> = self
            .converters
            .matching(&document.extname)
            .iter()
            .map(|converter| converter.output_ext(&document.extname))
            .collect();
        resolve_output_ext(
            document.permalink(),
            &exts,
            self.config.render.output_ext_policy,
            &document.extname,
        )
    }

    /// `path` relative to the site root, or unchanged when outside it.
    ///
    /// Both sides are compared lexically, so `./site/a.md` is below `site`.
    pub fn relative_path(&self, path: &Path) -> PathBuf {
        let path = normalize_path(path);
        let source = normalize_path(&self.source);
        path.strip_prefix(&source).map(Path::to_path_buf).unwrap_or(path)
    }

    /// Where the document named by `path` lives on disk.
    ///
    /// Absolute paths and paths already below the site root are kept, anything
    /// else is taken relative to the root. The working directory is never
    /// consulted.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        let path = normalize_path(path);
        if path.is_absolute() {
            return path;
        }
        let source = normalize_path(&self.source);
        if !source.as_os_str().is_empty() && path.starts_with(&source) {
            path
        } else {
            source.join(path)
        }
    }

    /// Render `document` through the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of the render.
    pub fn render(&self, document: &mut Document) -> Result<String, RenderError> {
        Renderer::new(self, document).render_document()
    }
}

/// Lexically clean `path`: drop `.` and fold `..` into the preceding name.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    components.iter().collect()
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("source", &self.source)
            .field("config", &self.config)
            .field("converters", &self.converters)
            .field("layouts", &self.layouts.len())
            .field("hooks", &self.hooks)
            .finish()
    }
}
