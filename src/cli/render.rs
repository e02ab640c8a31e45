//! Render a single document.
//!
//! The full pipeline converts the body, applies layouts and fires every hook.
//! With `--liquid-only` only the template pass runs and the rendered body is
//! printed as is.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::DiagnosticCollector;
use crate::regenerator::Regenerator;
use crate::render::Renderer;
use crate::site::{load_document, load_site};

/// Command to render one document.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Document to render: absolute, below the site root, or relative to it
    pub document: PathBuf,

    /// Site root
    #[arg(short, long, default_value = ".")]
    pub source: PathBuf,

    /// Stop after the template pass; skip conversion and layouts
    #[arg(long)]
    pub liquid_only: bool,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List the layout files the document depends on
    #[arg(long)]
    pub show_dependencies: bool,
}

impl RenderCommand {
    pub async fn execute(self, config_path: Option<&Path>, quiet: bool) -> Result<()> {
        let regenerator = Arc::new(Regenerator::new());
        let site = load_site(&self.source, config_path)
            .await
            .with_context(|| format!("Failed to load site at {}", self.source.display()))?
            .with_tracker(regenerator.clone());
        let mut document = load_document(&site, &self.document).await?;

        let (rendered, diagnostics) = {
            let mut renderer = Renderer::new(&site, &mut document);
            let rendered = if self.liquid_only {
                renderer.run()?;
                None
            } else {
                Some(renderer.render_document()?)
            };
            (rendered, renderer.into_diagnostics())
        };
        let rendered = match rendered {
            Some(output) => output,
            None => document.rendered_content.clone().unwrap_or_default(),
        };

        match &self.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                tokio::fs::write(path, &rendered)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if !quiet {
                    eprintln!(
                        "{} {} -> {}",
                        "Rendered".green().bold(),
                        document.display_path(),
                        path.display()
                    );
                }
            }
            None => print!("{rendered}"),
        }

        if self.show_dependencies {
            print_dependencies(&regenerator, &document.path);
        }
        if !quiet {
            print_diagnostics(&diagnostics);
        }
        Ok(())
    }
}

fn print_dependencies(regenerator: &Regenerator, document: &Path) {
    let dependencies = regenerator.dependencies_of(document);
    if dependencies.is_empty() {
        eprintln!("{}", "No layout dependencies".dimmed());
        return;
    }
    eprintln!("{}", "Depends on:".cyan().bold());
    for dependency in dependencies {
        eprintln!("  {}", dependency.display());
    }
}

fn print_diagnostics(diagnostics: &DiagnosticCollector) {
    if diagnostics.is_empty() {
        return;
    }
    for diagnostic in diagnostics.diagnostics() {
        eprintln!("{}: {}", "warning".yellow().bold(), diagnostic);
    }
    eprintln!("{} warning(s)", diagnostics.len().to_string().yellow());
}
