//! Command-line interface for jrender.
//!
//! # Available Commands
//!
//! - `render` - Render one document through the full pipeline (or templating only)
//! - `layouts` - List the layouts of a site with their parent chains
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//! - `--config` - Use a config file other than `<source>/_config.toml`
//!
//! ```bash
//! jrender render _posts/2024-01-01-hello.md --source ./site
//! jrender render about.md --liquid-only
//! jrender --verbose layouts --source ./site
//! ```
//!
//! Logs go to stderr so rendered output on stdout can be piped.

mod layouts;
mod render;

pub use layouts::LayoutsCommand;
pub use render::RenderCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Logging settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Filter directive, `None` keeps `RUST_LOG` or the default
    pub log_level: Option<String>,
    /// Explicit site configuration file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber. Later calls are ignored.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Render Jekyll-style documents with Tera templates and layouts.
#[derive(Parser, Debug)]
#[command(
    name = "jrender",
    about = "Render documents through converters, templates and layouts",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the site configuration file
    #[arg(long, global = true, env = "JRENDER_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a single document
    Render(RenderCommand),

    /// List layouts and their parent chains
    Layouts(LayoutsCommand),
}

impl Cli {
    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Render(cmd) => cmd.execute(config.config_path.as_deref(), self.quiet).await,
            Commands::Layouts(cmd) => cmd.execute(config.config_path.as_deref()).await,
        }
    }
}
