//! List the layouts of a site.
//!
//! Each layout is shown with the chain of parents it is wrapped in, innermost
//! first. Chains that loop back or name an unknown parent are flagged.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::document::LayoutChain;
use crate::site::load_site;

/// Command to list layouts.
#[derive(Args, Debug)]
pub struct LayoutsCommand {
    /// Site root
    #[arg(short, long, default_value = ".")]
    pub source: PathBuf,
}

impl LayoutsCommand {
    pub async fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let site = load_site(&self.source, config_path)
            .await
            .with_context(|| format!("Failed to load site at {}", self.source.display()))?;

        if site.layouts.is_empty() {
            println!("No layouts found in {}", self.source.join(&site.config.layouts_dir).display());
            return Ok(());
        }

        for layout in site.layouts.iter() {
            let chain = site.layouts.chain(&layout.name);
            println!("{}", format_chain(&chain));
        }
        Ok(())
    }
}

/// `post -> default`, with a marker for a cycle or a missing parent.
fn format_chain(chain: &LayoutChain) -> String {
    let mut line = chain
        .layouts
        .iter()
        .enumerate()
        .map(|(i, name)| if i == 0 { name.bold().to_string() } else { name.clone() })
        .collect::<Vec<_>>()
        .join(" -> ");

    if let Some(name) = &chain.cycle_at {
        line.push_str(&format!(" -> {} {}", name, "(cycle)".red()));
    }
    if let Some(name) = &chain.missing {
        line.push_str(&format!(" -> {} {}", name, "(missing)".yellow()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Layout, LayoutMap};

    #[test]
    fn test_format_chain_marks_problems() {
        colored::control::set_override(false);
        let map = LayoutMap::new()
            .with(Layout::new("post", "").with_parent("default"))
            .with(Layout::new("default", ""))
            .with(Layout::new("a", "").with_parent("b"))
            .with(Layout::new("b", "").with_parent("a"))
            .with(Layout::new("orphan", "").with_parent("base"));

        assert_eq!(format_chain(&map.chain("post")), "post -> default");
        assert_eq!(format_chain(&map.chain("a")), "a -> b -> a (cycle)");
        assert_eq!(format_chain(&map.chain("orphan")), "orphan -> base (missing)");
    }
}
