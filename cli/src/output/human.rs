//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::domain::config::QuadletConfig;
use crate::domain::report::{InstallReport, ListEntry, RemoveReport};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render installed quadlets as a table.
    pub fn render_list(&self, entries: &[ListEntry]) {
        if entries.is_empty() {
            if !self.ctx.quiet {
                println!("No quadlets installed. Install one: quadlet install <path|url>");
            }
            return;
        }

        let paths: Vec<String> = entries.iter().map(|e| e.path.display().to_string()).collect();
        let name_w = column_width("NAME", entries.iter().map(|e| e.name.as_str()));
        let path_w = column_width("PATH ON DISK", paths.iter().map(String::as_str));

        if !self.ctx.quiet {
            let header = format!("{:<name_w$}  {:<path_w$}  STATUS", "NAME", "PATH ON DISK");
            println!("{}", header.style(self.ctx.styles.bold));
        }
        for (entry, path) in entries.iter().zip(&paths) {
            let status = if entry.status.starts_with("active") {
                format!("{}", entry.status.style(self.ctx.styles.active))
            } else {
                entry.status.clone()
            };
            println!("{:<name_w$}  {path:<path_w$}  {status}", entry.name);
        }
    }

    /// Print each installed path, then every error.
    pub fn render_install(&self, report: &InstallReport) {
        for (_, path) in report.installed() {
            println!("{}", path.display());
        }
        for (key, err) in report.errors() {
            self.ctx.error(&format!("{key}: {err}"));
        }
        for err in &report.batch_errors {
            self.ctx.error(&err.to_string());
        }
    }

    /// Print each removed name, then every error.
    pub fn render_remove(&self, report: &RemoveReport) {
        for name in report.removed() {
            println!("{name}");
        }
        for (key, err) in report.errors() {
            self.ctx.error(&format!("{key}: {err}"));
        }
        for err in &report.batch_errors {
            self.ctx.error(&err.to_string());
        }
    }

    /// Render the effective configuration.
    pub fn render_config(&self, config: &QuadletConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!(
            "  {:<22} {}",
            "generator_path:",
            config.generator_path.display()
        );
        println!("  {:<22} {}s", "stop_timeout_secs:", config.stop_timeout_secs);
        println!("  {:<22} {}s", "command_timeout_secs:", config.command_timeout_secs);
        println!("  {:<22} {}s", "fetch_timeout_secs:", config.fetch_timeout_secs);
        let unit_dirs = config.unit_dirs.as_ref().map_or_else(
            || "(computed)".to_string(),
            |dirs| {
                dirs.iter()
                    .map(|d| d.display().to_string())
                    .collect::<Vec<_>>()
                    .join(":")
            },
        );
        println!("  {:<22} {unit_dirs}", "unit_dirs:");
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["QUADLET_CONFIG", "QUADLET_UNIT_DIRS", "RUST_LOG", "NO_COLOR"] {
            println!(
                "    {:<20} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }
}

/// Width of a table column: the widest cell or the header.
fn column_width<'s>(header: &str, cells: impl Iterator<Item = &'s str>) -> usize {
    cells
        .map(|c| c.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}
