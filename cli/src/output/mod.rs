//! Output formatting module

pub mod human;
pub mod json;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;

use crate::domain::config::QuadletConfig;
use crate::domain::report::{InstallReport, ListEntry, RemoveReport};

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self { styles, quiet }
    }

    /// Print a warning message prefixed with `⚠` to stderr. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            eprintln!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }
}

/// Renderer selected by the output mode.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Render `quadlet list` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_list(&self, entries: &[ListEntry]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_list(entries);
                Ok(())
            }
            Self::Json(r) => r.render_list(entries),
        }
    }

    /// Render the outcome of `quadlet install`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_install(&self, report: &InstallReport) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_install(report);
                Ok(())
            }
            Self::Json(r) => r.render_install(report),
        }
    }

    /// Render the outcome of `quadlet rm`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_remove(&self, report: &RemoveReport) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_remove(report);
                Ok(())
            }
            Self::Json(r) => r.render_remove(report),
        }
    }

    /// Render one quadlet file's contents.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_print(&self, name: &str, contents: &str) -> Result<()> {
        match self {
            Self::Human(_) => {
                print!("{contents}");
                Ok(())
            }
            Self::Json(r) => r.render_print(name, contents),
        }
    }

    /// Render the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &QuadletConfig, path: &Path) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config(config, path);
                Ok(())
            }
            Self::Json(r) => r.render_config(config, path),
        }
    }
}
