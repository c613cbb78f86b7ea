//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails, and the `JsonRenderer` for successful results.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::config::QuadletConfig;
use crate::domain::error::QuadletError;
use crate::domain::report::{InstallReport, ItemOutcome, ListEntry, RemoveReport};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

#[derive(Serialize)]
struct ErrorJson {
    code: &'static str,
    message: String,
}

impl From<&QuadletError> for ErrorJson {
    fn from(err: &QuadletError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct OutcomeJson<'a, T: Serialize> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorJson>,
}

fn outcomes<T: Serialize>(items: &[ItemOutcome<T>]) -> Vec<OutcomeJson<'_, T>> {
    items
        .iter()
        .map(|o| match &o.result {
            Ok(v) => OutcomeJson {
                key: &o.key,
                result: Some(v),
                error: None,
            },
            Err(e) => OutcomeJson {
                key: &o.key,
                result: None,
                error: Some(e.into()),
            },
        })
        .collect()
}

fn batch(errors: &[QuadletError]) -> Vec<ErrorJson> {
    errors.iter().map(ErrorJson::from).collect()
}

/// Renders results as pretty-printed JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_list(&self, entries: &[ListEntry]) -> Result<()> {
        emit(&entries)
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_install(&self, report: &InstallReport) -> Result<()> {
        emit(&serde_json::json!({
            "outcomes": outcomes(&report.outcomes),
            "batch_errors": batch(&report.batch_errors),
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_remove(&self, report: &RemoveReport) -> Result<()> {
        emit(&serde_json::json!({
            "outcomes": outcomes(&report.outcomes),
            "batch_errors": batch(&report.batch_errors),
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_print(&self, name: &str, contents: &str) -> Result<()> {
        emit(&serde_json::json!({ "name": name, "contents": contents }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &QuadletConfig, path: &Path) -> Result<()> {
        emit(&serde_json::json!({ "path": path, "config": config }))
    }
}

fn emit<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{out}");
    Ok(())
}
