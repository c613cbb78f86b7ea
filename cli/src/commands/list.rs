//! `quadlet list`: show installed quadlets and their service status.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::list::list_quadlets;
use crate::domain::filter::ListFilters;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Filter output (`name=<pattern>`, `status=<status>`); repeatable
    #[arg(short, long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,
}

/// Run `quadlet list`.
///
/// # Errors
///
/// Returns an error for invalid filters, an unreachable service manager or
/// unreadable quadlet directories.
pub async fn run(app: &AppContext, args: ListArgs) -> Result<ExitCode> {
    let filters = ListFilters::parse(&args.filters)?;
    let host = app.host()?;
    let reporter = app.reporter();

    let entries = list_quadlets(&host.context(&reporter), &filters).await?;
    app.renderer().render_list(&entries)?;
    Ok(ExitCode::SUCCESS)
}
