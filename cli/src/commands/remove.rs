//! `quadlet rm`: stop and remove installed quadlets.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::remove::{RemoveOptions, remove_quadlets};
use crate::commands::batch_exit_code;

/// Arguments for the rm command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Quadlet file names, e.g. `web.container`
    #[arg(value_name = "NAME", required_unless_present = "all")]
    pub names: Vec<String>,

    /// Stop running quadlets before removing them
    #[arg(short, long)]
    pub force: bool,

    /// Remove every installed quadlet
    #[arg(short, long, conflicts_with = "names")]
    pub all: bool,

    /// Do not fail for quadlets that do not exist
    #[arg(short, long)]
    pub ignore: bool,

    /// Seconds to wait for each service to stop (default from config)
    #[arg(short = 't', long = "time", value_name = "SECONDS")]
    pub stop_timeout: Option<u64>,

    /// Skip the confirmation prompt for `--all`
    #[arg(short, long)]
    pub yes: bool,
}

/// Run `quadlet rm`.
///
/// # Errors
///
/// Returns an error if no quadlet was named, the service manager is
/// unreachable, or the status query fails.
pub async fn run(app: &AppContext, args: RemoveArgs) -> Result<ExitCode> {
    if args.all
        && !args.yes
        && !app.confirm("Remove every installed quadlet?", true)?
    {
        app.output.warn("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let host = app.host()?;
    let reporter = app.reporter();
    let options = RemoveOptions {
        force: args.force,
        all: args.all,
        ignore: args.ignore,
        stop_timeout: args
            .stop_timeout
            .map_or_else(|| host.config.stop_timeout(), Duration::from_secs),
    };

    let report =
        remove_quadlets(&host.context(&reporter), &args.names, &options, &app.cancel).await?;

    app.renderer().render_remove(&report)?;
    Ok(batch_exit_code(report.has_failures()))
}
