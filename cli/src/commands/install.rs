//! `quadlet install`: install quadlets from paths, URLs or artifacts.

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Args};

use crate::app::AppContext;
use crate::application::services::install::{InstallOptions, install_quadlets};
use crate::commands::batch_exit_code;

/// Arguments for the install command.
#[derive(Args)]
pub struct InstallArgs {
    /// Local path, `http(s)://` URL or `oci-artifact://<name>`
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Reload systemd after installing
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub reload_systemd: bool,
}

/// Run `quadlet install`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the install
/// fails before any file is written.
pub async fn run(app: &AppContext, args: InstallArgs) -> Result<ExitCode> {
    let host = app.host()?;
    let reporter = app.reporter();
    let options = InstallOptions {
        reload_systemd: args.reload_systemd,
    };

    let report = install_quadlets(
        &host.context(&reporter),
        &host.fetcher,
        &host.generator,
        &args.sources,
        &options,
        &app.cancel,
    )
    .await?;

    app.renderer().render_install(&report)?;
    Ok(batch_exit_code(report.has_failures()))
}
