//! `quadlet print`: show the contents of one installed quadlet.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::print::print_quadlet;

/// Arguments for the print command.
#[derive(Args)]
pub struct PrintArgs {
    /// Quadlet file name, e.g. `web.container`
    pub name: String,
}

/// Run `quadlet print`.
///
/// # Errors
///
/// Returns an error if the quadlet cannot be found or read.
pub fn run(app: &AppContext, args: &PrintArgs) -> Result<ExitCode> {
    let host = app.host()?;
    let contents = print_quadlet(&host.fs, &host.layout, &args.name)?;
    app.renderer().render_print(&args.name, &contents)?;
    Ok(ExitCode::SUCCESS)
}
