//! quadlet - install, list and remove Podman quadlets

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use quadlet_cli::cli::Cli;
use quadlet_cli::domain::cancel::CancelToken;
use quadlet_cli::domain::error::QuadletError;
use quadlet_cli::output::json::format_error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let json = cli.json;
    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, finishing the current item");
            on_interrupt.cancel();
        }
    });

    match cli.run(cancel).await {
        Ok(code) => code,
        Err(e) => {
            report_error(&e, json);
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr; `--log-level` wins over `RUST_LOG`.
fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_error(e: &anyhow::Error, json: bool) {
    if json {
        let code = e
            .downcast_ref::<QuadletError>()
            .map_or("error", QuadletError::code);
        if let Ok(out) = format_error(&format!("{e:#}"), code) {
            println!("{out}");
            return;
        }
    }
    eprintln!("Error: {e:#}");
}
