//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::domain::cancel::CancelToken;

/// Install, list and remove Podman quadlets
#[derive(Parser)]
#[command(
    name = "quadlet",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Diagnostic log level (overrides `RUST_LOG`)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install quadlets from files, URLs or OCI artifacts
    Install(commands::install::InstallArgs),

    /// List installed quadlets and their status
    #[command(visible_alias = "ls")]
    List(commands::list::ListArgs),

    /// Stop and remove quadlets
    #[command(name = "rm", visible_alias = "remove")]
    Remove(commands::remove::RemoveArgs),

    /// Print the contents of a quadlet
    Print(commands::print::PrintArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails before producing a report.
    pub async fn run(self, cancel: CancelToken) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            log_level: _,
            command,
        } = self;
        let app = AppContext::new(
            &AppFlags {
                output: OutputFlags {
                    no_color,
                    quiet,
                    json,
                },
                behaviour: BehaviourFlags {
                    yes: matches!(&command, Command::Remove(args) if args.yes),
                },
            },
            cancel,
        );

        match command {
            Command::Install(args) => commands::install::run(&app, args).await,
            Command::List(args) => commands::list::run(&app, args).await,
            Command::Remove(args) => commands::remove::run(&app, args).await,
            Command::Print(args) => commands::print::run(&app, &args),
            Command::Config(cmd) => commands::config::run(&app, &cmd),
        }
    }
}
