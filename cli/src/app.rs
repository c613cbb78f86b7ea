//! Application context: unified state passed to every command handler.
//!
//! `AppContext` carries output settings, the config store and the
//! cancellation token. `AppContext::host` builds the production adapters
//! for one request from the loaded configuration.

use anyhow::Result;

use crate::application::services::QuadletContext;
use crate::application::services::config_service;
use crate::domain::cancel::CancelToken;
use crate::domain::config::QuadletConfig;
use crate::domain::dirs::UnitDirLayout;
use crate::infra::artifact::PodmanArtifactStore;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::fetch::DefaultSourceFetcher;
use crate::infra::fs::LocalFs;
use crate::infra::generator::PodmanGenerator;
use crate::infra::host;
use crate::infra::systemd::SystemctlServiceManager;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `QUADLET_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Configuration file store.
    pub config_store: YamlConfigStore,
    /// Tripped on Ctrl-C; checked between items.
    pub cancel: CancelToken,
    /// When `true`, skip interactive prompts and use defaults.
    pub non_interactive: bool,
}

/// Production adapters for one request.
pub struct Host {
    pub config: QuadletConfig,
    pub layout: UnitDirLayout,
    pub fs: LocalFs,
    pub manager: SystemctlServiceManager<TokioCommandRunner>,
    pub generator: PodmanGenerator<TokioCommandRunner>,
    pub fetcher: DefaultSourceFetcher<PodmanArtifactStore<TokioCommandRunner>>,
}

impl Host {
    /// Bundle the filesystem, manager and layout with `reporter`.
    #[must_use]
    pub fn context<'a, R>(
        &'a self,
        reporter: &'a R,
    ) -> QuadletContext<'a, LocalFs, SystemctlServiceManager<TokioCommandRunner>, R> {
        QuadletContext {
            fs: &self.fs,
            manager: &self.manager,
            layout: &self.layout,
            reporter,
        }
    }
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags, cancel: CancelToken) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("QUADLET_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config_store: YamlConfigStore,
            cancel,
            non_interactive,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Progress reporter writing to stderr.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Load the configuration and build adapters for the caller's privilege mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or parsed.
    pub fn host(&self) -> Result<Host> {
        let config = config_service::load_config(&self.config_store)?;
        let mode = host::privilege_mode();
        let layout = config_service::effective_layout(&config, mode, host::dir_env());
        tracing::debug!(?mode, dirs = ?layout.search_dirs, "resolved quadlet search directories");

        let runner = || TokioCommandRunner::new(config.command_timeout());
        Ok(Host {
            layout,
            fs: LocalFs,
            manager: SystemctlServiceManager::new(runner(), mode),
            generator: PodmanGenerator::new(runner(), config.generator_path.clone()),
            fetcher: DefaultSourceFetcher::new(
                PodmanArtifactStore::new(runner()),
                config.fetch_timeout(),
            ),
            config,
        })
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `QUADLET_YES`
    /// env), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
