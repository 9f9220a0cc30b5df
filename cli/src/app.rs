//! Application context: unified state passed to every command handler.
//!
//! `AppContext` owns the output context, the loaded configuration and the
//! production dispatcher, so command handlers only translate arguments.

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::application::backend::{WslBackend, default_wsl_exe};
use crate::application::dispatcher::CommandDispatcher;
use crate::domain::{ApxConfig, Command, CommandResult, InstanceLayout};
use crate::infra::config::{YamlConfigStore, resolve_root};
use crate::infra::process::TokioProcessExecutor;
use crate::infra::registry::LxssRegistry;
use crate::infra::terminal::HostTerminal;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Dispatcher wired to the real `wsl.exe`, registry and terminal.
pub type HostDispatcher = CommandDispatcher<TokioProcessExecutor, LxssRegistry, HostTerminal>;

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
    /// Skip interactive prompts (also set by `CI` / `APX_YES` env vars).
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
    /// Loaded and validated configuration.
    pub config: ApxConfig,
    /// Lifecycle command dispatcher.
    pub dispatcher: HostDispatcher,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `APX_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded or no instance root
    /// can be determined.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("APX_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config = YamlConfigStore.load()?;
        let layout = InstanceLayout::new(resolve_root(&config)?);
        let wsl_exe = config.wsl_exe.clone().unwrap_or_else(default_wsl_exe);
        tracing::debug!(root = %layout.root().display(), wsl = %wsl_exe.display(), "config loaded");

        let dispatcher = CommandDispatcher::new(
            WslBackend::new(TokioProcessExecutor::for_wsl(), wsl_exe),
            LxssRegistry,
            HostTerminal,
            layout,
            config.settings(),
        );

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config,
            dispatcher,
            non_interactive,
        })
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Run `command`, rendering its events as they arrive and its result at
    /// the end.
    pub async fn dispatch(&self, command: &Command, cancel: &CancellationToken) -> CommandResult {
        let renderer = self.renderer();
        let result = self
            .dispatcher
            .run(command, &|event| renderer.render_event(&event), cancel)
            .await;
        renderer.render_result(command.name(), &result);
        result
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `APX_YES` env),
    /// returns `default` immediately without prompting.
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
