//! Command dispatch. Binds a fresh [`CommandContext`] to each command.
//!
//! The dispatcher does not serialize calls: overlapping commands run
//! concurrently and may race on the same distro.

use tokio_util::sync::CancellationToken;

use crate::application::backend::WslBackend;
use crate::application::context::CommandContext;
use crate::application::ports::{DistroRegistry, ProcessExecutor, TerminalLauncher};
use crate::application::services;
use crate::domain::{Command, CommandEvent, CommandResult, InstanceLayout, ProvisionSettings};

/// Runs lifecycle commands against one backend, registry and terminal.
pub struct CommandDispatcher<E, R, T> {
    backend: WslBackend<E>,
    registry: R,
    terminal: T,
    layout: InstanceLayout,
    settings: ProvisionSettings,
}

impl<E, R, T> CommandDispatcher<E, R, T>
where
    E: ProcessExecutor,
    R: DistroRegistry,
    T: TerminalLauncher,
{
    #[must_use]
    pub fn new(
        backend: WslBackend<E>,
        registry: R,
        terminal: T,
        layout: InstanceLayout,
        settings: ProvisionSettings,
    ) -> Self {
        Self {
            backend,
            registry,
            terminal,
            layout,
            settings,
        }
    }

    /// Execute `command`, forwarding progress to `on_event`, and return its
    /// terminal result. Failures never escape as errors.
    pub async fn run(
        &self,
        command: &Command,
        on_event: &dyn Fn(CommandEvent),
        cancel: &CancellationToken,
    ) -> CommandResult {
        let ctx = CommandContext::new(
            &self.backend,
            &self.registry,
            &self.terminal,
            &self.layout,
            &self.settings,
            on_event,
        );

        tracing::info!(command = command.name(), "running command");
        let outcome = match command {
            Command::Create(params) => services::create::run(&ctx, params, cancel).await,
            Command::Enter(params) => services::enter::run(&ctx, params, cancel).await,
            Command::Delete(params) => services::delete::run(&ctx, params, cancel).await,
            Command::List => services::list::run(&ctx, cancel).await,
        };

        if let Err(err) = &outcome {
            tracing::info!(
                command = command.name(),
                kind = ?err.kind(),
                error = %err,
                "command failed"
            );
        }
        CommandResult::from(outcome)
    }
}
