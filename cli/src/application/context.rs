//! Per-execution context handed to every command pipeline.

use crate::application::backend::WslBackend;
use crate::application::ports::{DistroRegistry, ProcessExecutor, TerminalLauncher};
use crate::domain::{CommandEvent, InstanceLayout, ProvisionSettings};

/// Everything one command execution may touch, plus its event sink.
///
/// Built fresh by the dispatcher for every call; nothing in it outlives the
/// command.
pub struct CommandContext<'a, E, R, T> {
    pub backend: &'a WslBackend<E>,
    pub registry: &'a R,
    pub terminal: &'a T,
    pub layout: &'a InstanceLayout,
    pub settings: &'a ProvisionSettings,
    on_event: &'a dyn Fn(CommandEvent),
}

impl<'a, E, R, T> CommandContext<'a, E, R, T>
where
    E: ProcessExecutor,
    R: DistroRegistry,
    T: TerminalLauncher,
{
    #[must_use]
    pub fn new(
        backend: &'a WslBackend<E>,
        registry: &'a R,
        terminal: &'a T,
        layout: &'a InstanceLayout,
        settings: &'a ProvisionSettings,
        on_event: &'a dyn Fn(CommandEvent),
    ) -> Self {
        Self {
            backend,
            registry,
            terminal,
            layout,
            settings,
            on_event,
        }
    }

    /// Emit a timestamped progress message.
    pub fn emit(&self, message: impl Into<String>) {
        (self.on_event)(CommandEvent::now(message));
    }

    /// Emit a line the subprocess wrote to stderr.
    pub fn emit_stderr(&self, line: &str) {
        self.emit(format!("[err] {line}"));
    }
}
