//! List pipeline: one line per distro, with its disk image when known.

use tokio_util::sync::CancellationToken;

use crate::application::context::CommandContext;
use crate::application::ports::{DistroRegistry, ProcessExecutor, TerminalLauncher};
use crate::domain::CommandError;
use crate::domain::environment::is_listable_name;

/// Message emitted when no distros are registered.
pub const EMPTY_MESSAGE: &str = "No WSL distros found.";

/// Run the list pipeline.
///
/// Emits `name => <vhdx>` for disk-backed distros whose image is present on
/// disk and just `name` otherwise.
///
/// # Errors
///
/// Returns [`CommandError::ListFailed`] if `wsl -l -q` exits non-zero.
pub async fn run<E, R, T>(
    ctx: &CommandContext<'_, E, R, T>,
    cancel: &CancellationToken,
) -> Result<(), CommandError>
where
    E: ProcessExecutor,
    R: DistroRegistry,
    T: TerminalLauncher,
{
    let mut distros = Vec::new();
    let mut stderr = Vec::new();
    let code = ctx
        .backend
        .run(
            &["-l", "-q"],
            &mut |line| {
                let line = line.trim();
                if !line.is_empty() {
                    distros.push(line.to_string());
                }
            },
            &mut |line| {
                ctx.emit_stderr(line);
                stderr.push(line.to_string());
            },
            cancel,
        )
        .await?;
    if code != 0 {
        return Err(CommandError::ListFailed {
            exit_code: code,
            stderr: stderr.join("\n"),
        });
    }

    let names: Vec<String> = distros
        .into_iter()
        .map(|name| name.replace(['\r', '\n'], ""))
        .filter(|name| is_listable_name(name))
        .collect();

    if names.is_empty() {
        ctx.emit(EMPTY_MESSAGE);
        return Ok(());
    }

    ctx.emit("WSL distros (VHD path):");
    for name in names {
        let info = match ctx.registry.lookup(&name, cancel).await {
            Ok(info) => info,
            Err(err) => {
                tracing::debug!(distro = %name, error = %err, "registry lookup failed");
                None
            }
        };
        match info.and_then(|info| info.vhdx_path()) {
            Some(vhdx) if vhdx.is_file() => ctx.emit(format!("{name} => {}", vhdx.display())),
            _ => ctx.emit(name),
        }
    }
    Ok(())
}
