//! Delete pipeline: terminate → unregister → remove backing storage.

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::application::context::CommandContext;
use crate::application::ports::{DistroRegistry, ProcessExecutor, TerminalLauncher};
use crate::domain::paths::clean_name;
use crate::domain::{CommandError, DeleteParams};

/// Run the delete pipeline.
///
/// The storage path is read from the registry before unregistering, since
/// unregistering drops the metadata. When unregistering fails the storage is
/// left untouched.
///
/// # Errors
///
/// Returns [`CommandError::NotFound`] if the distro does not exist and
/// [`CommandError::UnregisterFailed`] if `wsl --unregister` exits non-zero.
pub async fn run<E, R, T>(
    ctx: &CommandContext<'_, E, R, T>,
    params: &DeleteParams,
    cancel: &CancellationToken,
) -> Result<(), CommandError>
where
    E: ProcessExecutor,
    R: DistroRegistry,
    T: TerminalLauncher,
{
    let name = clean_name(&params.name);
    if name.is_empty() {
        return Err(CommandError::InvalidInput("missing env name".to_string()));
    }

    if !ctx.backend.distro_exists(&name, cancel).await? {
        return Err(CommandError::NotFound(name));
    }

    let base_path = match ctx.registry.lookup(&name, cancel).await {
        Ok(info) => info.map(|info| info.base_path),
        Err(err) => {
            tracing::warn!(distro = %name, error = %err, "registry lookup failed");
            None
        }
    };

    ctx.emit(format!("Terminating '{name}'..."));
    let code = ctx.backend.run_quiet(&["--terminate", &name], cancel).await?;
    if code != 0 {
        tracing::debug!(distro = %name, exit_code = code, "wsl --terminate failed");
    }

    ctx.emit(format!("Unregistering '{name}'..."));
    let mut stderr = Vec::new();
    let code = ctx
        .backend
        .run(
            &["--unregister", &name],
            &mut |line| ctx.emit(line),
            &mut |line| {
                ctx.emit_stderr(line);
                stderr.push(line.to_string());
            },
            cancel,
        )
        .await?;
    if code != 0 {
        return Err(CommandError::UnregisterFailed {
            exit_code: code,
            stderr: stderr.join("\n"),
        });
    }

    if params.keep_files {
        ctx.emit("Done. (files kept)");
        return Ok(());
    }

    let delete_path = base_path.unwrap_or_else(|| ctx.layout.instance_dir(&name));
    if delete_path.exists() {
        ctx.emit(format!("Deleting files: {}", delete_path.display()));
        std::fs::remove_dir_all(&delete_path)
            .with_context(|| format!("removing directory {}", delete_path.display()))?;
    } else {
        ctx.emit(format!("Files already missing: {}", delete_path.display()));
    }

    ctx.emit("Done.");
    Ok(())
}
