//! Enter pipeline: open an interactive shell in a new terminal window.

use tokio_util::sync::CancellationToken;

use crate::application::context::CommandContext;
use crate::application::ports::{DistroRegistry, ProcessExecutor, TerminalLauncher};
use crate::domain::environment::GUEST_WORKDIR;
use crate::domain::paths::{clean_name, host_to_guest_path};
use crate::domain::{CommandError, EnterParams, provision};

/// Run the enter pipeline.
///
/// Success means the terminal was launched, not that the session finished.
///
/// # Errors
///
/// Returns [`CommandError::NotFound`] if the distro does not exist,
/// [`CommandError::InvalidPath`] if the start directory is not a drive path,
/// and [`CommandError::Unexpected`] if the terminal cannot be started.
pub async fn run<E, R, T>(
    ctx: &CommandContext<'_, E, R, T>,
    params: &EnterParams,
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

    let start_dir = match params.start_dir.as_deref().map(clean_name) {
        Some(dir) if !dir.is_empty() => host_to_guest_path(&dir)?,
        _ => GUEST_WORKDIR.to_string(),
    };

    let args = if ctx.backend.supports_cd(cancel).await? {
        vec!["-d".to_string(), name.clone(), "--cd".to_string(), start_dir]
    } else {
        tracing::debug!("wsl has no --cd; changing directory in the login shell");
        vec![
            "-d".to_string(),
            name.clone(),
            "--".to_string(),
            "bash".to_string(),
            "-lc".to_string(),
            provision::cd_shell_script(&start_dir),
        ]
    };

    ctx.emit(format!("Launching shell for '{name}'..."));
    ctx.terminal
        .launch(&ctx.backend.exe_path().to_string_lossy(), &args)?;
    Ok(())
}
