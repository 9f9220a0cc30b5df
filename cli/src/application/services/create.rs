//! Create pipeline: base image → import → default user → wsl.conf → workdir mount.
//!
//! Steps run in a fixed order and stop at the first failure. Nothing already
//! applied is rolled back: a failure after the import leaves a registered,
//! partially configured distro behind. Inputs that can be checked up front
//! (name, instance dir, mount descriptor) are checked before the import.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::application::context::CommandContext;
use crate::application::ports::{DistroRegistry, ProcessExecutor, TerminalLauncher};
use crate::domain::command::instance_dir_for;
use crate::domain::environment::{GUEST_WORKDIR, HOST_WORKDIR};
use crate::domain::paths::{clean_name, host_to_mount_descriptor, is_drive_path};
use crate::domain::{CommandError, CreateParams, provision};

/// Host side of the workdir bind mount.
struct Workdir {
    host_dir: PathBuf,
    descriptor: String,
}

/// Exit code and stderr of a guest script.
struct ScriptOutcome {
    exit_code: i32,
    stderr: String,
}

/// Run the create pipeline.
///
/// # Errors
///
/// Returns the [`CommandError`] of the first step that fails.
pub async fn run<E, R, T>(
    ctx: &CommandContext<'_, E, R, T>,
    params: &CreateParams,
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
    let install_dir = params
        .install_dir
        .as_deref()
        .map(clean_name)
        .filter(|dir| !dir.is_empty());

    for dir in [ctx.layout.base_dir(), ctx.layout.instances_dir()] {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating directory {}", dir.display()))?;
    }

    ctx.emit("Ensuring base image exists...");
    let base_image = ctx.layout.base_image_path();
    ctx.backend
        .ensure_base_image(
            &base_image,
            &ctx.settings.seed_distro,
            &|msg| ctx.emit(msg),
            cancel,
        )
        .await?;

    if ctx.backend.distro_exists(&name, cancel).await? {
        return Err(CommandError::AlreadyExists(name));
    }

    let instance_dir = absolute_host_path(instance_dir_for(
        install_dir.as_deref(),
        ctx.layout.instance_dir(&name),
        &name,
    ))?;
    let workdir = if params.mount_workdir {
        let host_dir = instance_dir.join(HOST_WORKDIR);
        let descriptor = host_to_mount_descriptor(&host_dir.to_string_lossy())?;
        Some(Workdir {
            host_dir,
            descriptor,
        })
    } else {
        None
    };
    prepare_instance_dir(&instance_dir)?;

    import(ctx, &name, &instance_dir, &base_image, cancel).await?;

    ctx.emit(format!("Creating default user '{}'...", ctx.settings.default_user));
    let script = provision::ensure_user_script(&ctx.settings.default_user);
    let outcome = run_as_root(ctx, &name, &script, cancel).await?;
    if outcome.exit_code != 0 {
        return Err(CommandError::UserProvisioningFailed {
            exit_code: outcome.exit_code,
            stderr: outcome.stderr,
        });
    }

    ctx.emit("Writing /etc/wsl.conf...");
    let script = provision::wsl_conf_script(&ctx.settings.default_user);
    let outcome = run_as_root(ctx, &name, &script, cancel).await?;
    if outcome.exit_code != 0 {
        return Err(CommandError::ConfigWriteFailed {
            exit_code: outcome.exit_code,
            stderr: outcome.stderr,
        });
    }

    if let Some(workdir) = &workdir {
        mount_workdir(ctx, &name, workdir, cancel).await?;
    }

    ctx.emit(format!("Terminating '{name}' to apply configuration..."));
    let code = ctx.backend.run_quiet(&["--terminate", &name], cancel).await?;
    if code != 0 {
        tracing::warn!(distro = %name, exit_code = code, "wsl --terminate failed");
    }

    ctx.emit("Done.");
    Ok(())
}

/// Anchor a relative install dir at the working directory. Drive paths are
/// left as given.
fn absolute_host_path(path: PathBuf) -> Result<PathBuf, CommandError> {
    if is_drive_path(&path.to_string_lossy()) {
        return Ok(path);
    }
    let absolute = std::path::absolute(&path)
        .with_context(|| format!("resolving {}", path.display()))?;
    Ok(absolute)
}

/// Create the instance directory and refuse to reuse a populated one.
fn prepare_instance_dir(dir: &Path) -> Result<(), CommandError> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating directory {}", dir.display()))?;
    let mut entries =
        std::fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;
    if entries.next().is_some() {
        return Err(CommandError::DirectoryNotEmpty(dir.to_path_buf()));
    }
    Ok(())
}

async fn import<E, R, T>(
    ctx: &CommandContext<'_, E, R, T>,
    name: &str,
    instance_dir: &Path,
    base_image: &Path,
    cancel: &CancellationToken,
) -> Result<(), CommandError>
where
    E: ProcessExecutor,
    R: DistroRegistry,
    T: TerminalLauncher,
{
    ctx.emit(format!("Importing '{name}' from base image..."));
    let dir = instance_dir.to_string_lossy();
    let image = base_image.to_string_lossy();
    let mut stderr = Vec::new();
    let code = ctx
        .backend
        .run(
            &["--import", name, &dir, &image],
            &mut |line| ctx.emit(line),
            &mut |line| {
                ctx.emit_stderr(line);
                stderr.push(line.to_string());
            },
            cancel,
        )
        .await?;
    if code != 0 {
        return Err(CommandError::ImportFailed {
            exit_code: Some(code),
            stderr: stderr.join("\n"),
        });
    }

    if !ctx
        .backend
        .ensure_distro_appears(name, ctx.settings.appear_tries, cancel)
        .await?
    {
        return Err(CommandError::ImportFailed {
            exit_code: None,
            stderr: format!("'{name}' did not appear after import"),
        });
    }
    Ok(())
}

async fn mount_workdir<E, R, T>(
    ctx: &CommandContext<'_, E, R, T>,
    name: &str,
    workdir: &Workdir,
    cancel: &CancellationToken,
) -> Result<(), CommandError>
where
    E: ProcessExecutor,
    R: DistroRegistry,
    T: TerminalLauncher,
{
    let host_dir = &workdir.host_dir;
    std::fs::create_dir_all(host_dir)
        .with_context(|| format!("creating directory {}", host_dir.display()))?;

    ctx.emit(format!("Mounting {} at {GUEST_WORKDIR}...", host_dir.display()));
    let script = provision::fstab_script(&workdir.descriptor, GUEST_WORKDIR);
    let outcome = run_as_root(ctx, name, &script, cancel).await?;
    if outcome.exit_code != 0 {
        return Err(CommandError::MountWriteFailed {
            exit_code: outcome.exit_code,
            stderr: outcome.stderr,
        });
    }

    let script = provision::profile_script(GUEST_WORKDIR);
    let outcome = run_as_root(ctx, name, &script, cancel).await?;
    if outcome.exit_code != 0 {
        return Err(CommandError::ProfileWriteFailed {
            exit_code: outcome.exit_code,
            stderr: outcome.stderr,
        });
    }

    let user = &ctx.settings.default_user;
    let script = provision::home_link_script(user, GUEST_WORKDIR);
    let outcome = run_as_root(ctx, name, &script, cancel).await?;
    if outcome.exit_code != 0 {
        ctx.emit(format!("Warning: could not link ~{user}/wkdir to {GUEST_WORKDIR}"));
        tracing::warn!(distro = name, stderr = %outcome.stderr, "home link failed");
    }
    Ok(())
}

/// Run `bash -lc <script>` as root inside `name`, streaming output as events.
async fn run_as_root<E, R, T>(
    ctx: &CommandContext<'_, E, R, T>,
    name: &str,
    script: &str,
    cancel: &CancellationToken,
) -> Result<ScriptOutcome, CommandError>
where
    E: ProcessExecutor,
    R: DistroRegistry,
    T: TerminalLauncher,
{
    let mut stderr = Vec::new();
    let exit_code = ctx
        .backend
        .run(
            &["-d", name, "-u", "root", "--", "bash", "-lc", script],
            &mut |line| ctx.emit(line),
            &mut |line| {
                ctx.emit_stderr(line);
                stderr.push(line.to_string());
            },
            cancel,
        )
        .await?;
    Ok(ScriptOutcome {
        exit_code,
        stderr: stderr.join("\n"),
    })
}
