//! `apx create <name> [--installDir <dir>] [--no-mount]`: provision a new distro.

use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::app::AppContext;
use crate::domain::{Command, CommandResult, CreateParams};

/// Arguments for the create command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the new distro
    pub name: String,

    /// Directory that receives `<dir>/<name>` (default: the instance root)
    #[arg(
        long = "installDir",
        visible_alias = "install-dir",
        aliases = ["homeDir", "homedir", "installdir"],
        value_name = "DIR"
    )]
    pub install_dir: Option<String>,

    /// Skip bind-mounting the instance `wkdir` into the guest
    #[arg(long)]
    pub no_mount: bool,
}

/// Run `apx create`.
pub async fn run(
    app: &AppContext,
    args: CreateArgs,
    cancel: &CancellationToken,
) -> CommandResult {
    let params = CreateParams {
        name: args.name,
        install_dir: args.install_dir,
        mount_workdir: app.config.mount_workdir && !args.no_mount,
    };
    app.dispatch(&Command::Create(params), cancel).await
}
