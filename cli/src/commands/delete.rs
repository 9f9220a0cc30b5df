//! `apx delete <name> [--keep-files] [--yes]`: unregister a distro and remove its files.

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::app::AppContext;
use crate::domain::paths::clean_name;
use crate::domain::{Command, CommandResult, DeleteParams};

/// Arguments for the delete command.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Name of the distro
    pub name: String,

    /// Unregister only; leave the instance directory on disk
    #[arg(long)]
    pub keep_files: bool,
}

/// Run `apx delete`.
///
/// # Errors
///
/// Returns an error if the confirmation prompt fails (e.g. no TTY available).
pub async fn run(
    app: &AppContext,
    args: DeleteArgs,
    cancel: &CancellationToken,
) -> Result<CommandResult> {
    if !app.non_interactive {
        let what = if args.keep_files {
            "Unregister"
        } else {
            "Unregister and delete the files of"
        };
        let prompt = format!("{what} WSL distro '{}'?", clean_name(&args.name));
        if !app.confirm(&prompt, false)? {
            app.output.warn("Cancelled.");
            return Ok(CommandResult::Success);
        }
    }

    let params = DeleteParams {
        name: args.name,
        keep_files: args.keep_files,
    };
    Ok(app.dispatch(&Command::Delete(params), cancel).await)
}
