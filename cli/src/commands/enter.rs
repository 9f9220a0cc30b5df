//! `apx enter <name> [--start-dir <dir>]`: open a shell in a new terminal.

use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::app::AppContext;
use crate::domain::{Command, CommandResult, EnterParams};

/// Arguments for the enter command.
#[derive(Args, Debug)]
pub struct EnterArgs {
    /// Name of the distro
    pub name: String,

    /// Host directory to start in (default: the mounted work directory)
    #[arg(long, value_name = "DIR")]
    pub start_dir: Option<String>,
}

/// Run `apx enter`.
pub async fn run(
    app: &AppContext,
    args: EnterArgs,
    cancel: &CancellationToken,
) -> CommandResult {
    let params = EnterParams {
        name: args.name,
        start_dir: args.start_dir,
    };
    app.dispatch(&Command::Enter(params), cancel).await
}
