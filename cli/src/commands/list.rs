//! `apx list`: show registered distros and their disk images.

use tokio_util::sync::CancellationToken;

use crate::app::AppContext;
use crate::domain::{Command, CommandResult};

/// Run `apx list`.
pub async fn run(app: &AppContext, cancel: &CancellationToken) -> CommandResult {
    app.dispatch(&Command::List, cancel).await
}
