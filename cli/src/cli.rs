//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Disposable WSL development environments
#[derive(Parser, Debug)]
#[command(
    name = "apx",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a distro from the cached base image
    Create(commands::create::CreateArgs),

    /// Open a shell in a distro in a new terminal window
    Enter(commands::enter::EnterArgs),

    /// Unregister a distro and delete its files
    Delete(commands::delete::DeleteArgs),

    /// List distros and their disk images
    List,
}

impl Cli {
    /// Execute the CLI command and return the process exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if the application context cannot be built (bad
    /// config, no data directory) or a confirmation prompt fails.
    pub async fn run(self, cancel: &CancellationToken) -> Result<i32> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            command,
        } = self;
        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        };

        let app = match AppContext::new(&flags) {
            Ok(app) => app,
            Err(err) => {
                if json {
                    let message = format!("{err:#}");
                    if let Ok(line) = crate::output::json::format_error(&message, "config") {
                        println!("{line}");
                    }
                }
                return Err(err);
            }
        };

        let result = match command {
            Command::Create(args) => commands::create::run(&app, args, cancel).await,
            Command::Enter(args) => commands::enter::run(&app, args, cancel).await,
            Command::Delete(args) => commands::delete::run(&app, args, cancel).await?,
            Command::List => commands::list::run(&app, cancel).await,
        };
        Ok(result.process_exit_code())
    }
}
