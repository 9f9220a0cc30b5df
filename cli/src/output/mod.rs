//! Output formatting module

pub mod human;
pub mod json;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use human::HumanRenderer;
pub use styles::Styles;

use crate::domain::{CommandEvent, CommandResult};

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    ///
    /// Colors need a TTY on stdout and are off under `--no-color` or a
    /// non-empty `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let use_colors = !no_color && !no_color_env() && Term::stdout().is_term();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self { styles, quiet }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.style(self.styles.error));
    }
}

/// `NO_COLOR` set to anything but the empty string.
fn no_color_env() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}

/// JSON-lines renderer for `--json`.
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn render_event(&self, event: &CommandEvent) {
        match json::format_event(event) {
            Ok(line) => println!("{line}"),
            Err(err) => tracing::warn!(error = %err, "dropping event"),
        }
    }

    pub fn render_result(&self, command: &str, result: &CommandResult) {
        match json::format_result(command, result) {
            Ok(line) => println!("{line}"),
            Err(err) => tracing::warn!(error = %err, "dropping result"),
        }
    }
}

/// Renderer for the active output mode.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    pub fn render_event(&self, event: &CommandEvent) {
        match self {
            Self::Human(r) => r.render_event(event),
            Self::Json(r) => r.render_event(event),
        }
    }

    pub fn render_result(&self, command: &str, result: &CommandResult) {
        match self {
            Self::Human(r) => r.render_result(result),
            Self::Json(r) => r.render_result(command, result),
        }
    }
}
