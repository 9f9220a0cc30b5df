//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::{CommandEvent, CommandResult};
use crate::output::{OutputContext, Styles};

/// Timestamp format for progress lines.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Prefix the pipelines put on relayed subprocess stderr lines.
const STDERR_PREFIX: &str = "[err] ";

/// Renders command events and results as terminal lines.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Print one progress event. Suppressed when `quiet`.
    pub fn render_event(&self, event: &CommandEvent) {
        if !self.ctx.quiet {
            println!("{}", format_event(event, &self.ctx.styles));
        }
    }

    /// Print the failure of a command to stderr. Success prints nothing; the
    /// pipelines already report their last step.
    pub fn render_result(&self, result: &CommandResult) {
        if let Some(failure) = result.failure() {
            self.ctx.error(&format!("Error: {}", failure.message));
        }
    }
}

/// `[HH:MM:SS] message`, with the stamp dimmed and relayed stderr tinted.
#[must_use]
pub fn format_event(event: &CommandEvent, styles: &Styles) -> String {
    let stamp = format!("[{}]", event.at.format(TIME_FORMAT));
    let message = if event.message.starts_with(STDERR_PREFIX) {
        event.message.style(styles.stderr).to_string()
    } else {
        event.message.clone()
    };
    format!("{} {message}", stamp.style(styles.dim))
}
