//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

/// Centralized stylesheet for CLI output colors.
#[derive(Default, Clone)]
pub struct Styles {
    /// Warning messages (yellow)
    pub warning: Style,
    /// Error messages (red)
    pub error: Style,
    /// Subprocess stderr lines (yellow, dimmed)
    pub stderr: Style,
    /// Timestamps and other secondary text
    pub dim: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.stderr = Style::new().yellow().dimmed();
        self.dim = Style::new().dimmed();
    }
}
