//! WSL semantics on top of the [`ProcessExecutor`] port.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::application::ports::ProcessExecutor;
use crate::domain::{CommandError, ExecError};

/// Interval between visibility polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Name the CLI is resolved by on the search path when no canonical copy exists.
pub const WSL_EXE: &str = "wsl.exe";

/// Substrings of a failed probe that positively identify a missing distro.
const MISSING_MARKERS: &[&str] = &["does not exist", "is not installed"];

/// Output of a buffered invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub exit_code: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl CapturedOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// All stderr lines joined with newlines.
    #[must_use]
    pub fn stderr_text(&self) -> String {
        self.stderr.join("\n")
    }
}

/// Preferred location of the WSL CLI: `%WINDIR%\System32\wsl.exe` when it
/// exists, otherwise the bare name so the search path resolves it at launch.
#[must_use]
pub fn default_wsl_exe() -> PathBuf {
    if let Some(windir) = std::env::var_os("WINDIR") {
        let candidate = PathBuf::from(windir).join("System32").join(WSL_EXE);
        if candidate.is_file() {
            return candidate;
        }
    }
    PathBuf::from(WSL_EXE)
}

/// The virtualization CLI, wrapped with existence checks and retries.
pub struct WslBackend<E> {
    executor: E,
    exe_path: PathBuf,
    poll_interval: Duration,
}

impl<E: ProcessExecutor> WslBackend<E> {
    #[must_use]
    pub fn new(executor: E, exe_path: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            exe_path: exe_path.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the visibility poll interval (tests use zero).
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn exe_path(&self) -> &Path {
        &self.exe_path
    }

    /// Run the CLI, streaming its output to the callbacks.
    ///
    /// # Errors
    ///
    /// Propagates [`ExecError`] from the executor.
    pub async fn run(
        &self,
        args: &[&str],
        on_stdout: &mut dyn FnMut(&str),
        on_stderr: &mut dyn FnMut(&str),
        cancel: &CancellationToken,
    ) -> Result<i32, ExecError> {
        let program = self.exe_path.to_string_lossy();
        tracing::debug!(program = %program, ?args, "running wsl");
        let code = self
            .executor
            .execute(&program, args, on_stdout, on_stderr, cancel)
            .await?;
        tracing::debug!(?args, exit_code = code, "wsl finished");
        Ok(code)
    }

    /// Run the CLI and discard its output.
    ///
    /// # Errors
    ///
    /// Propagates [`ExecError`] from the executor.
    pub async fn run_quiet(
        &self,
        args: &[&str],
        cancel: &CancellationToken,
    ) -> Result<i32, ExecError> {
        self.run(args, &mut |_| {}, &mut |_| {}, cancel).await
    }

    /// Run the CLI and buffer both streams.
    ///
    /// # Errors
    ///
    /// Propagates [`ExecError`] from the executor.
    pub async fn run_capture(
        &self,
        args: &[&str],
        cancel: &CancellationToken,
    ) -> Result<CapturedOutput, ExecError> {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let exit_code = self
            .run(
                args,
                &mut |line| stdout.push(line.to_string()),
                &mut |line| stderr.push(line.to_string()),
                cancel,
            )
            .await?;
        Ok(CapturedOutput {
            exit_code,
            stdout,
            stderr,
        })
    }

    /// Names from `wsl -l -q`, trimmed, blanks dropped, in CLI order.
    ///
    /// # Errors
    ///
    /// Propagates [`ExecError`] from the executor.
    pub async fn list_distros(&self, cancel: &CancellationToken) -> Result<Vec<String>, ExecError> {
        let output = self.run_capture(&["-l", "-q"], cancel).await?;
        if !output.success() {
            tracing::debug!(
                exit_code = output.exit_code,
                stderr = %output.stderr_text(),
                "wsl -l -q failed"
            );
        }
        Ok(output
            .stdout
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// Whether a distro exists.
    ///
    /// Falls back to a no-op `wsl -d <name> -- true` probe when the name is
    /// missing from the quiet list, which lags behind recent imports. Any
    /// probe failure counts as "does not exist", including failures whose
    /// stderr does not say so.
    ///
    /// # Errors
    ///
    /// Propagates [`ExecError`] from the executor.
    pub async fn distro_exists(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, ExecError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }

        let distros = self.list_distros(cancel).await?;
        if distros.iter().any(|d| d.eq_ignore_ascii_case(name)) {
            return Ok(true);
        }

        let probe = self.run_capture(&["-d", name, "--", "true"], cancel).await?;
        if probe.success() {
            tracing::debug!(distro = name, "distro missing from list but probe succeeded");
            return Ok(true);
        }

        let err = probe.stderr_text().to_lowercase();
        if MISSING_MARKERS.iter().any(|marker| err.contains(marker)) {
            tracing::debug!(distro = name, "distro does not exist");
        } else {
            tracing::warn!(
                distro = name,
                exit_code = probe.exit_code,
                stderr = %probe.stderr_text(),
                "existence probe failed for an unrelated reason; treating distro as missing"
            );
        }
        Ok(false)
    }

    /// Poll [`Self::distro_exists`] up to `tries` times; if the distro is still
    /// invisible, `wsl --shutdown` and poll `tries` times more.
    ///
    /// # Errors
    ///
    /// Propagates [`ExecError`], including [`ExecError::Cancelled`] between polls.
    pub async fn ensure_distro_appears(
        &self,
        name: &str,
        tries: u32,
        cancel: &CancellationToken,
    ) -> Result<bool, ExecError> {
        if self.poll(name, tries, cancel).await? {
            return Ok(true);
        }

        tracing::info!(distro = name, tries, "distro not visible; restarting WSL");
        self.run_quiet(&["--shutdown"], cancel).await?;
        self.pause(cancel).await?;

        self.poll(name, tries, cancel).await
    }

    async fn poll(
        &self,
        name: &str,
        tries: u32,
        cancel: &CancellationToken,
    ) -> Result<bool, ExecError> {
        for attempt in 1..=tries {
            if self.distro_exists(name, cancel).await? {
                return Ok(true);
            }
            tracing::debug!(distro = name, attempt, "distro not visible yet");
            self.pause(cancel).await?;
        }
        Ok(false)
    }

    async fn pause(&self, cancel: &CancellationToken) -> Result<(), ExecError> {
        tokio::select! {
            () = cancel.cancelled() => Err(ExecError::Cancelled),
            () = tokio::time::sleep(self.poll_interval) => Ok(()),
        }
    }

    /// Whether `wsl --help` advertises `--cd`.
    ///
    /// Inspects stdout and stderr regardless of exit code; some builds print
    /// help on stderr and exit non-zero.
    ///
    /// # Errors
    ///
    /// Propagates [`ExecError`] from the executor.
    pub async fn supports_cd(&self, cancel: &CancellationToken) -> Result<bool, ExecError> {
        let output = self.run_capture(&["--help"], cancel).await?;
        Ok(output
            .stdout
            .iter()
            .chain(&output.stderr)
            .any(|line| line.to_lowercase().contains("--cd")))
    }

    /// Make sure the base image exists at `target`, exporting it from
    /// `seed_distro` on first use. An existing file is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::PreconditionFailed`] if the seed distro is
    /// missing and [`CommandError::ExportFailed`] if the export exits non-zero.
    pub async fn ensure_base_image(
        &self,
        target: &Path,
        seed_distro: &str,
        log: &dyn Fn(&str),
        cancel: &CancellationToken,
    ) -> Result<(), CommandError> {
        if target.exists() {
            log(&format!("Base image already exists: {}", target.display()));
            return Ok(());
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }

        if !self.distro_exists(seed_distro, cancel).await? {
            return Err(CommandError::PreconditionFailed(format!(
                "{seed_distro} was not detected. Install it with 'wsl --install -d {seed_distro}' \
                 and make sure WSL runs from this process."
            )));
        }

        log(&format!(
            "Exporting '{seed_distro}' to base image: {}",
            target.display()
        ));
        let target_str = target.to_string_lossy();
        let output = self
            .run_capture(&["--export", seed_distro, &target_str], cancel)
            .await?;
        if !output.success() {
            return Err(CommandError::ExportFailed {
                exit_code: output.exit_code,
                stderr: output.stderr_text(),
            });
        }
        Ok(())
    }
}
