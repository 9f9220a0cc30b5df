//! Infrastructure implementation of the `ProcessExecutor` port.
//!
//! `TokioProcessExecutor` pumps stdout and stderr on two spawned reader tasks
//! that feed one channel, so a child filling either pipe never blocks on the
//! other. Callbacks run on the calling task in arrival order.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::ports::ProcessExecutor;
use crate::domain::ExecError;

/// Suppresses the console window for child processes on Windows.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Production `ProcessExecutor`: async process execution on tokio.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessExecutor {
    envs: Vec<(String, String)>,
}

impl TokioProcessExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor for `wsl.exe`: forces UTF-8 output instead of UTF-16.
    #[must_use]
    pub fn for_wsl() -> Self {
        Self::new().with_env("WSL_UTF8", "1")
    }

    /// Set an environment variable on every spawned child.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl ProcessExecutor for TokioProcessExecutor {
    async fn execute(
        &self,
        program: &str,
        args: &[&str],
        on_stdout: &mut dyn FnMut(&str),
        on_stderr: &mut dyn FnMut(&str),
        cancel: &CancellationToken,
    ) -> Result<i32, ExecError> {
        if cancel.is_cancelled() {
            return Err(ExecError::Cancelled);
        }

        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let mut child = command.spawn().map_err(|source| ExecError::Spawn {
            program: program.to_string(),
            source,
        })?;
        tracing::debug!(program, pid = child.id(), "spawned");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut pumps: Vec<JoinHandle<()>> = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            pumps.push(tokio::spawn(pump(stdout, Stream::Stdout, tx.clone())));
        }
        if let Some(stderr) = child.stderr.take() {
            pumps.push(tokio::spawn(pump(stderr, Stream::Stderr, tx.clone())));
        }
        drop(tx);

        // The channel closes once both pumps reach EOF.
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    for handle in &pumps {
                        handle.abort();
                    }
                    while let Ok((stream, line)) = rx.try_recv() {
                        deliver(stream, &line, on_stdout, on_stderr);
                    }
                    tracing::debug!(program, "cancelled; leaving child running");
                    return Err(ExecError::Cancelled);
                }
                item = rx.recv() => match item {
                    Some((stream, line)) => deliver(stream, &line, on_stdout, on_stderr),
                    None => break,
                },
            }
        }

        let status = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ExecError::Cancelled),
            status = child.wait() => status.map_err(|source| ExecError::Wait {
                program: program.to_string(),
                source,
            })?,
        };
        let code = status.code().unwrap_or(-1);
        tracing::debug!(program, exit_code = code, "exited");
        Ok(code)
    }
}

fn deliver(
    stream: Stream,
    line: &str,
    on_stdout: &mut dyn FnMut(&str),
    on_stderr: &mut dyn FnMut(&str),
) {
    match stream {
        Stream::Stdout => on_stdout(line),
        Stream::Stderr => on_stderr(line),
    }
}

/// Read `reader` line by line into `tx` until EOF, a read error, or the
/// receiver going away.
async fn pump<R>(reader: R, stream: Stream, tx: mpsc::UnboundedSender<(Stream, String)>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                if tx.send((stream, decode_line(&buf))).is_err() {
                    break;
                }
            }
            Err(err) => {
                tracing::debug!(?stream, error = %err, "pipe read failed");
                break;
            }
        }
    }
}

/// Lossy UTF-8 decode with NULs (UTF-16 residue) and the line terminator removed.
fn decode_line(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw).replace('\0', "");
    text.trim_end_matches(['\r', '\n']).to_string()
}
