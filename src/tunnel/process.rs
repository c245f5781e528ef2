//! Tunnel child process: spawning, output pumps, and exit monitoring.

use std::process::Stdio;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use super::scanner::{UrlScanner, is_benign_diagnostic};
use crate::config::TunnelConfig;
use crate::domain::PublicEndpoint;
use crate::error::TunnelError;

/// Running tunnel process and the tasks reading its output.
///
/// Dropping the handle aborts those tasks. The child is spawned with
/// `kill_on_drop`, so it is terminated together with its monitor task.
#[derive(Debug)]
pub struct TunnelHandle {
    pid: Option<u32>,
    tasks: Vec<JoinHandle<()>>,
}

impl TunnelHandle {
    /// OS process id of the tunnel, if it was still running when spawned.
    #[must_use]
    pub const fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Stops the tunnel.
    ///
    /// Aborts the output and monitor tasks. Aborting the monitor drops the
    /// [`Child`], which kills the process because it was spawned with
    /// `kill_on_drop`.
    pub fn shutdown(mut self) {
        tracing::info!(pid = ?self.pid, "stopping tunnel");
        self.abort_tasks();
    }

    fn abort_tasks(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for TunnelHandle {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}

/// Starts the tunnel described by `config`, forwarding to local `port`.
///
/// The first address matching the configured pattern on stdout is published
/// to `endpoint`. Stderr output is logged and never fatal.
///
/// # Errors
///
/// Returns [`TunnelError::InvalidPattern`] for a bad URL pattern and
/// [`TunnelError::Spawn`] if the program cannot be launched.
pub fn spawn_tunnel(
    config: &TunnelConfig,
    port: u16,
    endpoint: PublicEndpoint,
) -> Result<TunnelHandle, TunnelError> {
    let scanner = UrlScanner::new(&config.url_pattern)?;
    let args = config.args_for_port(port);

    let mut child = Command::new(&config.program)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| TunnelError::Spawn {
            program: config.program.clone(),
            source,
        })?;

    let stdout = child.stdout.take().ok_or(TunnelError::MissingPipe("stdout"))?;
    let stderr = child.stderr.take().ok_or(TunnelError::MissingPipe("stderr"))?;
    let pid = child.id();
    tracing::info!(program = %config.program, ?args, ?pid, "tunnel started");

    let tasks = vec![
        tokio::spawn(scan_stdout(stdout, scanner, endpoint)),
        tokio::spawn(log_stderr(stderr)),
        tokio::spawn(monitor(child)),
    ];

    Ok(TunnelHandle { pid, tasks })
}

/// Reads `stdout` line by line and publishes the first matching address.
pub(crate) async fn scan_stdout<R>(stdout: R, scanner: UrlScanner, endpoint: PublicEndpoint)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        match next_line(&mut reader, &mut buf).await {
            Ok(Some(line)) => {
                tracing::debug!(%line, "tunnel output");
                if let Some(url) = scanner.find(&line)
                    && endpoint.publish(url)
                {
                    tracing::info!(%url, "public tunnel is active");
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read tunnel output");
                break;
            }
        }
    }
}

/// Logs tunnel stderr, demoting the known harmless warning to debug.
async fn log_stderr<R>(stderr: R)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stderr);
    let mut buf = Vec::new();
    loop {
        match next_line(&mut reader, &mut buf).await {
            Ok(Some(line)) if is_benign_diagnostic(&line) => {
                tracing::debug!(%line, "tunnel diagnostic");
            }
            Ok(Some(line)) => tracing::warn!(%line, "tunnel error"),
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read tunnel diagnostics");
                break;
            }
        }
    }
}

/// Reads one line, decoding invalid UTF-8 lossily instead of failing.
///
/// Returns `Ok(None)` at end of stream. The trailing newline (and `\r`) is
/// stripped.
async fn next_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

async fn monitor(mut child: Child) {
    // `wait` closes stdin; ssh tears the session down on EOF.
    let _stdin = child.stdin.take();
    match child.wait().await {
        Ok(status) => tracing::warn!(%status, "tunnel process exited"),
        Err(e) => tracing::warn!(error = %e, "failed to wait for tunnel process"),
    }
}
