// src/exec/process_runner.rs

//! Child process runner.
//!
//! stdout and stderr of the child share one anonymous pipe, so the log sink
//! sees a single merged stream in the order the child wrote it. A dedicated
//! thread drains that pipe line by line while the caller races process exit
//! against the deadline:
//!
//! - exit first: the drain thread is joined, so every line has reached the
//!   sink before `run` returns. The join shares the same deadline; a
//!   descendant that keeps the pipe open past it is killed and the drain is
//!   abandoned.
//! - deadline first: the child is killed and the drain thread is left to
//!   finish on its own.
//!
//! On unix the child leads its own process group and the whole group is
//! killed, so helpers forked by a wrapper script do not outlive the deadline.
//! Elsewhere only the direct child is killed.

use std::fmt;
use std::io::{BufRead, BufReader, ErrorKind, PipeReader};
use std::process::Stdio;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::exec::command::ScanCommand;
use crate::exec::sink::LogSink;
use crate::types::ExecutionResult;

/// Runs [`ScanCommand`]s as OS processes.
pub struct ProcessRunner {
    sink: Arc<dyn LogSink>,
}

impl fmt::Debug for ProcessRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessRunner").finish_non_exhaustive()
    }
}

impl ProcessRunner {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Run `command`, streaming its output to the sink, for at most `timeout`.
    pub async fn run(&self, command: &ScanCommand, timeout: Duration) -> ExecutionResult {
        info!(
            program = %command.program(),
            args = ?command.args(),
            timeout_secs = timeout.as_secs_f64(),
            "starting scan process"
        );

        let (mut child, output) = match spawn_merged(command) {
            Ok(pair) => pair,
            Err(e) => {
                error!(
                    program = %command.program(),
                    error = %e,
                    "failed to spawn scan process"
                );
                return ExecutionResult::Error(format!(
                    "failed to spawn '{}': {e}",
                    command.program()
                ));
            }
        };

        let deadline = Instant::now() + timeout;
        let pid = child.id();

        let drained = match spawn_drain(output, Arc::clone(&self.sink)) {
            Ok(rx) => rx,
            Err(e) => {
                error!(error = %e, "failed to start output drain thread; killing process");
                if let Err(kill_err) = child.kill().await {
                    warn!(error = %kill_err, "failed to kill process after drain setup failure");
                }
                return ExecutionResult::Error(format!("failed to start output drain: {e}"));
            }
        };

        tokio::select! {
            status_res = child.wait() => {
                match status_res {
                    Ok(status) => {
                        match tokio::time::timeout_at(deadline, drained).await {
                            Ok(Ok(lines)) => debug!(lines, "process output fully drained"),
                            Ok(Err(_)) => warn!("output drain thread ended without reporting"),
                            Err(_) => {
                                warn!(
                                    program = %command.program(),
                                    "process exited but its output pipe is still held at the deadline; \
                                     killing leftover descendants and abandoning the drain"
                                );
                                kill_group(pid);
                            }
                        }

                        let exit_code = status.code();
                        info!(
                            program = %command.program(),
                            exit_code = ?exit_code,
                            success = status.success(),
                            "scan process exited"
                        );
                        ExecutionResult::Success { exit_code }
                    }
                    Err(e) => {
                        error!(
                            program = %command.program(),
                            error = %e,
                            "failed waiting for scan process"
                        );
                        ExecutionResult::Error(format!(
                            "waiting for '{}': {e}",
                            command.program()
                        ))
                    }
                }
            }

            _ = tokio::time::sleep_until(deadline) => {
                warn!(
                    program = %command.program(),
                    timeout_secs = timeout.as_secs_f64(),
                    "scan process exceeded its deadline; killing it"
                );
                kill_group(pid);
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "failed to kill timed-out process");
                }
                ExecutionResult::Timeout
            }
        }
    }
}

/// Spawn `command` with stdout and stderr both pointing at one pipe.
fn spawn_merged(command: &ScanCommand) -> std::io::Result<(Child, PipeReader)> {
    let (reader, writer) = std::io::pipe()?;
    let writer_for_stderr = writer.try_clone()?;

    let mut cmd = Command::new(command.program());
    cmd.args(command.args())
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(writer_for_stderr)
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    let child = cmd.spawn()?;

    // `cmd` still owns the parent's copies of the write end; the reader only
    // sees EOF once they are closed.
    drop(cmd);

    Ok((child, reader))
}

/// SIGKILL the process group led by `pid`. The group outlives its leader,
/// so this also reaches descendants of a child that already exited.
#[cfg(unix)]
fn kill_group(pid: Option<u32>) {
    let Some(pid) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    // SAFETY: kill(2) with a negative pid only sends a signal.
    let rc = unsafe { libc::kill(-pid, libc::SIGKILL) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        // ESRCH: the group is already gone.
        if err.raw_os_error() != Some(libc::ESRCH) {
            warn!(pid, error = %err, "failed to kill process group");
        }
    } else {
        debug!(pid, "killed process group");
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: Option<u32>) {}

/// Start the drain thread. The receiver resolves with the number of lines
/// forwarded once the pipe reaches EOF.
fn spawn_drain(
    output: PipeReader,
    sink: Arc<dyn LogSink>,
) -> std::io::Result<oneshot::Receiver<usize>> {
    let (done_tx, done_rx) = oneshot::channel();

    thread::Builder::new()
        .name("scanqueue-drain".to_string())
        .spawn(move || {
            let lines = drain_lines(BufReader::new(output), sink.as_ref());
            let _ = done_tx.send(lines);
        })?;

    Ok(done_rx)
}

fn drain_lines(mut reader: impl BufRead, sink: &dyn LogSink) -> usize {
    let mut buf = Vec::new();
    let mut count = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                // Scanner output is not guaranteed to be UTF-8.
                let line = String::from_utf8_lossy(&buf);
                sink.write_line(line.trim_end_matches(['\r', '\n']));
                count += 1;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(error = %e, "reading process output failed; stopping drain");
                break;
            }
        }
    }

    count
}
