//! Runs external processes with `tokio::process`.

use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

use sprout_core::{
    application::{
        ApplicationError,
        ports::{CommandSpec, ProcessOutput, ProcessRunner, ProgressSink},
    },
    error::{SproutError, SproutResult},
};

const READ_CHUNK: usize = 4096;

/// Production process runner.
///
/// Standard input is closed. Stdout and stderr are read concurrently and
/// every chunk is forwarded to the progress sink; stderr is also kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        command: &CommandSpec,
        progress: &dyn ProgressSink,
    ) -> SproutResult<ProcessOutput> {
        debug!(command = %command.display(), cwd = %command.cwd.display(), "Spawning");

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ApplicationError::ProcessSpawn {
                program: command.program.clone(),
                reason: e.to_string(),
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let completion = async {
            let (out, err, status) = tokio::join!(
                pump(stdout, progress, false),
                pump(stderr, progress, true),
                child.wait()
            );
            out?;
            Ok::<_, io::Error>((err?, status?))
        };

        let finished = match command.timeout {
            Some(limit) => match tokio::time::timeout(limit, completion).await {
                Ok(result) => Some(result),
                Err(_) => None,
            },
            None => Some(completion.await),
        };

        let Some(result) = finished else {
            let seconds = command.timeout.map(|t| t.as_secs()).unwrap_or_default();
            warn!(program = %command.program, seconds, "Process timed out, killing");
            if let Err(e) = child.kill().await {
                warn!(error = %e, "Failed to kill timed out process");
            }
            return Err(ApplicationError::ProcessTimedOut {
                program: command.program.clone(),
                seconds,
            }
            .into());
        };

        let (stderr, status) = result.map_err(|e| SproutError::Internal {
            message: format!("failed to read output of '{}': {e}", command.program),
        })?;

        debug!(status = %status, "Process exited");
        Ok(ProcessOutput {
            success: status.success(),
            code: status.code(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

/// Read `reader` to the end, forwarding chunks. Returns the bytes read when
/// `keep` is set.
async fn pump<R>(reader: Option<R>, progress: &dyn ProgressSink, keep: bool) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut kept = Vec::new();
    let Some(mut reader) = reader else {
        return Ok(kept);
    };

    let mut buf = [0u8; READ_CHUNK];
    let mut pending = Vec::new();
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        pending.extend_from_slice(&buf[..n]);
        let text = take_decoded(&mut pending);
        if !text.is_empty() {
            progress.report(&text);
        }
        if keep {
            kept.extend_from_slice(&buf[..n]);
        }
    }
    if !pending.is_empty() {
        progress.report(&String::from_utf8_lossy(&pending));
    }
    Ok(kept)
}

/// Decode `pending` up to a trailing incomplete character, which stays in
/// the buffer for the next read. Invalid bytes become U+FFFD.
fn take_decoded(pending: &mut Vec<u8>) -> String {
    let mut text = String::new();
    let mut start = 0;
    while start < pending.len() {
        match std::str::from_utf8(&pending[start..]) {
            Ok(rest) => {
                text.push_str(rest);
                start = pending.len();
            }
            Err(e) => {
                let valid = start + e.valid_up_to();
                text.push_str(&String::from_utf8_lossy(&pending[start..valid]));
                match e.error_len() {
                    Some(len) => {
                        text.push(char::REPLACEMENT_CHARACTER);
                        start = valid + len;
                    }
                    None => {
                        start = valid;
                        break;
                    }
                }
            }
        }
    }
    pending.drain(..start);
    text
}
