//! Child process execution with captured output.

use std::{
    io::Read,
    path::Path,
    process::{Child, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use crate::{Error, Result, command::GeneratorCommand};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Outcome of a generator run that started and finished.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run the command in `cwd` and capture its output.
///
/// Waits indefinitely when `timeout` is `None`. Otherwise the child is killed
/// once the deadline passes.
pub fn execute(
    command: &GeneratorCommand,
    cwd: &Path,
    timeout: Option<Duration>,
) -> Result<ProcessOutput> {
    let mut cmd = command.to_command();
    cmd.current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let spawn_error = |source| {
        Box::new(Error::Spawn {
            program: command.program().to_path_buf(),
            source,
        })
    };

    let child = cmd.spawn().map_err(spawn_error)?;
    tracing::debug!(pid = child.id(), "generator started");

    match timeout {
        None => {
            let output = child.wait_with_output().map_err(spawn_error)?;
            Ok(ProcessOutput {
                status: output.status,
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
        Some(limit) => wait_with_deadline(child, command, limit),
    }
}

fn wait_with_deadline(
    mut child: Child,
    command: &GeneratorCommand,
    limit: Duration,
) -> Result<ProcessOutput> {
    // A full pipe stalls the child, so both are drained while polling.
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let deadline = Instant::now() + limit;
    let status = loop {
        let polled = child.try_wait().map_err(|source| {
            Box::new(Error::Spawn {
                program: command.program().to_path_buf(),
                source,
            })
        })?;
        if let Some(status) = polled {
            break status;
        }
        if Instant::now() >= deadline {
            if let Err(e) = child.kill() {
                tracing::warn!(error = %e, "failed to kill generator");
            }
            let _ = child.wait();
            return Err(Box::new(Error::TimedOut {
                program: command.program().to_path_buf(),
                timeout: limit,
            }));
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok(ProcessOutput {
        status,
        stdout: join(stdout),
        stderr: join(stderr),
    })
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
