//! Spawn-and-capture execution of a composed script.
//!
//! One [`Runner::spawn`] call maps to exactly one child process. The child's
//! stdout and stderr are drained by background reader threads that deliver
//! their accumulated capture over bounded one-shot channels; consuming the
//! [`ExecHandle`] with [`wait`](ExecHandle::wait) is therefore the only way
//! to observe completion, and it can happen at most once.
//!
//! Capture is unbounded: a transfer that prints gigabytes will buffer
//! gigabytes. Callers that expect large output should use
//! [`Runner::stream`] instead.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, bounded};
use thiserror::Error;
use tracing::debug;

use crate::stream::LftpStream;

/// Program spawned when no override is configured.
pub const DEFAULT_PROGRAM: &str = "lftp";

/// Flag that makes the program execute an inline script.
pub const SCRIPT_FLAG: &str = "-c";

/// Errors surfaced by the process executor.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The child process could not be started at all.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        /// The program that was being launched.
        program: String,
        /// The underlying spawn failure.
        #[source]
        source: io::Error,
    },
    /// A capture pipe could not be read to completion.
    #[error("failed to capture child {stream}: {source}")]
    Capture {
        /// Which stream failed, `stdout` or `stderr`.
        stream: &'static str,
        /// The underlying read failure.
        #[source]
        source: io::Error,
    },
    /// The child's exit status could not be collected.
    #[error("failed to wait for {program}: {source}")]
    Wait {
        /// The program that was being waited on.
        program: String,
        /// The underlying wait failure.
        #[source]
        source: io::Error,
    },
}

/// Captured result of one finished execution.
///
/// The exit status is passed through untouched and captured stderr is
/// surfaced independently; the library never conflates the two.
#[derive(Debug)]
pub struct ExecOutput {
    /// Exit status reported by the operating system.
    pub status: ExitStatus,
    /// Everything the child wrote to stdout.
    pub data: String,
    /// Everything the child wrote to stderr, `None` when nothing was written.
    pub errors: Option<String>,
}

impl ExecOutput {
    /// Returns `true` when the child exited successfully.
    ///
    /// Captured stderr text does not influence this; lftp writes progress
    /// noise to stderr even on successful transfers.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Spawns the external program with a composed script.
#[derive(Clone, Debug)]
pub struct Runner {
    program: String,
    working_dir: Option<PathBuf>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    /// Creates a runner that spawns [`DEFAULT_PROGRAM`] from the caller's
    /// current directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_owned(),
            working_dir: None,
        }
    }

    /// Overrides the program to spawn, e.g. a non-`PATH` lftp build.
    pub fn set_program(&mut self, program: impl Into<String>) {
        self.program = program.into();
    }

    /// Sets or clears the working directory for spawned children.
    pub fn set_working_dir(&mut self, dir: Option<PathBuf>) {
        self.working_dir = dir;
    }

    /// The program that will be spawned.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The configured working directory, if any.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    fn command(&self, script: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.arg(SCRIPT_FLAG).arg(script);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }

    /// Spawns the program with `script` and starts draining its output.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Spawn`] when the process cannot be started; no
    /// output exists at that point.
    pub fn spawn(&self, script: &str) -> Result<ExecHandle, RunnerError> {
        let mut command = self.command(script);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(program = %self.program, "spawning transfer process");
        let mut child = command.spawn().map_err(|source| RunnerError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let stdout = take_pipe(child.stdout.take(), "stdout")?;
        let stderr = take_pipe(child.stderr.take(), "stderr")?;
        Ok(ExecHandle {
            program: self.program.clone(),
            child,
            stdout: CaptureChannel::drain("stdout", stdout),
            stderr: CaptureChannel::drain("stderr", stderr),
        })
    }

    /// Spawns the program with `script` and exposes it as a byte stream.
    ///
    /// No capture threads are started; the caller owns the child's stdin and
    /// stdout, and I/O failures surface as [`io::Error`] from the stream.
    /// The child's stderr is inherited from the parent rather than piped:
    /// lftp writes progress noise to stderr even on successful transfers,
    /// and an undrained stderr pipe would stall the child once the OS buffer
    /// fills. Callers that need captured stderr should use
    /// [`spawn`](Self::spawn) instead.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Spawn`] when the process cannot be started.
    pub fn stream(&self, script: &str) -> Result<LftpStream, RunnerError> {
        let mut command = self.command(script);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        debug!(program = %self.program, "spawning streaming transfer process");
        let mut child = command.spawn().map_err(|source| RunnerError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let stdin = take_pipe(child.stdin.take(), "stdin")?;
        let stdout = take_pipe(child.stdout.take(), "stdout")?;
        Ok(LftpStream::new(child, stdin, stdout))
    }
}

fn take_pipe<T>(pipe: Option<T>, stream: &'static str) -> Result<T, RunnerError> {
    pipe.ok_or_else(|| RunnerError::Capture {
        stream,
        source: io::Error::other("pipe was not requested at spawn time"),
    })
}

/// One background reader draining a child pipe into a one-shot channel.
struct CaptureChannel {
    stream: &'static str,
    thread: JoinHandle<()>,
    receiver: Receiver<io::Result<String>>,
}

impl CaptureChannel {
    fn drain<R>(stream: &'static str, mut source: R) -> Self
    where
        R: Read + Send + 'static,
    {
        let (sender, receiver) = bounded(1);
        let thread = thread::spawn(move || {
            let mut bytes = Vec::new();
            let result = source
                .read_to_end(&mut bytes)
                .map(|_| String::from_utf8_lossy(&bytes).into_owned());
            // The receiver disappears when the handle is dropped unawaited.
            let _ = sender.send(result);
        });
        Self {
            stream,
            thread,
            receiver,
        }
    }

    fn join(self) -> Result<String, RunnerError> {
        let result = self
            .receiver
            .recv()
            .unwrap_or_else(|_| Err(io::Error::other("capture thread exited without reporting")));
        let _ = self.thread.join();
        result.map_err(|source| RunnerError::Capture {
            stream: self.stream,
            source,
        })
    }
}

/// A running child process whose completion can be observed exactly once.
///
/// Dropping the handle without calling [`wait`](Self::wait) leaks the child
/// until it exits on its own; the capture threads terminate with it.
pub struct ExecHandle {
    program: String,
    child: Child,
    stdout: CaptureChannel,
    stderr: CaptureChannel,
}

impl ExecHandle {
    /// The operating-system identifier of the child process.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// The underlying process handle, for additional inspection or signals.
    pub fn child_mut(&mut self) -> &mut Child {
        &mut self.child
    }

    /// Receives both captures, reaps the child and returns the result.
    ///
    /// Consuming `self` makes double delivery a compile-time error.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Capture`] when a pipe could not be read and
    /// [`RunnerError::Wait`] when the exit status could not be collected.
    pub fn wait(self) -> Result<ExecOutput, RunnerError> {
        let Self {
            program,
            mut child,
            stdout,
            stderr,
        } = self;

        // recv blocks until the pipe reaches EOF, so the child has finished
        // writing by the time wait() reaps it.
        let data = stdout.join()?;
        let errors = stderr.join()?;
        let status = child
            .wait()
            .map_err(|source| RunnerError::Wait { program, source })?;

        debug!(code = ?status.code(), "transfer process exited");
        Ok(ExecOutput {
            status,
            data,
            errors: if errors.is_empty() {
                None
            } else {
                Some(errors)
            },
        })
    }
}
