#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `oc-lftp` drives the external [lftp](https://lftp.yar.ru/) binary: a
//! fluent builder assembles a `;`-separated script from connection settings
//! and queued transfer statements, and an executor spawns `lftp -c` with the
//! composed script, capturing its output or exposing it as a byte stream.
//! All transfer semantics - retries, reconnection, TLS, SFTP authentication -
//! belong to lftp itself; this library only composes scripts and supervises
//! a single child process per execution.
//!
//! # Design
//!
//! The workspace splits along the process boundary:
//!
//! - `oc-lftp-script` resolves [`ConnectionSettings`], escapes tokens and
//!   composes the script string.
//! - `oc-lftp-runner` spawns the child, drains stdout/stderr through one-shot
//!   capture channels and reports completion exactly once.
//! - This crate ties both together behind the fluent [`Lftp`] client.
//!
//! # Invariants
//!
//! - Every execution entry point drains the statement queue before spawning,
//!   so the client is reusable regardless of the child's fate.
//! - Completion is observed at most once per execution;
//!   [`ExecHandle::wait`] consumes the handle.
//! - Concurrent executions are independent: each spawns its own child and
//!   shares nothing but the immutable settings.
//!
//! # Examples
//!
//! ```no_run
//! use oc_lftp::{ConnectionSettings, Lftp};
//!
//! let settings = ConnectionSettings::builder("ftp.example.test")
//!     .username("backup")
//!     .password("secret")
//!     .build()?;
//!
//! let mut client = Lftp::new(settings);
//! let output = client
//!     .cd("/incoming")
//!     .put("report.csv", None)
//!     .ls()
//!     .exec()?;
//!
//! if output.success() {
//!     println!("{}", output.data);
//! }
//! # Ok::<(), oc_lftp::LftpError>(())
//! ```

use thiserror::Error;

pub use oc_lftp_runner::{
    DEFAULT_PROGRAM, ExecHandle, ExecOutput, LftpStream, Runner, RunnerError, StreamChild,
    StreamReader, StreamWriter,
};
pub use oc_lftp_script::{
    ConnectionSettings, MirrorDirection, MirrorOptions, Parallelism, STATEMENT_SEPARATOR,
    ScriptBuilder, SettingsBuilder, SettingsError, escape,
};

/// Errors surfaced by the facade: settings resolution or process execution.
#[derive(Debug, Error)]
pub enum LftpError {
    /// The connection settings did not resolve.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The child process failed to spawn, capture or be reaped.
    #[error(transparent)]
    Runner(#[from] RunnerError),
}

/// Fluent lftp client: connection settings plus an ordered statement queue.
///
/// Builder methods return `&mut Self` for chaining; the exclusive borrow
/// makes concurrent chaining on one client a compile-time error. Execution
/// entry points compose the script, drain the queue and spawn one child.
#[derive(Debug)]
pub struct Lftp {
    settings: ConnectionSettings,
    script: ScriptBuilder,
    runner: Runner,
}

impl Lftp {
    /// Creates a client for the given resolved settings.
    #[must_use]
    pub fn new(settings: ConnectionSettings) -> Self {
        let mut runner = Runner::new();
        runner.set_working_dir(settings.working_dir().map(std::path::Path::to_path_buf));
        let script = ScriptBuilder::new(settings.escape_enabled());
        Self {
            settings,
            script,
            runner,
        }
    }

    /// The resolved connection settings this client was built with.
    #[must_use]
    pub const fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Overrides the spawned program, e.g. an lftp build outside `PATH`.
    pub fn set_program(&mut self, program: impl Into<String>) -> &mut Self {
        self.runner.set_program(program);
        self
    }

    /// The statements queued for the next execution, in order.
    #[must_use]
    pub fn pending_commands(&self) -> &[String] {
        self.script.commands()
    }

    /// Renders the script the next execution would run, without draining.
    #[must_use]
    pub fn preview(&self) -> String {
        self.script.preview(&self.settings)
    }

    /// Queues an arbitrary statement verbatim. Empty input is a no-op.
    pub fn raw(&mut self, command: &str) -> &mut Self {
        self.script.raw(command);
        self
    }

    /// Queues a directory listing.
    pub fn ls(&mut self) -> &mut Self {
        self.script.ls();
        self
    }

    /// Queues a print of the remote working directory.
    pub fn pwd(&mut self) -> &mut Self {
        self.script.pwd();
        self
    }

    /// Queues a change of the remote working directory.
    pub fn cd(&mut self, directory: &str) -> &mut Self {
        self.script.cd(directory);
        self
    }

    /// Queues a read of the remote file at `path`.
    pub fn cat(&mut self, path: &str) -> &mut Self {
        self.script.cat(path);
        self
    }

    /// Queues an upload of `local`, optionally renamed to `remote`.
    /// An empty source path is a no-op.
    pub fn put(&mut self, local: &str, remote: Option<&str>) -> &mut Self {
        self.script.put(local, remote);
        self
    }

    /// Alias for [`put`](Self::put).
    pub fn add_file(&mut self, local: &str, remote: Option<&str>) -> &mut Self {
        self.put(local, remote)
    }

    /// Queues a download of `remote`, optionally stored as `local`.
    /// An empty source path is a no-op.
    pub fn get(&mut self, remote: &str, local: Option<&str>) -> &mut Self {
        self.script.get(remote, local);
        self
    }

    /// Alias for [`get`](Self::get).
    pub fn get_file(&mut self, remote: &str, local: Option<&str>) -> &mut Self {
        self.get(remote, local)
    }

    /// Queues a rename. A no-op unless both paths are non-empty.
    pub fn mv(&mut self, from: &str, to: &str) -> &mut Self {
        self.script.mv(from, to);
        self
    }

    /// Alias for [`mv`](Self::mv).
    pub fn move_file(&mut self, from: &str, to: &str) -> &mut Self {
        self.mv(from, to)
    }

    /// Queues a removal of every path in `paths` as one statement.
    pub fn rm<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.script.rm(paths);
        self
    }

    /// Alias for [`rm`](Self::rm).
    pub fn remove<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rm(paths)
    }

    /// Queues a removal of every directory in `paths` as one statement.
    pub fn rmdir<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.script.rmdir(paths);
        self
    }

    /// Queues a directory synchronization statement.
    pub fn mirror(&mut self, options: &MirrorOptions) -> &mut Self {
        self.script.mirror(options);
        self
    }

    /// Composes the script, drains the queue and spawns the child.
    ///
    /// The returned handle exposes the underlying process and delivers the
    /// captured result exactly once through [`ExecHandle::wait`].
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Spawn`] (wrapped in [`LftpError::Runner`]) when
    /// the process cannot be started. The queue is drained even then.
    pub fn spawn(&mut self) -> Result<ExecHandle, LftpError> {
        let script = self.script.finalize(&self.settings);
        Ok(self.runner.spawn(&script)?)
    }

    /// Executes the queued statements and waits for the captured result.
    pub fn exec(&mut self) -> Result<ExecOutput, LftpError> {
        let handle = self.spawn()?;
        Ok(handle.wait()?)
    }

    /// Queues every `;`-separated statement of `script`, then executes.
    pub fn exec_script(&mut self, script: &str) -> Result<ExecOutput, LftpError> {
        self.script.raw_script(script);
        self.exec()
    }

    /// Queues every statement in `commands` verbatim, then executes.
    pub fn exec_commands<I, S>(&mut self, commands: I) -> Result<ExecOutput, LftpError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for command in commands {
            self.script.raw(command.as_ref());
        }
        self.exec()
    }

    /// Composes the script, drains the queue and exposes the child as a
    /// byte stream instead of capturing its output. The child's stderr is
    /// inherited from the parent; use [`exec`](Self::exec) to capture it.
    pub fn exec_as_stream(&mut self) -> Result<LftpStream, LftpError> {
        let script = self.script.finalize(&self.settings);
        Ok(self.runner.stream(&script)?)
    }
}
