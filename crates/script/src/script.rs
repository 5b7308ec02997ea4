//! Ordered statement queue and script composition.
//!
//! [`ScriptBuilder`] accumulates transfer and navigation statements in
//! insertion order; the order is significant because lftp executes the
//! composed script sequentially. Finalizing prepends the connection preamble
//! derived from [`ConnectionSettings`] and drains the queue, leaving the
//! builder ready for the next script.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::mem;

use tracing::trace;

use crate::escape;
use crate::settings::ConnectionSettings;

/// Separator between statements in a composed script.
pub const STATEMENT_SEPARATOR: char = ';';

/// Direction of a [`mirror`](ScriptBuilder::mirror) synchronization.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MirrorDirection {
    /// Copy the remote tree into the local directory (lftp's default).
    #[default]
    Download,
    /// Copy the local tree to the remote directory (`mirror -R`).
    Upload,
}

/// Worker configuration for a mirror transfer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Parallelism {
    /// Let lftp pick the worker count (`--parallel`).
    Auto,
    /// Use an explicit worker count (`--parallel=N`); values below 1 are
    /// raised to 1.
    Jobs(u32),
}

/// Options for a [`mirror`](ScriptBuilder::mirror) statement.
#[derive(Clone, Debug)]
pub struct MirrorOptions {
    /// Transfer direction; decides which directory is the source.
    pub direction: MirrorDirection,
    /// Remote directory, defaults to `.`.
    pub remote_dir: String,
    /// Local directory, defaults to `.`.
    pub local_dir: String,
    /// Optional parallel transfer configuration.
    pub parallel: Option<Parallelism>,
    /// Extra option text inserted verbatim between the flags and the filter.
    pub options: String,
    /// Inclusion filter pattern, rendered as `-i "<pattern>"`.
    pub filter: Option<String>,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            direction: MirrorDirection::default(),
            remote_dir: ".".to_owned(),
            local_dir: ".".to_owned(),
            parallel: None,
            options: String::new(),
            filter: None,
        }
    }
}

/// Ordered queue of statements plus the escape toggle they are composed with.
#[derive(Clone, Debug)]
pub struct ScriptBuilder {
    commands: Vec<String>,
    escape: bool,
}

impl ScriptBuilder {
    /// Creates an empty builder; `escape` mirrors the settings' toggle.
    #[must_use]
    pub const fn new(escape: bool) -> Self {
        Self {
            commands: Vec::new(),
            escape,
        }
    }

    /// The statements queued so far, in execution order.
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Returns `true` when no statements are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn escape_token<'a>(&self, token: &'a str) -> Cow<'a, str> {
        if self.escape {
            escape::escape(token)
        } else {
            Cow::Borrowed(token)
        }
    }

    /// Queues an arbitrary statement verbatim. Empty input is a no-op.
    pub fn raw(&mut self, command: &str) -> &mut Self {
        if !command.is_empty() {
            self.commands.push(command.to_owned());
        }
        self
    }

    /// Queues every `;`-separated statement of `script`.
    pub fn raw_script(&mut self, script: &str) -> &mut Self {
        for statement in script.split(STATEMENT_SEPARATOR) {
            self.raw(statement);
        }
        self
    }

    /// Queues a directory listing.
    pub fn ls(&mut self) -> &mut Self {
        self.raw("ls")
    }

    /// Queues a print of the remote working directory.
    pub fn pwd(&mut self) -> &mut Self {
        self.raw("pwd")
    }

    /// Queues a change of the remote working directory.
    pub fn cd(&mut self, directory: &str) -> &mut Self {
        let command = format!("cd {}", self.escape_token(directory));
        self.raw(&command)
    }

    /// Queues a read of the remote file at `path`.
    pub fn cat(&mut self, path: &str) -> &mut Self {
        let command = format!("cat {}", self.escape_token(path));
        self.raw(&command)
    }

    /// Queues an upload of `local`, optionally renamed to `remote`.
    /// An empty source path is a no-op.
    pub fn put(&mut self, local: &str, remote: Option<&str>) -> &mut Self {
        if local.is_empty() {
            return self;
        }
        let mut command = format!("put {}", self.escape_token(local));
        if let Some(remote) = remote {
            let _ = write!(command, " -o {}", self.escape_token(remote));
        }
        self.raw(&command)
    }

    /// Queues a download of `remote`, optionally stored as `local`.
    /// An empty source path is a no-op.
    pub fn get(&mut self, remote: &str, local: Option<&str>) -> &mut Self {
        if remote.is_empty() {
            return self;
        }
        let mut command = format!("get {}", self.escape_token(remote));
        if let Some(local) = local {
            let _ = write!(command, " -o {}", self.escape_token(local));
        }
        self.raw(&command)
    }

    /// Queues a rename. A no-op unless both paths are non-empty.
    pub fn mv(&mut self, from: &str, to: &str) -> &mut Self {
        if from.is_empty() || to.is_empty() {
            return self;
        }
        let command = format!("mv {} {}", self.escape_token(from), self.escape_token(to));
        self.raw(&command)
    }

    /// Queues a removal of every path in `paths` as one statement.
    /// A no-op when `paths` is empty.
    pub fn rm<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.remove_with("rm", paths)
    }

    /// Queues a removal of every directory in `paths` as one statement.
    /// A no-op when `paths` is empty.
    pub fn rmdir<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.remove_with("rmdir", paths)
    }

    fn remove_with<I, S>(&mut self, program: &str, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut command = String::from(program);
        let mut any = false;
        for path in paths {
            any = true;
            let _ = write!(command, " {}", self.escape_token(path.as_ref()));
        }
        if any { self.raw(&command) } else { self }
    }

    /// Queues a directory synchronization statement.
    ///
    /// The direction decides the operand order: lftp expects the source
    /// before the destination, so uploads list the local directory first and
    /// downloads the remote one.
    pub fn mirror(&mut self, options: &MirrorOptions) -> &mut Self {
        let mut command = String::from("mirror");
        if options.direction == MirrorDirection::Upload {
            command.push_str(" -R");
        }
        match options.parallel {
            Some(Parallelism::Auto) => command.push_str(" --parallel"),
            Some(Parallelism::Jobs(jobs)) => {
                let _ = write!(command, " --parallel={}", jobs.max(1));
            }
            None => {}
        }
        if !options.options.is_empty() {
            let _ = write!(command, " {}", options.options);
        }
        if let Some(filter) = &options.filter {
            let _ = write!(command, " -i \"{filter}\"");
        }
        let (source, destination) = match options.direction {
            MirrorDirection::Upload => (&options.local_dir, &options.remote_dir),
            MirrorDirection::Download => (&options.remote_dir, &options.local_dir),
        };
        let _ = write!(
            command,
            " {} {}",
            self.escape_token(source),
            self.escape_token(destination)
        );
        self.raw(&command)
    }

    /// Renders the full script without draining the queue.
    ///
    /// Useful for diagnostics and tests; execution entry points use
    /// [`finalize`](Self::finalize) instead.
    #[must_use]
    pub fn preview(&self, settings: &ConnectionSettings) -> String {
        compose(settings, &self.commands)
    }

    /// Renders the full script and drains the queue.
    ///
    /// The queue is emptied before the caller spawns anything, so the builder
    /// is reusable regardless of how the execution turns out.
    pub fn finalize(&mut self, settings: &ConnectionSettings) -> String {
        let commands = mem::take(&mut self.commands);
        let script = compose(settings, &commands);
        trace!(statements = commands.len(), "composed lftp script");
        script
    }
}

/// Renders the connection preamble for `settings`, in execution order.
///
/// The preamble consists of `set` directives for confirmation, key
/// authentication and the retry/backoff knobs, any verbatim extra statements,
/// and finally the `open` directive carrying the credentials.
#[must_use]
pub fn connection_statements(settings: &ConnectionSettings) -> Vec<String> {
    let mut statements = Vec::new();
    let protocol = settings.protocol().to_ascii_lowercase();

    // Only sftp and fish know the auto-confirm setting.
    if settings.auto_confirm() && (protocol == "sftp" || protocol == "fish") {
        statements.push(format!("set {protocol}:auto-confirm yes"));
    }
    // Key authentication is an sftp-only connect-program override.
    if settings.require_ssh_key() && protocol == "sftp" {
        statements.push(format!(
            "set sftp:connect-program \"ssh -a -x -i {}\"",
            settings.ssh_key_path()
        ));
    }
    statements.push(format!("set net:max-retries {}", settings.retries()));
    statements.push(format!("set net:timeout {}", settings.timeout()));
    statements.push(format!(
        "set net:reconnect-interval-base {}",
        settings.retry_interval()
    ));
    statements.push(format!(
        "set net:reconnect-interval-multiplier {}",
        settings.retry_interval_multiplier()
    ));
    if !settings.extra_statements().is_empty() {
        statements.push(settings.extra_statements().to_owned());
    }

    let mut open = String::from("open");
    if !settings.username().is_empty() {
        let _ = write!(
            open,
            " -u \"{}\",\"{}\"",
            settings.escape(settings.username()),
            settings.escape(settings.password())
        );
    }
    let _ = write!(open, " \"{}\"", settings.remote_url());
    statements.push(open);
    statements
}

/// Joins the connection preamble and `commands` into one script string.
#[must_use]
pub fn compose(settings: &ConnectionSettings, commands: &[String]) -> String {
    let mut statements = connection_statements(settings);
    statements.extend(commands.iter().cloned());
    let separator = STATEMENT_SEPARATOR.to_string();
    statements.join(&separator)
}

#[cfg(test)]
mod tests;
