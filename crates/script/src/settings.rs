//! Connection settings resolution and validation.
//!
//! Callers describe a connection through [`SettingsBuilder`], which applies
//! lftp-compatible defaults, validates the combination of fields and
//! normalizes the endpoint into a `protocol://host[:port]` URL. The resulting
//! [`ConnectionSettings`] value is immutable: every later composition step
//! reads the same resolved configuration.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::escape;

/// Errors rejected while resolving a [`SettingsBuilder`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum SettingsError {
    /// No host was supplied, or the supplied host was empty.
    #[error("a remote host is required")]
    MissingHost,
    /// A username was supplied, passwords are required, and none was given.
    ///
    /// Anonymous access (empty username) and explicit
    /// [`SettingsBuilder::requires_password`] opt-outs both skip this check.
    #[error("a password is required when a username is set")]
    MissingPassword,
    /// Key authentication was requested without a key file path.
    #[error("an ssh key path is required when key authentication is requested")]
    MissingKeyPath,
}

/// Resolved, immutable connection configuration.
///
/// Built through [`ConnectionSettings::builder`]; the retry, interval and
/// timeout fields are advisory values forwarded verbatim to lftp's `net:*`
/// settings, the library itself never retries.
#[derive(Clone, Debug)]
pub struct ConnectionSettings {
    remote_url: String,
    protocol: String,
    username: String,
    password: String,
    escape: bool,
    retries: u32,
    timeout: u32,
    retry_interval: u32,
    retry_interval_multiplier: u32,
    auto_confirm: bool,
    working_dir: Option<PathBuf>,
    extra_statements: String,
    require_ssh_key: bool,
    ssh_key_path: String,
}

impl ConnectionSettings {
    /// Starts a builder for the given host.
    pub fn builder(host: impl Into<String>) -> SettingsBuilder {
        SettingsBuilder::new(host)
    }

    /// The normalized `protocol://host[:port]` endpoint.
    #[must_use]
    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    /// The transfer protocol as supplied (defaults to `ftp`).
    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// The connecting identity; empty for anonymous access.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password paired with [`username`](Self::username).
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Whether token escaping is enabled for composed statements.
    #[must_use]
    pub const fn escape_enabled(&self) -> bool {
        self.escape
    }

    /// Maximum connection attempts forwarded to `net:max-retries`.
    #[must_use]
    pub const fn retries(&self) -> u32 {
        self.retries
    }

    /// Connection attempt timeout in seconds, forwarded to `net:timeout`.
    #[must_use]
    pub const fn timeout(&self) -> u32 {
        self.timeout
    }

    /// Seconds between reconnection attempts (`net:reconnect-interval-base`).
    #[must_use]
    pub const fn retry_interval(&self) -> u32 {
        self.retry_interval
    }

    /// Backoff multiplier (`net:reconnect-interval-multiplier`).
    #[must_use]
    pub const fn retry_interval_multiplier(&self) -> u32 {
        self.retry_interval_multiplier
    }

    /// Whether the remote host key / certificate is accepted automatically.
    #[must_use]
    pub const fn auto_confirm(&self) -> bool {
        self.auto_confirm
    }

    /// Working directory for the spawned process, when overridden.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Extra `;`-separated statements appended verbatim to the preamble.
    #[must_use]
    pub fn extra_statements(&self) -> &str {
        &self.extra_statements
    }

    /// Whether SFTP connections authenticate with a key file.
    #[must_use]
    pub const fn require_ssh_key(&self) -> bool {
        self.require_ssh_key
    }

    /// Path to the key file used when key authentication is requested.
    #[must_use]
    pub fn ssh_key_path(&self) -> &str {
        &self.ssh_key_path
    }

    /// Escapes `token` according to the settings' escape toggle.
    ///
    /// Identity when escaping was disabled at build time.
    #[must_use]
    pub fn escape<'a>(&self, token: &'a str) -> Cow<'a, str> {
        if self.escape {
            escape::escape(token)
        } else {
            Cow::Borrowed(token)
        }
    }
}

/// Builder collecting connection fields before validation.
///
/// Every field except the host is optional and carries the default listed on
/// its setter. [`build`](Self::build) validates the combination and resolves
/// the endpoint URL.
#[derive(Clone, Debug)]
pub struct SettingsBuilder {
    host: String,
    username: String,
    password: String,
    protocol: String,
    port: Option<u16>,
    escape: bool,
    retries: u32,
    timeout: u32,
    retry_interval: u32,
    retry_interval_multiplier: u32,
    requires_password: bool,
    auto_confirm: bool,
    working_dir: Option<PathBuf>,
    extra_statements: String,
    require_ssh_key: bool,
    ssh_key_path: String,
}

impl SettingsBuilder {
    /// Creates a builder for `host` with lftp-compatible defaults.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: String::new(),
            password: String::new(),
            protocol: "ftp".to_owned(),
            port: None,
            escape: true,
            // lftp retries forever by default; cap that here.
            retries: 1,
            timeout: 10,
            retry_interval: 5,
            retry_interval_multiplier: 1,
            requires_password: true,
            auto_confirm: false,
            working_dir: None,
            extra_statements: String::new(),
            require_ssh_key: false,
            ssh_key_path: String::new(),
        }
    }

    /// Sets the connecting identity. Empty (the default) means anonymous.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Sets the password paired with the username.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Sets the transfer protocol (`ftp`, `sftp`, `ftps`, `fish`, ...).
    /// Defaults to `ftp`.
    #[must_use]
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Sets an explicit port, appended to the endpoint URL.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Enables or disables token escaping. Defaults to enabled.
    #[must_use]
    pub const fn escape(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    /// Sets `net:max-retries`. Defaults to 1 (no retries); 0 retries forever.
    #[must_use]
    pub const fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Sets `net:timeout` in seconds. Defaults to 10.
    #[must_use]
    pub const fn timeout(mut self, timeout: u32) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets `net:reconnect-interval-base` in seconds. Defaults to 5.
    #[must_use]
    pub const fn retry_interval(mut self, interval: u32) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Sets `net:reconnect-interval-multiplier`. Defaults to 1.
    #[must_use]
    pub const fn retry_interval_multiplier(mut self, multiplier: u32) -> Self {
        self.retry_interval_multiplier = multiplier;
        self
    }

    /// Controls whether a username requires a password. Defaults to `true`;
    /// disable for servers that accept a bare identity.
    #[must_use]
    pub const fn requires_password(mut self, requires_password: bool) -> Self {
        self.requires_password = requires_password;
        self
    }

    /// Accepts the remote host key / certificate automatically. Only honoured
    /// by protocols with an `auto-confirm` setting (sftp, fish).
    #[must_use]
    pub const fn auto_confirm(mut self, auto_confirm: bool) -> Self {
        self.auto_confirm = auto_confirm;
        self
    }

    /// Runs the spawned process from the given directory instead of the
    /// caller's current directory.
    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Appends extra `;`-separated statements to the connection preamble,
    /// passed through verbatim.
    #[must_use]
    pub fn extra_statements(mut self, statements: impl Into<String>) -> Self {
        self.extra_statements = statements.into();
        self
    }

    /// Authenticates SFTP connections with the key file at `path`.
    #[must_use]
    pub fn ssh_key(mut self, path: impl Into<String>) -> Self {
        self.require_ssh_key = true;
        self.ssh_key_path = path.into();
        self
    }

    /// Validates the collected fields and resolves the endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingHost`] for an empty host,
    /// [`SettingsError::MissingPassword`] when a username is set, passwords
    /// are required and none was given, and [`SettingsError::MissingKeyPath`]
    /// when key authentication was requested without a path.
    pub fn build(self) -> Result<ConnectionSettings, SettingsError> {
        if self.host.is_empty() {
            return Err(SettingsError::MissingHost);
        }
        if !self.username.is_empty() && self.requires_password && self.password.is_empty() {
            return Err(SettingsError::MissingPassword);
        }
        if self.require_ssh_key && self.ssh_key_path.is_empty() {
            return Err(SettingsError::MissingKeyPath);
        }

        let scheme = format!("{}://", self.protocol);
        let mut remote_url = if self.host.starts_with(&scheme) {
            self.host
        } else {
            format!("{scheme}{}", self.host)
        };
        if let Some(port) = self.port {
            remote_url.push(':');
            remote_url.push_str(&port.to_string());
        }

        Ok(ConnectionSettings {
            remote_url,
            protocol: self.protocol,
            username: self.username,
            password: self.password,
            escape: self.escape,
            retries: self.retries,
            timeout: self.timeout,
            retry_interval: self.retry_interval,
            retry_interval_multiplier: self.retry_interval_multiplier,
            auto_confirm: self.auto_confirm,
            working_dir: self.working_dir,
            extra_statements: self.extra_statements,
            require_ssh_key: self.require_ssh_key,
            ssh_key_path: self.ssh_key_path,
        })
    }
}
