#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `oc-lftp-script` holds the string side of the lftp driver: connection
//! settings, backslash escaping and the ordered statement queue that becomes
//! the `-c` script passed to the external binary. The crate performs no
//! process I/O; everything here is deterministic and unit-testable.
//!
//! # Design
//!
//! - [`settings`] resolves caller-supplied options into an immutable
//!   [`ConnectionSettings`] value, applying defaults, validating field
//!   combinations and normalizing the endpoint URL.
//! - [`escape`] prefixes a backslash to shell metacharacters so path and
//!   credential tokens cannot break out of the composed statement.
//! - [`script`] queues statements in insertion order and joins the connection
//!   preamble with the queue into one `;`-separated script.
//!
//! # Invariants
//!
//! - [`ConnectionSettings`] never changes after [`SettingsBuilder::build`];
//!   the retry and backoff fields are forwarded to lftp verbatim and the
//!   library never retries on its own.
//! - Queued statements keep their insertion order; lftp executes the script
//!   sequentially, so reordering would change transfer semantics.
//! - [`ScriptBuilder::finalize`] drains the queue before anything is spawned,
//!   which keeps the builder reusable whatever happens to the child process.
//!
//! # Errors
//!
//! The only fallible operation is [`SettingsBuilder::build`], which returns
//! [`SettingsError`] for missing hosts, missing passwords and missing key
//! paths. Composition itself cannot fail.
//!
//! # Examples
//!
//! ```
//! use oc_lftp_script::{ConnectionSettings, ScriptBuilder};
//!
//! let settings = ConnectionSettings::builder("example.test")
//!     .username("backup")
//!     .password("secret")
//!     .protocol("sftp")
//!     .port(2222)
//!     .build()?;
//! assert_eq!(settings.remote_url(), "sftp://example.test:2222");
//!
//! let mut builder = ScriptBuilder::new(settings.escape_enabled());
//! let script = builder.cd("/incoming").put("report.csv", None).finalize(&settings);
//! assert!(script.ends_with("cd /incoming;put report.csv"));
//! assert!(builder.is_empty());
//! # Ok::<(), oc_lftp_script::SettingsError>(())
//! ```

pub mod escape;
pub mod script;
pub mod settings;

pub use escape::escape;
pub use script::{
    MirrorDirection, MirrorOptions, Parallelism, STATEMENT_SEPARATOR, ScriptBuilder, compose,
    connection_statements,
};
pub use settings::{ConnectionSettings, SettingsBuilder, SettingsError};
