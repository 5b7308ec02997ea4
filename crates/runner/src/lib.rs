#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `oc-lftp-runner` owns the child-process side of the lftp driver: spawning
//! the external binary with a composed `-c` script, draining its output and
//! reporting completion. The crate knows nothing about statement composition;
//! it receives finished script strings from `oc-lftp-script`.
//!
//! # Design
//!
//! - [`runner`] spawns one child per execution. Background reader threads
//!   drain stdout and stderr into one-shot channels and [`ExecHandle::wait`]
//!   consumes the handle, so completion is delivered at most once by
//!   construction.
//! - [`stream`] exposes the child as a read/write byte stream instead,
//!   without any capture on this side; the child's stderr is inherited so
//!   diagnostics cannot back up an undrained pipe.
//!
//! # Invariants
//!
//! - Exactly one child process per [`Runner::spawn`] or [`Runner::stream`]
//!   call; the crate never pools or supervises processes.
//! - Capture is unbounded; output accumulates for the child's lifetime.
//! - The child's exit or an I/O error on its pipes is the only completion
//!   signal. Timeouts are lftp's business (`net:timeout`), not this crate's.
//!
//! # Errors
//!
//! [`RunnerError`] distinguishes spawn failures (the process never existed),
//! capture failures (a pipe could not be read) and wait failures (the exit
//! status could not be collected). A non-zero exit is not an error at this
//! layer: it is reported through [`ExecOutput::status`], with any stderr text
//! in [`ExecOutput::errors`].
//!
//! # Examples
//!
//! ```no_run
//! use oc_lftp_runner::Runner;
//!
//! let runner = Runner::new();
//! let output = runner.spawn("set net:timeout 10;open \"ftp://example.test\";ls")?.wait()?;
//! println!("{}", output.data);
//! # Ok::<(), oc_lftp_runner::RunnerError>(())
//! ```

pub mod runner;
pub mod stream;

pub use runner::{DEFAULT_PROGRAM, ExecHandle, ExecOutput, Runner, RunnerError, SCRIPT_FLAG};
pub use stream::{LftpStream, StreamChild, StreamReader, StreamWriter};
