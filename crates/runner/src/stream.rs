//! Stream-mode access to a spawned transfer process.
//!
//! [`LftpStream`] wraps the child with piped stdin/stdout and exposes it as
//! a read/write byte stream: writes go to the child's stdin, reads come
//! from its stdout. The child's stderr is inherited from the parent, so
//! diagnostics stay visible and can never back up an undrained pipe.
//! Nothing is buffered on this side; errors surface as [`io::Error`] values
//! from the stream operations themselves.

use std::io::{self, Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, ExitStatus};

/// Owns a streaming transfer subprocess and its stdio handles.
#[derive(Debug)]
pub struct LftpStream {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<ChildStdout>,
}

impl LftpStream {
    pub(crate) const fn new(child: Child, stdin: ChildStdin, stdout: ChildStdout) -> Self {
        Self {
            child,
            stdin: Some(stdin),
            stdout: Some(stdout),
        }
    }

    /// Flushes and closes the stdin pipe, signalling EOF to the subprocess.
    pub fn close_stdin(&mut self) -> io::Result<()> {
        if let Some(mut stdin) = self.stdin.take() {
            stdin.flush()?;
        }
        Ok(())
    }

    /// Attempts to retrieve the subprocess exit status without blocking.
    pub fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    /// Closes stdin and waits for the subprocess to exit, consuming the
    /// stream.
    pub fn wait(mut self) -> io::Result<ExitStatus> {
        self.close_stdin()?;
        self.child.wait()
    }

    /// Splits the stream into separate read and write halves.
    ///
    /// This consumes the stream and returns the reader (child stdout), the
    /// writer (child stdin) and an owned handle for reaping the child.
    ///
    /// # Errors
    ///
    /// Fails with [`io::ErrorKind::BrokenPipe`] when stdin or stdout has
    /// already been closed or taken.
    pub fn split(mut self) -> io::Result<(StreamReader, StreamWriter, StreamChild)> {
        let stdin = self.stdin.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "stdin has already been closed")
        })?;
        let stdout = self.stdout.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "stdout has already been taken")
        })?;

        Ok((
            StreamReader { stdout },
            StreamWriter { stdin },
            StreamChild { child: self.child },
        ))
    }
}

impl Read for LftpStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.stdout.as_mut() {
            Some(stdout) => stdout.read(buf),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "stdout has already been taken",
            )),
        }
    }
}

impl Write for LftpStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.stdin.as_mut() {
            Some(stdin) => stdin.write(buf),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "stdin has already been closed",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.stdin.as_mut() {
            Some(stdin) => stdin.flush(),
            None => Ok(()),
        }
    }
}

/// Read half of a streaming transfer (child stdout).
#[derive(Debug)]
pub struct StreamReader {
    stdout: ChildStdout,
}

impl Read for StreamReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdout.read(buf)
    }
}

/// Write half of a streaming transfer (child stdin).
#[derive(Debug)]
pub struct StreamWriter {
    stdin: ChildStdin,
}

impl Write for StreamWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdin.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdin.flush()
    }
}

impl StreamWriter {
    /// Flushes and closes the stdin pipe, signalling EOF to the subprocess.
    pub fn close(mut self) -> io::Result<()> {
        self.stdin.flush()
    }
}

/// Handle for reaping a split streaming subprocess.
#[derive(Debug)]
pub struct StreamChild {
    child: Child,
}

impl StreamChild {
    /// Attempts to retrieve the subprocess exit status without blocking.
    pub fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    /// Waits for the subprocess to exit.
    pub fn wait(mut self) -> io::Result<ExitStatus> {
        self.child.wait()
    }
}
