//! Failure taxonomy and the terminating failure path.
//!
//! Every check in this crate returns `Result<_, Failure>`. Only the exported
//! C entry points turn an `Err` into process termination, through
//! [`terminate`]. Nothing here unwinds, so a host has nothing to catch.

use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

/// Exit status used for every assertion failure, panic and invalid argument.
pub const EXIT_STATUS: i32 = 1;

/// A failure reported by a runtime primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// Two compared values differ. Operands hold their rendered bytes.
    #[error("assertion failed, {} != {}", lossy(.lhs), lossy(.rhs))]
    AssertionMismatch { lhs: Vec<u8>, rhs: Vec<u8> },

    /// The host requested an unconditional abort.
    #[error("panic")]
    ExplicitPanic,

    /// A string argument was null or otherwise unusable.
    #[error("invalid argument: {operation}: {reason}")]
    InvalidArgument {
        operation: &'static str,
        reason: &'static str,
    },
}

/// Coarse classification of a [`Failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    AssertionMismatch,
    ExplicitPanic,
    InvalidArgument,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailureKind::AssertionMismatch => write!(f, "assertion mismatch"),
            FailureKind::ExplicitPanic => write!(f, "explicit panic"),
            FailureKind::InvalidArgument => write!(f, "invalid argument"),
        }
    }
}

fn lossy(bytes: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

impl Failure {
    pub fn mismatch(lhs: impl Into<Vec<u8>>, rhs: impl Into<Vec<u8>>) -> Self {
        Failure::AssertionMismatch {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    pub fn invalid(operation: &'static str, reason: &'static str) -> Self {
        Failure::InvalidArgument { operation, reason }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::AssertionMismatch { .. } => FailureKind::AssertionMismatch,
            Failure::ExplicitPanic => FailureKind::ExplicitPanic,
            Failure::InvalidArgument { .. } => FailureKind::InvalidArgument,
        }
    }

    /// Write the one-line diagnostic for this failure.
    ///
    /// Unlike `Display`, string operands are written as their exact bytes.
    pub fn report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            Failure::AssertionMismatch { lhs, rhs } => {
                out.write_all(b"assertion failed, ")?;
                out.write_all(lhs)?;
                out.write_all(b" != ")?;
                out.write_all(rhs)?;
                out.write_all(b"\n")?;
            }
            other => writeln!(out, "{}", other)?,
        }
        out.flush()
    }
}

/// Report `failure` on standard output and exit with [`EXIT_STATUS`].
pub fn terminate(failure: Failure) -> ! {
    log::debug!("terminating process ({}): {}", failure.kind(), failure);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = failure.report(&mut out) {
        log::warn!("failed to report failure: {}", e);
    }

    std::process::exit(EXIT_STATUS)
}

/// Unwrap a primitive's result, terminating the process on failure.
pub(crate) fn or_terminate<T>(result: Result<T, Failure>) -> T {
    match result {
        Ok(value) => value,
        Err(failure) => terminate(failure),
    }
}
