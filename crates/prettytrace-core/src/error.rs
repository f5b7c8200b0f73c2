//! The error taxonomy surfaced by the formatting facade.

use thiserror::Error;

/// Errors a formatting entry point can surface.
///
/// Display failures and terminal-capability probe failures are never
/// represented here; both are recovered locally (placeholder text,
/// "not a terminal") by design.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The last-error accessors were used before any unhandled error was
    /// recorded.
    #[error("no last error has been recorded")]
    NoLastError,

    /// Exactly one of the legacy `(value, tb)` pair was supplied.
    #[error("both or neither of value and trace must be given")]
    MalformedArguments,

    /// A write/print destination failed.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}
