//! Common result and error types for the Kairo toolkit.

/// The standard result type for fallible internal operations.
///
/// `Ok` contains the result value. `Err` indicates an unrecoverable internal
/// error (a bug in Kairo), not a user-facing error. User errors are reported
/// through [`DiagnosticSink`](kairo_diagnostics) and the operation still
/// returns `Ok` or an ordinary typed error.
pub type KairoResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in Kairo, not a user input problem.
///
/// These errors should never occur during normal operation. If one does occur,
/// it means there is a logic error in the toolkit that should be fixed.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
