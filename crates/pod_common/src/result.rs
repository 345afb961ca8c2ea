//! Result type for operations that can only fail on an internal bug.

/// Result of an operation whose only failure mode is a broken internal invariant.
///
/// User mistakes (bad wiring, misaligned bases) have their own error enums in
/// the crates that detect them; `InternalError` is reserved for states the
/// netlist should never reach, such as a dangling arena id.
pub type PodResult<T> = Result<T, InternalError>;

/// A bug in pod rather than a problem with the user's design.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// What went wrong.
    pub message: String,
}

impl InternalError {
    /// Creates an internal error with the given message.
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
