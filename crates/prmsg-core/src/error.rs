use thiserror::Error;

/// Error taxonomy for page extraction and message injection.
///
/// All variants are terminal to the initiating call chain only; the polling
/// loops log them and keep monitoring.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnhancerError {
    #[error("unable to find {0}")]
    NotFound(String),
    #[error("timed out after {waited_ms}ms waiting for {what}")]
    Timeout { what: String, waited_ms: u64 },
    #[error("unable to find merge commit message field")]
    FieldNotFound,
}

impl EnhancerError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn timeout(what: impl Into<String>, waited_ms: u64) -> Self {
        Self::Timeout {
            what: what.into(),
            waited_ms,
        }
    }
}
