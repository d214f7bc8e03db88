//! Configuration error types.

/// A migration configuration that cannot be used as given.
///
/// Covers an unreadable or unparsable config file and credentials missing
/// from the environment. Raised at startup only: a run never begins with a
/// broken configuration, so these never surface mid-migration.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use caravel_error::ConfigError;
    ///
    /// let err = ConfigError::new("CARAVEL_DEST_PASSWORD must be set");
    /// assert!(err.message.contains("must be set"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
