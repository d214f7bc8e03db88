//! JSON error types.

/// A wire payload or persisted record that could not be serialized or
/// deserialized.
///
/// Raised when an API response is missing an expected field, when a pulled
/// record does not match its schema, and when migration state cannot be
/// rendered back to JSON.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a new JsonError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use caravel_error::JsonError;
    ///
    /// let err = JsonError::new("POST /videos/upload: response missing video.uuid");
    /// assert!(err.message.contains("video.uuid"));
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
