//! HTTP error types.

/// A request that never produced a usable response.
///
/// Wraps transport-level failures (connection refused, timeout, a media
/// download cut short) as distinct from [`crate::ApiError`], where the
/// remote answered but with a non-success status.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", message, line, file)]
pub struct HttpError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create a new HttpError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use caravel_error::HttpError;
    ///
    /// let err = HttpError::new("GET https://files.example.org/abc: connection reset");
    /// assert!(err.message.contains("connection reset"));
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
