//! Remote API error types.

/// Non-success response from a remote API.
///
/// Carries the HTTP status and the raw response body so that every failed
/// item can be reported with enough context for manual retry.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("API Error: {} returned {}: {} at line {} in {}", endpoint, status, body, line, file)]
pub struct ApiError {
    /// The endpoint that produced the response
    pub endpoint: String,
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ApiError {
    /// Create a new ApiError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use caravel_error::ApiError;
    ///
    /// let err = ApiError::new("/users", 409, "username already exists");
    /// assert_eq!(err.status, 409);
    /// ```
    #[track_caller]
    pub fn new(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
