//! Identity mapping error types.

/// Kinds of mapping store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MappingErrorKind {
    /// No destination id recorded for the given source id
    #[display("No mapping for source id: {}", _0)]
    NotFound(String),
    /// The mapping file could not be read or parsed
    #[display("Mapping table unreadable: {}", _0)]
    Corrupt(String),
    /// The mapping file could not be persisted
    #[display("Mapping table write failed: {}", _0)]
    Persist(String),
}

/// Identity mapping error with location tracking.
///
/// # Examples
///
/// ```
/// use caravel_error::{MappingError, MappingErrorKind};
///
/// let err = MappingError::new(MappingErrorKind::NotFound("abc123".to_string()));
/// assert!(format!("{}", err).contains("abc123"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Mapping Error: {} at line {} in {}", kind, line, file)]
pub struct MappingError {
    /// The kind of error that occurred
    pub kind: MappingErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MappingError {
    /// Create a new mapping error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MappingErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
