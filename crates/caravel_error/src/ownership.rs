//! Ownership resolver error types.

/// Kinds of ownership resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum OwnershipErrorKind {
    /// A spreadsheet row matched no pulled video title at all
    #[display("No video title matches spreadsheet row: {}", _0)]
    NoTitleMatch(String),
    /// The spreadsheet could not be read or parsed
    #[display("Spreadsheet unreadable: {}", _0)]
    Spreadsheet(String),
}

/// Ownership resolver error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Ownership Error: {} at line {} in {}", kind, line, file)]
pub struct OwnershipError {
    /// The kind of error that occurred
    pub kind: OwnershipErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl OwnershipError {
    /// Create a new ownership error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: OwnershipErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
