//! Push pipeline error types.

/// A resource references a parent that has no destination counterpart.
///
/// A comment cannot exist without its video and author; this error is never
/// skippable and aborts the push run.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Dependency Error: {} {} requires unresolved {} at line {} in {}",
    resource,
    source_id,
    dependency,
    line,
    file
)]
pub struct DependencyError {
    /// Kind of the resource being pushed (e.g. "comment")
    pub resource: &'static str,
    /// Source id of the resource being pushed
    pub source_id: String,
    /// Description of the missing dependency
    pub dependency: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl DependencyError {
    /// Create a new DependencyError at the current location.
    #[track_caller]
    pub fn new(
        resource: &'static str,
        source_id: impl Into<String>,
        dependency: impl Into<String>,
    ) -> Self {
        let location = std::panic::Location::caller();
        Self {
            resource,
            source_id: source_id.into(),
            dependency: dependency.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
