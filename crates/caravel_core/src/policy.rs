//! Error policy for push loops.

use std::io::{self, BufRead, Write};

/// What to do when a remote creation fails with a non-success response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ErrorPolicy {
    /// Continue with the next record, keeping prior progress
    Skip,
    /// Abort the whole push run
    Stop,
    /// Pause and ask the operator whether to continue
    Confirm,
}

/// Resolution of a failed item under an [`ErrorPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Move on to the next record
    Continue,
    /// Abort the run
    Abort,
}

impl ErrorPolicy {
    /// Resolve a failure into an action. `Confirm` blocks on a stdin prompt;
    /// anything other than `y`/`yes` aborts.
    pub fn resolve(&self, context: &str) -> FailureAction {
        match self {
            ErrorPolicy::Skip => FailureAction::Continue,
            ErrorPolicy::Stop => FailureAction::Abort,
            ErrorPolicy::Confirm => {
                eprint!("{context}\nContinue with the next record? [y/N] ");
                let _ = io::stderr().flush();
                let mut answer = String::new();
                if io::stdin().lock().read_line(&mut answer).is_err() {
                    return FailureAction::Abort;
                }
                match answer.trim().to_lowercase().as_str() {
                    "y" | "yes" => FailureAction::Continue,
                    _ => FailureAction::Abort,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_continues() {
        assert_eq!(ErrorPolicy::Skip.resolve("boom"), FailureAction::Continue);
    }

    #[test]
    fn stop_aborts() {
        assert_eq!(ErrorPolicy::Stop.resolve("boom"), FailureAction::Abort);
    }
}
