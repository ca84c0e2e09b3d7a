//! Errors the cursor and walker layer can report.
//!
//! Hand-written `Display`/`Error` impls rather than a `thiserror` derive,
//! matching this codebase's existing `SerializeError` (its other
//! fallible-conversion enum has no derive macro either).

use std::fmt;

/// A failure raised while cursoring over or walking a heap value.
#[derive(Debug, Clone, PartialEq)]
pub enum IterError {
    /// A walked value's runtime kind didn't match what the caller
    /// expected at that position (e.g. a `{callback}` structural object
    /// whose `callback` field isn't a function).
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A structural object (`{data,count}` or `{callback}`) was missing
    /// a required field.
    MissingProperty { property: &'static str },
    /// The walker's recursion depth exceeded its configured limit.
    DepthExceeded { limit: usize },
    /// The external interpreter collaborator's `execute_function` call
    /// failed.
    CallbackFailed { message: String },
}

impl fmt::Display for IterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterError::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            IterError::MissingProperty { property } => {
                write!(f, "missing required property '{property}'")
            }
            IterError::DepthExceeded { limit } => {
                write!(f, "walker recursion depth exceeded limit of {limit}")
            }
            IterError::CallbackFailed { message } => {
                write!(f, "callback execution failed: {message}")
            }
        }
    }
}

impl std::error::Error for IterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_human_readable() {
        let err = IterError::TypeMismatch {
            expected: "function",
            found: "string",
        };
        assert_eq!(err.to_string(), "expected function, found string");

        let err = IterError::MissingProperty { property: "count" };
        assert_eq!(err.to_string(), "missing required property 'count'");

        let err = IterError::DepthExceeded { limit: 32 };
        assert_eq!(
            err.to_string(),
            "walker recursion depth exceeded limit of 32"
        );
    }
}
