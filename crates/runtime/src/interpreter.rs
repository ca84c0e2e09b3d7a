//! External collaborators the walker calls out to.
//!
//! The walker does not itself know how to execute a `{callback}`
//! structural object's `callback` field — that is the embedding
//! interpreter's job. [`Interpreter`] is the seam: anything that can run
//! a `Function` value against a slice of `Value` arguments and hand back
//! a result.

use tracing::warn;
use varheap_core::Value;

use crate::error::set_runtime_error;
use crate::iter_error::IterError;

/// Runs a heap-resident function value.
///
/// Implemented by the embedding interpreter; this crate only calls it
/// from the callback walker's `{callback}` structural-object case.
pub trait Interpreter {
    fn execute_function(&self, function: &Value, args: &[Value]) -> Result<Value, IterError>;
}

/// Reports a type error through the thread-local last-error slot and
/// returns the corresponding [`IterError`], so callers can both set the
/// conventional error-collaborator state and propagate a `Result`.
pub fn raise_type_error(expected: &'static str, found: &'static str) -> IterError {
    let err = IterError::TypeMismatch { expected, found };
    warn!(expected, found, "type error during iteration");
    set_runtime_error(err.to_string());
    err
}
