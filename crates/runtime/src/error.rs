//! Thread-local last-error slot.
//!
//! The callback walker's error collaborator (see [`crate::interpreter`])
//! reports type errors by calling [`set_runtime_error`] rather than
//! panicking, so a walk that hits a type mismatch deep in a nested
//! structure can unwind cleanly back to a `Result` at the walker's own
//! boundary. This mirrors the thread-local error slot used elsewhere in
//! this codebase for FFI-safe error reporting; the FFI-facing C string
//! wrappers are dropped here since this crate has no FFI boundary of its
//! own, but the underlying thread-local mechanism is unchanged.

use std::cell::RefCell;

thread_local! {
    /// Thread-local storage for the last runtime error message.
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Set the last runtime error message.
pub fn set_runtime_error(msg: impl Into<String>) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = Some(msg.into());
    });
}

/// Take (and clear) the last runtime error message.
pub fn take_runtime_error() -> Option<String> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

/// Check if there's a pending runtime error.
pub fn has_runtime_error() -> bool {
    LAST_ERROR.with(|e| e.borrow().is_some())
}

/// Clear any pending runtime error.
pub fn clear_runtime_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
}

/// Format a panic payload into an error message, for the rare case a
/// collaborator panics instead of returning an error.
pub fn format_panic_payload(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_take_error() {
        clear_runtime_error();
        assert!(!has_runtime_error());

        set_runtime_error("test error");
        assert!(has_runtime_error());

        let error = take_runtime_error();
        assert_eq!(error, Some("test error".to_string()));
        assert!(!has_runtime_error());
    }

    #[test]
    fn clear_error() {
        set_runtime_error("another error");
        assert!(has_runtime_error());

        clear_runtime_error();
        assert!(!has_runtime_error());
        assert!(take_runtime_error().is_none());
    }

    #[test]
    fn format_panic_payload_handles_str_and_string() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("panic message");
        assert_eq!(format_panic_payload(&*payload), "panic message");

        let payload: Box<dyn std::any::Any + Send> = Box::new("owned panic".to_string());
        assert_eq!(format_panic_payload(&*payload), "owned panic");
    }
}
