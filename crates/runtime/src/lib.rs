//! varheap-runtime: the cursor and callback-walker iteration layer over
//! the varheap-core cell substrate.
//!
//! This crate does not allocate or own cells — it only walks them. Four
//! cursor shapes (string-chain, object-children, full-array, typed-view)
//! are unified under [`unified_cursor::UnifiedCursor`], which the
//! callback [`walker::Walker`] recurses through to flatten any heap
//! value down to a sequence of numeric leaves.
//!
//! # Modules
//!
//! - `string_cursor`: byte-granular cursor over a string's cell chain.
//! - `object_cursor`: cursor over a container's named child-slot list.
//! - `full_array_cursor`: dense logical-index overlay atop a sparse
//!   array container's child-slot backing.
//! - `typed_view_cursor`: element-granular cursor over a typed-array
//!   view, decoding signed/unsigned/float elements in either byte order.
//! - `unified_cursor`: the tagged union of the four cursor shapes above.
//! - `walker`: the recursive callback walker and its two derived sinks.
//! - `interpreter`: the `Interpreter` collaborator trait the walker
//!   calls out to for `{callback}` thunks.
//! - `error`: thread-local last-error slot.
//! - `iter_error`: the `IterError` type cursor and walker operations
//!   return.
//! - `config`: tunable walker limits.

pub mod config;
pub mod error;
pub mod full_array_cursor;
pub mod interpreter;
pub mod iter_error;
pub mod object_cursor;
pub mod string_cursor;
pub mod typed_view_cursor;
pub mod unified_cursor;
pub mod walker;

pub use config::WalkerConfig;
pub use error::{clear_runtime_error, has_runtime_error, set_runtime_error, take_runtime_error};
pub use full_array_cursor::FullArrayCursor;
pub use interpreter::{raise_type_error, Interpreter};
pub use iter_error::IterError;
pub use object_cursor::{append_child, ObjectCursor};
pub use string_cursor::StringCursor;
pub use typed_view_cursor::TypedViewCursor;
pub use unified_cursor::UnifiedCursor;
pub use walker::{Sink, Walker};
