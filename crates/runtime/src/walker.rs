//! The callback walker: recursively flattens any heap value down to a
//! sequence of numeric leaves, dispatching two structural object shapes
//! along the way:
//!
//! * `{callback}` — if `callback` is present and is a function, invoke it
//!   via the [`Interpreter`] collaborator with no arguments, then walk
//!   whatever it returns. Takes precedence over `{data,count}` even if
//!   both are present on the same object.
//! * `{data, count}` — walk `data` `count` times in a row (a compact
//!   repetition, rather than materializing `count` copies on the heap).
//!
//! Arrays and typed-array views are walked structurally: arrays recurse
//! into their elements, strings yield one numeric leaf per byte,
//! typed-array views yield one decoded element per leaf. A plain object —
//! one with neither a `{callback}` nor a `{data,count}` shape — is a type
//! error: objects are never flattened by their own properties. A function
//! or getter/setter reaching the walker directly (not wrapped in a
//! `{callback}` object) is likewise a type error: the walker can only
//! invoke a function through the `{callback}` protocol.
//!
//! Two sinks are built on top of the walk: [`Walker::count`] (how many
//! leaves would be produced) and [`Walker::to_bytes`] (truncate each
//! leaf to a byte and pack them into a caller-provided buffer).

use tracing::warn;
use varheap_core::{CellHandle, ChunkSizes, Value};

use crate::full_array_cursor::FullArrayCursor;
use crate::interpreter::{raise_type_error, Interpreter};
use crate::iter_error::IterError;
use crate::object_cursor::ObjectCursor;
use crate::string_cursor::StringCursor;
use crate::typed_view_cursor::TypedViewCursor;
use crate::config::WalkerConfig;

/// A sink that consumes each numeric leaf the walker produces.
pub trait Sink {
    fn accept(&mut self, value: Value) -> Result<(), IterError>;
}

impl<F: FnMut(Value) -> Result<(), IterError>> Sink for F {
    fn accept(&mut self, value: Value) -> Result<(), IterError> {
        self(value)
    }
}

enum Structural {
    Repeat { data: Value, count: u64 },
    Callback { callback: Value },
    Plain,
}

/// Classifies a plain-object container as a `{callback}` thunk, a
/// `{data,count}` repeat, or neither. A `callback` field that is itself a
/// function is checked first and takes precedence even over an object
/// that also carries `data`/`count` — matching a function-typed
/// `callback` winning before `count`/`data` are ever consulted.
fn classify(container: &CellHandle) -> Structural {
    let mut data = None;
    let mut count = None;
    let mut callback = None;

    let mut cursor = ObjectCursor::new(container.lock_again());
    while cursor.has_value() {
        let key = cursor.get_key().expect("has_value implies a key");
        let value = cursor.get_value().expect("has_value implies a value");
        match key.as_str() {
            "data" => data = Some(value),
            "count" => count = Some(value),
            "callback" => callback = Some(value),
            _ => {}
        }
        cursor.next();
    }

    if let Some(callback) = &callback {
        if callback.is_function() {
            return Structural::Callback {
                callback: callback.clone(),
            };
        }
    }
    if let (Some(data), Some(count)) = (data, count) {
        if let Some(n) = count.as_i64() {
            return Structural::Repeat {
                data,
                count: n.max(0) as u64,
            };
        }
    }
    if let Some(callback) = callback {
        return Structural::Callback { callback };
    }
    Structural::Plain
}

/// Recursively flattens heap values, calling out to an [`Interpreter`]
/// for `{callback}` thunks.
pub struct Walker<'a, I: Interpreter> {
    config: WalkerConfig,
    sizes: ChunkSizes,
    interpreter: &'a I,
}

impl<'a, I: Interpreter> Walker<'a, I> {
    pub fn new(config: WalkerConfig, sizes: ChunkSizes, interpreter: &'a I) -> Self {
        Self {
            config,
            sizes,
            interpreter,
        }
    }

    /// Walks `value`, calling `sink` once per numeric leaf produced.
    pub fn walk(&self, value: &Value, sink: &mut dyn Sink) -> Result<(), IterError> {
        self.walk_depth(value, 0, sink)
    }

    fn walk_depth(&self, value: &Value, depth: usize, sink: &mut dyn Sink) -> Result<(), IterError> {
        if depth > self.config.max_depth {
            warn!(limit = self.config.max_depth, "walker recursion depth exceeded");
            return Err(IterError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }

        match value {
            Value::Int(_) | Value::Float(_) => sink.accept(value.clone()),
            Value::String(head) => {
                let mut cursor = StringCursor::new(head.lock_again(), self.sizes);
                while cursor.has_char() {
                    let byte = cursor.get_char().expect("has_char implies a byte");
                    sink.accept(Value::Int(i64::from(byte)))?;
                    cursor.next();
                }
                Ok(())
            }
            Value::TypedArrayView(view) => {
                let mut cursor = TypedViewCursor::new(view, self.sizes);
                while cursor.has_element() {
                    let element = cursor
                        .get_value(false)
                        .expect("has_element implies a value");
                    sink.accept(element)?;
                    cursor.next();
                }
                Ok(())
            }
            Value::Array(container) => {
                let mut cursor = FullArrayCursor::new(container.lock_again());
                while cursor.has_value() {
                    let element = cursor.get_value();
                    self.walk_depth(&element, depth + 1, sink)?;
                    cursor.next();
                }
                Ok(())
            }
            Value::Object(container) => self.walk_object(container, depth, sink),
            Value::Function(_) | Value::GetterSetter(_) => {
                Err(raise_type_error("iterable value", "function or getter/setter"))
            }
        }
    }

    fn walk_object(
        &self,
        container: &CellHandle,
        depth: usize,
        sink: &mut dyn Sink,
    ) -> Result<(), IterError> {
        match classify(container) {
            Structural::Repeat { data, count } => {
                for _ in 0..count {
                    self.walk_depth(&data, depth + 1, sink)?;
                }
                Ok(())
            }
            Structural::Callback { callback } => {
                let result = self.interpreter.execute_function(&callback, &[])?;
                self.walk_depth(&result, depth + 1, sink)
            }
            Structural::Plain => Err(raise_type_error("{data,count} or {callback}", "object")),
        }
    }

    /// Counts how many numeric leaves a full walk of `value` would
    /// produce, without retaining any of them.
    pub fn count(&self, value: &Value) -> Result<u64, IterError> {
        let mut total: u64 = 0;
        self.walk(value, &mut |_: Value| {
            total += 1;
            Ok(())
        })?;
        Ok(total)
    }

    /// Walks `value`, truncating each numeric leaf to a byte and packing
    /// it into `buf`. Once `buf` is full, further leaves are still
    /// walked (so a `{callback}` thunk's side effects, if any, still
    /// run) but are no longer written. Returns the number of bytes
    /// actually written.
    pub fn to_bytes(&self, value: &Value, buf: &mut [u8]) -> Result<usize, IterError> {
        let mut written = 0usize;
        let capacity = buf.len();
        self.walk(value, &mut |leaf: Value| {
            if written < capacity {
                buf[written] = leaf.as_i64().unwrap_or(0) as u8;
                written += 1;
            }
            Ok(())
        })?;
        Ok(written)
    }
}
