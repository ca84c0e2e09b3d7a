//! The unified cursor: one tagged union over the four cursor shapes the
//! callback walker needs to recurse through, so the walker itself does
//! not need to match on a value's kind more than once per level.

use varheap_core::{new_flat_string, CellHandle, ChildKey, ChunkSizes, TypedArrayView, Value};

use crate::full_array_cursor::FullArrayCursor;
use crate::object_cursor::ObjectCursor;
use crate::string_cursor::StringCursor;
use crate::typed_view_cursor::TypedViewCursor;

/// A cursor over one of the four iterable heap-value shapes.
pub enum UnifiedCursor {
    /// A plain object, function, or getter/setter: named children in
    /// insertion order.
    Object(ObjectCursor),
    /// An array, walked by dense logical index with holes filled in.
    FullArray(FullArrayCursor),
    /// A string, walked one byte at a time.
    String(StringCursor),
    /// A typed-array view, walked one decoded element at a time.
    TypedView(TypedViewCursor),
}

impl UnifiedCursor {
    pub fn for_object(container: CellHandle) -> Self {
        UnifiedCursor::Object(ObjectCursor::new(container))
    }

    pub fn for_full_array(container: CellHandle) -> Self {
        UnifiedCursor::FullArray(FullArrayCursor::new(container))
    }

    pub fn for_string(head: CellHandle, sizes: ChunkSizes) -> Self {
        UnifiedCursor::String(StringCursor::new(head, sizes))
    }

    pub fn for_typed_view(view: &TypedArrayView, sizes: ChunkSizes) -> Self {
        UnifiedCursor::TypedView(TypedViewCursor::new(view, sizes))
    }

    /// Builds the cursor shape appropriate to `value`. Returns `None` if
    /// `value` isn't one of the four iterable shapes.
    pub fn for_value(value: &Value, sizes: ChunkSizes) -> Option<Self> {
        match value {
            Value::Object(c) | Value::Function(c) | Value::GetterSetter(c) => {
                Some(Self::for_object(c.lock_again()))
            }
            Value::Array(c) => Some(Self::for_full_array(c.lock_again())),
            Value::String(c) => Some(Self::for_string(c.lock_again(), sizes)),
            Value::TypedArrayView(view) => Some(Self::for_typed_view(view, sizes)),
            Value::Int(_) | Value::Float(_) => None,
        }
    }

    pub fn has_value(&self) -> bool {
        match self {
            UnifiedCursor::Object(c) => c.has_value(),
            UnifiedCursor::FullArray(c) => c.has_value(),
            UnifiedCursor::String(c) => c.has_char(),
            UnifiedCursor::TypedView(c) => c.has_element(),
        }
    }

    pub fn next(&mut self) {
        match self {
            UnifiedCursor::Object(c) => c.next(),
            UnifiedCursor::FullArray(c) => c.next(),
            UnifiedCursor::String(c) => c.next(),
            UnifiedCursor::TypedView(c) => c.next(),
        }
    }

    /// The value at the cursor's current position. For the STRING shape
    /// this is a newly allocated single-character string, not the byte's
    /// numeric value — use `get_integer`/`get_float` for that. TYPED-VIEW
    /// is decoded little-endian (use the typed-view cursor directly for
    /// big-endian reads).
    pub fn get_value(&mut self) -> Option<Value> {
        match self {
            UnifiedCursor::Object(c) => c.get_value(),
            UnifiedCursor::FullArray(c) => Some(c.get_value()),
            UnifiedCursor::String(c) => c.get_char().map(|b| Value::String(new_flat_string(&[b]))),
            UnifiedCursor::TypedView(c) => c.get_value(false),
        }
    }

    /// The current position's value coerced to an integer: the raw byte
    /// for STRING, the decoded element for TYPED-VIEW, and otherwise
    /// whatever `get_value` would produce, coerced via `Value::as_i64`.
    /// FULL-ARRAY holes read as `0`, matching `get_value`'s hole-fill.
    pub fn get_integer(&mut self) -> Option<i64> {
        match self {
            UnifiedCursor::String(c) => c.get_char().map(i64::from),
            UnifiedCursor::TypedView(c) => c.get_integer(false),
            UnifiedCursor::Object(_) | UnifiedCursor::FullArray(_) => {
                self.get_value().and_then(|v| v.as_i64())
            }
        }
    }

    /// The current position's value coerced to a float, analogous to
    /// `get_integer`. FULL-ARRAY holes read as `NaN` rather than `0.0`.
    pub fn get_float(&mut self) -> Option<f64> {
        match self {
            UnifiedCursor::String(c) => c.get_char().map(f64::from),
            UnifiedCursor::TypedView(c) => c.get_float(false),
            UnifiedCursor::FullArray(c) => {
                if c.is_hole() {
                    Some(f64::NAN)
                } else {
                    c.get_value().as_f64()
                }
            }
            UnifiedCursor::Object(_) => self.get_value().and_then(|v| v.as_f64()),
        }
    }

    /// The key at the cursor's current position: a real property name
    /// for OBJECT, a synthesized stringified index for FULL-ARRAY, and
    /// `None` for STRING and TYPED-VIEW, which have no named positions.
    pub fn get_key(&self) -> Option<ChildKey> {
        match self {
            UnifiedCursor::Object(c) => c.get_key(),
            UnifiedCursor::FullArray(c) => Some(ChildKey::new(c.logical_index().to_string())),
            UnifiedCursor::String(_) | UnifiedCursor::TypedView(_) => None,
        }
    }

    /// Writes `value` at the cursor's current position. For STRING, a
    /// `Value::String` argument contributes its first byte and anything
    /// else falls back to its low byte as an integer.
    pub fn set_value(&mut self, value: Value) -> bool {
        match self {
            UnifiedCursor::Object(c) => c.set_value(value),
            UnifiedCursor::FullArray(c) => c.set_value(value),
            UnifiedCursor::String(c) => match &value {
                Value::String(head) => {
                    match StringCursor::new(head.lock_again(), ChunkSizes::default()).get_char() {
                        Some(b) => c.set_char(b),
                        None => false,
                    }
                }
                _ => match value.as_i64() {
                    Some(i) => c.set_char(i as u8),
                    None => false,
                },
            },
            UnifiedCursor::TypedView(c) => c.set_value(&value, false),
        }
    }
}
