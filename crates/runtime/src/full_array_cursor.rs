//! The FULL-ARRAY overlay: a dense, index-addressed view over an array
//! container's sparse child-slot backing.
//!
//! An array's children are stored exactly like an object's — named
//! slots, keyed here by the child's stringified index — so a sparse
//! array like `[, , 5]` only has one real child slot, under key `"2"`.
//! This cursor walks logical indices `0..length` and reports a hole
//! (read as `Value::Int(0)`) wherever no child slot matches.

use varheap_core::{CellHandle, ChildKey, Value};

use crate::object_cursor::ObjectCursor;

/// Cursor over an array container's logical `0..length` index range.
pub struct FullArrayCursor {
    container: CellHandle,
    backing: ObjectCursor,
    length: u64,
    logical_index: u64,
}

impl FullArrayCursor {
    pub fn new(container: CellHandle) -> Self {
        let length = container
            .kind()
            .as_container()
            .and_then(|c| *c.length.borrow())
            .unwrap_or(0);
        let backing = ObjectCursor::new(container.clone());
        Self {
            container,
            backing,
            length,
            logical_index: 0,
        }
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn logical_index(&self) -> u64 {
        self.logical_index
    }

    pub fn has_value(&self) -> bool {
        self.logical_index < self.length
    }

    fn current_matches(&self) -> bool {
        self.backing.has_value()
            && self
                .backing
                .get_key()
                .map(|k| k.as_str() == self.logical_index.to_string())
                .unwrap_or(false)
    }

    /// True at a logical index with no backing child slot.
    pub fn is_hole(&self) -> bool {
        self.has_value() && !self.current_matches()
    }

    /// The value at the current logical index: the real child's value,
    /// or `Value::Int(0)` for a hole.
    pub fn get_value(&self) -> Value {
        if self.current_matches() {
            self.backing
                .get_value()
                .expect("current_matches implies a backing value")
        } else {
            Value::Int(0)
        }
    }

    /// Writes `value` at the current logical index. If this index is a
    /// hole, a new child slot is inserted into the sparse backing at the
    /// correct sorted position rather than densifying the whole array.
    pub fn set_value(&mut self, value: Value) -> bool {
        if !self.has_value() {
            return false;
        }
        if self.current_matches() {
            self.backing.set_value(value)
        } else {
            self.backing
                .insert_before(ChildKey::new(self.logical_index.to_string()), value);
            true
        }
    }

    pub fn next(&mut self) {
        if !self.has_value() {
            return;
        }
        if self.current_matches() {
            self.backing.next();
        }
        self.logical_index += 1;
    }

    pub fn container(&self) -> &CellHandle {
        &self.container
    }
}
