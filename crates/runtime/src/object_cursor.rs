//! The object-children cursor: walks a linked list of named child cells
//! via first-child / next-sibling links.

use varheap_core::{new_child_slot, CellHandle, ChildKey, Value};

/// Links a new child slot holding `value` under `key` onto the end of
/// `container`'s child list.
pub fn append_child(container: &CellHandle, key: ChildKey, value: Value) {
    let slot = new_child_slot(key, value);
    let container_cell = container
        .kind()
        .as_container()
        .expect("append_child requires a container cell");

    let mut current = container_cell.first_child.borrow().as_ref().map(CellHandle::lock_again);
    if current.is_none() {
        *container_cell.first_child.borrow_mut() = Some(slot);
        return;
    }
    loop {
        let current_cell = current.as_ref().unwrap();
        let next = current_cell
            .kind()
            .as_child_slot()
            .and_then(|s| s.next_sibling.borrow().as_ref().map(CellHandle::lock_again));
        match next {
            Some(next_cell) => current = Some(next_cell),
            None => {
                *current_cell
                    .kind()
                    .as_child_slot()
                    .unwrap()
                    .next_sibling
                    .borrow_mut() = Some(slot);
                return;
            }
        }
    }
}

/// Cursor over a container's child-slot list.
pub struct ObjectCursor {
    container: CellHandle,
    prev: Option<CellHandle>,
    current: Option<CellHandle>,
}

impl ObjectCursor {
    /// Starts a cursor at the first child of `container`.
    pub fn new(container: CellHandle) -> Self {
        let current = container
            .kind()
            .as_container()
            .expect("ObjectCursor requires a container cell")
            .first_child
            .borrow()
            .as_ref()
            .map(CellHandle::lock_again);
        Self {
            container,
            prev: None,
            current,
        }
    }

    pub fn has_value(&self) -> bool {
        self.current.is_some()
    }

    pub fn get_key(&self) -> Option<ChildKey> {
        self.current
            .as_ref()
            .and_then(|c| c.kind().as_child_slot())
            .map(|s| s.key.clone())
    }

    pub fn get_value(&self) -> Option<Value> {
        self.current
            .as_ref()
            .and_then(|c| c.kind().as_child_slot())
            .map(|s| s.value.borrow().clone())
    }

    /// Overwrites the value at the cursor's current position. Returns
    /// `false` if the cursor has no current child.
    pub fn set_value(&self, value: Value) -> bool {
        match self.current.as_ref().and_then(|c| c.kind().as_child_slot()) {
            Some(slot) => {
                *slot.value.borrow_mut() = value;
                true
            }
            None => false,
        }
    }

    /// Advances to the next child. A no-op once already past the last
    /// child.
    pub fn next(&mut self) {
        let Some(current) = self.current.clone() else {
            return;
        };
        self.prev = Some(current.clone());
        self.current = current
            .kind()
            .as_child_slot()
            .and_then(|s| s.next_sibling.borrow().as_ref().map(CellHandle::lock_again));
    }

    /// Inserts a new child slot holding `value` under `key` immediately
    /// before the cursor's previous position, and makes it the cursor's
    /// new current position. `get_key`/`get_value` immediately after this
    /// call observe the inserted child; a following `next` advances past
    /// it to whatever was `current` before the insert.
    pub fn insert_before(&mut self, key: ChildKey, value: Value) {
        let slot = new_child_slot(key, value);
        *slot
            .kind()
            .as_child_slot()
            .expect("freshly allocated slot")
            .next_sibling
            .borrow_mut() = self.current.clone();

        match &self.prev {
            Some(prev) => {
                *prev
                    .kind()
                    .as_child_slot()
                    .expect("prev must be a child slot")
                    .next_sibling
                    .borrow_mut() = Some(slot.clone());
            }
            None => {
                *self
                    .container
                    .kind()
                    .as_container()
                    .expect("container must be a container cell")
                    .first_child
                    .borrow_mut() = Some(slot.clone());
            }
        }
        self.current = Some(slot);
    }

    /// Unlinks the current child from the container and advances the
    /// cursor to what follows it.
    pub fn remove_and_next(&mut self) {
        let Some(current) = self.current.clone() else {
            return;
        };
        let next = current
            .kind()
            .as_child_slot()
            .and_then(|s| s.next_sibling.borrow().as_ref().map(CellHandle::lock_again));

        match &self.prev {
            Some(prev) => {
                *prev
                    .kind()
                    .as_child_slot()
                    .expect("prev must be a child slot")
                    .next_sibling
                    .borrow_mut() = next.clone();
            }
            None => {
                *self
                    .container
                    .kind()
                    .as_container()
                    .expect("container must be a container cell")
                    .first_child
                    .borrow_mut() = next.clone();
            }
        }
        self.current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use varheap_core::{new_container, ContainerKind};

    fn sample_object() -> CellHandle {
        let object = new_container(ContainerKind::Object);
        append_child(&object, ChildKey::new("a"), Value::Int(1));
        append_child(&object, ChildKey::new("b"), Value::Int(2));
        append_child(&object, ChildKey::new("c"), Value::Int(3));
        object
    }

    #[test]
    fn walks_children_in_insertion_order() {
        let object = sample_object();
        let mut cursor = ObjectCursor::new(object);
        let mut keys = Vec::new();
        while cursor.has_value() {
            keys.push(cursor.get_key().unwrap().as_str().to_string());
            cursor.next();
        }
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn set_value_overwrites_current_child() {
        let object = sample_object();
        let mut cursor = ObjectCursor::new(object);
        cursor.next();
        assert!(cursor.set_value(Value::Int(99)));
        assert_eq!(cursor.get_value().unwrap().as_i64(), Some(99));
    }

    #[test]
    fn remove_middle_child_relinks_siblings() {
        let object = sample_object();
        let mut cursor = ObjectCursor::new(object.clone());
        cursor.next(); // now at "b"
        cursor.remove_and_next(); // removes "b", lands on "c"
        assert_eq!(cursor.get_key().unwrap().as_str(), "c");

        let mut reader = ObjectCursor::new(object);
        let mut keys = Vec::new();
        while reader.has_value() {
            keys.push(reader.get_key().unwrap().as_str().to_string());
            reader.next();
        }
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn insert_before_moves_cursor_onto_the_new_child() {
        let object = sample_object();
        let mut cursor = ObjectCursor::new(object.clone());
        cursor.next(); // now at "b"
        cursor.insert_before(ChildKey::new("a2"), Value::Int(15));
        assert_eq!(cursor.get_key().unwrap().as_str(), "a2");
        cursor.next();
        assert_eq!(cursor.get_key().unwrap().as_str(), "b");

        let mut reader = ObjectCursor::new(object);
        let mut keys = Vec::new();
        while reader.has_value() {
            keys.push(reader.get_key().unwrap().as_str().to_string());
            reader.next();
        }
        assert_eq!(keys, vec!["a", "a2", "b", "c"]);
    }

    #[test]
    fn remove_first_child_updates_container_head() {
        let object = sample_object();
        let mut cursor = ObjectCursor::new(object.clone());
        cursor.remove_and_next(); // removes "a"

        let mut reader = ObjectCursor::new(object);
        let mut keys = Vec::new();
        while reader.has_value() {
            keys.push(reader.get_key().unwrap().as_str().to_string());
            reader.next();
        }
        assert_eq!(keys, vec!["b", "c"]);
    }
}
