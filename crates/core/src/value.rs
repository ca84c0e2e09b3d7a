//! The `Value` enum: what a child slot or a cursor position can hold.
//!
//! Pared down from this codebase's general-purpose `Value` (which also
//! carries closures, channels, quotations, and weave contexts for a
//! concatenative language runtime) to exactly the shapes named by the
//! heap model this crate implements: numbers, strings, objects, arrays,
//! functions, getter/setter pairs, and typed-array views. There is no
//! `Bool`/`Null`/`Undefined` here; those are represented as `Int(0)` or
//! absence of a child slot at the object-cursor and walker layers, same
//! as the cell model they are drawn from does not give them cell shapes
//! of their own.

use crate::cell::CellHandle;

/// The element type of a typed-array view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedArrayTag {
    Int8,
    UInt8,
    UInt8Clamped,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl TypedArrayTag {
    /// Width of one element, in bytes.
    pub const fn width(self) -> usize {
        match self {
            TypedArrayTag::Int8 | TypedArrayTag::UInt8 | TypedArrayTag::UInt8Clamped => 1,
            TypedArrayTag::Int16 | TypedArrayTag::UInt16 => 2,
            TypedArrayTag::Int32 | TypedArrayTag::UInt32 | TypedArrayTag::Float32 => 4,
            TypedArrayTag::Float64 => 8,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            TypedArrayTag::Int8 | TypedArrayTag::Int16 | TypedArrayTag::Int32
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(self, TypedArrayTag::Float32 | TypedArrayTag::Float64)
    }

    pub const fn is_clamped(self) -> bool {
        matches!(self, TypedArrayTag::UInt8Clamped)
    }
}

/// A typed view over a byte buffer: which cell backs it, where the view
/// starts, how many elements it has, and how each element is decoded.
#[derive(Debug, Clone)]
pub struct TypedArrayView {
    buffer: CellHandle,
    byte_offset: usize,
    element_count: usize,
    tag: TypedArrayTag,
}

impl TypedArrayView {
    pub fn new(
        buffer: CellHandle,
        byte_offset: usize,
        element_count: usize,
        tag: TypedArrayTag,
    ) -> Self {
        Self {
            buffer,
            byte_offset,
            element_count,
            tag,
        }
    }

    pub fn buffer(&self) -> &CellHandle {
        &self.buffer
    }

    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    pub fn tag(&self) -> TypedArrayTag {
        self.tag
    }

    pub fn byte_len(&self) -> usize {
        self.element_count * self.tag.width()
    }
}

/// A dynamically-typed heap value.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    /// Head cell of a string's cell chain (root, flat, or native).
    String(CellHandle),
    Object(CellHandle),
    Array(CellHandle),
    Function(CellHandle),
    GetterSetter(CellHandle),
    TypedArrayView(TypedArrayView),
}

impl Value {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    pub fn is_getter_or_setter(&self) -> bool {
        matches!(self, Value::GetterSetter(_))
    }

    pub fn is_typed_array_view(&self) -> bool {
        matches!(self, Value::TypedArrayView(_))
    }

    /// True for any of the container shapes (object, array, function,
    /// getter/setter), all of which are backed by a `ContainerCell` and
    /// can be walked via the object-children cursor.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Value::Object(_) | Value::Array(_) | Value::Function(_) | Value::GetterSetter(_)
        )
    }

    /// True for anything with a cursor shape in this crate: containers
    /// (walked via the object-children cursor), typed-array views, and
    /// strings. Does not imply the callback walker will descend into it
    /// directly — a plain object still requires a `{data,count}` or
    /// `{callback}` wrapper there.
    pub fn is_iterable(&self) -> bool {
        self.is_container() || self.is_typed_array_view() || self.is_string()
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_cell_handle(&self) -> Option<&CellHandle> {
        match self {
            Value::String(h)
            | Value::Object(h)
            | Value::Array(h)
            | Value::Function(h)
            | Value::GetterSetter(h) => Some(h),
            Value::Int(_) | Value::Float(_) | Value::TypedArrayView(_) => None,
        }
    }

    pub fn as_typed_array_view(&self) -> Option<&TypedArrayView> {
        match self {
            Value::TypedArrayView(view) => Some(view),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{new_container, ContainerKind};

    #[test]
    fn numeric_predicate_covers_int_and_float() {
        assert!(Value::Int(1).is_numeric());
        assert!(Value::Float(1.0).is_numeric());
        assert!(!Value::Int(1).is_string());
    }

    #[test]
    fn container_predicate_covers_all_four_shapes() {
        let object = Value::Object(new_container(ContainerKind::Object));
        let array = Value::Array(new_container(ContainerKind::Array));
        let function = Value::Function(new_container(ContainerKind::Function));
        let getter = Value::GetterSetter(new_container(ContainerKind::GetterSetter));
        assert!(object.is_container() && object.is_iterable());
        assert!(array.is_container());
        assert!(function.is_container());
        assert!(getter.is_container());
    }

    #[test]
    fn typed_array_tag_widths() {
        assert_eq!(TypedArrayTag::Int8.width(), 1);
        assert_eq!(TypedArrayTag::Float64.width(), 8);
        assert!(TypedArrayTag::UInt8Clamped.is_clamped());
        assert!(TypedArrayTag::Float32.is_float());
        assert!(TypedArrayTag::Int32.is_signed());
    }
}
