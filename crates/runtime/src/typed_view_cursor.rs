//! The typed-view cursor: an element-granular cursor layered on top of
//! the byte-granular string-chain cursor, decoding 1/2/4/8-byte signed,
//! unsigned, and floating-point elements in either byte order.
//!
//! A typed-array view's backing buffer is itself a cell chain, same as a
//! string's — so reading or writing one element is just reading or
//! writing `width` consecutive bytes through a [`StringCursor`] rather
//! than a separate buffer abstraction.

use varheap_core::{ChunkSizes, TypedArrayTag, TypedArrayView, Value};

use crate::string_cursor::StringCursor;

fn assemble_unsigned(raw: &[u8], big_endian: bool) -> u64 {
    let mut value: u64 = 0;
    if big_endian {
        for &b in raw {
            value = (value << 8) | u64::from(b);
        }
    } else {
        for &b in raw.iter().rev() {
            value = (value << 8) | u64::from(b);
        }
    }
    value
}

fn disassemble_unsigned(value: u64, width: usize, big_endian: bool) -> Vec<u8> {
    let mut bytes = vec![0u8; width];
    if big_endian {
        for (i, out) in bytes.iter_mut().enumerate() {
            *out = (value >> (8 * (width - 1 - i))) as u8;
        }
    } else {
        for (i, out) in bytes.iter_mut().enumerate() {
            *out = (value >> (8 * i)) as u8;
        }
    }
    bytes
}

fn decode(tag: TypedArrayTag, raw: &[u8], big_endian: bool) -> Value {
    match tag {
        TypedArrayTag::Float32 => {
            let bits = assemble_unsigned(raw, big_endian) as u32;
            Value::Float(f64::from(f32::from_bits(bits)))
        }
        TypedArrayTag::Float64 => {
            let bits = assemble_unsigned(raw, big_endian);
            Value::Float(f64::from_bits(bits))
        }
        _ => {
            let width = tag.width();
            let unsigned = assemble_unsigned(raw, big_endian);
            if tag.is_signed() {
                let shift = 64 - width * 8;
                let signed = ((unsigned << shift) as i64) >> shift;
                Value::Int(signed)
            } else {
                Value::Int(unsigned as i64)
            }
        }
    }
}

fn encode(tag: TypedArrayTag, value: &Value, big_endian: bool) -> Option<Vec<u8>> {
    let width = tag.width();
    match tag {
        TypedArrayTag::Float32 => {
            let f = value.as_f64()? as f32;
            Some(disassemble_unsigned(u64::from(f.to_bits()), width, big_endian))
        }
        TypedArrayTag::Float64 => {
            let f = value.as_f64()?;
            Some(disassemble_unsigned(f.to_bits(), width, big_endian))
        }
        TypedArrayTag::UInt8Clamped => {
            let f = value.as_f64()?;
            let clamped = f.round().clamp(0.0, 255.0) as u64;
            Some(disassemble_unsigned(clamped, width, big_endian))
        }
        _ => {
            let i = value.as_i64()?;
            Some(disassemble_unsigned(i as u64, width, big_endian))
        }
    }
}

/// Cursor over a typed-array view's elements.
#[derive(Debug, Clone)]
pub struct TypedViewCursor {
    bytes: StringCursor,
    tag: TypedArrayTag,
    element_count: usize,
    element_index: usize,
    /// Mirrors the source model's `hasAccessedElement`: true once the
    /// current element has been read or written, reset by `next()` or
    /// by the `*_and_rewind` variants. Lets a caller peek an element's
    /// value without committing to having "consumed" it.
    has_accessed_element: bool,
}

impl TypedViewCursor {
    pub fn new(view: &TypedArrayView, sizes: ChunkSizes) -> Self {
        let bytes = StringCursor::new_at(view.buffer().lock_again(), view.byte_offset(), sizes);
        Self {
            bytes,
            tag: view.tag(),
            element_count: view.element_count(),
            element_index: 0,
            has_accessed_element: false,
        }
    }

    pub fn has_element(&self) -> bool {
        self.element_index < self.element_count
    }

    pub fn has_accessed_element(&self) -> bool {
        self.has_accessed_element
    }

    fn read_raw(&self) -> Option<Vec<u8>> {
        if !self.has_element() {
            return None;
        }
        let width = self.tag.width();
        let mut cursor = self.bytes.clone();
        let mut raw = Vec::with_capacity(width);
        for _ in 0..width {
            raw.push(cursor.get_char()?);
            cursor.next();
        }
        Some(raw)
    }

    /// Reads the current element as a `Value`, decoded per this view's
    /// tag and `big_endian`.
    pub fn get_value(&mut self, big_endian: bool) -> Option<Value> {
        let raw = self.read_raw()?;
        self.has_accessed_element = true;
        Some(decode(self.tag, &raw, big_endian))
    }

    pub fn get_integer(&mut self, big_endian: bool) -> Option<i64> {
        self.get_value(big_endian).and_then(|v| v.as_i64())
    }

    pub fn get_float(&mut self, big_endian: bool) -> Option<f64> {
        self.get_value(big_endian).and_then(|v| v.as_f64())
    }

    /// Reads the current element, then immediately clears
    /// `has_accessed_element` — for callers that want the value without
    /// marking the element as consumed.
    pub fn get_and_rewind(&mut self, big_endian: bool) -> Option<Value> {
        let value = self.get_value(big_endian);
        self.has_accessed_element = false;
        value
    }

    /// Writes `value` into the current element, encoding per this view's
    /// tag and `big_endian`. Returns `false` (without partially writing)
    /// if the cursor is past the last element, the value can't be
    /// coerced to this tag's representation, or the backing chain is
    /// read-only at this position.
    pub fn set_value(&mut self, value: &Value, big_endian: bool) -> bool {
        if !self.has_element() {
            return false;
        }
        let Some(raw) = encode(self.tag, value, big_endian) else {
            return false;
        };
        let mut cursor = self.bytes.clone();
        for byte in raw {
            if !cursor.set_char(byte) {
                return false;
            }
            cursor.next();
        }
        self.has_accessed_element = true;
        true
    }

    pub fn set_integer(&mut self, value: i64, big_endian: bool) -> bool {
        self.set_value(&Value::Int(value), big_endian)
    }

    /// Fast path for single-byte tags (`Int8`/`UInt8`/`UInt8Clamped`):
    /// writes the raw byte directly without going through `encode`.
    /// Returns `false` on a multi-byte tag.
    pub fn set_byte(&mut self, byte: u8) -> bool {
        if !self.has_element() || self.tag.width() != 1 {
            return false;
        }
        let ok = self.bytes.set_char(byte);
        if ok {
            self.has_accessed_element = true;
        }
        ok
    }

    pub fn set_and_rewind(&mut self, value: &Value, big_endian: bool) -> bool {
        let ok = self.set_value(value, big_endian);
        self.has_accessed_element = false;
        ok
    }

    /// Advances to the next element, skipping `width` bytes.
    pub fn next(&mut self) {
        if !self.has_element() {
            return;
        }
        self.element_index += 1;
        self.has_accessed_element = false;
        for _ in 0..self.tag.width() {
            self.bytes.next();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use varheap_core::new_root_string_chunk;

    fn sizes() -> ChunkSizes {
        ChunkSizes {
            root_capacity: 32,
            extension_capacity: 16,
        }
    }

    fn view(bytes: &[u8], tag: TypedArrayTag, element_count: usize) -> TypedArrayView {
        let buffer = new_root_string_chunk(bytes, &sizes());
        TypedArrayView::new(buffer, 0, element_count, tag)
    }

    #[test]
    fn reads_little_endian_uint16() {
        let view = view(&[0x34, 0x12], TypedArrayTag::UInt16, 1);
        let mut cursor = TypedViewCursor::new(&view, sizes());
        assert_eq!(cursor.get_integer(false), Some(0x1234));
    }

    #[test]
    fn reads_big_endian_uint16() {
        let view = view(&[0x12, 0x34], TypedArrayTag::UInt16, 1);
        let mut cursor = TypedViewCursor::new(&view, sizes());
        assert_eq!(cursor.get_integer(true), Some(0x1234));
    }

    #[test]
    fn sign_extends_negative_int8() {
        let view = view(&[0xFF], TypedArrayTag::Int8, 1);
        let mut cursor = TypedViewCursor::new(&view, sizes());
        assert_eq!(cursor.get_integer(false), Some(-1));
    }

    #[test]
    fn uint8_does_not_sign_extend() {
        let view = view(&[0xFF], TypedArrayTag::UInt8, 1);
        let mut cursor = TypedViewCursor::new(&view, sizes());
        assert_eq!(cursor.get_integer(false), Some(255));
    }

    #[test]
    fn float32_round_trips() {
        let buffer = new_root_string_chunk(&[0u8; 4], &sizes());
        let descriptor = TypedArrayView::new(buffer, 0, 1, TypedArrayTag::Float32);
        let mut cursor = TypedViewCursor::new(&descriptor, sizes());
        assert!(cursor.set_value(&Value::Float(1.5), false));
        assert_eq!(cursor.get_float(false), Some(1.5));
    }

    #[test]
    fn float64_round_trips_big_endian() {
        let buffer = new_root_string_chunk(&[0u8; 8], &sizes());
        let descriptor = TypedArrayView::new(buffer, 0, 1, TypedArrayTag::Float64);
        let mut cursor = TypedViewCursor::new(&descriptor, sizes());
        assert!(cursor.set_value(&Value::Float(-2.5), true));
        assert_eq!(cursor.get_float(true), Some(-2.5));
    }

    #[test]
    fn uint8_clamped_saturates_out_of_range_values() {
        let buffer = new_root_string_chunk(&[0u8], &sizes());
        let descriptor = TypedArrayView::new(buffer, 0, 1, TypedArrayTag::UInt8Clamped);
        let mut cursor = TypedViewCursor::new(&descriptor, sizes());
        assert!(cursor.set_value(&Value::Int(1000), false));
        assert_eq!(cursor.get_integer(false), Some(255));

        assert!(cursor.set_value(&Value::Int(-10), false));
        assert_eq!(cursor.get_integer(false), Some(0));
    }

    #[test]
    fn next_advances_by_element_width_not_byte() {
        let view = view(&[0x01, 0x00, 0x02, 0x00], TypedArrayTag::UInt16, 2);
        let mut cursor = TypedViewCursor::new(&view, sizes());
        assert_eq!(cursor.get_integer(false), Some(1));
        cursor.next();
        assert!(cursor.has_element());
        assert_eq!(cursor.get_integer(false), Some(2));
        cursor.next();
        assert!(!cursor.has_element());
    }

    #[test]
    fn get_and_rewind_clears_accessed_flag() {
        let view = view(&[7], TypedArrayTag::UInt8, 1);
        let mut cursor = TypedViewCursor::new(&view, sizes());
        cursor.get_and_rewind(false);
        assert!(!cursor.has_accessed_element());
    }
}
