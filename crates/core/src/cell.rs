//! The heap cell substrate.
//!
//! Three cell shapes cover everything the iteration layer walks:
//!
//! * [`CellKind::StringChunk`] — one link in a string's cell chain (root,
//!   extension, flat, or native).
//! * [`CellKind::ChildSlot`] — one named entry in an object/array/function's
//!   property list, linked to the next sibling.
//! * [`CellKind::Container`] — the head of an object/array/function/
//!   getter-setter, holding a reference to its first child slot.
//!
//! Cells are shared through [`CellHandle`], a reference-counted handle
//! (`Rc`-backed, mirroring the `Arc`-backed `VariantData`/`ChannelData`
//! payloads elsewhere in this codebase) rather than a hand-rolled free list.
//! `Rc` rather than `Arc` because this heap has exactly one thread touching
//! it; see the crate-level concurrency notes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::config::ChunkSizes;
use crate::heap_stats::heap_stats;
use crate::value::Value;

/// Byte storage backing a string-chunk cell.
#[derive(Debug)]
pub enum ChunkBytes {
    /// Heap-owned, mutable, fixed-capacity buffer with a used length.
    Owned { buf: Box<[u8]>, len: usize },
    /// Borrowed, read-only bytes over memory the heap does not own.
    ///
    /// # Safety
    /// The caller constructing a native string chunk must ensure the
    /// referenced memory outlives every handle to the cell.
    Native { ptr: *const u8, len: usize },
}

impl ChunkBytes {
    fn owned_from(content: &[u8], capacity: usize) -> Self {
        debug_assert!(content.len() <= capacity);
        let mut buf = vec![0u8; capacity].into_boxed_slice();
        buf[..content.len()].copy_from_slice(content);
        ChunkBytes::Owned {
            buf,
            len: content.len(),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            ChunkBytes::Owned { buf, len } => &buf[..*len],
            // SAFETY: the caller who constructed this chunk promised `ptr`
            // is valid for `len` bytes for the chunk's lifetime.
            ChunkBytes::Native { ptr, len } => unsafe { std::slice::from_raw_parts(*ptr, *len) },
        }
    }

    pub fn capacity(&self) -> usize {
        match self {
            ChunkBytes::Owned { buf, .. } => buf.len(),
            ChunkBytes::Native { len, .. } => *len,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ChunkBytes::Owned { len, .. } => *len,
            ChunkBytes::Native { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    pub fn is_native(&self) -> bool {
        matches!(self, ChunkBytes::Native { .. })
    }

    pub fn get_byte(&self, idx: usize) -> Option<u8> {
        self.as_slice().get(idx).copied()
    }

    /// Appends a byte if capacity remains. Returns `false` (without
    /// mutating) on a full or native chunk.
    pub fn push_byte(&mut self, byte: u8) -> bool {
        match self {
            ChunkBytes::Owned { buf, len } if *len < buf.len() => {
                buf[*len] = byte;
                *len += 1;
                true
            }
            _ => false,
        }
    }

    /// Overwrites a byte already within the used length. Returns `false`
    /// on an out-of-range index or a native chunk.
    pub fn set_byte(&mut self, idx: usize, byte: u8) -> bool {
        match self {
            ChunkBytes::Owned { buf, len } if idx < *len => {
                buf[idx] = byte;
                true
            }
            _ => false,
        }
    }
}

/// One link in a string's cell chain.
#[derive(Debug)]
pub struct StringChunkCell {
    pub bytes: RefCell<ChunkBytes>,
    pub next: RefCell<Option<CellHandle>>,
}

/// What an object/array/function/getter-setter container actually is.
///
/// Kept on the container rather than folded only into `Value`, since
/// cell-level predicates need to distinguish these without round-tripping
/// through a `Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Object,
    Array,
    Function,
    GetterSetter,
}

/// The head cell of an object/array/function/getter-setter: holds a
/// reference to its first child slot. Further children are reached by
/// walking `ChildSlotCell::next_sibling`.
#[derive(Debug)]
pub struct ContainerCell {
    pub kind: ContainerKind,
    pub first_child: RefCell<Option<CellHandle>>,
    /// Declared dense length, meaningful only when `kind` is
    /// [`ContainerKind::Array`]. A sparse array can declare a length
    /// longer than its highest present child index, leaving the gap as
    /// holes for the FULL-ARRAY cursor shape to fill.
    pub length: RefCell<Option<u64>>,
}

/// The name of one child slot in a container's property list.
///
/// Array elements are keyed by their stringified index, same as object
/// properties — a full-array cursor overlays dense logical indices atop
/// this sparse representation (see the unified cursor's FULL-ARRAY shape).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChildKey(Rc<str>);

impl ChildKey {
    pub fn new(s: impl Into<Rc<str>>) -> Self {
        ChildKey(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChildKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One named entry in a container's property list.
#[derive(Debug)]
pub struct ChildSlotCell {
    pub key: ChildKey,
    pub value: RefCell<Value>,
    pub next_sibling: RefCell<Option<CellHandle>>,
}

/// The three heap-cell shapes the iteration layer walks.
#[derive(Debug)]
pub enum CellKind {
    StringChunk(StringChunkCell),
    ChildSlot(ChildSlotCell),
    Container(ContainerCell),
}

/// A single heap cell. Always reached through a [`CellHandle`].
#[derive(Debug)]
pub struct Cell {
    kind: CellKind,
}

impl Cell {
    pub fn kind(&self) -> &CellKind {
        &self.kind
    }

    pub fn as_string_chunk(&self) -> Option<&StringChunkCell> {
        match &self.kind {
            CellKind::StringChunk(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn as_child_slot(&self) -> Option<&ChildSlotCell> {
        match &self.kind {
            CellKind::ChildSlot(slot) => Some(slot),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&ContainerCell> {
        match &self.kind {
            CellKind::Container(container) => Some(container),
            _ => None,
        }
    }
}

/// A reference-counted handle to a heap cell.
///
/// Cloning is O(1) (an `Rc` bump), matching `lock_again` in the cell
/// model's vocabulary; dropping the last handle is `unlock`.
#[derive(Debug, Clone)]
pub struct CellHandle(Rc<Cell>);

impl CellHandle {
    fn from_kind(kind: CellKind) -> Self {
        heap_stats().record_cell_allocated();
        CellHandle(Rc::new(Cell { kind }))
    }

    /// The cell this handle points to, exposing the `as_string_chunk`/
    /// `as_child_slot`/`as_container` shape accessors.
    pub fn kind(&self) -> &Cell {
        &self.0
    }

    /// Clones the handle, incrementing the cell's reference count.
    pub fn lock_again(&self) -> CellHandle {
        self.clone()
    }

    /// Drops this handle, decrementing the cell's reference count.
    /// Named to mirror `lock_again` rather than relying on an implicit
    /// `Drop`.
    pub fn unlock(self) {
        drop(self);
    }

    /// Clones an `Option<CellHandle>` without panicking on `None`.
    pub fn lock_safe(handle: Option<&CellHandle>) -> Option<CellHandle> {
        handle.map(CellHandle::lock_again)
    }

    /// The current strong reference count.
    pub fn get_ref(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    pub fn ptr_eq(&self, other: &CellHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Allocates a root string-chunk cell sized per `sizes.root_capacity`,
/// seeded with `content` (which must fit within that capacity).
pub fn new_root_string_chunk(content: &[u8], sizes: &ChunkSizes) -> CellHandle {
    trace!(len = content.len(), "allocating root string chunk");
    CellHandle::from_kind(CellKind::StringChunk(StringChunkCell {
        bytes: RefCell::new(ChunkBytes::owned_from(content, sizes.root_capacity)),
        next: RefCell::new(None),
    }))
}

/// Allocates an extension string-chunk cell sized per
/// `sizes.extension_capacity`, seeded with `content`.
pub fn new_extension_string_chunk(content: &[u8], sizes: &ChunkSizes) -> CellHandle {
    trace!(len = content.len(), "allocating extension string chunk");
    heap_stats().record_extension_cell_allocated();
    CellHandle::from_kind(CellKind::StringChunk(StringChunkCell {
        bytes: RefCell::new(ChunkBytes::owned_from(content, sizes.extension_capacity)),
        next: RefCell::new(None),
    }))
}

/// Allocates a flat string cell: a single chunk whose capacity equals its
/// content length. Any append therefore immediately overflows into an
/// extension cell, which is the correct (if surprising) behavior per the
/// source this model is drawn from: flat strings report their capacity
/// honestly, which happens to equal their current length.
pub fn new_flat_string(content: &[u8]) -> CellHandle {
    trace!(len = content.len(), "allocating flat string chunk");
    CellHandle::from_kind(CellKind::StringChunk(StringChunkCell {
        bytes: RefCell::new(ChunkBytes::owned_from(content, content.len())),
        next: RefCell::new(None),
    }))
}

/// Allocates a native string cell: a read-only, single-cell view over
/// caller-owned memory. No chain, no mutation.
///
/// # Safety
/// `ptr` must be valid for reads of `len` bytes for as long as any
/// [`CellHandle`] to the resulting cell (or a clone of it) is live.
pub unsafe fn new_native_string(ptr: *const u8, len: usize) -> CellHandle {
    trace!(len, "allocating native string chunk");
    CellHandle::from_kind(CellKind::StringChunk(StringChunkCell {
        bytes: RefCell::new(ChunkBytes::Native { ptr, len }),
        next: RefCell::new(None),
    }))
}

/// Allocates an empty container cell of the given kind.
pub fn new_container(kind: ContainerKind) -> CellHandle {
    trace!(?kind, "allocating container");
    CellHandle::from_kind(CellKind::Container(ContainerCell {
        kind,
        first_child: RefCell::new(None),
        length: RefCell::new(None),
    }))
}

/// Allocates an empty array container with the given declared length.
pub fn new_array(length: u64) -> CellHandle {
    let handle = new_container(ContainerKind::Array);
    *handle.kind().as_container().unwrap().length.borrow_mut() = Some(length);
    handle
}

/// Allocates a child slot cell holding `value` under `key`, with no
/// sibling linked yet.
pub fn new_child_slot(key: ChildKey, value: Value) -> CellHandle {
    CellHandle::from_kind(CellKind::ChildSlot(ChildSlotCell {
        key,
        value: RefCell::new(value),
        next_sibling: RefCell::new(None),
    }))
}

/// Appends `chunk` onto the chain's current last link, sized at
/// `chunk`'s own length, which the caller allocated via
/// [`new_extension_string_chunk`]. Walks from `head` to find the tail.
pub fn append_chunk(head: &CellHandle, chunk: CellHandle) {
    let mut current = head.lock_again();
    loop {
        let next = {
            let cell = current.kind().as_string_chunk().expect("chain link must be a string chunk");
            cell.next.borrow().as_ref().map(CellHandle::lock_again)
        };
        match next {
            Some(next_cell) => current = next_cell,
            None => {
                let cell = current.kind().as_string_chunk().expect("chain link must be a string chunk");
                *cell.next.borrow_mut() = Some(chunk);
                return;
            }
        }
    }
}
