//! The string-chain cursor: a byte-granular read/write/append cursor over
//! a string's cell chain.
//!
//! Tracks the current cell (`var`), the char's index within that cell
//! (`var_index`), the char's index within the whole chain (`char_idx`),
//! and the current cell's used length (`chars_in_var`) so bounds checks
//! don't need to re-borrow the cell on every call.

use tracing::debug;
use varheap_core::{append_chunk, new_extension_string_chunk, CellHandle, ChunkSizes};

/// Cursor position over a string's cell chain.
#[derive(Debug, Clone)]
pub struct StringCursor {
    sizes: ChunkSizes,
    var: Option<CellHandle>,
    var_index: usize,
    char_idx: usize,
    chars_in_var: usize,
}

fn used_len(cell: &CellHandle) -> usize {
    cell.kind()
        .as_string_chunk()
        .map(|c| c.bytes.borrow().len())
        .unwrap_or(0)
}

impl StringCursor {
    /// Starts a cursor at the beginning of the chain rooted at `head`.
    pub fn new(head: CellHandle, sizes: ChunkSizes) -> Self {
        let chars_in_var = used_len(&head);
        Self {
            sizes,
            var: Some(head),
            var_index: 0,
            char_idx: 0,
            chars_in_var,
        }
    }

    /// Starts a cursor positioned at `start_index` chars into the chain.
    /// Stops early (at whatever the logical end is) if the chain is
    /// shorter than `start_index`.
    pub fn new_at(head: CellHandle, start_index: usize, sizes: ChunkSizes) -> Self {
        let mut cursor = Self::new(head, sizes);
        for _ in 0..start_index {
            if !cursor.has_char() {
                break;
            }
            cursor.next();
        }
        cursor
    }

    /// The char index this cursor is positioned at, within the whole
    /// chain (not just the current cell).
    pub fn char_index(&self) -> usize {
        self.char_idx
    }

    /// Whether the current position holds a readable char. `false` means
    /// the cursor is at the logical end of the chain.
    pub fn has_char(&self) -> bool {
        self.var.is_some() && self.var_index < self.chars_in_var
    }

    pub fn get_char(&self) -> Option<u8> {
        self.var.as_ref().and_then(|cell| {
            cell.kind()
                .as_string_chunk()
                .and_then(|c| c.bytes.borrow().get_byte(self.var_index))
        })
    }

    /// Returns the current char widened to `i32`, or `-1` at the logical
    /// end of the chain — mirrors a common C idiom for "char or EOF".
    pub fn get_char_or_minus_one(&self) -> i32 {
        self.get_char().map(i32::from).unwrap_or(-1)
    }

    /// Overwrites the char at the cursor's current position. Returns
    /// `false` (without mutating) if the cursor is at the end, or the
    /// backing chunk is a read-only native chunk.
    pub fn set_char(&self, byte: u8) -> bool {
        if !self.has_char() {
            return false;
        }
        self.var
            .as_ref()
            .and_then(|cell| cell.kind().as_string_chunk())
            .map(|c| c.bytes.borrow_mut().set_byte(self.var_index, byte))
            .unwrap_or(false)
    }

    /// Advances the cursor by one char, crossing into the next cell in
    /// the chain if the current one is exhausted. A no-op once already
    /// at the logical end.
    pub fn next(&mut self) {
        if !self.has_char() {
            return;
        }
        self.var_index += 1;
        self.char_idx += 1;
        if self.var_index >= self.chars_in_var {
            let next_cell = self
                .var
                .as_ref()
                .and_then(|cell| cell.kind().as_string_chunk())
                .and_then(|c| c.next.borrow().as_ref().map(CellHandle::lock_again));
            if let Some(next) = next_cell {
                self.chars_in_var = used_len(&next);
                self.var_index = 0;
                self.var = Some(next);
            }
            // else: no more cells, stay at this logical end position.
        }
    }

    /// Advances the cursor to the logical end of the chain, ready for
    /// [`StringCursor::append`].
    pub fn goto_end(&mut self) {
        while self.has_char() {
            self.next();
        }
    }

    /// Appends one byte at the cursor's current position, which must be
    /// the logical end of the chain (call [`StringCursor::goto_end`]
    /// first). Allocates a new extension cell and links it onto the
    /// chain if the current cell has no room (including when the
    /// current cell is a read-only native chunk).
    pub fn append(&mut self, byte: u8) {
        let Some(current) = self.var.clone() else {
            return;
        };
        let pushed = current
            .kind()
            .as_string_chunk()
            .map(|c| c.bytes.borrow_mut().push_byte(byte))
            .unwrap_or(false);
        if pushed {
            self.chars_in_var += 1;
            self.var_index += 1;
            self.char_idx += 1;
            return;
        }

        debug!(char_idx = self.char_idx, "string chain full, allocating extension cell");
        let extension = new_extension_string_chunk(&[byte], &self.sizes);
        append_chunk(&current, extension.lock_again());
        self.var = Some(extension);
        self.chars_in_var = 1;
        self.var_index = 1;
        self.char_idx += 1;
    }

    /// Appends every byte of `bytes` via repeated [`StringCursor::append`].
    pub fn append_str(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.append(byte);
        }
    }
}
