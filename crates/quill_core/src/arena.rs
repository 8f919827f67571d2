//! Arena allocation for syntax trees.
//!
//! Every syntax node of a compilation is allocated from one bump arena, so a
//! whole set of trees is released at once when the arena goes away. Only
//! trivially-droppable data (spans, `&str`, node references) goes in here;
//! bump allocations never run destructors.

use bumpalo::Bump;

/// The compiler arena wraps a bump allocator for syntax allocations.
pub struct CompilerArena {
    bump: Bump,
}

impl CompilerArena {
    /// Create a new compiler arena with default capacity.
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Allocate a value in the arena and return a reference to it.
    #[inline]
    pub fn alloc<T>(&self, val: T) -> &T {
        self.bump.alloc(val)
    }

    /// Allocate a string slice in the arena.
    #[inline]
    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    /// Move the elements of a vector into an arena slice.
    #[inline]
    pub fn alloc_vec<T>(&self, items: Vec<T>) -> &[T] {
        if items.is_empty() {
            return &[];
        }
        self.bump.alloc_slice_fill_iter(items)
    }

    /// Total bytes allocated in this arena.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for CompilerArena {
    fn default() -> Self {
        Self::new()
    }
}
