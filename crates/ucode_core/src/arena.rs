//! Arena allocation for syntax trees.
//!
//! A parse session allocates every node from one bump arena. Nodes borrow
//! from the arena, so the whole tree is released at once when the arena is
//! dropped or reset.

use bumpalo::Bump;

/// Owns the bump allocator backing one or more parse sessions.
pub struct ParseArena {
    bump: Bump,
}

impl ParseArena {
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Create an arena sized for a source of `source_len` bytes
    /// (six arena bytes per source byte).
    pub fn for_source(source_len: usize) -> Self {
        Self::with_capacity(source_len.saturating_mul(6))
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(capacity),
        }
    }

    /// The underlying allocator, handed to the parser.
    #[inline]
    pub fn bump(&self) -> &Bump {
        &self.bump
    }

    #[inline]
    pub fn alloc<T>(&self, val: T) -> &T {
        self.bump.alloc(val)
    }

    #[inline]
    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }

    /// Drop every tree allocated so far while keeping the memory.
    pub fn reset(&mut self) {
        self.bump.reset();
    }
}

impl Default for ParseArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_and_reset() {
        let mut arena = ParseArena::for_source(16);
        let name = arena.alloc_str("endfor");
        assert_eq!(name, "endfor");
        let value = arena.alloc(42u32);
        assert_eq!(*value, 42);
        assert!(arena.allocated_bytes() > 0);
        arena.reset();
    }
}
