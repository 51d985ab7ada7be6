//! Identifier interning.
//!
//! Every identifier the parser produces is interned so that later passes can
//! compare names as integers. The interner is thread-safe and cheap to clone,
//! which lets several parse sessions running on different threads share one
//! name table.

use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::Arc;

/// Handle to an interned name. Comparing two handles is an integer compare.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct InternedString(Spur);

impl InternedString {
    #[inline]
    pub fn from_spur(spur: Spur) -> Self {
        Self(spur)
    }

    #[inline]
    pub fn as_spur(self) -> Spur {
        self.0
    }
}

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InternedString({:?})", self.0)
    }
}

/// Shared name table backed by a `ThreadedRodeo`.
#[derive(Clone)]
pub struct StringInterner {
    rodeo: Arc<ThreadedRodeo>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self {
            rodeo: Arc::new(ThreadedRodeo::new()),
        }
    }

    /// Intern a name, returning the existing handle if it was seen before.
    #[inline]
    pub fn intern(&self, s: &str) -> InternedString {
        InternedString::from_spur(self.rodeo.get_or_intern(s))
    }

    /// Intern a name known at compile time without copying it.
    #[inline]
    pub fn intern_static(&self, s: &'static str) -> InternedString {
        InternedString::from_spur(self.rodeo.get_or_intern_static(s))
    }

    /// Look up a name without interning it.
    #[inline]
    pub fn get(&self, s: &str) -> Option<InternedString> {
        self.rodeo.get(s).map(InternedString::from_spur)
    }

    #[inline]
    pub fn resolve(&self, key: InternedString) -> &str {
        self.rodeo.resolve(&key.as_spur())
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_handle() {
        let interner = StringInterner::new();
        let a = interner.intern("counter");
        let b = interner.intern("counter");
        let c = interner.intern("total");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "counter");
        assert_eq!(interner.resolve(c), "total");
    }

    #[test]
    fn test_get_does_not_intern() {
        let interner = StringInterner::new();
        assert!(interner.get("x").is_none());
        assert!(interner.is_empty());
        let x = interner.intern("x");
        assert_eq!(interner.get("x"), Some(x));
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_clones_share_table() {
        let interner = StringInterner::new();
        let other = interner.clone();
        let a = interner.intern_static("print");
        assert_eq!(other.get("print"), Some(a));
    }

    #[test]
    fn test_shared_across_threads() {
        let interner = StringInterner::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let interner = interner.clone();
                std::thread::spawn(move || interner.intern("shared"))
            })
            .collect();
        let keys: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(keys.windows(2).all(|w| w[0] == w[1]));
    }
}
