//! ucode_core: shared building blocks for the ucode syntax crates.
//!
//! Source positions, the node arena and the identifier interner.

pub mod arena;
pub mod intern;
pub mod text;

pub use arena::ParseArena;
pub use intern::{InternedString, StringInterner};
pub use text::{LineAndColumn, LineMap, TextRange, TextSpan};
