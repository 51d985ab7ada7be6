//! ucode_ast: syntax tree definitions for ucode templates and programs.
//!
//! This crate defines the node types, the `SyntaxKind` enum, the flag types
//! shared with the scanner, and a visitor for walking finished trees.

pub mod generated;
pub mod node;
pub mod syntax_kind;
pub mod types;
pub mod visitor;

// Re-export key types
pub use node::*;
pub use syntax_kind::SyntaxKind;
pub use types::*;
pub use visitor::AstVisitor;
