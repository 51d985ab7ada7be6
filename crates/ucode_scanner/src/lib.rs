//! ucode_scanner: tokenizer for ucode templates and programs.
//!
//! The scanner is pull-based: the parser calls [`Scanner::scan`] for each
//! token. It switches between literal text, tag code, template strings and
//! `${ }` placeholders using a mode stack, and handles:
//! - `{{ }}`, `{% %}` and `{# #}` tags with `-`/`+` whitespace markers
//! - string, template and regular expression literals with escape decoding
//! - decimal, hex, octal, binary and floating point numbers
//! - line and block comments inside code

mod char_codes;
mod scanner;
mod token;

pub use scanner::{ScanMode, Scanner, ScannerState, TagKind};
pub use token::TokenInfo;
