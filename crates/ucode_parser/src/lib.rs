//! ucode_parser: Recursive descent parser for ucode templates and programs.
//!
//! Turns the token stream of `ucode_scanner` into an arena-allocated
//! `SourceFile`. Parsing always produces a tree; problems are reported as
//! diagnostics in the returned [`ParseResult`].
//!
//! ```ignore
//! let arena = bumpalo::Bump::new();
//! let result = ucode_parser::parse_markup(&arena, "page.ut", "Hello {{ name }}!");
//! assert!(!result.has_errors());
//! ```

mod expression;
mod module;
mod parser;
mod precedence;
mod statement;
mod utilities;

use bumpalo::Bump;
use ucode_options::ParseOptions;

pub use parser::{ParseResult, Parser};

/// Parse `source_text` with explicit options.
pub fn parse_with_options<'a>(
    arena: &'a Bump,
    file_name: &str,
    source_text: &str,
    options: &ParseOptions,
) -> ParseResult<'a> {
    Parser::new(arena, file_name, source_text, options).parse_source_file()
}

/// Parse a template: raw text with `{% %}`, `{{ }}` and `{# #}` tags.
pub fn parse_markup<'a>(arena: &'a Bump, file_name: &str, source_text: &str) -> ParseResult<'a> {
    parse_with_options(arena, file_name, source_text, &ParseOptions::markup())
}

/// Parse a plain program with no template text.
pub fn parse_program<'a>(arena: &'a Bump, file_name: &str, source_text: &str) -> ParseResult<'a> {
    parse_with_options(arena, file_name, source_text, &ParseOptions::program())
}
