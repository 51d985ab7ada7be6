//! Token information produced by the scanner.

use ucode_ast::syntax_kind::SyntaxKind;
use ucode_ast::types::TokenFlags;

/// A scanned token, detached from the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub kind: SyntaxKind,
    /// Start offset in the source text.
    pub pos: u32,
    /// End offset in the source text (exclusive).
    pub end: u32,
    /// Decoded value: string contents, identifier text, raw text run, ...
    pub text: String,
    pub flags: TokenFlags,
}

impl TokenInfo {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            pos,
            end,
            text: String::new(),
            flags: TokenFlags::NONE,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags = flags;
        self
    }

    /// The length of this token in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    /// `{{-`, `{%-`, `-}}` or `-%}`.
    pub fn strips_whitespace(&self) -> bool {
        self.flags.contains(TokenFlags::STRIP_WHITESPACE)
    }
}
