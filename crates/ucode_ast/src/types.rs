//! Flag types and small enums shared by the scanner, parser and tree.

use serde::{Deserialize, Serialize};
use std::fmt;

bitflags::bitflags! {
    /// Flags stored on every node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u16 {
        const NONE              = 0;
        const LET               = 1 << 0;
        const CONST             = 1 << 1;
        /// This chain link was introduced by `?.`.
        const OPTIONAL_CHAIN    = 1 << 2;
        /// Synthesized in place of a construct that failed to parse.
        const MISSING           = 1 << 3;
        /// A statement or block written in the `:` ... `endXXX` form.
        /// Records the surface form only: with this flag and spans set
        /// aside, both forms of a construct build the same tree.
        const ALT_SYNTAX        = 1 << 4;
        /// A declaration group introduced by `export`.
        const EXPORT_CONTEXT    = 1 << 5;

        const BLOCK_SCOPED = Self::LET.bits() | Self::CONST.bits();
    }
}

bitflags::bitflags! {
    /// Flags describing the token most recently scanned.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u16 {
        const NONE                  = 0;
        const PRECEDING_LINE_BREAK  = 1 << 0;
        const UNTERMINATED          = 1 << 1;
        /// `{{-`, `{%-`, `-}}` or `-%}`.
        const STRIP_WHITESPACE      = 1 << 2;
        /// `{%+`.
        const KEEP_WHITESPACE       = 1 << 3;
        const HEX_SPECIFIER         = 1 << 4;
        const BINARY_SPECIFIER      = 1 << 5;
        const OCTAL_SPECIFIER       = 1 << 6;
        const SCIENTIFIC            = 1 << 7;
        const CONTAINS_ESCAPE       = 1 << 8;
        const CONTAINS_INVALID_ESCAPE = 1 << 9;
        /// Raw text following a tag closed with a strip marker.
        const TRIM_START            = 1 << 10;
        /// Raw text followed by a tag opened with a strip marker.
        const TRIM_END              = 1 << 11;

        const NUMERIC_LITERAL_FLAGS = Self::HEX_SPECIFIER.bits()
            | Self::BINARY_SPECIFIER.bits()
            | Self::OCTAL_SPECIFIER.bits()
            | Self::SCIENTIFIC.bits();
    }
}

bitflags::bitflags! {
    /// Flags following a regular expression literal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegexFlags: u8 {
        const GLOBAL        = 1 << 0;
        const IGNORE_CASE   = 1 << 1;
        const DOT_ALL       = 1 << 2;
    }
}

impl RegexFlags {
    /// Parse a `[gis]*` flag run. Returns `None` on any other character.
    pub fn from_text(text: &str) -> Option<RegexFlags> {
        let mut flags = RegexFlags::empty();
        for ch in text.chars() {
            flags |= match ch {
                'g' => RegexFlags::GLOBAL,
                'i' => RegexFlags::IGNORE_CASE,
                's' => RegexFlags::DOT_ALL,
                _ => return None,
            };
        }
        Some(flags)
    }
}

impl fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(RegexFlags::GLOBAL) {
            f.write_str("g")?;
        }
        if self.contains(RegexFlags::IGNORE_CASE) {
            f.write_str("i")?;
        }
        if self.contains(RegexFlags::DOT_ALL) {
            f.write_str("s")?;
        }
        Ok(())
    }
}

/// Which grammar a source is read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Literal text with `{% %}`, `{{ }}` and `{# #}` tags.
    #[default]
    Markup,
    /// Code statements only.
    Program,
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMode::Markup => write!(f, "markup"),
            SourceMode::Program => write!(f, "program"),
        }
    }
}
