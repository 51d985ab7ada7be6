//! Parser utility functions.

use bumpalo::Bump;
use ucode_ast::syntax_kind::SyntaxKind;

/// Move a Vec into the arena as a slice.
pub fn alloc_vec_in<T>(arena: &Bump, vec: Vec<T>) -> &[T] {
    arena.alloc_slice_fill_iter(vec)
}

/// Tag delimiters. Statements never continue across one.
#[inline]
pub fn is_tag_boundary(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::StatementTagOpen
            | SyntaxKind::StatementTagClose
            | SyntaxKind::ExpressionTagClose
    )
}

/// Keywords that close an alt-form body.
#[inline]
pub fn is_end_keyword(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::EndifKeyword
            | SyntaxKind::EndforKeyword
            | SyntaxKind::EndwhileKeyword
            | SyntaxKind::EndfunctionKeyword
    )
}

/// Tokens that may only continue an enclosing construct, never start a
/// statement of their own.
pub fn is_dangling_clause_keyword(kind: SyntaxKind) -> bool {
    is_end_keyword(kind)
        || matches!(
            kind,
            SyntaxKind::ElifKeyword
                | SyntaxKind::ElseKeyword
                | SyntaxKind::CaseKeyword
                | SyntaxKind::CatchKeyword
                | SyntaxKind::CloseBraceToken
        )
}

/// Where error recovery may resume parsing statements.
pub fn is_statement_boundary(kind: SyntaxKind) -> bool {
    is_tag_boundary(kind)
        || is_dangling_clause_keyword(kind)
        || matches!(
            kind,
            SyntaxKind::ExpressionTagOpen
                | SyntaxKind::RawText
                | SyntaxKind::RawComment
                | SyntaxKind::DefaultKeyword
                | SyntaxKind::LetKeyword
                | SyntaxKind::ConstKeyword
                | SyntaxKind::IfKeyword
                | SyntaxKind::WhileKeyword
                | SyntaxKind::ForKeyword
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::SwitchKeyword
                | SyntaxKind::TryKeyword
                | SyntaxKind::ReturnKeyword
                | SyntaxKind::BreakKeyword
                | SyntaxKind::ContinueKeyword
                | SyntaxKind::ImportKeyword
                | SyntaxKind::ExportKeyword
        )
}

/// Tokens that end a statement without being part of it: `%}`, `{%`,
/// `}` and end of input. A `;` is consumed separately.
#[inline]
pub fn is_implicit_terminator(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::StatementTagOpen
            | SyntaxKind::StatementTagClose
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::EndOfFileToken
    )
}

/// The end keyword that closes the alt form of `opener`.
pub fn alt_closer_for(opener: SyntaxKind) -> SyntaxKind {
    match opener {
        SyntaxKind::IfKeyword => SyntaxKind::EndifKeyword,
        SyntaxKind::ForKeyword => SyntaxKind::EndforKeyword,
        SyntaxKind::WhileKeyword => SyntaxKind::EndwhileKeyword,
        SyntaxKind::FunctionKeyword => SyntaxKind::EndfunctionKeyword,
        _ => SyntaxKind::Unknown,
    }
}

/// Statement list terminators of an alt-form body. Every closer is listed,
/// so a body closed with the wrong one stops there and the mismatch is
/// reported by the construct that opened it.
pub const ALT_BODY_TERMINATORS: &[SyntaxKind] = &[
    SyntaxKind::EndifKeyword,
    SyntaxKind::EndforKeyword,
    SyntaxKind::EndwhileKeyword,
    SyntaxKind::EndfunctionKeyword,
    SyntaxKind::CloseBraceToken,
];

/// Alt-form `if` bodies additionally stop at `elif` and `else`.
pub const ALT_IF_TERMINATORS: &[SyntaxKind] = &[
    SyntaxKind::ElifKeyword,
    SyntaxKind::ElseKeyword,
    SyntaxKind::EndifKeyword,
    SyntaxKind::EndforKeyword,
    SyntaxKind::EndwhileKeyword,
    SyntaxKind::EndfunctionKeyword,
    SyntaxKind::CloseBraceToken,
];

pub const BLOCK_TERMINATORS: &[SyntaxKind] = &[SyntaxKind::CloseBraceToken];

pub const CASE_CLAUSE_TERMINATORS: &[SyntaxKind] = &[
    SyntaxKind::CaseKeyword,
    SyntaxKind::DefaultKeyword,
    SyntaxKind::CloseBraceToken,
];

/// The value of a `NumberLiteral` token. Returns `None` when it does not
/// fit in 64 bits.
pub fn parse_integer_literal(text: &str) -> Option<u64> {
    let bytes = text.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => 16,
            b'b' | b'B' => 2,
            b'o' | b'O' => 8,
            _ => 10,
        };
        if radix != 10 {
            return u64::from_str_radix(&text[2..], radix).ok();
        }
    }
    text.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_literal() {
        assert_eq!(parse_integer_literal("42"), Some(42));
        assert_eq!(parse_integer_literal("0x1F"), Some(31));
        assert_eq!(parse_integer_literal("0b101"), Some(5));
        assert_eq!(parse_integer_literal("0o17"), Some(15));
        assert_eq!(parse_integer_literal("007"), Some(7));
        assert_eq!(parse_integer_literal("18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_integer_literal("18446744073709551616"), None);
    }

    #[test]
    fn test_alloc_vec_in() {
        let arena = Bump::new();
        let empty: &[u32] = alloc_vec_in(&arena, Vec::new());
        assert!(empty.is_empty());
        assert_eq!(alloc_vec_in(&arena, vec![1, 2, 3]), &[1, 2, 3]);
    }

    #[test]
    fn test_boundaries() {
        assert!(is_statement_boundary(SyntaxKind::StatementTagClose));
        assert!(is_statement_boundary(SyntaxKind::EndifKeyword));
        assert!(!is_statement_boundary(SyntaxKind::Identifier));
        assert_eq!(alt_closer_for(SyntaxKind::WhileKeyword), SyntaxKind::EndwhileKeyword);
    }
}
