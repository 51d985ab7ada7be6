//! Operator precedence for binary operators.

use ucode_ast::syntax_kind::SyntaxKind;

/// Operator precedence levels, lowest binding first.
///
/// Ternary `?:` and `??` share the [`Conditional`](Self::Conditional) band
/// and associate left to right among themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
#[allow(dead_code)]
pub enum OperatorPrecedence {
    Lowest = 0,
    Sequence = 1,
    Assignment = 2,
    Conditional = 3,
    LogicalOr = 4,
    LogicalAnd = 5,
    BitwiseOr = 6,
    BitwiseXor = 7,
    BitwiseAnd = 8,
    Equality = 9,
    Relational = 10,
    Shift = 11,
    Additive = 12,
    Multiplicative = 13,
    Exponentiation = 14,
    Unary = 15,
    Update = 16,
    Member = 17,
    Invalid = 255,
}

/// Get the binary operator precedence for a given token kind.
pub fn get_binary_operator_precedence(kind: SyntaxKind) -> OperatorPrecedence {
    match kind {
        SyntaxKind::QuestionQuestionToken => OperatorPrecedence::Conditional,
        SyntaxKind::BarBarToken => OperatorPrecedence::LogicalOr,
        SyntaxKind::AmpersandAmpersandToken => OperatorPrecedence::LogicalAnd,
        SyntaxKind::BarToken => OperatorPrecedence::BitwiseOr,
        SyntaxKind::CaretToken => OperatorPrecedence::BitwiseXor,
        SyntaxKind::AmpersandToken => OperatorPrecedence::BitwiseAnd,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => OperatorPrecedence::Equality,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken
        | SyntaxKind::InKeyword => OperatorPrecedence::Relational,
        SyntaxKind::LessThanLessThanToken | SyntaxKind::GreaterThanGreaterThanToken => OperatorPrecedence::Shift,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => OperatorPrecedence::Additive,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => {
            OperatorPrecedence::Multiplicative
        }
        SyntaxKind::AsteriskAsteriskToken => OperatorPrecedence::Exponentiation,
        _ => OperatorPrecedence::Invalid,
    }
}

/// `**` is the only right-associative binary operator.
#[inline]
pub fn is_right_associative(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::AsteriskAsteriskToken
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        let p = get_binary_operator_precedence;
        assert!(p(SyntaxKind::AsteriskAsteriskToken) > p(SyntaxKind::AsteriskToken));
        assert!(p(SyntaxKind::AsteriskToken) > p(SyntaxKind::PlusToken));
        assert!(p(SyntaxKind::PlusToken) > p(SyntaxKind::LessThanLessThanToken));
        assert!(p(SyntaxKind::InKeyword) > p(SyntaxKind::EqualsEqualsToken));
        assert!(p(SyntaxKind::AmpersandToken) > p(SyntaxKind::CaretToken));
        assert!(p(SyntaxKind::CaretToken) > p(SyntaxKind::BarToken));
        assert!(p(SyntaxKind::AmpersandAmpersandToken) > p(SyntaxKind::BarBarToken));
        assert!(p(SyntaxKind::BarBarToken) > p(SyntaxKind::QuestionQuestionToken));
    }

    #[test]
    fn test_non_operators_are_invalid() {
        assert_eq!(get_binary_operator_precedence(SyntaxKind::EqualsToken), OperatorPrecedence::Invalid);
        assert_eq!(get_binary_operator_precedence(SyntaxKind::QuestionToken), OperatorPrecedence::Invalid);
        assert_eq!(get_binary_operator_precedence(SyntaxKind::Identifier), OperatorPrecedence::Invalid);
        assert!(is_right_associative(SyntaxKind::AsteriskAsteriskToken));
        assert!(!is_right_associative(SyntaxKind::MinusToken));
    }
}
