//! Scanner integration tests.
//!
//! Verifies tokenization of markup tags, code tokens, literals and the
//! lexical errors the scanner reports.

use ucode_ast::syntax_kind::SyntaxKind;
use ucode_ast::types::{SourceMode, TokenFlags};
use ucode_diagnostics::DiagnosticKind;
use ucode_scanner::Scanner;

/// Helper: scan all tokens from source and return as (kind, value) pairs.
fn scan_all(source: &str, mode: SourceMode) -> Vec<(SyntaxKind, String)> {
    let mut scanner = Scanner::new(source, mode);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.token_value().to_string()));
    }
    tokens
}

fn program(source: &str) -> Vec<(SyntaxKind, String)> {
    scan_all(source, SourceMode::Program)
}

/// Helper: scan all token kinds.
fn program_kinds(source: &str) -> Vec<SyntaxKind> {
    program(source).into_iter().map(|(k, _)| k).collect()
}

fn markup_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source, SourceMode::Markup).into_iter().map(|(k, _)| k).collect()
}

/// Scan a single program token and return it with its flags.
fn first_token(source: &str) -> (SyntaxKind, String, TokenFlags) {
    let mut scanner = Scanner::new(source, SourceMode::Program);
    let kind = scanner.scan();
    (kind, scanner.token_value().to_string(), scanner.token_flags())
}

// ============================================================================
// Markup
// ============================================================================

#[test]
fn test_empty_source() {
    assert!(scan_all("", SourceMode::Markup).is_empty());
    assert!(scan_all("", SourceMode::Program).is_empty());
}

#[test]
fn test_whitespace_only_program() {
    assert!(program("   \n\t  ").is_empty());
}

#[test]
fn test_plain_text_is_one_token() {
    let tokens = scan_all("Hello, world!\n", SourceMode::Markup);
    assert_eq!(tokens, vec![(SyntaxKind::RawText, "Hello, world!\n".to_string())]);
}

#[test]
fn test_lone_brace_stays_in_text() {
    let tokens = scan_all("a { b } c", SourceMode::Markup);
    assert_eq!(tokens, vec![(SyntaxKind::RawText, "a { b } c".to_string())]);
}

#[test]
fn test_expression_tag() {
    assert_eq!(
        markup_kinds("Hi {{ name }}!"),
        vec![
            SyntaxKind::RawText,
            SyntaxKind::ExpressionTagOpen,
            SyntaxKind::Identifier,
            SyntaxKind::ExpressionTagClose,
            SyntaxKind::RawText,
        ]
    );
}

#[test]
fn test_statement_tag() {
    assert_eq!(
        markup_kinds("{% if (x): %}yes{% endif %}"),
        vec![
            SyntaxKind::StatementTagOpen,
            SyntaxKind::IfKeyword,
            SyntaxKind::OpenParenToken,
            SyntaxKind::Identifier,
            SyntaxKind::CloseParenToken,
            SyntaxKind::ColonToken,
            SyntaxKind::StatementTagClose,
            SyntaxKind::RawText,
            SyntaxKind::StatementTagOpen,
            SyntaxKind::EndifKeyword,
            SyntaxKind::StatementTagClose,
        ]
    );
}

#[test]
fn test_percent_operator_inside_statement_tag() {
    assert_eq!(
        markup_kinds("{% x = a % b %}"),
        vec![
            SyntaxKind::StatementTagOpen,
            SyntaxKind::Identifier,
            SyntaxKind::EqualsToken,
            SyntaxKind::Identifier,
            SyntaxKind::PercentToken,
            SyntaxKind::Identifier,
            SyntaxKind::StatementTagClose,
        ]
    );
}

#[test]
fn test_raw_comment() {
    let tokens = scan_all("a{# note #}b", SourceMode::Markup);
    assert_eq!(
        tokens,
        vec![
            (SyntaxKind::RawText, "a".to_string()),
            (SyntaxKind::RawComment, " note ".to_string()),
            (SyntaxKind::RawText, "b".to_string()),
        ]
    );
}

#[test]
fn test_unterminated_raw_comment() {
    let mut scanner = Scanner::new("{# never closed", SourceMode::Markup);
    assert_eq!(scanner.scan(), SyntaxKind::ErrorToken);
    assert!(scanner.token_flags().contains(TokenFlags::UNTERMINATED));
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    assert_eq!(scanner.diagnostics().len(), 1);
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1006);
}

#[test]
fn test_strip_markers() {
    let mut scanner = Scanner::new("a {{- x -}} b", SourceMode::Markup);
    assert_eq!(scanner.scan(), SyntaxKind::RawText);
    assert!(scanner.token_flags().contains(TokenFlags::TRIM_END));
    assert!(!scanner.token_flags().contains(TokenFlags::TRIM_START));

    assert_eq!(scanner.scan(), SyntaxKind::ExpressionTagOpen);
    assert!(scanner.token_flags().contains(TokenFlags::STRIP_WHITESPACE));
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::ExpressionTagClose);
    assert!(scanner.token_flags().contains(TokenFlags::STRIP_WHITESPACE));

    assert_eq!(scanner.scan(), SyntaxKind::RawText);
    assert_eq!(scanner.token_value(), " b");
    assert!(scanner.token_flags().contains(TokenFlags::TRIM_START));
}

#[test]
fn test_keep_whitespace_marker() {
    let mut scanner = Scanner::new("{%+ x %}", SourceMode::Markup);
    assert_eq!(scanner.scan(), SyntaxKind::StatementTagOpen);
    assert!(scanner.token_flags().contains(TokenFlags::KEEP_WHITESPACE));
    assert_eq!(scanner.token_end(), 3);
}

#[test]
fn test_statement_tag_strip_close() {
    let mut scanner = Scanner::new("{% x -%}\n  y", SourceMode::Markup);
    scanner.scan();
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::StatementTagClose);
    assert!(scanner.token_flags().contains(TokenFlags::STRIP_WHITESPACE));
    assert_eq!(scanner.scan(), SyntaxKind::RawText);
    assert!(scanner.token_flags().contains(TokenFlags::TRIM_START));
}

#[test]
fn test_line_comment_stops_at_tag_close() {
    assert_eq!(
        markup_kinds("{% x // note %}after"),
        vec![
            SyntaxKind::StatementTagOpen,
            SyntaxKind::Identifier,
            SyntaxKind::StatementTagClose,
            SyntaxKind::RawText,
        ]
    );
}

#[test]
fn test_nested_braces_do_not_close_expression_tag() {
    assert_eq!(
        markup_kinds("{{ f({a: 1}) }}"),
        vec![
            SyntaxKind::ExpressionTagOpen,
            SyntaxKind::Identifier,
            SyntaxKind::OpenParenToken,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::Identifier,
            SyntaxKind::ColonToken,
            SyntaxKind::NumberLiteral,
            SyntaxKind::CloseBraceToken,
            SyntaxKind::CloseParenToken,
            SyntaxKind::ExpressionTagClose,
        ]
    );
}

#[test]
fn test_tags_are_not_recognized_in_program_mode() {
    let kinds = program_kinds("{% x %}");
    assert_eq!(kinds[0], SyntaxKind::OpenBraceToken);
    assert_eq!(kinds[1], SyntaxKind::PercentToken);
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_numeric_literals() {
    assert_eq!(first_token("42").0, SyntaxKind::NumberLiteral);
    assert_eq!(first_token("42").1, "42");

    assert_eq!(first_token("3.14").0, SyntaxKind::DoubleLiteral);
    assert_eq!(first_token("1.").0, SyntaxKind::DoubleLiteral);

    let (kind, value, flags) = first_token("0xFF");
    assert_eq!(kind, SyntaxKind::NumberLiteral);
    assert_eq!(value, "0xFF");
    assert!(flags.contains(TokenFlags::HEX_SPECIFIER));

    assert!(first_token("0b1010").2.contains(TokenFlags::BINARY_SPECIFIER));
    assert!(first_token("0o17").2.contains(TokenFlags::OCTAL_SPECIFIER));

    let (kind, _, flags) = first_token("1e10");
    assert_eq!(kind, SyntaxKind::DoubleLiteral);
    assert!(flags.contains(TokenFlags::SCIENTIFIC));
    assert_eq!(first_token("2.5e-3").1, "2.5e-3");
}

#[test]
fn test_exponent_without_digits_is_identifier() {
    assert_eq!(
        program("1em"),
        vec![
            (SyntaxKind::NumberLiteral, "1".to_string()),
            (SyntaxKind::Identifier, "em".to_string()),
        ]
    );
}

#[test]
fn test_radix_prefix_without_digits() {
    let mut scanner = Scanner::new("0x;", SourceMode::Program);
    assert_eq!(scanner.scan(), SyntaxKind::ErrorToken);
    assert_eq!(scanner.diagnostics().diagnostics()[0].message_text, "Hexadecimal digit expected.");
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_literals() {
    assert_eq!(program("\"hello\""), vec![(SyntaxKind::StringLiteral, "hello".to_string())]);
    assert_eq!(program("'world'"), vec![(SyntaxKind::StringLiteral, "world".to_string())]);
    assert_eq!(program("'it\"s'"), vec![(SyntaxKind::StringLiteral, "it\"s".to_string())]);
}

#[test]
fn test_string_escapes() {
    let (kind, value, flags) = first_token(r#""a\tb\n\x41é\101\q""#);
    assert_eq!(kind, SyntaxKind::StringLiteral);
    assert_eq!(value, "a\tb\nA\u{e9}Aq");
    assert!(flags.contains(TokenFlags::CONTAINS_ESCAPE));
}

#[test]
fn test_surrogate_pair_escape() {
    let (_, value, _) = first_token(r#""\ud83d\ude00""#);
    assert_eq!(value, "\u{1F600}");
    let (_, value, _) = first_token(r#""\ud83d""#);
    assert_eq!(value, "\u{FFFD}");
}

#[test]
fn test_invalid_escape() {
    let mut scanner = Scanner::new(r#""\x4""#, SourceMode::Program);
    assert_eq!(scanner.scan(), SyntaxKind::ErrorToken);
    assert!(scanner.token_flags().contains(TokenFlags::CONTAINS_INVALID_ESCAPE));
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1007);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn test_unterminated_string() {
    let mut scanner = Scanner::new("'abc", SourceMode::Program);
    assert_eq!(scanner.scan(), SyntaxKind::ErrorToken);
    assert!(scanner.token_flags().contains(TokenFlags::UNTERMINATED));
    let diagnostic = &scanner.diagnostics().diagnostics()[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::LexicalError);
    assert_eq!(diagnostic.code, 1002);
}

#[test]
fn test_multibyte_string() {
    assert_eq!(program("'héllo wörld'"), vec![(SyntaxKind::StringLiteral, "héllo wörld".to_string())]);
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn test_template_without_placeholders() {
    assert_eq!(program("`hello`"), vec![(SyntaxKind::TemplateSegment, "hello".to_string())]);
}

#[test]
fn test_template_with_placeholders() {
    assert_eq!(
        program("`a${x}b${ {k: 1}.k }c`"),
        vec![
            (SyntaxKind::TemplateSegment, "a".to_string()),
            (SyntaxKind::PlaceholderOpen, String::new()),
            (SyntaxKind::Identifier, "x".to_string()),
            (SyntaxKind::PlaceholderClose, String::new()),
            (SyntaxKind::TemplateSegment, "b".to_string()),
            (SyntaxKind::PlaceholderOpen, String::new()),
            (SyntaxKind::OpenBraceToken, String::new()),
            (SyntaxKind::Identifier, "k".to_string()),
            (SyntaxKind::ColonToken, String::new()),
            (SyntaxKind::NumberLiteral, "1".to_string()),
            (SyntaxKind::CloseBraceToken, String::new()),
            (SyntaxKind::DotToken, String::new()),
            (SyntaxKind::Identifier, "k".to_string()),
            (SyntaxKind::PlaceholderClose, String::new()),
            (SyntaxKind::TemplateSegment, "c".to_string()),
        ]
    );
}

#[test]
fn test_nested_template() {
    assert_eq!(
        program_kinds("`a${`b${c}`}d`"),
        vec![
            SyntaxKind::TemplateSegment,
            SyntaxKind::PlaceholderOpen,
            SyntaxKind::TemplateSegment,
            SyntaxKind::PlaceholderOpen,
            SyntaxKind::Identifier,
            SyntaxKind::PlaceholderClose,
            SyntaxKind::TemplateSegment,
            SyntaxKind::PlaceholderClose,
            SyntaxKind::TemplateSegment,
        ]
    );
}

#[test]
fn test_template_dollar_without_brace() {
    assert_eq!(program("`cost: $5`"), vec![(SyntaxKind::TemplateSegment, "cost: $5".to_string())]);
}

#[test]
fn test_unterminated_template() {
    let mut scanner = Scanner::new("`abc", SourceMode::Program);
    assert_eq!(scanner.scan(), SyntaxKind::TemplateSegment);
    assert!(scanner.token_flags().contains(TokenFlags::UNTERMINATED));
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1003);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

// ============================================================================
// Regular expressions
// ============================================================================

#[test]
fn test_rescan_regex() {
    let mut scanner = Scanner::new("/a[/]b\\//gi;", SourceMode::Program);
    assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
    assert_eq!(scanner.rescan_slash_token(), SyntaxKind::RegexPattern);
    assert_eq!(scanner.token_value(), "a[/]b\\/");
    assert_eq!(scanner.scan(), SyntaxKind::RegexFlags);
    assert_eq!(scanner.token_value(), "gi");
    assert_eq!(scanner.scan(), SyntaxKind::SemicolonToken);
}

#[test]
fn test_rescan_regex_without_flags() {
    let mut scanner = Scanner::new("/=x/ ", SourceMode::Program);
    assert_eq!(scanner.scan(), SyntaxKind::SlashEqualsToken);
    assert_eq!(scanner.rescan_slash_token(), SyntaxKind::RegexPattern);
    assert_eq!(scanner.token_value(), "=x");
    assert_eq!(scanner.scan(), SyntaxKind::RegexFlags);
    assert_eq!(scanner.token_value(), "");
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn test_unterminated_regex() {
    let mut scanner = Scanner::new("/abc", SourceMode::Program);
    scanner.scan();
    assert_eq!(scanner.rescan_slash_token(), SyntaxKind::ErrorToken);
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1004);
}

// ============================================================================
// Punctuation and keywords
// ============================================================================

#[test]
fn test_keywords() {
    assert_eq!(
        program_kinds("if elif else endif for endfor while endwhile function endfunction"),
        vec![
            SyntaxKind::IfKeyword,
            SyntaxKind::ElifKeyword,
            SyntaxKind::ElseKeyword,
            SyntaxKind::EndifKeyword,
            SyntaxKind::ForKeyword,
            SyntaxKind::EndforKeyword,
            SyntaxKind::WhileKeyword,
            SyntaxKind::EndwhileKeyword,
            SyntaxKind::FunctionKeyword,
            SyntaxKind::EndfunctionKeyword,
        ]
    );
}

#[test]
fn test_contextual_words_are_identifiers() {
    assert_eq!(
        program_kinds("from as of"),
        vec![SyntaxKind::Identifier, SyntaxKind::Identifier, SyntaxKind::Identifier]
    );
}

#[test]
fn test_operators() {
    assert_eq!(
        program_kinds("=== !== ** **= ?? ??= ?. ... => >>= << &&= ||="),
        vec![
            SyntaxKind::EqualsEqualsEqualsToken,
            SyntaxKind::ExclamationEqualsEqualsToken,
            SyntaxKind::AsteriskAsteriskToken,
            SyntaxKind::AsteriskAsteriskEqualsToken,
            SyntaxKind::QuestionQuestionToken,
            SyntaxKind::QuestionQuestionEqualsToken,
            SyntaxKind::QuestionDotToken,
            SyntaxKind::DotDotDotToken,
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::GreaterThanGreaterThanEqualsToken,
            SyntaxKind::LessThanLessThanToken,
            SyntaxKind::AmpersandAmpersandEqualsToken,
            SyntaxKind::BarBarEqualsToken,
        ]
    );
}

#[test]
fn test_question_dot_before_digit() {
    assert_eq!(
        program_kinds("a?.5:b"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionToken,
            SyntaxKind::DoubleLiteral,
            SyntaxKind::ColonToken,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        program_kinds("a // line\n/* block */ b"),
        vec![SyntaxKind::Identifier, SyntaxKind::Identifier]
    );
}

#[test]
fn test_preceding_line_break() {
    let mut scanner = Scanner::new("a\nb", SourceMode::Program);
    scanner.scan();
    assert!(!scanner.has_preceding_line_break());
    scanner.scan();
    assert!(scanner.has_preceding_line_break());
}

#[test]
fn test_unterminated_block_comment() {
    let mut scanner = Scanner::new("a /* never", SourceMode::Program);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1005);
}

#[test]
fn test_invalid_character() {
    let mut scanner = Scanner::new("a @ b", SourceMode::Program);
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::ErrorToken);
    assert_eq!(scanner.token_value(), "@");
    assert_eq!(scanner.diagnostics().diagnostics()[0].message_text, "Invalid character '@'.");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
}

#[test]
fn test_token_positions() {
    let mut scanner = Scanner::new("let x = 42;", SourceMode::Program);
    assert_eq!(scanner.scan(), SyntaxKind::LetKeyword);
    assert_eq!((scanner.token_start(), scanner.token_end()), (0, 3));
    scanner.scan();
    assert_eq!(scanner.token_text(), "x");
    scanner.scan();
    scanner.scan();
    let info = scanner.token_info();
    assert_eq!(info.kind, SyntaxKind::NumberLiteral);
    assert_eq!((info.pos, info.end), (8, 10));
    assert_eq!(info.text, "42");
}
