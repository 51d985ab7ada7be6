//! ucode_diagnostics: structured parse diagnostics.
//!
//! Two classes of problems are reported while reading a template or program:
//! lexical errors (malformed tokens found by the scanner) and syntax errors
//! (tokens that cannot continue the current production). Both are collected
//! as [`Diagnostic`] values rather than aborting the parse, so one pass can
//! surface several independent mistakes.
//!
//! [`ParseError`] is the `std::error::Error` form of a single diagnostic,
//! used by fail-fast callers and rendered through `miette`.

use std::fmt;
use std::sync::Arc;

use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, Severity, SourceCode};
use thiserror::Error;
use ucode_core::text::TextSpan;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// What went wrong, independent of the rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Malformed token reported by the scanner.
    LexicalError,
    UnexpectedToken,
    /// A statement was not followed by `;`, a tag boundary, `}` or end of input.
    MissingTerminator,
    /// A block was opened in one form and closed with another form's closer.
    MismatchedCloser,
    InvalidAssignmentTarget,
    ReservedIdentifier,
    MalformedImport,
    MalformedExport,
    MissingInitializer,
    NestingTooDeep,
    DuplicateDefaultClause,
}

impl DiagnosticKind {
    #[inline]
    pub fn is_lexical(self) -> bool {
        self == DiagnosticKind::LexicalError
    }

    /// `"LexicalError"` or `"SyntaxError"`.
    pub fn class_name(self) -> &'static str {
        if self.is_lexical() {
            "LexicalError"
        } else {
            "SyntaxError"
        }
    }
}

/// A message template with a stable code. `{0}`, `{1}` are replaced by
/// arguments when the diagnostic is created.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
    pub message: &'static str,
}

/// A realized diagnostic with location and resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub file: Option<String>,
    pub span: Option<TextSpan>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
    /// Description of the construct the parser was looking for.
    pub expected: Option<String>,
    /// Text of the token actually found.
    pub found: Option<String>,
}

impl Diagnostic {
    /// A diagnostic without location, e.g. for options validation.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
            kind: message.kind,
            expected: None,
            found: None,
        }
    }

    pub fn with_location(
        file: String,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file: Some(file),
            span: Some(span),
            ..Self::new(message, args)
        }
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        }
        write!(
            f,
            "{} {} UC{}: {}",
            self.category,
            self.kind.class_name(),
            self.code,
            self.message_text
        )
    }
}

/// Replace `{0}`, `{1}`, ... in `template` with `args`.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Diagnostics accumulated by one scanner or parser.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// The most recently added diagnostic, for attaching expected/found text.
    pub fn last_mut(&mut self) -> Option<&mut Diagnostic> {
        self.diagnostics.last_mut()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// The earliest-reported error, if any.
    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.is_error())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Drop diagnostics added after the collection had `len` entries.
    /// Used when speculative scanning is rolled back.
    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sort by file, then by position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.file.cmp(&b.file).then_with(|| {
                let a_pos = a.span.map(|s| s.start).unwrap_or(0);
                let b_pos = b.span.map(|s| s.start).unwrap_or(0);
                a_pos.cmp(&b_pos)
            })
        });
    }
}

// ============================================================================
// Error type for fail-fast callers
// ============================================================================

/// A single diagnostic promoted to an error value, carrying the source text
/// so it can be rendered with a labelled snippet.
#[derive(Debug, Clone, Error)]
#[error("{file}: {message}")]
pub struct ParseError {
    pub file: String,
    pub message: String,
    pub code: u32,
    pub kind: DiagnosticKind,
    pub span: Option<TextSpan>,
    pub expected: Option<String>,
    source_code: Arc<NamedSource<String>>,
}

impl ParseError {
    pub fn from_diagnostic(diagnostic: &Diagnostic, file: &str, source: &str) -> Self {
        Self {
            file: diagnostic.file.clone().unwrap_or_else(|| file.to_string()),
            message: diagnostic.message_text.clone(),
            code: diagnostic.code,
            kind: diagnostic.kind,
            span: diagnostic.span,
            expected: diagnostic.expected.clone(),
            source_code: Arc::new(NamedSource::new(file, source.to_string())),
        }
    }
}

impl miette::Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("{}::UC{}", self.kind.class_name(), self.code)))
    }

    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.expected
            .as_ref()
            .map(|expected| Box::new(format!("expected {}", expected)) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(self.source_code.as_ref())
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let label = LabeledSpan::new_with_span(
            Some(self.message.clone()),
            (span.start as usize, span.length as usize),
        );
        Some(Box::new(std::iter::once(label)))
    }
}

/// Render every diagnostic with a source snippet, without colours.
pub fn render_diagnostics(diagnostics: &[Diagnostic], file: &str, source: &str) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    for diagnostic in diagnostics {
        let error = ParseError::from_diagnostic(diagnostic, file, source);
        if handler.render_report(&mut out, &error).is_err() {
            out.push_str(&diagnostic.to_string());
            out.push('\n');
        }
    }
    out
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $kind:ident, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::Error,
                kind: DiagnosticKind::$kind,
                message: $msg,
            }
        };
        ($code:expr, Warning, $kind:ident, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::Warning,
                kind: DiagnosticKind::$kind,
                message: $msg,
            }
        };
    }

    // ========================================================================
    // Scanner errors (1000-1099)
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, LexicalError, "Unterminated string literal.");
    pub const UNTERMINATED_TEMPLATE_LITERAL: DiagnosticMessage = diag!(1003, Error, LexicalError, "Unterminated template literal.");
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: DiagnosticMessage = diag!(1004, Error, LexicalError, "Unterminated regular expression literal.");
    pub const ASTERISK_SLASH_EXPECTED: DiagnosticMessage = diag!(1005, Error, LexicalError, "'*/' expected.");
    pub const COMMENT_TAG_CLOSE_EXPECTED: DiagnosticMessage = diag!(1006, Error, LexicalError, "'#}' expected.");
    pub const INVALID_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(1007, Error, LexicalError, "Invalid escape sequence.");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1008, Error, LexicalError, "Invalid character '{0}'.");
    pub const _0_DIGIT_EXPECTED: DiagnosticMessage = diag!(1009, Error, LexicalError, "{0} digit expected.");
    pub const INTEGER_LITERAL_TOO_LARGE: DiagnosticMessage = diag!(1010, Error, LexicalError, "Integer literal '{0}' is too large.");

    // ========================================================================
    // Parser errors (1100-1199)
    // ========================================================================
    pub const _0_EXPECTED: DiagnosticMessage = diag!(1101, Error, UnexpectedToken, "'{0}' expected.");
    pub const _0_EXPECTED_FOUND_1: DiagnosticMessage = diag!(1102, Error, UnexpectedToken, "'{0}' expected, found '{1}'.");
    pub const UNEXPECTED_TOKEN_0: DiagnosticMessage = diag!(1103, Error, UnexpectedToken, "Unexpected token '{0}'.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1104, Error, UnexpectedToken, "Expression expected.");
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1105, Error, UnexpectedToken, "Identifier expected.");
    pub const STATEMENT_EXPECTED: DiagnosticMessage = diag!(1106, Error, UnexpectedToken, "Statement expected.");
    pub const CASE_OR_DEFAULT_EXPECTED: DiagnosticMessage = diag!(1107, Error, UnexpectedToken, "'case' or 'default' expected.");
    pub const PROPERTY_ASSIGNMENT_EXPECTED: DiagnosticMessage = diag!(1108, Error, UnexpectedToken, "Property assignment expected.");
    pub const REST_PARAMETER_MUST_BE_LAST: DiagnosticMessage = diag!(1109, Error, UnexpectedToken, "A rest parameter must be last in a parameter list.");
    pub const END_OF_STATEMENT_EXPECTED: DiagnosticMessage = diag!(1110, Error, MissingTerminator, "';' expected, found '{0}'.");
    pub const _0_EXPECTED_TO_CLOSE_1: DiagnosticMessage = diag!(1111, Error, MismatchedCloser, "'{0}' expected to close '{1}', found '{2}'.");
    pub const RESERVED_WORD_0_CANNOT_BE_IDENTIFIER: DiagnosticMessage = diag!(1112, Error, ReservedIdentifier, "'{0}' is a reserved keyword and cannot be used as an identifier.");
    pub const INVALID_ASSIGNMENT_TARGET: DiagnosticMessage = diag!(1113, Error, InvalidAssignmentTarget, "Invalid assignment target.");
    pub const INVALID_UPDATE_OPERAND: DiagnosticMessage = diag!(1114, Error, InvalidAssignmentTarget, "Invalid assignment target: '{0}' needs a variable, property or element operand.");
    pub const INVALID_DELETE_OPERAND: DiagnosticMessage = diag!(1115, Error, InvalidAssignmentTarget, "Invalid assignment target: 'delete' needs a variable, property or element operand.");
    pub const CONST_DECLARATION_REQUIRES_INITIALIZER: DiagnosticMessage = diag!(1116, Error, MissingInitializer, "Constant '{0}' must be initialized.");
    pub const NESTING_TOO_DEEP: DiagnosticMessage = diag!(1117, Error, NestingTooDeep, "Expression nesting exceeds the limit of {0}.");
    pub const DUPLICATE_DEFAULT_CLAUSE: DiagnosticMessage = diag!(1118, Warning, DuplicateDefaultClause, "A 'default' clause appears more than once in a 'switch' statement.");
    pub const FUNCTION_EXPRESSION_ALT_FORM: DiagnosticMessage = diag!(1119, Error, UnexpectedToken, "Function expressions must use a '{ ... }' body.");

    // ========================================================================
    // Module errors (1200-1299)
    // ========================================================================
    pub const IMPORT_CLAUSE_EXPECTED: DiagnosticMessage = diag!(1201, Error, MalformedImport, "Default name, '* as name' or '{ ... }' expected after 'import'.");
    pub const IMPORTED_0_REQUIRES_ALIAS: DiagnosticMessage = diag!(1202, Error, MalformedImport, "Imported {0} must be renamed with 'as'.");
    pub const IMPORT_SPECIFIER_EXPECTED: DiagnosticMessage = diag!(1203, Error, MalformedImport, "Import name expected.");
    pub const MODULE_SPECIFIER_EXPECTED: DiagnosticMessage = diag!(1204, Error, MalformedImport, "Module name string expected after 'from'.");
    pub const EXPORT_BODY_EXPECTED: DiagnosticMessage = diag!(1205, Error, MalformedExport, "Export list, 'const', 'let', 'function' or 'default' expected after 'export'.");
    pub const EXPORT_ALIAS_EXPECTED: DiagnosticMessage = diag!(1206, Error, MalformedExport, "Export alias expected after 'as'.");
    pub const EXPORT_FUNCTION_ALT_FORM: DiagnosticMessage = diag!(1207, Error, MalformedExport, "Exported functions must use a '{ ... }' body.");
    pub const EXPORT_SPECIFIER_EXPECTED: DiagnosticMessage = diag!(1208, Error, MalformedExport, "Export name expected.");
    pub const FROM_EXPECTED_AFTER_IMPORT_CLAUSE: DiagnosticMessage = diag!(1209, Error, MalformedImport, "'from' expected after import clause, found '{0}'.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        assert_eq!(format_message("'{0}' expected.", &["endif"]), "'endif' expected.");
        assert_eq!(
            format_message("'{0}' expected to close '{1}', found '{2}'.", &["endif", "if", "}"]),
            "'endif' expected to close 'if', found '}'."
        );
        assert_eq!(format_message("no args", &[]), "no args");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::with_location(
            "page.ut".to_string(),
            TextSpan::new(10, 1),
            &messages::INVALID_ASSIGNMENT_TARGET,
            &[],
        );
        assert_eq!(diag.to_string(), "page.ut(10): error SyntaxError UC1113: Invalid assignment target.");
        assert_eq!(diag.kind, DiagnosticKind::InvalidAssignmentTarget);
    }

    #[test]
    fn test_lexical_class() {
        let diag = Diagnostic::new(&messages::UNTERMINATED_STRING_LITERAL, &[]);
        assert!(diag.kind.is_lexical());
        assert_eq!(diag.kind.class_name(), "LexicalError");
        assert_eq!(diag.to_string(), "error LexicalError UC1002: Unterminated string literal.");
    }

    #[test]
    fn test_collection_counts_errors_only() {
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::new(&messages::DUPLICATE_DEFAULT_CLAUSE, &[]));
        assert!(!collection.has_errors());
        collection.add(Diagnostic::new(&messages::EXPRESSION_EXPECTED, &[]));
        assert!(collection.has_errors());
        assert_eq!(collection.error_count(), 1);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.first_error().map(|d| d.code), Some(1104));
        collection.truncate(1);
        assert!(!collection.has_errors());
    }

    #[test]
    fn test_sort_by_position() {
        let mut collection = DiagnosticCollection::new();
        for start in [30u32, 5, 12] {
            collection.add(Diagnostic::with_location(
                "a.uc".to_string(),
                TextSpan::new(start, 1),
                &messages::EXPRESSION_EXPECTED,
                &[],
            ));
        }
        collection.sort();
        let starts: Vec<_> = collection.diagnostics().iter().filter_map(|d| d.span).map(|s| s.start).collect();
        assert_eq!(starts, vec![5, 12, 30]);
    }

    #[test]
    fn test_parse_error_renders_snippet() {
        let source = "let x = ;";
        let diag = Diagnostic::with_location(
            "a.uc".to_string(),
            TextSpan::new(8, 1),
            &messages::EXPRESSION_EXPECTED,
            &[],
        )
        .with_expected("expression");
        let error = ParseError::from_diagnostic(&diag, "a.uc", source);
        assert_eq!(error.to_string(), "a.uc: Expression expected.");

        let rendered = render_diagnostics(&[diag], "a.uc", source);
        assert!(rendered.contains("Expression expected."));
        assert!(rendered.contains("let x = ;"));
        assert!(rendered.contains("expected expression"));
    }
}
