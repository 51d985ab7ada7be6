//! The ucode parser.
//!
//! A recursive descent parser over the token stream of [`Scanner`]. Nodes
//! are allocated in a caller-supplied arena. Syntax errors never abort the
//! parse: each one is recorded as a [`Diagnostic`], a placeholder node flagged
//! [`NodeFlags::MISSING`] stands in for the broken construct, and the
//! innermost statement list resynchronizes at the next statement boundary.
//!
//! Productions are split across modules by area: statements live in
//! `statement.rs`, expressions in `expression.rs` and `import`/`export` in
//! `module.rs`. This file holds the parser state, token handling, error
//! reporting and statement-list recovery.

use bumpalo::Bump;
use tracing::debug;
use ucode_ast::node::*;
use ucode_ast::syntax_kind::SyntaxKind;
use ucode_ast::types::*;
use ucode_core::intern::StringInterner;
use ucode_core::text::TextSpan;
use ucode_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use ucode_options::ParseOptions;
use ucode_scanner::Scanner;

use crate::utilities::{alloc_vec_in, is_statement_boundary, is_tag_boundary};

/// A parsed source plus everything that went wrong while parsing it.
///
/// The tree is always produced. It is only trustworthy when
/// [`ParseResult::has_errors`] is false.
#[derive(Debug)]
pub struct ParseResult<'a> {
    pub source_file: SourceFile<'a>,
    /// Lexical and syntax diagnostics, sorted by position.
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> ParseResult<'a> {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.is_error())
    }
}

/// The parser produces a SourceFile AST from template or program text.
pub struct Parser<'a> {
    pub(crate) arena: &'a Bump,
    pub(crate) scanner: Scanner,
    pub(crate) file_name: String,
    pub(crate) source_len: u32,
    pub(crate) options: ParseOptions,
    pub(crate) interner: StringInterner,
    pub(crate) diagnostics: DiagnosticCollection,
    /// Current nesting of expressions and statements.
    pub(crate) recursion_depth: u32,
    /// End offset and kind of the last consumed token.
    pub(crate) prev_token_end: u32,
    pub(crate) prev_token_kind: SyntaxKind,
    /// Set when a syntax error left the token stream mid-construct. The
    /// innermost statement list skips to the next boundary and clears it.
    pub(crate) pending_recovery: bool,
    /// Start of the last reported error. A second error at the same offset
    /// is dropped.
    pub(crate) last_error_pos: Option<u32>,
    /// Fail-fast mode hit an error; every production now sees end of input.
    pub(crate) aborted: bool,
}

impl<'a> Parser<'a> {
    pub fn new(arena: &'a Bump, file_name: &str, source_text: &str, options: &ParseOptions) -> Self {
        Self {
            arena,
            scanner: Scanner::new(source_text, options.mode),
            file_name: file_name.to_string(),
            source_len: source_text.len() as u32,
            options: options.clone(),
            interner: StringInterner::new(),
            diagnostics: DiagnosticCollection::new(),
            recursion_depth: 0,
            prev_token_end: 0,
            prev_token_kind: SyntaxKind::Unknown,
            pending_recovery: false,
            last_error_pos: None,
            aborted: false,
        }
    }

    /// Intern identifiers into a table shared with other parse sessions.
    pub fn with_interner(mut self, interner: StringInterner) -> Self {
        self.interner = interner;
        self
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn parse_source_file(mut self) -> ParseResult<'a> {
        let hash_bang = if self.options.allow_hash_bang {
            self.scanner.skip_hash_bang()
        } else {
            None
        };
        self.next_token();

        let statements = self.parse_statement_list(&[]);
        if statements.is_empty() && !self.aborted {
            let pos = self.token_pos();
            self.report_at(pos, pos, &messages::STATEMENT_EXPECTED, &[], true);
        }

        let end = self.source_len;
        let source_file = SourceFile {
            data: NodeData::new(SyntaxKind::SourceFile, 0, end),
            statements,
            end_of_file_token: Token::new(SyntaxKind::EndOfFileToken, end, end),
            file_name: self.file_name.clone(),
            mode: self.options.mode,
            hash_bang,
        };
        let diagnostics = self.finish_diagnostics();
        ParseResult {
            source_file,
            diagnostics,
        }
    }

    /// Merge scanner and parser diagnostics into one position-ordered list.
    fn finish_diagnostics(&mut self) -> Vec<Diagnostic> {
        let mut collection = std::mem::take(&mut self.diagnostics);
        let mut lexical = self.scanner.take_diagnostics().into_diagnostics();
        for diagnostic in lexical.iter_mut() {
            diagnostic.file.get_or_insert_with(|| self.file_name.clone());
        }
        for diagnostic in lexical {
            collection.add(diagnostic);
        }
        collection.sort();
        collection.into_diagnostics()
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    pub(crate) fn current_token(&self) -> SyntaxKind {
        if self.aborted {
            SyntaxKind::EndOfFileToken
        } else {
            self.scanner.token()
        }
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        if self.aborted {
            return SyntaxKind::EndOfFileToken;
        }
        self.prev_token_end = self.scanner.token_end() as u32;
        self.prev_token_kind = self.scanner.token();
        let kind = self.scanner.scan();
        if self.options.fail_fast && self.scanner.diagnostics().has_errors() {
            self.aborted = true;
        }
        kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.token_start() as u32
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.token_end() as u32
    }

    #[inline]
    pub(crate) fn token_value(&self) -> &str {
        self.scanner.token_value()
    }

    /// Whether the current token is the identifier `text`. Used for the
    /// contextual words `from` and `as`.
    pub(crate) fn is_identifier_text(&self, text: &str) -> bool {
        self.current_token() == SyntaxKind::Identifier && self.token_value() == text
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.current_token() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report `'x' expected, found 'y'`.
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        self.error_expected(kind.display_text());
        false
    }

    pub(crate) fn optional_token(&mut self, kind: SyntaxKind) -> Option<Token> {
        if self.current_token() == kind {
            let token = Token::new(kind, self.token_pos(), self.token_end());
            self.next_token();
            Some(token)
        } else {
            None
        }
    }

    /// Node data spanning `pos` to the end of the last consumed token.
    #[inline]
    pub(crate) fn node_data(&self, kind: SyntaxKind, pos: u32) -> NodeData {
        NodeData::new(kind, pos, self.prev_token_end.max(pos))
    }

    /// Allocate a node in the arena.
    #[inline]
    pub(crate) fn alloc<T>(&self, value: T) -> &'a T {
        self.arena.alloc(value)
    }

    #[inline]
    pub(crate) fn alloc_slice<T>(&self, values: Vec<T>) -> &'a [T] {
        alloc_vec_in(self.arena, values)
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Text of the current token for `found '...'` messages.
    pub(crate) fn found_text(&self) -> String {
        match self.current_token() {
            SyntaxKind::Identifier
            | SyntaxKind::NumberLiteral
            | SyntaxKind::DoubleLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::ErrorToken => {
                let text = self.scanner.token_text();
                match text.char_indices().nth(24) {
                    Some((cut, _)) => format!("{}...", &text[..cut]),
                    None => text.to_string(),
                }
            }
            kind => kind.display_text().to_string(),
        }
    }

    /// Record a diagnostic spanning `pos..end`. `resync` marks errors that
    /// leave the token stream inside a broken construct.
    pub(crate) fn report_at(
        &mut self,
        pos: u32,
        end: u32,
        message: &DiagnosticMessage,
        args: &[&str],
        resync: bool,
    ) -> Option<&mut Diagnostic> {
        let diagnostic = Diagnostic::with_location(
            self.file_name.clone(),
            TextSpan::from_bounds(pos, end.max(pos)),
            message,
            args,
        );
        self.report(diagnostic, resync)
    }

    fn report(&mut self, diagnostic: Diagnostic, resync: bool) -> Option<&mut Diagnostic> {
        if self.aborted {
            return None;
        }
        if diagnostic.is_error() {
            let start = diagnostic.span.map(|s| s.start);
            if start.is_some() && start == self.last_error_pos {
                return None;
            }
            self.last_error_pos = start;
            if resync {
                self.pending_recovery = true;
            }
            if self.options.fail_fast {
                self.aborted = true;
            }
        }
        self.diagnostics.add(diagnostic);
        self.diagnostics.last_mut()
    }

    /// Error at the current token.
    pub(crate) fn error(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let (pos, end) = (self.token_pos(), self.token_end());
        self.report_at(pos, end, message, args, true);
    }

    /// `'expected' expected, found '<current token>'`.
    pub(crate) fn error_expected(&mut self, expected: &str) {
        let found = self.found_text();
        let (pos, end) = (self.token_pos(), self.token_end());
        if let Some(diagnostic) = self.report_at(pos, end, &messages::_0_EXPECTED_FOUND_1, &[expected, &found], true) {
            diagnostic.expected = Some(expected.to_string());
            diagnostic.found = Some(found);
        }
    }

    /// Error at the current token that names what was expected.
    pub(crate) fn error_with_expected(&mut self, message: &DiagnosticMessage, args: &[&str], expected: &str) {
        let found = self.found_text();
        let (pos, end) = (self.token_pos(), self.token_end());
        if let Some(diagnostic) = self.report_at(pos, end, message, args, true) {
            diagnostic.expected = Some(expected.to_string());
            diagnostic.found = Some(found);
        }
    }

    /// A well-formed construct that is not allowed where it appears, such as
    /// an invalid assignment target. The token stream stays in sync.
    pub(crate) fn error_on_node(&mut self, data: &NodeData, message: &DiagnosticMessage, args: &[&str]) {
        self.report_at(data.range.pos, data.range.end, message, args, false);
    }

    /// Track one more level of nesting. Returns false, after reporting, when
    /// the configured limit is exceeded; the caller must then build a
    /// missing node without recursing.
    pub(crate) fn enter_nesting(&mut self) -> bool {
        self.recursion_depth += 1;
        if self.recursion_depth > self.options.max_nesting_depth {
            let limit = self.options.max_nesting_depth.to_string();
            self.error(&messages::NESTING_TOO_DEEP, &[&limit]);
            self.recursion_depth -= 1;
            return false;
        }
        true
    }

    #[inline]
    pub(crate) fn exit_nesting(&mut self) {
        self.recursion_depth -= 1;
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// Build an identifier from the current word token and consume it.
    pub(crate) fn parse_word(&mut self) -> Identifier<'a> {
        let (pos, end) = (self.token_pos(), self.token_end());
        let name: &'a str = self.arena.alloc_str(self.scanner.token_value());
        let text = self.interner.intern(name);
        self.next_token();
        Identifier {
            data: NodeData::new(SyntaxKind::Identifier, pos, end),
            text,
            name,
        }
    }

    /// A zero-width identifier standing in for one that failed to parse.
    pub(crate) fn missing_identifier(&self) -> Identifier<'a> {
        let pos = self.token_pos();
        Identifier {
            data: NodeData::new(SyntaxKind::Identifier, pos, pos).with_flags(NodeFlags::MISSING),
            text: self.interner.intern_static(""),
            name: "",
        }
    }

    /// An identifier that introduces a name: variables, parameters, import
    /// bindings. Keywords are rejected.
    pub(crate) fn parse_binding_identifier(&mut self) -> Identifier<'a> {
        match self.current_token() {
            SyntaxKind::Identifier => self.parse_word(),
            kind if kind.is_keyword() => {
                let keyword = kind.display_text();
                let (pos, end) = (self.token_pos(), self.token_end());
                self.report_at(pos, end, &messages::RESERVED_WORD_0_CANNOT_BE_IDENTIFIER, &[keyword], false);
                self.parse_word()
            }
            _ => {
                self.error_with_expected(&messages::IDENTIFIER_EXPECTED, &[], "identifier");
                self.missing_identifier()
            }
        }
    }

    // ========================================================================
    // Statement lists
    // ========================================================================

    /// Parse statements until end of input or one of `terminators`, which
    /// is left unconsumed. Tag delimiters and `{# #}` comments between
    /// statements are skipped.
    pub(crate) fn parse_statement_list(&mut self, terminators: &[SyntaxKind]) -> &'a [Statement<'a>] {
        let mut statements = Vec::new();
        loop {
            let token = self.current_token();
            if token == SyntaxKind::EndOfFileToken || terminators.contains(&token) {
                break;
            }
            if is_tag_boundary(token) || matches!(token, SyntaxKind::RawComment | SyntaxKind::ErrorToken) {
                self.next_token();
                continue;
            }

            let start = self.token_pos();
            self.pending_recovery = false;
            let statement = self.parse_statement();
            statements.push(statement);

            if self.pending_recovery || self.token_pos() == start {
                self.skip_to_statement_boundary(terminators, start);
            }
            self.pending_recovery = false;
        }
        self.alloc_slice(statements)
    }

    /// Discard tokens after a failed statement up to the next place a
    /// statement can start. A `;` is consumed; tags, raw text, `}` and the
    /// list's own terminators are kept.
    fn skip_to_statement_boundary(&mut self, terminators: &[SyntaxKind], start: u32) {
        if self.prev_token_kind == SyntaxKind::SemicolonToken && self.token_pos() != start {
            return;
        }
        let mut skipped = 0usize;
        loop {
            let token = self.current_token();
            if token == SyntaxKind::EndOfFileToken || terminators.contains(&token) {
                break;
            }
            if self.token_pos() != start && is_statement_boundary(token) {
                break;
            }
            self.next_token();
            skipped += 1;
            if token == SyntaxKind::SemicolonToken {
                break;
            }
        }
        if skipped > 0 {
            debug!(
                file = %self.file_name,
                skipped,
                resume_at = self.token_pos(),
                "skipped tokens after syntax error"
            );
        }
    }
}
