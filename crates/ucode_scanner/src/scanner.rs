//! The ucode scanner.
//!
//! Converts template or program text into tokens on demand. What a byte
//! means depends on where it appears: literal text, code inside a tag, a
//! template string or a `${ }` placeholder. The scanner tracks this with an
//! explicit stack of [`ScanMode`]s, pushed when a context opens and popped
//! when its closer is seen.

use crate::char_codes::*;
use crate::token::TokenInfo;
use memchr::memmem;
use ucode_ast::syntax_kind::SyntaxKind;
use ucode_ast::types::{SourceMode, TokenFlags};
use ucode_core::text::{TextRange, TextSpan};
use ucode_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};

/// Which kind of tag a code region was opened by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `{{ ... }}`
    Expression,
    /// `{% ... %}`
    Statement,
}

/// One entry of the scanner's context stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Literal markup text.
    Text,
    /// Code. `tag` is `None` for program sources. `braces` counts open `{`
    /// so an expression tag only closes on `}}` at depth zero.
    Code { tag: Option<TagKind>, braces: u32 },
    /// Inside a template string. When `segment_pending` is false the next
    /// token is the `${` that stopped the previous segment.
    Template { segment_pending: bool },
    /// Inside `${ ... }`.
    Placeholder { braces: u32 },
}

/// Saved scanner state for lookahead.
#[derive(Debug, Clone)]
pub struct ScannerState {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    modes: Vec<ScanMode>,
    trim_next_text: bool,
    regex_flags_pending: bool,
    diagnostics_len: usize,
}

pub struct Scanner {
    text: String,
    pos: usize,
    /// Start of the current token (after leading trivia).
    token_start: usize,
    token: SyntaxKind,
    /// Decoded value of the current token.
    token_value: String,
    token_flags: TokenFlags,
    modes: Vec<ScanMode>,
    /// The last tag closed with a strip marker.
    trim_next_text: bool,
    /// A regex pattern was just rescanned; its flags come next.
    regex_flags_pending: bool,
    diagnostics: DiagnosticCollection,
}

impl Scanner {
    pub fn new(text: &str, mode: SourceMode) -> Self {
        let initial = match mode {
            SourceMode::Markup => ScanMode::Text,
            SourceMode::Program => ScanMode::Code { tag: None, braces: 0 },
        };
        Self {
            text: text.to_string(),
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::NONE,
            modes: vec![initial],
            trim_next_text: false,
            regex_flags_pending: false,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Skip a `#!` line at the very beginning of the source and return its
    /// range. Call this before the first `scan()`.
    pub fn skip_hash_bang(&mut self) -> Option<TextRange> {
        if self.pos != 0 || !self.text.starts_with("#!") {
            return None;
        }
        let end = memchr::memchr2(b'\n', b'\r', self.text.as_bytes()).unwrap_or(self.text.len());
        self.pos = end;
        Some(TextRange::new(0, end as u32))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// The innermost scanning context.
    pub fn mode(&self) -> ScanMode {
        self.modes.last().copied().unwrap_or(ScanMode::Text)
    }

    /// Look ahead: save state, call f, restore state and return the result.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// End of the current token.
    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    /// Source text of the current token, undecoded.
    pub fn token_text(&self) -> &str {
        self.text.get(self.token_start..self.pos).unwrap_or("")
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn token_info(&self) -> TokenInfo {
        TokenInfo {
            kind: self.token,
            pos: self.token_start as u32,
            end: self.pos as u32,
            text: self.token_value.clone(),
            flags: self.token_flags,
        }
    }

    /// Save the full scanner state for lookahead.
    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            modes: self.modes.clone(),
            trim_next_text: self.trim_next_text,
            regex_flags_pending: self.regex_flags_pending,
            diagnostics_len: self.diagnostics.len(),
        }
    }

    /// Restore a saved state. Diagnostics reported since the save are
    /// dropped, since the tokens that caused them will be scanned again.
    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.token_flags = state.token_flags;
        self.modes = state.modes;
        self.trim_next_text = state.trim_next_text;
        self.regex_flags_pending = state.regex_flags_pending;
        self.diagnostics.truncate(state.diagnostics_len);
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    #[inline]
    fn current_byte(&self) -> Option<u8> {
        self.byte_at(0)
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    #[inline]
    fn starts_with(&self, s: &str) -> bool {
        self.text.as_bytes()[self.pos.min(self.text.len())..].starts_with(s.as_bytes())
    }

    /// Copy the character at the current position into `out` and advance.
    fn push_current_char(&mut self, out: &mut String) {
        let len = self.current_byte().map_or(1, utf8_len);
        let end = (self.pos + len).min(self.text.len());
        if let Some(s) = self.text.get(self.pos..end) {
            out.push_str(s);
        }
        self.pos = end;
    }

    fn error(&mut self, message: &DiagnosticMessage, args: &[&str], start: usize, end: usize) {
        let mut diagnostic = Diagnostic::new(message, args);
        diagnostic.span = Some(TextSpan::from_bounds(start as u32, end.max(start) as u32));
        self.diagnostics.add(diagnostic);
    }

    fn replace_mode(&mut self, mode: ScanMode) {
        if let Some(top) = self.modes.last_mut() {
            *top = mode;
        }
    }

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();

        if self.regex_flags_pending {
            self.regex_flags_pending = false;
            self.token = self.scan_regex_flags();
            return self.token;
        }

        self.token = match self.mode() {
            ScanMode::Text => self.scan_text(),
            ScanMode::Template { segment_pending: true } => {
                self.token_start = self.pos;
                self.scan_template_segment()
            }
            ScanMode::Template { segment_pending: false } => self.scan_placeholder_open(),
            ScanMode::Code { .. } | ScanMode::Placeholder { .. } => self.scan_code(),
        };
        self.token
    }

    // ========================================================================
    // Markup
    // ========================================================================

    fn scan_text(&mut self) -> SyntaxKind {
        self.token_start = self.pos;
        if self.is_eof() {
            return SyntaxKind::EndOfFileToken;
        }

        if self.current_byte() == Some(b'{') {
            match self.byte_at(1) {
                Some(b'{') => return self.scan_tag_open(TagKind::Expression),
                Some(b'%') => return self.scan_tag_open(TagKind::Statement),
                Some(b'#') => return self.scan_raw_comment(),
                _ => {}
            }
        }

        let bytes = self.text.as_bytes();
        let mut end = self.pos + 1;
        loop {
            match memchr::memchr(b'{', &bytes[end.min(bytes.len())..]) {
                Some(offset) => {
                    let at = end + offset;
                    if matches!(bytes.get(at + 1), Some(b'{' | b'%' | b'#')) {
                        end = at;
                        break;
                    }
                    end = at + 1;
                }
                None => {
                    end = bytes.len();
                    break;
                }
            }
        }
        let trim_end = matches!(&bytes[end..], [b'{', b'{' | b'%', b'-', ..]);

        self.pos = end;
        self.token_value.push_str(&self.text[self.token_start..end]);
        if std::mem::take(&mut self.trim_next_text) {
            self.token_flags |= TokenFlags::TRIM_START;
        }
        if trim_end {
            self.token_flags |= TokenFlags::TRIM_END;
        }
        SyntaxKind::RawText
    }

    fn scan_tag_open(&mut self, kind: TagKind) -> SyntaxKind {
        self.pos += 2;
        self.trim_next_text = false;
        match (kind, self.current_byte()) {
            (_, Some(b'-')) => {
                self.pos += 1;
                self.token_flags |= TokenFlags::STRIP_WHITESPACE;
            }
            (TagKind::Statement, Some(b'+')) => {
                self.pos += 1;
                self.token_flags |= TokenFlags::KEEP_WHITESPACE;
            }
            _ => {}
        }
        self.modes.push(ScanMode::Code {
            tag: Some(kind),
            braces: 0,
        });
        match kind {
            TagKind::Expression => SyntaxKind::ExpressionTagOpen,
            TagKind::Statement => SyntaxKind::StatementTagOpen,
        }
    }

    fn scan_raw_comment(&mut self) -> SyntaxKind {
        self.pos += 2;
        self.trim_next_text = false;
        let body_start = self.pos;
        match memmem::find(&self.text.as_bytes()[body_start..], b"#}") {
            Some(offset) => {
                self.token_value.push_str(&self.text[body_start..body_start + offset]);
                self.pos = body_start + offset + 2;
                SyntaxKind::RawComment
            }
            None => {
                self.pos = self.text.len();
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::COMMENT_TAG_CLOSE_EXPECTED, &[], self.token_start, self.pos);
                SyntaxKind::ErrorToken
            }
        }
    }

    /// `%}`, `-%}`, `}}` or `-}}` closing the innermost tag, if present.
    fn scan_tag_close(&mut self) -> Option<SyntaxKind> {
        let ScanMode::Code { tag: Some(tag), braces } = self.mode() else {
            return None;
        };
        let (strip, len, kind) = match tag {
            TagKind::Statement if self.starts_with("%}") => (false, 2, SyntaxKind::StatementTagClose),
            TagKind::Statement if self.starts_with("-%}") => (true, 3, SyntaxKind::StatementTagClose),
            TagKind::Expression if braces == 0 && self.starts_with("}}") => {
                (false, 2, SyntaxKind::ExpressionTagClose)
            }
            TagKind::Expression if braces == 0 && self.starts_with("-}}") => {
                (true, 3, SyntaxKind::ExpressionTagClose)
            }
            _ => return None,
        };
        self.pos += len;
        self.modes.pop();
        if strip {
            self.token_flags |= TokenFlags::STRIP_WHITESPACE;
            self.trim_next_text = true;
        }
        Some(kind)
    }

    // ========================================================================
    // Templates
    // ========================================================================

    /// Scan literal template text up to `${`, the closing backtick or EOF.
    fn scan_template_segment(&mut self) -> SyntaxKind {
        let mut value = String::new();
        loop {
            let Some(ch) = self.current_byte() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_TEMPLATE_LITERAL, &[], self.token_start, self.pos);
                self.modes.pop();
                break;
            };
            match ch {
                b'`' => {
                    self.pos += 1;
                    self.modes.pop();
                    break;
                }
                b'$' if self.byte_at(1) == Some(b'{') => {
                    self.replace_mode(ScanMode::Template {
                        segment_pending: false,
                    });
                    break;
                }
                b'\\' => {
                    self.token_flags |= TokenFlags::CONTAINS_ESCAPE;
                    let escape_start = self.pos;
                    if !self.scan_escape(&mut value) {
                        self.token_flags |= TokenFlags::CONTAINS_INVALID_ESCAPE;
                        self.error(&messages::INVALID_ESCAPE_SEQUENCE, &[], escape_start, self.pos);
                    }
                }
                _ => {
                    let rest = &self.text.as_bytes()[self.pos..];
                    let run = memchr::memchr3(b'`', b'$', b'\\', rest).unwrap_or(rest.len()).max(1);
                    let end = self.pos + run;
                    if let Some(s) = self.text.get(self.pos..end) {
                        value.push_str(s);
                        self.pos = end;
                    } else {
                        self.push_current_char(&mut value);
                    }
                }
            }
        }
        self.token_value = value;
        SyntaxKind::TemplateSegment
    }

    fn scan_placeholder_open(&mut self) -> SyntaxKind {
        self.token_start = self.pos;
        self.pos += 2;
        self.replace_mode(ScanMode::Template {
            segment_pending: true,
        });
        self.modes.push(ScanMode::Placeholder { braces: 0 });
        SyntaxKind::PlaceholderOpen
    }

    // ========================================================================
    // Code
    // ========================================================================

    /// Skip whitespace and comments, setting flags for line breaks.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current_byte() {
            if is_white_space(ch) {
                if is_line_break(ch) {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                }
                self.pos += 1;
            } else if ch == b'/' && self.byte_at(1) == Some(b'/') {
                self.pos += 2;
                while let Some(c) = self.current_byte() {
                    if is_line_break(c) || self.at_tag_close() {
                        break;
                    }
                    self.pos += 1;
                }
            } else if ch == b'/' && self.byte_at(1) == Some(b'*') {
                let start = self.pos;
                self.pos += 2;
                match memmem::find(&self.text.as_bytes()[self.pos..], b"*/") {
                    Some(offset) => {
                        if memchr::memchr(b'\n', &self.text.as_bytes()[self.pos..self.pos + offset]).is_some() {
                            self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                        }
                        self.pos += offset + 2;
                    }
                    None => {
                        self.pos = self.text.len();
                        self.error(&messages::ASTERISK_SLASH_EXPECTED, &[], start, self.pos);
                    }
                }
            } else {
                return;
            }
        }
    }

    /// Whether the innermost tag's closer starts here. Line comments stop
    /// at it.
    fn at_tag_close(&self) -> bool {
        match self.mode() {
            ScanMode::Code {
                tag: Some(TagKind::Statement),
                ..
            } => self.starts_with("%}") || self.starts_with("-%}"),
            ScanMode::Code {
                tag: Some(TagKind::Expression),
                braces: 0,
            } => self.starts_with("}}") || self.starts_with("-}}"),
            _ => false,
        }
    }

    fn scan_code(&mut self) -> SyntaxKind {
        self.skip_trivia();
        self.token_start = self.pos;

        let Some(ch) = self.current_byte() else {
            return SyntaxKind::EndOfFileToken;
        };

        if let Some(kind) = self.scan_tag_close() {
            return kind;
        }

        match ch {
            b'(' => self.single(SyntaxKind::OpenParenToken),
            b')' => self.single(SyntaxKind::CloseParenToken),
            b'[' => self.single(SyntaxKind::OpenBracketToken),
            b']' => self.single(SyntaxKind::CloseBracketToken),
            b';' => self.single(SyntaxKind::SemicolonToken),
            b',' => self.single(SyntaxKind::CommaToken),
            b'~' => self.single(SyntaxKind::TildeToken),
            b':' => self.single(SyntaxKind::ColonToken),
            b'{' => self.scan_open_brace(),
            b'}' => self.scan_close_brace(),

            b'.' => self.scan_dot(),
            b'?' => self.scan_question(),
            b'<' => self.scan_less_than(),
            b'>' => self.scan_greater_than(),
            b'=' => self.scan_equals(),
            b'!' => self.scan_exclamation(),
            b'+' => self.scan_plus(),
            b'-' => self.scan_minus(),
            b'*' => self.scan_asterisk(),
            b'/' => self.scan_slash(),
            b'%' => self.scan_percent(),
            b'&' => self.scan_ampersand(),
            b'|' => self.scan_bar(),
            b'^' => self.scan_caret(),

            b'\'' | b'"' => self.scan_string_literal(ch),
            b'`' => {
                self.pos += 1;
                self.modes.push(ScanMode::Template {
                    segment_pending: true,
                });
                self.scan_template_segment()
            }

            b'0'..=b'9' => self.scan_number(),

            _ if is_identifier_start(ch) => self.scan_identifier(),

            _ => {
                let mut invalid = String::new();
                self.push_current_char(&mut invalid);
                self.error(&messages::INVALID_CHARACTER, &[&invalid], self.token_start, self.pos);
                self.token_value = invalid;
                SyntaxKind::ErrorToken
            }
        }
    }

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    /// Scan `len` bytes as `kind`.
    #[inline]
    fn operator(&mut self, len: usize, kind: SyntaxKind) -> SyntaxKind {
        self.pos += len;
        kind
    }

    fn scan_open_brace(&mut self) -> SyntaxKind {
        if let Some(ScanMode::Code { braces, .. } | ScanMode::Placeholder { braces }) = self.modes.last_mut() {
            *braces += 1;
        }
        self.single(SyntaxKind::OpenBraceToken)
    }

    /// `}` either closes a brace opened in code or, at depth zero inside a
    /// placeholder, the placeholder itself.
    fn scan_close_brace(&mut self) -> SyntaxKind {
        match self.modes.last_mut() {
            Some(ScanMode::Placeholder { braces: 0 }) => {
                self.modes.pop();
                self.single(SyntaxKind::PlaceholderClose)
            }
            Some(ScanMode::Code { braces, .. } | ScanMode::Placeholder { braces }) => {
                *braces = braces.saturating_sub(1);
                self.single(SyntaxKind::CloseBraceToken)
            }
            _ => self.single(SyntaxKind::CloseBraceToken),
        }
    }

    // ========================================================================
    // Punctuation
    // ========================================================================

    fn scan_dot(&mut self) -> SyntaxKind {
        if self.byte_at(1).map_or(false, is_digit) {
            return self.scan_number();
        }
        if self.byte_at(1) == Some(b'.') && self.byte_at(2) == Some(b'.') {
            self.operator(3, SyntaxKind::DotDotDotToken)
        } else {
            self.single(SyntaxKind::DotToken)
        }
    }

    fn scan_question(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'?'), Some(b'=')) => self.operator(3, SyntaxKind::QuestionQuestionEqualsToken),
            (Some(b'?'), _) => self.operator(2, SyntaxKind::QuestionQuestionToken),
            // `a?.5:b` is a conditional, not an optional chain.
            (Some(b'.'), next) if !next.map_or(false, is_digit) => {
                self.operator(2, SyntaxKind::QuestionDotToken)
            }
            _ => self.single(SyntaxKind::QuestionToken),
        }
    }

    fn scan_less_than(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'<'), Some(b'=')) => self.operator(3, SyntaxKind::LessThanLessThanEqualsToken),
            (Some(b'<'), _) => self.operator(2, SyntaxKind::LessThanLessThanToken),
            (Some(b'='), _) => self.operator(2, SyntaxKind::LessThanEqualsToken),
            _ => self.single(SyntaxKind::LessThanToken),
        }
    }

    fn scan_greater_than(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'>'), Some(b'=')) => self.operator(3, SyntaxKind::GreaterThanGreaterThanEqualsToken),
            (Some(b'>'), _) => self.operator(2, SyntaxKind::GreaterThanGreaterThanToken),
            (Some(b'='), _) => self.operator(2, SyntaxKind::GreaterThanEqualsToken),
            _ => self.single(SyntaxKind::GreaterThanToken),
        }
    }

    fn scan_equals(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'='), Some(b'=')) => self.operator(3, SyntaxKind::EqualsEqualsEqualsToken),
            (Some(b'='), _) => self.operator(2, SyntaxKind::EqualsEqualsToken),
            (Some(b'>'), _) => self.operator(2, SyntaxKind::EqualsGreaterThanToken),
            _ => self.single(SyntaxKind::EqualsToken),
        }
    }

    fn scan_exclamation(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'='), Some(b'=')) => self.operator(3, SyntaxKind::ExclamationEqualsEqualsToken),
            (Some(b'='), _) => self.operator(2, SyntaxKind::ExclamationEqualsToken),
            _ => self.single(SyntaxKind::ExclamationToken),
        }
    }

    fn scan_plus(&mut self) -> SyntaxKind {
        match self.byte_at(1) {
            Some(b'+') => self.operator(2, SyntaxKind::PlusPlusToken),
            Some(b'=') => self.operator(2, SyntaxKind::PlusEqualsToken),
            _ => self.single(SyntaxKind::PlusToken),
        }
    }

    fn scan_minus(&mut self) -> SyntaxKind {
        match self.byte_at(1) {
            Some(b'-') => self.operator(2, SyntaxKind::MinusMinusToken),
            Some(b'=') => self.operator(2, SyntaxKind::MinusEqualsToken),
            _ => self.single(SyntaxKind::MinusToken),
        }
    }

    fn scan_asterisk(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'*'), Some(b'=')) => self.operator(3, SyntaxKind::AsteriskAsteriskEqualsToken),
            (Some(b'*'), _) => self.operator(2, SyntaxKind::AsteriskAsteriskToken),
            (Some(b'='), _) => self.operator(2, SyntaxKind::AsteriskEqualsToken),
            _ => self.single(SyntaxKind::AsteriskToken),
        }
    }

    /// Division. The parser calls [`Scanner::rescan_slash_token`] where a
    /// regular expression may start.
    fn scan_slash(&mut self) -> SyntaxKind {
        match self.byte_at(1) {
            Some(b'=') => self.operator(2, SyntaxKind::SlashEqualsToken),
            _ => self.single(SyntaxKind::SlashToken),
        }
    }

    fn scan_percent(&mut self) -> SyntaxKind {
        match self.byte_at(1) {
            Some(b'=') => self.operator(2, SyntaxKind::PercentEqualsToken),
            _ => self.single(SyntaxKind::PercentToken),
        }
    }

    fn scan_ampersand(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'&'), Some(b'=')) => self.operator(3, SyntaxKind::AmpersandAmpersandEqualsToken),
            (Some(b'&'), _) => self.operator(2, SyntaxKind::AmpersandAmpersandToken),
            (Some(b'='), _) => self.operator(2, SyntaxKind::AmpersandEqualsToken),
            _ => self.single(SyntaxKind::AmpersandToken),
        }
    }

    fn scan_bar(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'|'), Some(b'=')) => self.operator(3, SyntaxKind::BarBarEqualsToken),
            (Some(b'|'), _) => self.operator(2, SyntaxKind::BarBarToken),
            (Some(b'='), _) => self.operator(2, SyntaxKind::BarEqualsToken),
            _ => self.single(SyntaxKind::BarToken),
        }
    }

    fn scan_caret(&mut self) -> SyntaxKind {
        match self.byte_at(1) {
            Some(b'=') => self.operator(2, SyntaxKind::CaretEqualsToken),
            _ => self.single(SyntaxKind::CaretToken),
        }
    }

    // ========================================================================
    // Literals
    // ========================================================================

    /// Decode one escape sequence starting at the backslash into `out`.
    /// Returns false if the sequence is malformed.
    fn scan_escape(&mut self, out: &mut String) -> bool {
        self.pos += 1;
        let Some(ch) = self.current_byte() else {
            return false;
        };
        match ch {
            b'u' => {
                self.pos += 1;
                let Some(code) = self.scan_hex_digits(4) else {
                    return false;
                };
                out.push(self.decode_utf16_escape(code));
                true
            }
            b'x' => {
                self.pos += 1;
                match self.scan_hex_digits(2) {
                    Some(code) => {
                        out.push(char::from(code as u8));
                        true
                    }
                    None => false,
                }
            }
            b'0'..=b'7' => {
                let mut code = 0u32;
                let mut count = 0;
                while count < 3 {
                    match self.current_byte() {
                        Some(d) if is_octal_digit(d) => {
                            code = code * 8 + u32::from(d - b'0');
                            self.pos += 1;
                            count += 1;
                        }
                        _ => break,
                    }
                }
                if code > 255 {
                    return false;
                }
                out.push(char::from(code as u8));
                true
            }
            b'a' => self.simple_escape(out, '\u{07}'),
            b'b' => self.simple_escape(out, '\u{08}'),
            b'e' => self.simple_escape(out, '\u{1B}'),
            b'f' => self.simple_escape(out, '\u{0C}'),
            b'n' => self.simple_escape(out, '\n'),
            b'r' => self.simple_escape(out, '\r'),
            b't' => self.simple_escape(out, '\t'),
            b'v' => self.simple_escape(out, '\u{0B}'),
            _ => {
                self.push_current_char(out);
                true
            }
        }
    }

    #[inline]
    fn simple_escape(&mut self, out: &mut String, decoded: char) -> bool {
        self.pos += 1;
        out.push(decoded);
        true
    }

    /// Read exactly `count` hex digits.
    fn scan_hex_digits(&mut self, count: usize) -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..count {
            let digit = self.current_byte().and_then(|b| char::from(b).to_digit(16))?;
            value = value * 16 + digit;
            self.pos += 1;
        }
        Some(value)
    }

    /// Turn a `\uXXXX` code unit into a char, joining a following low
    /// surrogate escape when the unit is a high surrogate.
    fn decode_utf16_escape(&mut self, code: u32) -> char {
        if (0xD800..0xDC00).contains(&code) && self.starts_with("\\u") {
            let save = self.pos;
            self.pos += 2;
            match self.scan_hex_digits(4) {
                Some(low) if (0xDC00..0xE000).contains(&low) => {
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER);
                }
                _ => self.pos = save,
            }
        }
        char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn scan_string_literal(&mut self, quote: u8) -> SyntaxKind {
        self.pos += 1;
        let mut value = String::new();
        let mut valid = true;
        loop {
            let Some(ch) = self.current_byte() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_STRING_LITERAL, &[], self.token_start, self.pos);
                self.token_value = value;
                return SyntaxKind::ErrorToken;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == b'\\' {
                self.token_flags |= TokenFlags::CONTAINS_ESCAPE;
                let escape_start = self.pos;
                if !self.scan_escape(&mut value) {
                    valid = false;
                    self.error(&messages::INVALID_ESCAPE_SEQUENCE, &[], escape_start, self.pos);
                }
                continue;
            }
            let rest = &self.text.as_bytes()[self.pos..];
            let run = memchr::memchr2(quote, b'\\', rest).unwrap_or(rest.len());
            match self.text.get(self.pos..self.pos + run) {
                Some(s) => {
                    value.push_str(s);
                    self.pos += run;
                }
                None => self.push_current_char(&mut value),
            }
        }
        self.token_value = value;
        if valid {
            SyntaxKind::StringLiteral
        } else {
            self.token_flags |= TokenFlags::CONTAINS_INVALID_ESCAPE;
            SyntaxKind::ErrorToken
        }
    }

    /// Rescan the current `/` or `/=` as a regular expression pattern.
    /// The token value is the pattern between the slashes; the next `scan()`
    /// yields the [`SyntaxKind::RegexFlags`] token.
    pub fn rescan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(self.token, SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken) {
            return self.token;
        }
        self.pos = self.token_start + 1;
        let pattern_start = self.pos;
        let mut in_character_class = false;
        let mut scratch = String::new();

        loop {
            let Some(ch) = self.current_byte() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(
                    &messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
                    &[],
                    self.token_start,
                    self.pos,
                );
                self.token_value = self.text[pattern_start..].to_string();
                self.token = SyntaxKind::ErrorToken;
                return self.token;
            };
            match ch {
                b'\\' => {
                    let escape_start = self.pos;
                    scratch.clear();
                    if !self.scan_escape(&mut scratch) {
                        self.error(&messages::INVALID_ESCAPE_SEQUENCE, &[], escape_start, self.pos);
                    }
                    continue;
                }
                b'[' => in_character_class = true,
                b']' => in_character_class = false,
                b'/' if !in_character_class => break,
                _ => {}
            }
            self.pos += utf8_len(ch);
        }

        self.token_value = self.text[pattern_start..self.pos].to_string();
        self.pos += 1;
        self.regex_flags_pending = true;
        self.token = SyntaxKind::RegexPattern;
        self.token
    }

    fn scan_regex_flags(&mut self) -> SyntaxKind {
        self.token_start = self.pos;
        while self.current_byte().map_or(false, is_regex_flag) {
            self.pos += 1;
        }
        self.token_value.push_str(&self.text[self.token_start..self.pos]);
        SyntaxKind::RegexFlags
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;

        if self.current_byte() == Some(b'0') {
            let radix = match self.byte_at(1) {
                Some(b'x' | b'X') => Some((TokenFlags::HEX_SPECIFIER, "Hexadecimal", is_hex_digit as fn(u8) -> bool)),
                Some(b'b' | b'B') => Some((TokenFlags::BINARY_SPECIFIER, "Binary", is_binary_digit as fn(u8) -> bool)),
                Some(b'o' | b'O') => Some((TokenFlags::OCTAL_SPECIFIER, "Octal", is_octal_digit as fn(u8) -> bool)),
                _ => None,
            };
            if let Some((flag, name, is_radix_digit)) = radix {
                self.pos += 2;
                self.token_flags |= flag;
                let digits_start = self.pos;
                while self.current_byte().map_or(false, is_radix_digit) {
                    self.pos += 1;
                }
                self.token_value.push_str(&self.text[start..self.pos]);
                if self.pos == digits_start {
                    self.error(&messages::_0_DIGIT_EXPECTED, &[name], start, self.pos);
                    return SyntaxKind::ErrorToken;
                }
                return SyntaxKind::NumberLiteral;
            }
        }

        let mut kind = SyntaxKind::NumberLiteral;
        self.skip_decimal_digits();

        if self.current_byte() == Some(b'.') {
            self.pos += 1;
            self.skip_decimal_digits();
            kind = SyntaxKind::DoubleLiteral;
        }

        if let Some(b'e' | b'E') = self.current_byte() {
            let exponent_digits = match self.byte_at(1) {
                Some(b'+' | b'-') => 2,
                _ => 1,
            };
            if self.byte_at(exponent_digits).map_or(false, is_digit) {
                self.pos += exponent_digits;
                self.skip_decimal_digits();
                self.token_flags |= TokenFlags::SCIENTIFIC;
                kind = SyntaxKind::DoubleLiteral;
            }
        }

        self.token_value.push_str(&self.text[start..self.pos]);
        kind
    }

    fn skip_decimal_digits(&mut self) {
        while self.current_byte().map_or(false, is_digit) {
            self.pos += 1;
        }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        while self.current_byte().map_or(false, is_identifier_part) {
            self.pos += 1;
        }
        self.token_value.push_str(&self.text[start..self.pos]);
        SyntaxKind::from_keyword(&self.token_value).unwrap_or(SyntaxKind::Identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str, mode: SourceMode) -> Vec<SyntaxKind> {
        let mut scanner = Scanner::new(text, mode);
        let mut out = Vec::new();
        loop {
            let kind = scanner.scan();
            if kind == SyntaxKind::EndOfFileToken {
                break;
            }
            out.push(kind);
        }
        out
    }

    #[test]
    fn test_mode_stack_for_expression_tag() {
        let mut scanner = Scanner::new("a{{ x }}b", SourceMode::Markup);
        assert_eq!(scanner.mode(), ScanMode::Text);
        assert_eq!(scanner.scan(), SyntaxKind::RawText);
        assert_eq!(scanner.scan(), SyntaxKind::ExpressionTagOpen);
        assert_eq!(
            scanner.mode(),
            ScanMode::Code {
                tag: Some(TagKind::Expression),
                braces: 0
            }
        );
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::ExpressionTagClose);
        assert_eq!(scanner.mode(), ScanMode::Text);
        assert_eq!(scanner.scan(), SyntaxKind::RawText);
    }

    #[test]
    fn test_object_braces_inside_expression_tag() {
        assert_eq!(
            kinds("{{ {a:{b:1}} }}", SourceMode::Markup),
            vec![
                SyntaxKind::ExpressionTagOpen,
                SyntaxKind::OpenBraceToken,
                SyntaxKind::Identifier,
                SyntaxKind::ColonToken,
                SyntaxKind::OpenBraceToken,
                SyntaxKind::Identifier,
                SyntaxKind::ColonToken,
                SyntaxKind::NumberLiteral,
                SyntaxKind::CloseBraceToken,
                SyntaxKind::CloseBraceToken,
                SyntaxKind::ExpressionTagClose,
            ]
        );
    }

    #[test]
    fn test_restore_drops_lookahead_diagnostics() {
        let mut scanner = Scanner::new("'abc", SourceMode::Program);
        let state = scanner.save_state();
        assert_eq!(scanner.scan(), SyntaxKind::ErrorToken);
        assert_eq!(scanner.diagnostics().len(), 1);
        scanner.restore_state(state);
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn test_look_ahead_restores_modes() {
        let mut scanner = Scanner::new("`a${b}c`", SourceMode::Program);
        assert_eq!(scanner.scan(), SyntaxKind::TemplateSegment);
        let next = scanner.look_ahead(|s| {
            s.scan();
            s.scan()
        });
        assert_eq!(next, SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::PlaceholderOpen);
    }

    #[test]
    fn test_hash_bang_range() {
        let mut scanner = Scanner::new("#!/usr/bin/ucode\nprint(1);", SourceMode::Program);
        assert_eq!(scanner.skip_hash_bang(), Some(TextRange::new(0, 16)));
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "print");
    }
}
