//! SyntaxKind enum: every token and node kind of the ucode syntax tree.

/// The kind of a syntax token or node.
///
/// Token kinds come first, then keywords, then node kinds. The range helpers
/// below rely on that ordering, so new variants must be added inside the
/// group they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown = 0,
    EndOfFileToken,
    /// Malformed input; the scanner has recorded a lexical diagnostic.
    ErrorToken,

    // Markup
    RawText,
    RawComment,
    ExpressionTagOpen,
    ExpressionTagClose,
    StatementTagOpen,
    StatementTagClose,

    // Literals
    NumberLiteral,
    DoubleLiteral,
    StringLiteral,
    TemplateSegment,
    RegexPattern,
    RegexFlags,

    // Template placeholders
    PlaceholderOpen,
    PlaceholderClose,

    Identifier,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    QuestionDotToken,
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsEqualsToken,
    EqualsGreaterThanToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,
    LessThanLessThanToken,
    GreaterThanGreaterThanToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,
    QuestionToken,
    ColonToken,
    QuestionQuestionToken,

    // Assignment operators
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    AsteriskAsteriskEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,
    LessThanLessThanEqualsToken,
    GreaterThanGreaterThanEqualsToken,
    AmpersandEqualsToken,
    BarEqualsToken,
    CaretEqualsToken,
    BarBarEqualsToken,
    AmpersandAmpersandEqualsToken,
    QuestionQuestionEqualsToken,

    // ========================================================================
    // Keywords
    // ========================================================================
    BreakKeyword,
    CaseKeyword,
    CatchKeyword,
    ConstKeyword,
    ContinueKeyword,
    DefaultKeyword,
    DeleteKeyword,
    ElifKeyword,
    ElseKeyword,
    EndforKeyword,
    EndfunctionKeyword,
    EndifKeyword,
    EndwhileKeyword,
    ExportKeyword,
    FalseKeyword,
    ForKeyword,
    FunctionKeyword,
    IfKeyword,
    ImportKeyword,
    InKeyword,
    LetKeyword,
    NullKeyword,
    ReturnKeyword,
    SwitchKeyword,
    ThisKeyword,
    TrueKeyword,
    TryKeyword,
    WhileKeyword,

    // ========================================================================
    // Nodes
    // ========================================================================
    SourceFile,

    // Statements
    RawTextStatement,
    ExpressionBlock,
    Block,
    EmptyStatement,
    ExpressionStatement,
    VariableStatement,
    VariableDeclarationList,
    VariableDeclaration,
    IfStatement,
    WhileStatement,
    ForStatement,
    ForInStatement,
    FunctionDeclaration,
    Parameter,
    SwitchStatement,
    CaseClause,
    DefaultClause,
    TryStatement,
    CatchClause,
    ReturnStatement,
    BreakStatement,
    ContinueStatement,

    // Modules
    ImportDeclaration,
    ImportClause,
    NamespaceImport,
    NamedImports,
    ImportSpecifier,
    ExportDeclaration,
    NamedExports,
    ExportSpecifier,
    ExportDefault,

    // Expressions
    ArrayLiteralExpression,
    ObjectLiteralExpression,
    PropertyAssignment,
    ShorthandPropertyAssignment,
    SpreadAssignment,
    ComputedPropertyName,
    TemplateExpression,
    TemplateSpan,
    RegularExpressionLiteral,
    PropertyAccessExpression,
    ElementAccessExpression,
    CallExpression,
    AssignmentExpression,
    AugmentedAssignmentExpression,
    ConditionalExpression,
    BinaryExpression,
    UnaryExpression,
    UpdateExpression,
    DeleteExpression,
    ArrowFunction,
    FunctionExpression,
    SequenceExpression,
    SpreadElement,
}

impl SyntaxKind {
    pub const FIRST_PUNCTUATION: SyntaxKind = SyntaxKind::OpenBraceToken;
    pub const LAST_PUNCTUATION: SyntaxKind = SyntaxKind::QuestionQuestionEqualsToken;
    pub const FIRST_ASSIGNMENT: SyntaxKind = SyntaxKind::EqualsToken;
    pub const LAST_ASSIGNMENT: SyntaxKind = SyntaxKind::QuestionQuestionEqualsToken;
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::BreakKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::WhileKeyword;
    pub const FIRST_NODE: SyntaxKind = SyntaxKind::SourceFile;
}

impl SyntaxKind {
    /// Whether this kind is a reserved word.
    #[inline]
    pub fn is_keyword(self) -> bool {
        self >= Self::FIRST_KEYWORD && self <= Self::LAST_KEYWORD
    }

    #[inline]
    pub fn is_punctuation(self) -> bool {
        self >= Self::FIRST_PUNCTUATION && self <= Self::LAST_PUNCTUATION
    }

    #[inline]
    pub fn is_literal(self) -> bool {
        self >= SyntaxKind::NumberLiteral && self <= SyntaxKind::RegexPattern
    }

    /// Whether this kind is `=` or one of the augmented assignment operators.
    #[inline]
    pub fn is_assignment_operator(self) -> bool {
        self >= Self::FIRST_ASSIGNMENT && self <= Self::LAST_ASSIGNMENT
    }

    #[inline]
    pub fn is_compound_assignment(self) -> bool {
        self > Self::FIRST_ASSIGNMENT && self <= Self::LAST_ASSIGNMENT
    }

    /// `{%` or `%}`. Either one ends the statement before it.
    #[inline]
    pub fn is_statement_tag(self) -> bool {
        matches!(self, SyntaxKind::StatementTagOpen | SyntaxKind::StatementTagClose)
    }

    /// A word token: an identifier or a keyword. Words may name properties.
    #[inline]
    pub fn is_word(self) -> bool {
        self == SyntaxKind::Identifier || self.is_keyword()
    }

    #[inline]
    pub fn is_node(self) -> bool {
        self >= Self::FIRST_NODE
    }

    /// Whether this node kind is a statement.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::RawTextStatement
                | SyntaxKind::ExpressionBlock
                | SyntaxKind::Block
                | SyntaxKind::EmptyStatement
                | SyntaxKind::ExpressionStatement
                | SyntaxKind::VariableStatement
                | SyntaxKind::IfStatement
                | SyntaxKind::WhileStatement
                | SyntaxKind::ForStatement
                | SyntaxKind::ForInStatement
                | SyntaxKind::FunctionDeclaration
                | SyntaxKind::SwitchStatement
                | SyntaxKind::TryStatement
                | SyntaxKind::ReturnStatement
                | SyntaxKind::BreakStatement
                | SyntaxKind::ContinueStatement
                | SyntaxKind::ImportDeclaration
                | SyntaxKind::ExportDeclaration
        )
    }

    /// Get the keyword text for a keyword kind, or None if not a keyword.
    pub fn keyword_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::BreakKeyword => Some("break"),
            SyntaxKind::CaseKeyword => Some("case"),
            SyntaxKind::CatchKeyword => Some("catch"),
            SyntaxKind::ConstKeyword => Some("const"),
            SyntaxKind::ContinueKeyword => Some("continue"),
            SyntaxKind::DefaultKeyword => Some("default"),
            SyntaxKind::DeleteKeyword => Some("delete"),
            SyntaxKind::ElifKeyword => Some("elif"),
            SyntaxKind::ElseKeyword => Some("else"),
            SyntaxKind::EndforKeyword => Some("endfor"),
            SyntaxKind::EndfunctionKeyword => Some("endfunction"),
            SyntaxKind::EndifKeyword => Some("endif"),
            SyntaxKind::EndwhileKeyword => Some("endwhile"),
            SyntaxKind::ExportKeyword => Some("export"),
            SyntaxKind::FalseKeyword => Some("false"),
            SyntaxKind::ForKeyword => Some("for"),
            SyntaxKind::FunctionKeyword => Some("function"),
            SyntaxKind::IfKeyword => Some("if"),
            SyntaxKind::ImportKeyword => Some("import"),
            SyntaxKind::InKeyword => Some("in"),
            SyntaxKind::LetKeyword => Some("let"),
            SyntaxKind::NullKeyword => Some("null"),
            SyntaxKind::ReturnKeyword => Some("return"),
            SyntaxKind::SwitchKeyword => Some("switch"),
            SyntaxKind::ThisKeyword => Some("this"),
            SyntaxKind::TrueKeyword => Some("true"),
            SyntaxKind::TryKeyword => Some("try"),
            SyntaxKind::WhileKeyword => Some("while"),
            _ => None,
        }
    }

    /// Look up a keyword SyntaxKind from text.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        match text {
            "break" => Some(SyntaxKind::BreakKeyword),
            "case" => Some(SyntaxKind::CaseKeyword),
            "catch" => Some(SyntaxKind::CatchKeyword),
            "const" => Some(SyntaxKind::ConstKeyword),
            "continue" => Some(SyntaxKind::ContinueKeyword),
            "default" => Some(SyntaxKind::DefaultKeyword),
            "delete" => Some(SyntaxKind::DeleteKeyword),
            "elif" => Some(SyntaxKind::ElifKeyword),
            "else" => Some(SyntaxKind::ElseKeyword),
            "endfor" => Some(SyntaxKind::EndforKeyword),
            "endfunction" => Some(SyntaxKind::EndfunctionKeyword),
            "endif" => Some(SyntaxKind::EndifKeyword),
            "endwhile" => Some(SyntaxKind::EndwhileKeyword),
            "export" => Some(SyntaxKind::ExportKeyword),
            "false" => Some(SyntaxKind::FalseKeyword),
            "for" => Some(SyntaxKind::ForKeyword),
            "function" => Some(SyntaxKind::FunctionKeyword),
            "if" => Some(SyntaxKind::IfKeyword),
            "import" => Some(SyntaxKind::ImportKeyword),
            "in" => Some(SyntaxKind::InKeyword),
            "let" => Some(SyntaxKind::LetKeyword),
            "null" => Some(SyntaxKind::NullKeyword),
            "return" => Some(SyntaxKind::ReturnKeyword),
            "switch" => Some(SyntaxKind::SwitchKeyword),
            "this" => Some(SyntaxKind::ThisKeyword),
            "true" => Some(SyntaxKind::TrueKeyword),
            "try" => Some(SyntaxKind::TryKeyword),
            "while" => Some(SyntaxKind::WhileKeyword),
            _ => None,
        }
    }

    /// Get the punctuation text for a punctuation kind, or None.
    pub fn punctuation_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::OpenBraceToken => Some("{"),
            SyntaxKind::CloseBraceToken => Some("}"),
            SyntaxKind::OpenParenToken => Some("("),
            SyntaxKind::CloseParenToken => Some(")"),
            SyntaxKind::OpenBracketToken => Some("["),
            SyntaxKind::CloseBracketToken => Some("]"),
            SyntaxKind::DotToken => Some("."),
            SyntaxKind::DotDotDotToken => Some("..."),
            SyntaxKind::SemicolonToken => Some(";"),
            SyntaxKind::CommaToken => Some(","),
            SyntaxKind::QuestionDotToken => Some("?."),
            SyntaxKind::LessThanToken => Some("<"),
            SyntaxKind::GreaterThanToken => Some(">"),
            SyntaxKind::LessThanEqualsToken => Some("<="),
            SyntaxKind::GreaterThanEqualsToken => Some(">="),
            SyntaxKind::EqualsEqualsToken => Some("=="),
            SyntaxKind::ExclamationEqualsToken => Some("!="),
            SyntaxKind::EqualsEqualsEqualsToken => Some("==="),
            SyntaxKind::ExclamationEqualsEqualsToken => Some("!=="),
            SyntaxKind::EqualsGreaterThanToken => Some("=>"),
            SyntaxKind::PlusToken => Some("+"),
            SyntaxKind::MinusToken => Some("-"),
            SyntaxKind::AsteriskToken => Some("*"),
            SyntaxKind::AsteriskAsteriskToken => Some("**"),
            SyntaxKind::SlashToken => Some("/"),
            SyntaxKind::PercentToken => Some("%"),
            SyntaxKind::PlusPlusToken => Some("++"),
            SyntaxKind::MinusMinusToken => Some("--"),
            SyntaxKind::LessThanLessThanToken => Some("<<"),
            SyntaxKind::GreaterThanGreaterThanToken => Some(">>"),
            SyntaxKind::AmpersandToken => Some("&"),
            SyntaxKind::BarToken => Some("|"),
            SyntaxKind::CaretToken => Some("^"),
            SyntaxKind::ExclamationToken => Some("!"),
            SyntaxKind::TildeToken => Some("~"),
            SyntaxKind::AmpersandAmpersandToken => Some("&&"),
            SyntaxKind::BarBarToken => Some("||"),
            SyntaxKind::QuestionToken => Some("?"),
            SyntaxKind::ColonToken => Some(":"),
            SyntaxKind::QuestionQuestionToken => Some("??"),
            SyntaxKind::EqualsToken => Some("="),
            SyntaxKind::PlusEqualsToken => Some("+="),
            SyntaxKind::MinusEqualsToken => Some("-="),
            SyntaxKind::AsteriskEqualsToken => Some("*="),
            SyntaxKind::AsteriskAsteriskEqualsToken => Some("**="),
            SyntaxKind::SlashEqualsToken => Some("/="),
            SyntaxKind::PercentEqualsToken => Some("%="),
            SyntaxKind::LessThanLessThanEqualsToken => Some("<<="),
            SyntaxKind::GreaterThanGreaterThanEqualsToken => Some(">>="),
            SyntaxKind::AmpersandEqualsToken => Some("&="),
            SyntaxKind::BarEqualsToken => Some("|="),
            SyntaxKind::CaretEqualsToken => Some("^="),
            SyntaxKind::BarBarEqualsToken => Some("||="),
            SyntaxKind::AmpersandAmpersandEqualsToken => Some("&&="),
            SyntaxKind::QuestionQuestionEqualsToken => Some("??="),
            _ => None,
        }
    }

    /// Short human-readable name for diagnostics, e.g. `endif`, `}}` or
    /// `end of input`.
    pub fn display_text(self) -> &'static str {
        if let Some(text) = self.keyword_text().or_else(|| self.punctuation_text()) {
            return text;
        }
        match self {
            SyntaxKind::EndOfFileToken => "end of input",
            SyntaxKind::ErrorToken => "invalid token",
            SyntaxKind::RawText => "text",
            SyntaxKind::RawComment => "{# ... #}",
            SyntaxKind::ExpressionTagOpen => "{{",
            SyntaxKind::ExpressionTagClose => "}}",
            SyntaxKind::StatementTagOpen => "{%",
            SyntaxKind::StatementTagClose => "%}",
            SyntaxKind::NumberLiteral | SyntaxKind::DoubleLiteral => "number",
            SyntaxKind::StringLiteral => "string",
            SyntaxKind::TemplateSegment => "template string",
            SyntaxKind::RegexPattern => "regular expression",
            SyntaxKind::RegexFlags => "regular expression flags",
            SyntaxKind::PlaceholderOpen => "${",
            SyntaxKind::PlaceholderClose => "}",
            SyntaxKind::Identifier => "identifier",
            _ => "token",
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
