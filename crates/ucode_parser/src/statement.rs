//! Statement productions.
//!
//! Control statements come in two forms: a brace form whose body is a single
//! statement or `{ ... }` block, and an alt form whose body runs from `:` to
//! the matching `endif`, `endfor`, `endwhile` or `endfunction`. Alt bodies
//! are represented as a [`Block`] flagged [`NodeFlags::ALT_SYNTAX`].

use tracing::trace;
use ucode_ast::node::*;
use ucode_ast::syntax_kind::SyntaxKind;
use ucode_ast::types::*;
use ucode_diagnostics::messages;

use crate::parser::Parser;
use crate::utilities::{
    alt_closer_for, is_dangling_clause_keyword, is_end_keyword, is_implicit_terminator, is_tag_boundary,
    ALT_BODY_TERMINATORS, ALT_IF_TERMINATORS, BLOCK_TERMINATORS, CASE_CLAUSE_TERMINATORS,
};

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> Statement<'a> {
        trace!(pos = self.token_pos(), token = ?self.current_token(), "statement");
        if !self.enter_nesting() {
            return self.missing_statement();
        }
        let statement = self.parse_statement_worker();
        self.exit_nesting();
        statement
    }

    fn parse_statement_worker(&mut self) -> Statement<'a> {
        match self.current_token() {
            SyntaxKind::RawText => self.parse_raw_text_statement(),
            SyntaxKind::ExpressionTagOpen => self.parse_expression_block(),
            SyntaxKind::SemicolonToken => {
                let (pos, end) = (self.token_pos(), self.token_end());
                self.next_token();
                Statement::Empty(NodeData::new(SyntaxKind::EmptyStatement, pos, end))
            }
            SyntaxKind::OpenBraceToken => Statement::Block(self.parse_block()),
            SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => self.parse_variable_statement(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::FunctionKeyword => {
                if self.scanner.look_ahead(|s| s.scan() == SyntaxKind::Identifier) {
                    Statement::FunctionDeclaration(self.parse_function_declaration())
                } else {
                    self.parse_expression_statement()
                }
            }
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => self.parse_break_or_continue_statement(),
            SyntaxKind::ImportKeyword => self.parse_import_declaration(),
            SyntaxKind::ExportKeyword => self.parse_export_declaration(),
            token if is_dangling_clause_keyword(token) || token == SyntaxKind::DefaultKeyword => {
                let found = self.found_text();
                self.error(&messages::UNEXPECTED_TOKEN_0, &[&found]);
                self.missing_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn missing_statement(&self) -> Statement<'a> {
        let pos = self.token_pos();
        Statement::Empty(NodeData::new(SyntaxKind::EmptyStatement, pos, pos).with_flags(NodeFlags::MISSING))
    }

    /// The single-statement body of a brace-form `if`, `while` or `for`.
    /// A tag boundary here yields an empty statement.
    fn parse_embedded_statement(&mut self) -> Statement<'a> {
        let token = self.current_token();
        if token.is_statement_tag() {
            let pos = self.token_pos();
            return Statement::Empty(NodeData::new(SyntaxKind::EmptyStatement, pos, pos));
        }
        if token == SyntaxKind::EndOfFileToken {
            self.error_with_expected(&messages::STATEMENT_EXPECTED, &[], "statement");
            return self.missing_statement();
        }
        self.parse_statement()
    }

    /// Consume a `;`, or accept a tag boundary, `}` or end of input as the
    /// end of the statement.
    pub(crate) fn parse_statement_terminator(&mut self) {
        let token = self.current_token();
        if token == SyntaxKind::SemicolonToken {
            self.next_token();
            return;
        }
        if is_implicit_terminator(token) {
            return;
        }
        let found = self.found_text();
        self.error_with_expected(&messages::END_OF_STATEMENT_EXPECTED, &[&found], ";");
    }

    /// Consume `closer`, reporting a mismatch when another block closer
    /// stands in its place. The wrong closer is left for the construct it
    /// belongs to.
    pub(crate) fn parse_closer(&mut self, closer: SyntaxKind, opener: &str) {
        let token = self.current_token();
        if token == closer {
            self.next_token();
            return;
        }
        if !is_end_keyword(token) && token != SyntaxKind::CloseBraceToken {
            self.error_expected(closer.display_text());
            return;
        }
        let expected = closer.display_text();
        let found = self.found_text();
        let (pos, end) = (self.token_pos(), self.token_end());
        if let Some(diagnostic) =
            self.report_at(pos, end, &messages::_0_EXPECTED_TO_CLOSE_1, &[expected, opener, &found], true)
        {
            diagnostic.expected = Some(expected.to_string());
            diagnostic.found = Some(found);
        }
    }

    // ========================================================================
    // Markup
    // ========================================================================

    fn parse_raw_text_statement(&mut self) -> Statement<'a> {
        let (pos, end) = (self.token_pos(), self.token_end());
        let flags = self.scanner.token_flags();
        let text: &'a str = self.arena.alloc_str(self.token_value());
        self.next_token();
        Statement::RawText(RawTextStatement {
            data: NodeData::new(SyntaxKind::RawTextStatement, pos, end),
            text,
            trim_start: flags.contains(TokenFlags::TRIM_START),
            trim_end: flags.contains(TokenFlags::TRIM_END),
        })
    }

    /// `{{ expressions }}`.
    fn parse_expression_block(&mut self) -> Statement<'a> {
        const MARKERS: TokenFlags = TokenFlags::STRIP_WHITESPACE.union(TokenFlags::KEEP_WHITESPACE);

        let pos = self.token_pos();
        let open_flags = self.scanner.token_flags() & MARKERS;
        self.next_token();

        let expression = if self.current_token() == SyntaxKind::ExpressionTagClose {
            self.error_with_expected(&messages::EXPRESSION_EXPECTED, &[], "expression");
            let missing = self.missing_expression();
            self.alloc(missing)
        } else {
            self.parse_expression_ref()
        };

        let close_flags = if self.current_token() == SyntaxKind::ExpressionTagClose {
            let flags = self.scanner.token_flags() & MARKERS;
            self.next_token();
            flags
        } else {
            self.error_expected("}}");
            TokenFlags::NONE
        };

        Statement::ExpressionBlock(ExpressionBlock {
            data: self.node_data(SyntaxKind::ExpressionBlock, pos),
            expression,
            open_flags,
            close_flags,
        })
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// `{ statements }`.
    pub(crate) fn parse_block(&mut self) -> Block<'a> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let statements = self.parse_statement_list(BLOCK_TERMINATORS);
        self.parse_closer(SyntaxKind::CloseBraceToken, "{");
        Block {
            data: self.node_data(SyntaxKind::Block, pos),
            statements,
        }
    }

    /// A `{ ... }` block where nothing else is allowed, such as a `try` body.
    fn parse_required_block(&mut self) -> Block<'a> {
        if self.current_token() == SyntaxKind::OpenBraceToken {
            return self.parse_block();
        }
        self.error_expected("{");
        let pos = self.token_pos();
        Block {
            data: NodeData::new(SyntaxKind::Block, pos, pos).with_flags(NodeFlags::MISSING),
            statements: &[],
        }
    }

    /// The statements after an alt-form `:`, up to one of `terminators`.
    fn parse_alt_block(&mut self, terminators: &[SyntaxKind]) -> Block<'a> {
        let pos = self.token_pos();
        let statements = self.parse_statement_list(terminators);
        Block {
            data: self.node_data(SyntaxKind::Block, pos).with_flags(NodeFlags::ALT_SYNTAX),
            statements,
        }
    }

    /// The body of a loop: `: ... endXXX` or a single statement.
    fn parse_loop_body(&mut self, opener: SyntaxKind) -> (&'a Statement<'a>, NodeFlags) {
        if self.parse_optional(SyntaxKind::ColonToken) {
            let block = self.parse_alt_block(ALT_BODY_TERMINATORS);
            self.parse_closer(alt_closer_for(opener), opener.display_text());
            (self.alloc(Statement::Block(block)), NodeFlags::ALT_SYNTAX)
        } else {
            let body = self.parse_embedded_statement();
            (self.alloc(body), NodeFlags::NONE)
        }
    }

    /// `( expression )`.
    fn parse_condition(&mut self) -> &'a Expression<'a> {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression_ref();
        self.parse_expected(SyntaxKind::CloseParenToken);
        condition
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_variable_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        let declaration_list = self.parse_variable_declaration_list();
        self.parse_statement_terminator();
        Statement::Variable(VariableStatement {
            data: self.node_data(SyntaxKind::VariableStatement, pos),
            declaration_list,
        })
    }

    /// `let a = 1, b` or `const c = 2`. The current token is the keyword.
    pub(crate) fn parse_variable_declaration_list(&mut self) -> VariableDeclarationList<'a> {
        let pos = self.token_pos();
        let flags = if self.current_token() == SyntaxKind::ConstKeyword {
            NodeFlags::CONST
        } else {
            NodeFlags::LET
        };
        self.next_token();

        let mut declarations = Vec::new();
        loop {
            let declaration_pos = self.token_pos();
            let name = self.parse_binding_identifier();
            let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                let expression = self.parse_assignment_expression();
                Some(self.alloc(expression))
            } else {
                None
            };
            if initializer.is_none() && flags == NodeFlags::CONST && !name.data.is_missing() {
                self.error_on_node(&name.data, &messages::CONST_DECLARATION_REQUIRES_INITIALIZER, &[name.name]);
            }
            declarations.push(VariableDeclaration {
                data: self.node_data(SyntaxKind::VariableDeclaration, declaration_pos),
                name,
                initializer,
            });
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }

        VariableDeclarationList {
            data: self.node_data(SyntaxKind::VariableDeclarationList, pos).with_flags(flags),
            declarations: self.alloc_slice(declarations),
        }
    }

    /// `function name(params) { ... }` or `function name(params): ... endfunction`.
    pub(crate) fn parse_function_declaration(&mut self) -> FunctionDeclaration<'a> {
        let pos = self.token_pos();
        self.next_token();
        let name = self.parse_binding_identifier();
        let parameters = self.parse_parameter_list();
        let body = self.parse_function_body();
        let flags = body.data.flags & NodeFlags::ALT_SYNTAX;
        FunctionDeclaration {
            data: self.node_data(SyntaxKind::FunctionDeclaration, pos).with_flags(flags),
            name,
            parameters,
            body,
        }
    }

    pub(crate) fn parse_function_body(&mut self) -> Block<'a> {
        if self.parse_optional(SyntaxKind::ColonToken) {
            let block = self.parse_alt_block(ALT_BODY_TERMINATORS);
            self.parse_closer(SyntaxKind::EndfunctionKeyword, "function");
            return block;
        }
        self.parse_required_block()
    }

    /// `( a, b, ...rest )`.
    pub(crate) fn parse_parameter_list(&mut self) -> ParameterList<'a> {
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return ParameterList { params: &[], rest: None };
        }
        let mut params = Vec::new();
        let mut rest = None;
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken
        ) {
            if self.current_token() == SyntaxKind::DotDotDotToken {
                let pos = self.token_pos();
                self.next_token();
                let name = self.parse_binding_identifier();
                rest = Some(Parameter {
                    data: self.node_data(SyntaxKind::Parameter, pos),
                    name,
                });
                if self.current_token() == SyntaxKind::CommaToken {
                    self.error(&messages::REST_PARAMETER_MUST_BE_LAST, &[]);
                }
                break;
            }
            let name = self.parse_binding_identifier();
            if name.data.is_missing() {
                break;
            }
            params.push(Parameter {
                data: NodeData::new(SyntaxKind::Parameter, name.data.range.pos, name.data.range.end),
                name,
            });
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        ParameterList {
            params: self.alloc_slice(params),
            rest,
        }
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    fn parse_if_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token();
        let condition = self.parse_condition();
        if self.parse_optional(SyntaxKind::ColonToken) {
            return self.parse_alt_if_rest(pos, condition);
        }

        let then_statement = self.parse_embedded_statement();
        let then_statement = self.alloc(then_statement);
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            let statement = self.parse_embedded_statement();
            Some(self.alloc(statement))
        } else {
            None
        };
        Statement::If(IfStatement {
            data: self.node_data(SyntaxKind::IfStatement, pos),
            condition,
            then_statement,
            else_statement,
        })
    }

    /// Everything after the `:` of an alt-form `if` or `elif`. Each `elif`
    /// becomes an `If` nested in the else slot; the innermost one consumes
    /// the shared `endif`.
    fn parse_alt_if_rest(&mut self, pos: u32, condition: &'a Expression<'a>) -> Statement<'a> {
        let then_block = self.parse_alt_block(ALT_IF_TERMINATORS);
        let then_statement = self.alloc(Statement::Block(then_block));

        let else_statement = match self.current_token() {
            SyntaxKind::ElifKeyword => {
                let elif_pos = self.token_pos();
                self.next_token();
                let elif_condition = self.parse_condition();
                self.parse_expected(SyntaxKind::ColonToken);
                let nested = self.parse_alt_if_rest(elif_pos, elif_condition);
                Some(self.alloc(nested))
            }
            SyntaxKind::ElseKeyword => {
                self.next_token();
                self.parse_optional(SyntaxKind::ColonToken);
                let else_block = self.parse_alt_block(ALT_BODY_TERMINATORS);
                self.parse_closer(SyntaxKind::EndifKeyword, "if");
                Some(self.alloc(Statement::Block(else_block)))
            }
            _ => {
                self.parse_closer(SyntaxKind::EndifKeyword, "if");
                None
            }
        };

        Statement::If(IfStatement {
            data: self.node_data(SyntaxKind::IfStatement, pos).with_flags(NodeFlags::ALT_SYNTAX),
            condition,
            then_statement,
            else_statement,
        })
    }

    fn parse_while_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token();
        let condition = self.parse_condition();
        let (body, flags) = self.parse_loop_body(SyntaxKind::WhileKeyword);
        Statement::While(WhileStatement {
            data: self.node_data(SyntaxKind::WhileStatement, pos).with_flags(flags),
            condition,
            body,
        })
    }

    fn parse_for_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        if self.is_for_in_header() {
            return self.parse_for_in_rest(pos);
        }

        let initializer = match self.current_token() {
            SyntaxKind::SemicolonToken => None,
            SyntaxKind::LetKeyword => Some(ForInitializer::Variable(self.parse_variable_declaration_list())),
            _ => Some(ForInitializer::Expression(self.parse_expression_ref())),
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        let condition = if self.current_token() != SyntaxKind::SemicolonToken {
            Some(self.parse_expression_ref())
        } else {
            None
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        let incrementor = if self.current_token() != SyntaxKind::CloseParenToken {
            Some(self.parse_expression_ref())
        } else {
            None
        };
        self.parse_expected(SyntaxKind::CloseParenToken);

        let (body, flags) = self.parse_loop_body(SyntaxKind::ForKeyword);
        Statement::For(ForStatement {
            data: self.node_data(SyntaxKind::ForStatement, pos).with_flags(flags),
            initializer,
            condition,
            incrementor,
            body,
        })
    }

    /// Whether the header reads `[let] name [, name] in`.
    fn is_for_in_header(&mut self) -> bool {
        if !matches!(self.current_token(), SyntaxKind::LetKeyword | SyntaxKind::Identifier) {
            return false;
        }
        self.scanner.look_ahead(|s| {
            let mut token = s.token();
            if token == SyntaxKind::LetKeyword {
                token = s.scan();
            }
            if token != SyntaxKind::Identifier {
                return false;
            }
            token = s.scan();
            if token == SyntaxKind::CommaToken {
                if s.scan() != SyntaxKind::Identifier {
                    return false;
                }
                token = s.scan();
            }
            token == SyntaxKind::InKeyword
        })
    }

    fn parse_for_in_rest(&mut self, pos: u32) -> Statement<'a> {
        let mut flags = NodeFlags::NONE;
        if self.parse_optional(SyntaxKind::LetKeyword) {
            flags |= NodeFlags::LET;
        }
        let first = self.parse_binding_identifier();
        let binding = if self.parse_optional(SyntaxKind::CommaToken) {
            let value = self.parse_binding_identifier();
            ForInBinding::KeyValue { key: first, value }
        } else {
            ForInBinding::Item(first)
        };
        self.parse_expected(SyntaxKind::InKeyword);
        let expression = self.parse_expression_ref();
        self.parse_expected(SyntaxKind::CloseParenToken);

        let (body, body_flags) = self.parse_loop_body(SyntaxKind::ForKeyword);
        Statement::ForIn(ForInStatement {
            data: self.node_data(SyntaxKind::ForInStatement, pos).with_flags(flags | body_flags),
            binding,
            expression,
            body,
        })
    }

    fn parse_switch_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_condition();
        let mut clauses = Vec::new();

        if self.parse_expected(SyntaxKind::OpenBraceToken) {
            let mut seen_default = false;
            loop {
                let clause_pos = self.token_pos();
                match self.current_token() {
                    SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken => break,
                    SyntaxKind::CaseKeyword => {
                        self.next_token();
                        let expression = self.parse_expression_ref();
                        self.parse_expected(SyntaxKind::ColonToken);
                        let statements = self.parse_statement_list(CASE_CLAUSE_TERMINATORS);
                        clauses.push(CaseOrDefaultClause::Case(CaseClause {
                            data: self.node_data(SyntaxKind::CaseClause, clause_pos),
                            expression,
                            statements,
                        }));
                    }
                    SyntaxKind::DefaultKeyword => {
                        let clause_end = self.token_end();
                        self.next_token();
                        if seen_default {
                            self.report_at(clause_pos, clause_end, &messages::DUPLICATE_DEFAULT_CLAUSE, &[], false);
                        }
                        seen_default = true;
                        self.parse_expected(SyntaxKind::ColonToken);
                        let statements = self.parse_statement_list(CASE_CLAUSE_TERMINATORS);
                        clauses.push(CaseOrDefaultClause::Default(DefaultClause {
                            data: self.node_data(SyntaxKind::DefaultClause, clause_pos),
                            statements,
                        }));
                    }
                    token if is_tag_boundary(token) || token == SyntaxKind::RawComment => {
                        self.next_token();
                    }
                    SyntaxKind::RawText if self.token_value().trim().is_empty() => {
                        self.next_token();
                    }
                    _ => {
                        self.error_with_expected(&messages::CASE_OR_DEFAULT_EXPECTED, &[], "case");
                        while !matches!(
                            self.current_token(),
                            SyntaxKind::CaseKeyword
                                | SyntaxKind::DefaultKeyword
                                | SyntaxKind::CloseBraceToken
                                | SyntaxKind::EndOfFileToken
                        ) {
                            self.next_token();
                        }
                    }
                }
            }
            self.parse_closer(SyntaxKind::CloseBraceToken, "switch");
        }

        Statement::Switch(SwitchStatement {
            data: self.node_data(SyntaxKind::SwitchStatement, pos),
            expression,
            clauses: self.alloc_slice(clauses),
        })
    }

    /// `try { } catch [(name)] { }`.
    fn parse_try_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token();
        let try_block = self.parse_required_block();

        let catch_pos = self.token_pos();
        let mut variable = None;
        let block = if self.parse_expected(SyntaxKind::CatchKeyword) {
            if self.parse_optional(SyntaxKind::OpenParenToken) {
                variable = Some(self.parse_binding_identifier());
                self.parse_expected(SyntaxKind::CloseParenToken);
            }
            self.parse_required_block()
        } else {
            Block {
                data: NodeData::new(SyntaxKind::Block, catch_pos, catch_pos).with_flags(NodeFlags::MISSING),
                statements: &[],
            }
        };

        Statement::Try(TryStatement {
            data: self.node_data(SyntaxKind::TryStatement, pos),
            try_block,
            catch_clause: CatchClause {
                data: self.node_data(SyntaxKind::CatchClause, catch_pos),
                variable,
                block,
            },
        })
    }

    fn parse_return_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token();
        let token = self.current_token();
        let expression = if token == SyntaxKind::SemicolonToken || is_implicit_terminator(token) || is_end_keyword(token) {
            None
        } else {
            Some(self.parse_expression_ref())
        };
        self.parse_statement_terminator();
        Statement::Return(ReturnStatement {
            data: self.node_data(SyntaxKind::ReturnStatement, pos),
            expression,
        })
    }

    fn parse_break_or_continue_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        let is_break = self.current_token() == SyntaxKind::BreakKeyword;
        self.next_token();
        // No terminator required: `case 1: break case 2:` is well formed.
        self.parse_optional(SyntaxKind::SemicolonToken);
        if is_break {
            Statement::Break(self.node_data(SyntaxKind::BreakStatement, pos))
        } else {
            Statement::Continue(self.node_data(SyntaxKind::ContinueStatement, pos))
        }
    }

    fn parse_expression_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        let expression = self.parse_expression_ref();
        self.parse_statement_terminator();
        Statement::Expression(ExpressionStatement {
            data: self.node_data(SyntaxKind::ExpressionStatement, pos),
            expression,
        })
    }
}
