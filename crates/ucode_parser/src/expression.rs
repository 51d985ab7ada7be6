//! Expression productions.
//!
//! ```text
//! Expression  ::= Assignment { ',' Assignment }
//! Assignment  ::= Arrow | Conditional [ AssignOp Assignment ]
//! Conditional ::= Binary { '??' Binary } [ '?' Assignment ':' Assignment ]
//! Binary      ::= Unary { BinOp Unary }          (precedence climbing)
//! Unary       ::= ( '!' | '~' | '-' | '+' | '++' | '--' | 'delete' ) Unary | Postfix
//! Postfix     ::= Chain [ '++' | '--' ]
//! Chain       ::= Primary { '.' Word | '?.' ... | '[' Expression ']' | Arguments }
//! ```

use ucode_ast::node::*;
use ucode_ast::syntax_kind::SyntaxKind;
use ucode_ast::types::*;
use ucode_diagnostics::messages;

use crate::parser::Parser;
use crate::precedence::{get_binary_operator_precedence, is_right_associative, OperatorPrecedence};
use crate::utilities::parse_integer_literal;

impl<'a> Parser<'a> {
    /// Comma-separated expressions. Two or more produce a `SequenceExpression`.
    pub(crate) fn parse_expression(&mut self) -> Expression<'a> {
        let first = self.parse_assignment_expression();
        if self.current_token() != SyntaxKind::CommaToken {
            return first;
        }
        let pos = first.pos();
        let mut elements = vec![first];
        while self.parse_optional(SyntaxKind::CommaToken) {
            elements.push(self.parse_assignment_expression());
        }
        Expression::Sequence(SequenceExpression {
            data: self.node_data(SyntaxKind::SequenceExpression, pos),
            elements: self.alloc_slice(elements),
        })
    }

    pub(crate) fn parse_expression_ref(&mut self) -> &'a Expression<'a> {
        let expression = self.parse_expression();
        self.alloc(expression)
    }

    /// A zero-width identifier flagged MISSING at the current token.
    pub(crate) fn missing_expression(&self) -> Expression<'a> {
        Expression::Identifier(self.missing_identifier())
    }

    // ========================================================================
    // Assignment and conditional
    // ========================================================================

    pub(crate) fn parse_assignment_expression(&mut self) -> Expression<'a> {
        if !self.enter_nesting() {
            return self.missing_expression();
        }
        let expression = self.parse_assignment_expression_worker();
        self.exit_nesting();
        expression
    }

    fn parse_assignment_expression_worker(&mut self) -> Expression<'a> {
        if self.is_start_of_arrow_function() {
            return self.parse_arrow_function();
        }

        let left = self.parse_conditional_expression();
        let operator = self.current_token();
        if !operator.is_assignment_operator() {
            return left;
        }
        if !left.is_assignment_target() && !left.data().is_missing() {
            self.error_on_node(left.data(), &messages::INVALID_ASSIGNMENT_TARGET, &[]);
        }

        let pos = left.pos();
        let operator_token = Token::new(operator, self.token_pos(), self.token_end());
        self.next_token();
        let right = self.parse_assignment_expression();

        if operator == SyntaxKind::EqualsToken {
            Expression::Assignment(AssignmentExpression {
                data: self.node_data(SyntaxKind::AssignmentExpression, pos),
                left: self.alloc(left),
                operator_token,
                right: self.alloc(right),
            })
        } else {
            Expression::AugmentedAssignment(AssignmentExpression {
                data: self.node_data(SyntaxKind::AugmentedAssignmentExpression, pos),
                left: self.alloc(left),
                operator_token,
                right: self.alloc(right),
            })
        }
    }

    /// `??` and `?:` share one band and are read left to right, so
    /// `a ?? b ? c : d` is `(a ?? b) ? c : d`.
    fn parse_conditional_expression(&mut self) -> Expression<'a> {
        let mut expression = self.parse_binary_expression(OperatorPrecedence::Conditional);
        loop {
            match self.current_token() {
                SyntaxKind::QuestionQuestionToken => {
                    let operator_token = Token::new(SyntaxKind::QuestionQuestionToken, self.token_pos(), self.token_end());
                    self.next_token();
                    let right = self.parse_binary_expression(OperatorPrecedence::Conditional);
                    expression = self.make_binary(expression, operator_token, right);
                }
                SyntaxKind::QuestionToken => {
                    let pos = expression.pos();
                    self.next_token();
                    let when_true = self.parse_assignment_expression();
                    self.parse_expected(SyntaxKind::ColonToken);
                    let when_false = self.parse_assignment_expression();
                    return Expression::Conditional(ConditionalExpression {
                        data: self.node_data(SyntaxKind::ConditionalExpression, pos),
                        condition: self.alloc(expression),
                        when_true: self.alloc(when_true),
                        when_false: self.alloc(when_false),
                    });
                }
                _ => return expression,
            }
        }
    }

    // ========================================================================
    // Binary and unary
    // ========================================================================

    fn parse_binary_expression(&mut self, min_precedence: OperatorPrecedence) -> Expression<'a> {
        let mut left = self.parse_unary_expression();
        loop {
            let operator = self.current_token();
            let precedence = get_binary_operator_precedence(operator);
            if precedence == OperatorPrecedence::Invalid || precedence <= min_precedence {
                break;
            }
            let operator_token = Token::new(operator, self.token_pos(), self.token_end());
            self.next_token();
            // `**` binds its right operand one band lower so a following `**`
            // nests to the right.
            let right_precedence = if is_right_associative(operator) {
                OperatorPrecedence::Multiplicative
            } else {
                precedence
            };
            let right = self.parse_binary_expression(right_precedence);
            left = self.make_binary(left, operator_token, right);
        }
        left
    }

    fn make_binary(&self, left: Expression<'a>, operator_token: Token, right: Expression<'a>) -> Expression<'a> {
        let pos = left.pos();
        Expression::Binary(BinaryExpression {
            data: self.node_data(SyntaxKind::BinaryExpression, pos),
            left: self.alloc(left),
            operator_token,
            right: self.alloc(right),
        })
    }

    /// Prefix operators apply to the following unary operand only, so
    /// `-a ** b` reads as `(-a) ** b`.
    fn parse_unary_expression(&mut self) -> Expression<'a> {
        let operator = self.current_token();
        let pos = self.token_pos();
        match operator {
            SyntaxKind::ExclamationToken | SyntaxKind::TildeToken | SyntaxKind::MinusToken | SyntaxKind::PlusToken => {
                self.next_token();
                let operand = self.parse_nested_unary();
                Expression::Unary(UnaryExpression {
                    data: self.node_data(SyntaxKind::UnaryExpression, pos),
                    operator,
                    operand: self.alloc(operand),
                })
            }
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                self.next_token();
                let operand = self.parse_nested_unary();
                self.check_update_operand(&operand, operator);
                Expression::Update(UpdateExpression {
                    data: self.node_data(SyntaxKind::UpdateExpression, pos),
                    operator,
                    operand: self.alloc(operand),
                    prefix: true,
                })
            }
            SyntaxKind::DeleteKeyword => {
                self.next_token();
                let operand = self.parse_nested_unary();
                if !operand.is_assignment_target() && !operand.data().is_missing() {
                    self.error_on_node(operand.data(), &messages::INVALID_DELETE_OPERAND, &[]);
                }
                Expression::Delete(DeleteExpression {
                    data: self.node_data(SyntaxKind::DeleteExpression, pos),
                    expression: self.alloc(operand),
                })
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_nested_unary(&mut self) -> Expression<'a> {
        if !self.enter_nesting() {
            return self.missing_expression();
        }
        let operand = self.parse_unary_expression();
        self.exit_nesting();
        operand
    }

    fn check_update_operand(&mut self, operand: &Expression<'a>, operator: SyntaxKind) {
        if !operand.is_assignment_target() && !operand.data().is_missing() {
            self.error_on_node(operand.data(), &messages::INVALID_UPDATE_OPERAND, &[operator.display_text()]);
        }
    }

    fn parse_postfix_expression(&mut self) -> Expression<'a> {
        let expression = self.parse_left_hand_side_expression();
        let operator = self.current_token();
        if matches!(operator, SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
            && !self.scanner.has_preceding_line_break()
        {
            self.check_update_operand(&expression, operator);
            let pos = expression.pos();
            self.next_token();
            return Expression::Update(UpdateExpression {
                data: self.node_data(SyntaxKind::UpdateExpression, pos),
                operator,
                operand: self.alloc(expression),
                prefix: false,
            });
        }
        expression
    }

    // ========================================================================
    // Member chains
    // ========================================================================

    fn parse_left_hand_side_expression(&mut self) -> Expression<'a> {
        let mut expression = self.parse_primary_expression();
        loop {
            expression = match self.current_token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    self.parse_property_access_rest(expression, None)
                }
                SyntaxKind::QuestionDotToken => {
                    let question_dot = Token::new(SyntaxKind::QuestionDotToken, self.token_pos(), self.token_end());
                    self.next_token();
                    match self.current_token() {
                        SyntaxKind::OpenBracketToken => self.parse_element_access_rest(expression, Some(question_dot)),
                        SyntaxKind::OpenParenToken => self.parse_call_rest(expression, Some(question_dot)),
                        _ => self.parse_property_access_rest(expression, Some(question_dot)),
                    }
                }
                SyntaxKind::OpenBracketToken => self.parse_element_access_rest(expression, None),
                SyntaxKind::OpenParenToken => self.parse_call_rest(expression, None),
                _ => break,
            };
        }
        expression
    }

    fn chain_data(&self, kind: SyntaxKind, pos: u32, question_dot: &Option<Token>) -> NodeData {
        let data = self.node_data(kind, pos);
        if question_dot.is_some() {
            data.with_flags(NodeFlags::OPTIONAL_CHAIN)
        } else {
            data
        }
    }

    fn parse_property_access_rest(&mut self, expression: Expression<'a>, question_dot_token: Option<Token>) -> Expression<'a> {
        let pos = expression.pos();
        let name = if self.current_token().is_word() {
            self.parse_word()
        } else {
            self.error_with_expected(&messages::IDENTIFIER_EXPECTED, &[], "property name");
            self.missing_identifier()
        };
        Expression::PropertyAccess(PropertyAccessExpression {
            data: self.chain_data(SyntaxKind::PropertyAccessExpression, pos, &question_dot_token),
            expression: self.alloc(expression),
            question_dot_token,
            name,
        })
    }

    fn parse_element_access_rest(&mut self, expression: Expression<'a>, question_dot_token: Option<Token>) -> Expression<'a> {
        let pos = expression.pos();
        self.next_token();
        let argument_expression = self.parse_expression_ref();
        self.parse_expected(SyntaxKind::CloseBracketToken);
        Expression::ElementAccess(ElementAccessExpression {
            data: self.chain_data(SyntaxKind::ElementAccessExpression, pos, &question_dot_token),
            expression: self.alloc(expression),
            question_dot_token,
            argument_expression,
        })
    }

    fn parse_call_rest(&mut self, expression: Expression<'a>, question_dot_token: Option<Token>) -> Expression<'a> {
        let pos = expression.pos();
        let arguments = self.parse_arguments();
        Expression::Call(CallExpression {
            data: self.chain_data(SyntaxKind::CallExpression, pos, &question_dot_token),
            expression: self.alloc(expression),
            question_dot_token,
            arguments,
        })
    }

    fn parse_arguments(&mut self) -> &'a [Expression<'a>] {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let mut arguments = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken
        ) {
            arguments.push(self.parse_spread_or_assignment());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.alloc_slice(arguments)
    }

    fn parse_spread_or_assignment(&mut self) -> Expression<'a> {
        if self.current_token() != SyntaxKind::DotDotDotToken {
            return self.parse_assignment_expression();
        }
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_assignment_expression();
        Expression::Spread(SpreadElement {
            data: self.node_data(SyntaxKind::SpreadElement, pos),
            expression: self.alloc(expression),
        })
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn parse_primary_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let end = self.token_end();
        match self.current_token() {
            SyntaxKind::NumberLiteral => self.parse_number_literal(),
            SyntaxKind::DoubleLiteral => {
                let value = self.token_value().parse::<f64>().unwrap_or(f64::NAN);
                self.next_token();
                Expression::Double(DoubleLiteral {
                    data: NodeData::new(SyntaxKind::DoubleLiteral, pos, end),
                    value,
                })
            }
            SyntaxKind::StringLiteral => Expression::String(self.parse_string_literal()),
            SyntaxKind::TemplateSegment => self.parse_template_expression(),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => self.parse_regex_literal(),
            kind @ (SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::ThisKeyword) => {
                self.next_token();
                let data = NodeData::new(kind, pos, end);
                match kind {
                    SyntaxKind::TrueKeyword => Expression::True(data),
                    SyntaxKind::FalseKeyword => Expression::False(data),
                    SyntaxKind::NullKeyword => Expression::Null(data),
                    _ => Expression::This(data),
                }
            }
            SyntaxKind::Identifier => Expression::Identifier(self.parse_word()),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let expression = self.parse_expression();
                self.parse_expected(SyntaxKind::CloseParenToken);
                expression
            }
            SyntaxKind::FunctionKeyword => self.parse_function_expression(),
            SyntaxKind::ErrorToken => {
                // Already reported by the scanner.
                let missing = self.missing_expression();
                self.next_token();
                missing
            }
            _ => {
                self.error_with_expected(&messages::EXPRESSION_EXPECTED, &[], "expression");
                self.missing_expression()
            }
        }
    }

    fn parse_number_literal(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let end = self.token_end();
        let numeric_literal_flags = self.scanner.token_flags() & TokenFlags::NUMERIC_LITERAL_FLAGS;
        let value = match parse_integer_literal(self.token_value()) {
            Some(value) => value,
            None => {
                let text = self.token_value().to_string();
                self.report_at(pos, end, &messages::INTEGER_LITERAL_TOO_LARGE, &[&text], false);
                u64::MAX
            }
        };
        self.next_token();
        Expression::Number(NumberLiteral {
            data: NodeData::new(SyntaxKind::NumberLiteral, pos, end),
            value,
            numeric_literal_flags,
        })
    }

    pub(crate) fn parse_string_literal(&mut self) -> StringLiteral<'a> {
        let data = NodeData::new(SyntaxKind::StringLiteral, self.token_pos(), self.token_end());
        let value: &'a str = self.arena.alloc_str(self.token_value());
        self.next_token();
        StringLiteral { data, value }
    }

    pub(crate) fn missing_string_literal(&self) -> StringLiteral<'a> {
        let pos = self.token_pos();
        StringLiteral {
            data: NodeData::new(SyntaxKind::StringLiteral, pos, pos).with_flags(NodeFlags::MISSING),
            value: "",
        }
    }

    /// A `/` in operand position starts a regular expression literal.
    fn parse_regex_literal(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        if self.scanner.rescan_slash_token() != SyntaxKind::RegexPattern {
            let missing = self.missing_expression();
            self.next_token();
            return missing;
        }
        let pattern: &'a str = self.arena.alloc_str(self.token_value());
        self.next_token();
        let mut flags = RegexFlags::empty();
        if self.current_token() == SyntaxKind::RegexFlags {
            flags = RegexFlags::from_text(self.token_value()).unwrap_or_default();
            self.next_token();
        }
        Expression::Regex(RegularExpressionLiteral {
            data: self.node_data(SyntaxKind::RegularExpressionLiteral, pos),
            pattern,
            flags,
        })
    }

    fn parse_template_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let head = self.parse_template_segment();
        let mut template_spans = Vec::new();
        while self.current_token() == SyntaxKind::PlaceholderOpen {
            let span_pos = self.token_pos();
            self.next_token();
            let expression = self.parse_expression_ref();
            if !self.parse_optional(SyntaxKind::PlaceholderClose) {
                self.error_expected("}");
                self.skip_to_placeholder_close();
            }
            let literal = if self.current_token() == SyntaxKind::TemplateSegment {
                self.parse_template_segment()
            } else {
                let at = self.token_pos();
                TemplateSegment {
                    data: NodeData::new(SyntaxKind::TemplateSegment, at, at).with_flags(NodeFlags::MISSING),
                    value: "",
                }
            };
            template_spans.push(TemplateSpan {
                data: self.node_data(SyntaxKind::TemplateSpan, span_pos),
                expression,
                literal,
            });
        }
        Expression::Template(TemplateExpression {
            data: self.node_data(SyntaxKind::TemplateExpression, pos),
            head,
            template_spans: self.alloc_slice(template_spans),
        })
    }

    fn parse_template_segment(&mut self) -> TemplateSegment<'a> {
        let data = NodeData::new(SyntaxKind::TemplateSegment, self.token_pos(), self.token_end());
        let value: &'a str = self.arena.alloc_str(self.token_value());
        self.next_token();
        TemplateSegment { data, value }
    }

    fn skip_to_placeholder_close(&mut self) {
        loop {
            match self.current_token() {
                SyntaxKind::PlaceholderClose => {
                    self.next_token();
                    return;
                }
                SyntaxKind::TemplateSegment | SyntaxKind::EndOfFileToken => return,
                _ => {
                    self.next_token();
                }
            }
        }
    }

    fn parse_array_literal(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBracketToken | SyntaxKind::EndOfFileToken
        ) {
            elements.push(self.parse_spread_or_assignment());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        Expression::Array(ArrayLiteralExpression {
            data: self.node_data(SyntaxKind::ArrayLiteralExpression, pos),
            elements: self.alloc_slice(elements),
        })
    }

    fn parse_object_literal(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        self.next_token();
        let mut properties = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            match self.parse_object_literal_element() {
                Some(property) => properties.push(property),
                None => self.skip_to_property_boundary(),
            }
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        Expression::Object(ObjectLiteralExpression {
            data: self.node_data(SyntaxKind::ObjectLiteralExpression, pos),
            properties: self.alloc_slice(properties),
        })
    }

    fn parse_object_literal_element(&mut self) -> Option<ObjectLiteralElement<'a>> {
        let pos = self.token_pos();
        let token = self.current_token();
        let name = match token {
            SyntaxKind::DotDotDotToken => {
                self.next_token();
                let expression = self.parse_assignment_expression();
                return Some(ObjectLiteralElement::SpreadAssignment(SpreadAssignment {
                    data: self.node_data(SyntaxKind::SpreadAssignment, pos),
                    expression: self.alloc(expression),
                }));
            }
            SyntaxKind::OpenBracketToken => {
                self.next_token();
                let expression = self.parse_expression_ref();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                PropertyName::Computed(ComputedPropertyName {
                    data: self.node_data(SyntaxKind::ComputedPropertyName, pos),
                    expression,
                })
            }
            SyntaxKind::StringLiteral => PropertyName::StringLiteral(self.parse_string_literal()),
            _ if token.is_word() => {
                let name = self.parse_word();
                if self.current_token() != SyntaxKind::ColonToken {
                    if token != SyntaxKind::Identifier {
                        self.error_on_node(&name.data, &messages::RESERVED_WORD_0_CANNOT_BE_IDENTIFIER, &[name.name]);
                    }
                    return Some(ObjectLiteralElement::ShorthandPropertyAssignment(ShorthandPropertyAssignment {
                        data: self.node_data(SyntaxKind::ShorthandPropertyAssignment, pos),
                        name,
                    }));
                }
                PropertyName::Identifier(name)
            }
            _ => {
                self.error_with_expected(&messages::PROPERTY_ASSIGNMENT_EXPECTED, &[], "property");
                return None;
            }
        };
        self.parse_expected(SyntaxKind::ColonToken);
        let initializer = self.parse_assignment_expression();
        Some(ObjectLiteralElement::PropertyAssignment(PropertyAssignment {
            data: self.node_data(SyntaxKind::PropertyAssignment, pos),
            name,
            initializer: self.alloc(initializer),
        }))
    }

    fn skip_to_property_boundary(&mut self) {
        while !matches!(
            self.current_token(),
            SyntaxKind::CommaToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::EndOfFileToken
                | SyntaxKind::StatementTagClose
                | SyntaxKind::ExpressionTagClose
        ) {
            self.next_token();
        }
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// `name =>` or a parenthesized list of plain names, optionally ending in
    /// `...rest`, followed by `=>`.
    fn is_start_of_arrow_function(&mut self) -> bool {
        match self.current_token() {
            SyntaxKind::Identifier => self
                .scanner
                .look_ahead(|s| s.scan() == SyntaxKind::EqualsGreaterThanToken),
            SyntaxKind::OpenParenToken => self.scanner.look_ahead(|s| {
                let mut token = s.scan();
                if token == SyntaxKind::CloseParenToken {
                    return s.scan() == SyntaxKind::EqualsGreaterThanToken;
                }
                loop {
                    if token == SyntaxKind::DotDotDotToken {
                        return s.scan() == SyntaxKind::Identifier
                            && s.scan() == SyntaxKind::CloseParenToken
                            && s.scan() == SyntaxKind::EqualsGreaterThanToken;
                    }
                    if token != SyntaxKind::Identifier {
                        return false;
                    }
                    match s.scan() {
                        SyntaxKind::CommaToken => token = s.scan(),
                        SyntaxKind::CloseParenToken => return s.scan() == SyntaxKind::EqualsGreaterThanToken,
                        _ => return false,
                    }
                }
            }),
            _ => false,
        }
    }

    fn parse_arrow_function(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let parameters = if self.current_token() == SyntaxKind::Identifier {
            let name = self.parse_word();
            let param = Parameter {
                data: NodeData::new(SyntaxKind::Parameter, name.data.range.pos, name.data.range.end),
                name,
            };
            ParameterList {
                params: self.alloc_slice(vec![param]),
                rest: None,
            }
        } else {
            self.parse_parameter_list()
        };
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);

        let body = if self.current_token() == SyntaxKind::OpenBraceToken {
            let block = self.parse_block();
            ArrowFunctionBody::Block(self.alloc(block))
        } else {
            let expression = self.parse_assignment_expression();
            ArrowFunctionBody::Expression(self.alloc(expression))
        };
        Expression::ArrowFunction(ArrowFunction {
            data: self.node_data(SyntaxKind::ArrowFunction, pos),
            parameters,
            body,
        })
    }

    fn parse_function_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        self.next_token();
        let name = if self.current_token() == SyntaxKind::Identifier {
            Some(self.parse_word())
        } else {
            None
        };
        let parameters = self.parse_parameter_list();
        let body = self.parse_function_body();
        let flags = body.data.flags & NodeFlags::ALT_SYNTAX;
        let data = self.node_data(SyntaxKind::FunctionExpression, pos).with_flags(flags);
        if flags.contains(NodeFlags::ALT_SYNTAX) {
            self.error_on_node(&data, &messages::FUNCTION_EXPRESSION_ALT_FORM, &[]);
        }
        Expression::FunctionExpression(FunctionExpression {
            data,
            name,
            parameters,
            body,
        })
    }
}
