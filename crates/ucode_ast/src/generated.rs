//! Node accessors.
//!
//! Uniform `data()` / `kind()` access over the node enums, plus a few
//! shape queries the parser and its consumers need.

use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use crate::types::NodeFlags;

/// Helper to get the NodeData from any statement.
impl<'a> Statement<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Statement::RawText(n) => &n.data,
            Statement::ExpressionBlock(n) => &n.data,
            Statement::Block(n) => &n.data,
            Statement::Empty(d) => d,
            Statement::Expression(n) => &n.data,
            Statement::Variable(n) => &n.data,
            Statement::If(n) => &n.data,
            Statement::While(n) => &n.data,
            Statement::For(n) => &n.data,
            Statement::ForIn(n) => &n.data,
            Statement::FunctionDeclaration(n) => &n.data,
            Statement::Switch(n) => &n.data,
            Statement::Try(n) => &n.data,
            Statement::Return(n) => &n.data,
            Statement::Break(d) => d,
            Statement::Continue(d) => d,
            Statement::Import(n) => &n.data,
            Statement::Export(n) => &n.data,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn pos(&self) -> u32 {
        self.data().range.pos
    }

    pub fn end(&self) -> u32 {
        self.data().range.end
    }
}

/// Helper to get the NodeData from any expression.
impl<'a> Expression<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Expression::Number(n) => &n.data,
            Expression::Double(n) => &n.data,
            Expression::String(n) => &n.data,
            Expression::True(d) => d,
            Expression::False(d) => d,
            Expression::Null(d) => d,
            Expression::This(d) => d,
            Expression::Identifier(n) => &n.data,
            Expression::Array(n) => &n.data,
            Expression::Object(n) => &n.data,
            Expression::Template(n) => &n.data,
            Expression::Regex(n) => &n.data,
            Expression::PropertyAccess(n) => &n.data,
            Expression::ElementAccess(n) => &n.data,
            Expression::Call(n) => &n.data,
            Expression::Assignment(n) => &n.data,
            Expression::AugmentedAssignment(n) => &n.data,
            Expression::Conditional(n) => &n.data,
            Expression::Binary(n) => &n.data,
            Expression::Unary(n) => &n.data,
            Expression::Update(n) => &n.data,
            Expression::Delete(n) => &n.data,
            Expression::ArrowFunction(n) => &n.data,
            Expression::FunctionExpression(n) => &n.data,
            Expression::Sequence(n) => &n.data,
            Expression::Spread(n) => &n.data,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn pos(&self) -> u32 {
        self.data().range.pos
    }

    pub fn end(&self) -> u32 {
        self.data().range.end
    }

    /// Identifier, property access or element access: the only forms that
    /// may be assigned, updated or deleted.
    pub fn is_assignment_target(&self) -> bool {
        matches!(
            self,
            Expression::Identifier(_) | Expression::PropertyAccess(_) | Expression::ElementAccess(_)
        )
    }

    /// Whether this chain link was written with `?.`.
    pub fn is_optional_chain(&self) -> bool {
        self.data().flags.contains(NodeFlags::OPTIONAL_CHAIN)
    }
}

impl<'a> ObjectLiteralElement<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            ObjectLiteralElement::PropertyAssignment(n) => &n.data,
            ObjectLiteralElement::ShorthandPropertyAssignment(n) => &n.data,
            ObjectLiteralElement::SpreadAssignment(n) => &n.data,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }
}

impl<'a> PropertyName<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            PropertyName::Identifier(n) => &n.data,
            PropertyName::StringLiteral(n) => &n.data,
            PropertyName::Computed(n) => &n.data,
        }
    }

    /// The static key text, if the name is not computed.
    pub fn static_text(&self) -> Option<&'a str> {
        match self {
            PropertyName::Identifier(n) => Some(n.name),
            PropertyName::StringLiteral(n) => Some(n.value),
            PropertyName::Computed(_) => None,
        }
    }
}

impl<'a> CaseOrDefaultClause<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            CaseOrDefaultClause::Case(n) => &n.data,
            CaseOrDefaultClause::Default(n) => &n.data,
        }
    }

    pub fn statements(&self) -> &[Statement<'a>] {
        match self {
            CaseOrDefaultClause::Case(n) => n.statements,
            CaseOrDefaultClause::Default(n) => n.statements,
        }
    }
}

impl<'a> ExportBody<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            ExportBody::Named(n) => n.data.kind,
            ExportBody::Variable(n) => n.data.kind,
            ExportBody::Function(n) => n.data.kind,
            ExportBody::Default(_) => SyntaxKind::ExportDefault,
        }
    }
}
