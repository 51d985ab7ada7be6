//! AST visitor trait for traversing the syntax tree.
//!
//! Implement [`AstVisitor`] and override the methods for the node kinds of
//! interest. Default implementations walk into children in source order.

use crate::node::*;

pub trait AstVisitor<'a> {
    fn visit_source_file(&mut self, node: &SourceFile<'a>) {
        for stmt in node.statements.iter() {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &Statement<'a>) {
        match stmt {
            Statement::RawText(n) => self.visit_raw_text(n),
            Statement::ExpressionBlock(n) => self.visit_expression(n.expression),
            Statement::Block(n) => self.visit_block(n),
            Statement::Empty(_) => {}
            Statement::Expression(n) => self.visit_expression(n.expression),
            Statement::Variable(n) => self.visit_variable_declaration_list(&n.declaration_list),
            Statement::If(n) => self.visit_if_statement(n),
            Statement::While(n) => self.visit_while_statement(n),
            Statement::For(n) => self.visit_for_statement(n),
            Statement::ForIn(n) => self.visit_for_in_statement(n),
            Statement::FunctionDeclaration(n) => self.visit_function_declaration(n),
            Statement::Switch(n) => self.visit_switch_statement(n),
            Statement::Try(n) => self.visit_try_statement(n),
            Statement::Return(n) => {
                if let Some(expr) = n.expression {
                    self.visit_expression(expr);
                }
            }
            Statement::Break(_) => {}
            Statement::Continue(_) => {}
            Statement::Import(n) => self.visit_import_declaration(n),
            Statement::Export(n) => self.visit_export_declaration(n),
        }
    }

    // -- Statements --

    fn visit_raw_text(&mut self, _node: &RawTextStatement<'a>) {}

    fn visit_block(&mut self, node: &Block<'a>) {
        for stmt in node.statements.iter() {
            self.visit_statement(stmt);
        }
    }

    fn visit_variable_declaration_list(&mut self, node: &VariableDeclarationList<'a>) {
        for decl in node.declarations.iter() {
            self.visit_identifier(&decl.name);
            if let Some(init) = decl.initializer {
                self.visit_expression(init);
            }
        }
    }

    fn visit_if_statement(&mut self, node: &IfStatement<'a>) {
        self.visit_expression(node.condition);
        self.visit_statement(node.then_statement);
        if let Some(else_stmt) = node.else_statement {
            self.visit_statement(else_stmt);
        }
    }

    fn visit_while_statement(&mut self, node: &WhileStatement<'a>) {
        self.visit_expression(node.condition);
        self.visit_statement(node.body);
    }

    fn visit_for_statement(&mut self, node: &ForStatement<'a>) {
        match node.initializer {
            Some(ForInitializer::Variable(ref list)) => self.visit_variable_declaration_list(list),
            Some(ForInitializer::Expression(expr)) => self.visit_expression(expr),
            None => {}
        }
        if let Some(cond) = node.condition {
            self.visit_expression(cond);
        }
        if let Some(step) = node.incrementor {
            self.visit_expression(step);
        }
        self.visit_statement(node.body);
    }

    fn visit_for_in_statement(&mut self, node: &ForInStatement<'a>) {
        match node.binding {
            ForInBinding::Item(ref item) => self.visit_identifier(item),
            ForInBinding::KeyValue { ref key, ref value } => {
                self.visit_identifier(key);
                self.visit_identifier(value);
            }
        }
        self.visit_expression(node.expression);
        self.visit_statement(node.body);
    }

    fn visit_function_declaration(&mut self, node: &FunctionDeclaration<'a>) {
        self.visit_identifier(&node.name);
        self.visit_parameter_list(&node.parameters);
        self.visit_block(&node.body);
    }

    fn visit_parameter_list(&mut self, node: &ParameterList<'a>) {
        for param in node.params.iter().chain(node.rest.iter()) {
            self.visit_identifier(&param.name);
        }
    }

    fn visit_switch_statement(&mut self, node: &SwitchStatement<'a>) {
        self.visit_expression(node.expression);
        for clause in node.clauses.iter() {
            if let CaseOrDefaultClause::Case(case) = clause {
                self.visit_expression(case.expression);
            }
            for stmt in clause.statements() {
                self.visit_statement(stmt);
            }
        }
    }

    fn visit_try_statement(&mut self, node: &TryStatement<'a>) {
        self.visit_block(&node.try_block);
        if let Some(ref var) = node.catch_clause.variable {
            self.visit_identifier(var);
        }
        self.visit_block(&node.catch_clause.block);
    }

    fn visit_import_declaration(&mut self, node: &ImportDeclaration<'a>) {
        let clause = &node.import_clause;
        if let Some(ref name) = clause.name {
            self.visit_identifier(name);
        }
        match clause.named_bindings {
            Some(NamedImportBindings::NamespaceImport(ref ns)) => self.visit_identifier(&ns.name),
            Some(NamedImportBindings::NamedImports(ref named)) => {
                for specifier in named.elements.iter() {
                    if let Some(local) = specifier.local_name() {
                        self.visit_identifier(local);
                    }
                }
            }
            None => {}
        }
    }

    fn visit_export_declaration(&mut self, node: &ExportDeclaration<'a>) {
        match node.body {
            ExportBody::Named(ref named) => {
                for specifier in named.elements.iter() {
                    self.visit_identifier(&specifier.name);
                }
            }
            ExportBody::Variable(ref list) => self.visit_variable_declaration_list(list),
            ExportBody::Function(func) => self.visit_function_declaration(func),
            ExportBody::Default(expr) => self.visit_expression(expr),
        }
    }

    // -- Expressions --

    fn visit_expression(&mut self, expr: &Expression<'a>) {
        match expr {
            Expression::Number(_)
            | Expression::Double(_)
            | Expression::String(_)
            | Expression::True(_)
            | Expression::False(_)
            | Expression::Null(_)
            | Expression::This(_)
            | Expression::Regex(_) => {}
            Expression::Identifier(n) => self.visit_identifier(n),
            Expression::Array(n) => {
                for element in n.elements.iter() {
                    self.visit_expression(element);
                }
            }
            Expression::Object(n) => self.visit_object_literal(n),
            Expression::Template(n) => {
                for span in n.template_spans.iter() {
                    self.visit_expression(span.expression);
                }
            }
            Expression::PropertyAccess(n) => self.visit_expression(n.expression),
            Expression::ElementAccess(n) => {
                self.visit_expression(n.expression);
                self.visit_expression(n.argument_expression);
            }
            Expression::Call(n) => self.visit_call_expression(n),
            Expression::Assignment(n) | Expression::AugmentedAssignment(n) => {
                self.visit_expression(n.left);
                self.visit_expression(n.right);
            }
            Expression::Conditional(n) => {
                self.visit_expression(n.condition);
                self.visit_expression(n.when_true);
                self.visit_expression(n.when_false);
            }
            Expression::Binary(n) => {
                self.visit_expression(n.left);
                self.visit_expression(n.right);
            }
            Expression::Unary(n) => self.visit_expression(n.operand),
            Expression::Update(n) => self.visit_expression(n.operand),
            Expression::Delete(n) => self.visit_expression(n.expression),
            Expression::ArrowFunction(n) => self.visit_arrow_function(n),
            Expression::FunctionExpression(n) => {
                if let Some(ref name) = n.name {
                    self.visit_identifier(name);
                }
                self.visit_parameter_list(&n.parameters);
                self.visit_block(&n.body);
            }
            Expression::Sequence(n) => {
                for element in n.elements.iter() {
                    self.visit_expression(element);
                }
            }
            Expression::Spread(n) => self.visit_expression(n.expression),
        }
    }

    fn visit_identifier(&mut self, _node: &Identifier<'a>) {}

    fn visit_object_literal(&mut self, node: &ObjectLiteralExpression<'a>) {
        for prop in node.properties.iter() {
            match prop {
                ObjectLiteralElement::PropertyAssignment(p) => {
                    if let PropertyName::Computed(ref computed) = p.name {
                        self.visit_expression(computed.expression);
                    }
                    self.visit_expression(p.initializer);
                }
                ObjectLiteralElement::ShorthandPropertyAssignment(p) => self.visit_identifier(&p.name),
                ObjectLiteralElement::SpreadAssignment(p) => self.visit_expression(p.expression),
            }
        }
    }

    fn visit_call_expression(&mut self, node: &CallExpression<'a>) {
        self.visit_expression(node.expression);
        for arg in node.arguments.iter() {
            self.visit_expression(arg);
        }
    }

    fn visit_arrow_function(&mut self, node: &ArrowFunction<'a>) {
        self.visit_parameter_list(&node.parameters);
        match node.body {
            ArrowFunctionBody::Block(block) => self.visit_block(block),
            ArrowFunctionBody::Expression(expr) => self.visit_expression(expr),
        }
    }
}
