//! `import` and `export` declarations.
//!
//! `from` and `as` are ordinary identifiers that only carry meaning in
//! these positions.

use ucode_ast::node::*;
use ucode_ast::syntax_kind::SyntaxKind;
use ucode_ast::types::*;
use ucode_diagnostics::messages;

use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// ```text
    /// import d from "m";
    /// import d, * as ns from "m";
    /// import d, { a, b as c } from "m";
    /// import * as ns from "m";
    /// import { default as d, "sym" as s } from "m";
    /// ```
    pub(crate) fn parse_import_declaration(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token();
        let import_clause = self.parse_import_clause();

        let module_specifier = if self.is_identifier_text("from") {
            self.next_token();
            if self.current_token() == SyntaxKind::StringLiteral {
                self.parse_string_literal()
            } else {
                self.error_with_expected(&messages::MODULE_SPECIFIER_EXPECTED, &[], "module name");
                self.missing_string_literal()
            }
        } else {
            let found = self.found_text();
            self.error_with_expected(&messages::FROM_EXPECTED_AFTER_IMPORT_CLAUSE, &[&found], "from");
            self.missing_string_literal()
        };
        self.parse_statement_terminator();

        Statement::Import(ImportDeclaration {
            data: self.node_data(SyntaxKind::ImportDeclaration, pos),
            import_clause,
            module_specifier,
        })
    }

    fn parse_import_clause(&mut self) -> ImportClause<'a> {
        let pos = self.token_pos();
        let mut name = None;
        if self.current_token() == SyntaxKind::Identifier {
            name = Some(self.parse_word());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                return ImportClause {
                    data: self.node_data(SyntaxKind::ImportClause, pos),
                    name,
                    named_bindings: None,
                };
            }
        }

        let named_bindings = match self.current_token() {
            SyntaxKind::AsteriskToken => {
                let namespace_pos = self.token_pos();
                self.next_token();
                if self.is_identifier_text("as") {
                    self.next_token();
                } else {
                    self.error_with_expected(&messages::IMPORT_CLAUSE_EXPECTED, &[], "as");
                }
                let namespace_name = self.parse_binding_identifier();
                Some(NamedImportBindings::NamespaceImport(NamespaceImport {
                    data: self.node_data(SyntaxKind::NamespaceImport, namespace_pos),
                    name: namespace_name,
                }))
            }
            SyntaxKind::OpenBraceToken => Some(NamedImportBindings::NamedImports(self.parse_named_imports())),
            _ => {
                self.error_with_expected(&messages::IMPORT_CLAUSE_EXPECTED, &[], "import clause");
                None
            }
        };

        ImportClause {
            data: self.node_data(SyntaxKind::ImportClause, pos),
            name,
            named_bindings,
        }
    }

    fn parse_named_imports(&mut self) -> NamedImports<'a> {
        let pos = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            match self.parse_import_specifier() {
                Some(specifier) => elements.push(specifier),
                None => break,
            }
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        NamedImports {
            data: self.node_data(SyntaxKind::NamedImports, pos),
            elements: self.alloc_slice(elements),
        }
    }

    /// `name`, `name as alias`, `default as alias` or `"sym" as alias`.
    fn parse_import_specifier(&mut self) -> Option<ImportSpecifier<'a>> {
        let pos = self.token_pos();
        let imported = match self.current_token() {
            SyntaxKind::Identifier => ImportedName::Identifier(self.parse_word()),
            SyntaxKind::DefaultKeyword => {
                let token = Token::new(SyntaxKind::DefaultKeyword, pos, self.token_end());
                self.next_token();
                ImportedName::Default(token)
            }
            SyntaxKind::StringLiteral => ImportedName::String(self.parse_string_literal()),
            _ => {
                self.error_with_expected(&messages::IMPORT_SPECIFIER_EXPECTED, &[], "import name");
                return None;
            }
        };

        let alias = if self.is_identifier_text("as") {
            self.next_token();
            Some(self.parse_binding_identifier())
        } else {
            None
        };

        let data = self.node_data(SyntaxKind::ImportSpecifier, pos);
        if alias.is_none() {
            let described = match imported {
                ImportedName::Identifier(_) => None,
                ImportedName::Default(_) => Some("'default'".to_string()),
                ImportedName::String(ref s) => Some(format!("string \"{}\"", s.value)),
            };
            if let Some(described) = described {
                self.error_on_node(&data, &messages::IMPORTED_0_REQUIRES_ALIAS, &[&described]);
            }
        }
        Some(ImportSpecifier { data, imported, alias })
    }

    /// ```text
    /// export { a, b as c, d as "sym", e as default };
    /// export const x = 1;
    /// export function f() { }
    /// export default expr;
    /// ```
    pub(crate) fn parse_export_declaration(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token();

        let body = match self.current_token() {
            SyntaxKind::OpenBraceToken => {
                let named = self.parse_named_exports();
                self.parse_statement_terminator();
                ExportBody::Named(named)
            }
            SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                let mut list = self.parse_variable_declaration_list();
                list.data.flags |= NodeFlags::EXPORT_CONTEXT;
                self.parse_statement_terminator();
                ExportBody::Variable(list)
            }
            SyntaxKind::FunctionKeyword => {
                let mut function = self.parse_function_declaration();
                function.data.flags |= NodeFlags::EXPORT_CONTEXT;
                if function.data.flags.contains(NodeFlags::ALT_SYNTAX) {
                    self.error_on_node(&function.data, &messages::EXPORT_FUNCTION_ALT_FORM, &[]);
                }
                ExportBody::Function(self.alloc(function))
            }
            SyntaxKind::DefaultKeyword => {
                self.next_token();
                let expression = self.parse_assignment_expression();
                let expression = self.alloc(expression);
                self.parse_statement_terminator();
                ExportBody::Default(expression)
            }
            _ => {
                self.error_with_expected(&messages::EXPORT_BODY_EXPECTED, &[], "export body");
                return Statement::Empty(
                    self.node_data(SyntaxKind::EmptyStatement, pos).with_flags(NodeFlags::MISSING),
                );
            }
        };

        Statement::Export(ExportDeclaration {
            data: self.node_data(SyntaxKind::ExportDeclaration, pos),
            body,
        })
    }

    fn parse_named_exports(&mut self) -> NamedExports<'a> {
        let pos = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            match self.parse_export_specifier() {
                Some(specifier) => elements.push(specifier),
                None => break,
            }
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        NamedExports {
            data: self.node_data(SyntaxKind::NamedExports, pos),
            elements: self.alloc_slice(elements),
        }
    }

    fn parse_export_specifier(&mut self) -> Option<ExportSpecifier<'a>> {
        let pos = self.token_pos();
        if self.current_token() != SyntaxKind::Identifier {
            self.error_with_expected(&messages::EXPORT_SPECIFIER_EXPECTED, &[], "export name");
            return None;
        }
        let name = self.parse_word();

        let alias = if self.is_identifier_text("as") {
            self.next_token();
            match self.current_token() {
                SyntaxKind::Identifier => Some(ExportAlias::Identifier(self.parse_word())),
                SyntaxKind::StringLiteral => Some(ExportAlias::String(self.parse_string_literal())),
                SyntaxKind::DefaultKeyword => {
                    let token = Token::new(SyntaxKind::DefaultKeyword, self.token_pos(), self.token_end());
                    self.next_token();
                    Some(ExportAlias::Default(token))
                }
                _ => {
                    self.error_with_expected(&messages::EXPORT_ALIAS_EXPECTED, &[], "export alias");
                    None
                }
            }
        } else {
            None
        };

        Some(ExportSpecifier {
            data: self.node_data(SyntaxKind::ExportSpecifier, pos),
            name,
            alias,
        })
    }
}
