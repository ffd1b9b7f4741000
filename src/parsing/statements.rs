//! Statement parsing: dispatch, simple statements, imports, compound
//! statements and suites.

use crate::parsing::builder::Marker;
use crate::parsing::context::{FutureFeature, FuturePhase, ParsingScope};
use crate::parsing::parser::{EXPRESSION_EXPECTED, IDENTIFIER_EXPECTED, Parser};
use crate::parsing::tokens::TokenKind;
use crate::parsing::tree::NodeKind;

impl<'src> Parser<'src> {
    // ── Dispatch ──────────────────────────────────────────────────────────────

    /// Parse one statement.  Always consumes at least one token unless the
    /// stream is at EOF.
    pub fn parse_statement(&mut self, scope: ParsingScope) {
        while self.at(TokenKind::StatementBreak) {
            self.bump();
        }
        if self.at_eof() {
            return;
        }

        match self.current() {
            TokenKind::WhileKeyword => self.parse_while_statement(scope),
            TokenKind::IfKeyword => self.parse_if_statement(scope),
            TokenKind::ForKeyword => self.parse_for_statement(scope),
            TokenKind::TryKeyword => self.parse_try_statement(scope),
            TokenKind::DefKeyword => self.parse_function_declaration(),
            TokenKind::At => self.parse_decorated_declaration(scope),
            TokenKind::ClassKeyword => self.parse_class_declaration(scope),
            TokenKind::WithKeyword => self.parse_with_statement(scope),
            _ => self.parse_simple_statement(scope),
        }
    }

    pub fn parse_simple_statement(&mut self, scope: ParsingScope) {
        if self.at_eof() {
            return;
        }
        match self.current() {
            TokenKind::PrintKeyword => self.parse_print_statement(scope),
            TokenKind::AssertKeyword => self.parse_assert_statement(scope),
            TokenKind::BreakKeyword => self.parse_keyword_statement(NodeKind::BreakStatement, scope),
            TokenKind::ContinueKeyword => {
                self.parse_keyword_statement(NodeKind::ContinueStatement, scope)
            }
            TokenKind::DelKeyword => self.parse_del_statement(scope),
            TokenKind::ExecKeyword => self.parse_exec_statement(scope),
            TokenKind::GlobalKeyword => {
                self.parse_name_defining_statement(NodeKind::GlobalStatement, scope)
            }
            TokenKind::NonlocalKeyword => {
                self.parse_name_defining_statement(NodeKind::NonlocalStatement, scope)
            }
            TokenKind::ImportKeyword => self.parse_import_statement(scope),
            TokenKind::FromKeyword => self.parse_from_import_statement(scope),
            TokenKind::PassKeyword => self.parse_keyword_statement(NodeKind::PassStatement, scope),
            TokenKind::ReturnKeyword => self.parse_return_statement(scope),
            TokenKind::RaiseKeyword => self.parse_raise_statement(scope),
            _ => self.parse_expression_or_assignment(scope),
        }
    }

    /// Expression statement, augmented assignment, or assignment chain.
    fn parse_expression_or_assignment(&mut self, scope: ParsingScope) {
        let first = self.current();
        let mut statement = self.mark();

        if first == TokenKind::YieldKeyword {
            self.parse_yield_or_tuple_expression(false);
            self.check_end_of_statement(scope);
            statement.commit(self, NodeKind::ExpressionStatement);
            return;
        }

        if !self.parse_expression_optional() {
            statement.discard(self);
            let bad = self.mark();
            self.bump();
            let message = match first {
                TokenKind::InconsistentDedent => {
                    "Unindent does not match any outer indentation level".to_string()
                }
                TokenKind::Indent => "Unexpected indent".to_string(),
                other => format!("Statement expected, found {other}"),
            };
            bad.error(self, message);
            return;
        }

        let mut kind = NodeKind::ExpressionStatement;
        if self.current().is_aug_assign() {
            kind = NodeKind::AugAssignmentStatement;
            self.bump();
            if !self.parse_yield_or_tuple_expression(false) {
                self.error(EXPRESSION_EXPECTED);
            }
        } else if self.at(TokenKind::Eq) {
            kind = NodeKind::AssignmentStatement;
            // Reparse the left side now that it is known to be a target.
            statement.rollback(self);
            statement = self.mark();
            self.parse_expression_with(false, true);
            self.expect(TokenKind::Eq, "'=' expected");
            self.parse_assignment_values();
        }

        self.check_end_of_statement(scope);
        statement.commit(self, kind);
    }

    /// Right-hand sides of `a = b = c`: every operand followed by `=` is
    /// reparsed as a target.
    fn parse_assignment_values(&mut self) {
        loop {
            let operand = self.mark();
            let is_yield = self.at(TokenKind::YieldKeyword);
            if !self.parse_yield_or_tuple_expression(false) {
                operand.discard(self);
                self.error(EXPRESSION_EXPECTED);
                break;
            }
            if !self.at(TokenKind::Eq) {
                operand.discard(self);
                break;
            }
            if is_yield {
                operand.discard(self);
                self.error("Cannot assign to 'yield' expression");
            } else {
                operand.rollback(self);
                self.parse_expression_with(false, true);
            }
            self.expect(TokenKind::Eq, "'=' expected");
        }
    }

    /// Consume the end of a simple statement.
    ///
    /// A semicolon inside a single-line suite is left for the suite loop.
    pub(crate) fn check_end_of_statement(&mut self, scope: ParsingScope) {
        match self.current() {
            TokenKind::StatementBreak => self.bump(),
            TokenKind::Semicolon => {
                if !scope.in_suite {
                    self.bump();
                    self.eat(TokenKind::StatementBreak);
                }
            }
            _ if !self.at_eof() => self.error("End of statement expected"),
            _ => {}
        }
    }

    // ── Simple statements ─────────────────────────────────────────────────────

    fn parse_print_statement(&mut self, scope: ParsingScope) {
        let statement = self.mark();
        self.bump();
        if self.at(TokenKind::GtGt) {
            let target = self.mark();
            self.bump();
            self.parse_single_expression(false);
            target.commit(self, NodeKind::PrintTarget);
        } else {
            self.parse_single_expression(false);
        }
        while self.eat(TokenKind::Comma) {
            if self.at_end_of_statement() {
                break;
            }
            self.parse_single_expression(false);
        }
        self.check_end_of_statement(scope);
        statement.commit(self, NodeKind::PrintStatement);
    }

    fn parse_keyword_statement(&mut self, kind: NodeKind, scope: ParsingScope) {
        let statement = self.mark();
        self.bump();
        self.check_end_of_statement(scope);
        statement.commit(self, kind);
    }

    fn parse_return_statement(&mut self, scope: ParsingScope) {
        let statement = self.mark();
        self.bump();
        if !self.at_end_of_statement() {
            self.parse_expression();
        }
        self.check_end_of_statement(scope);
        statement.commit(self, NodeKind::ReturnStatement);
    }

    fn parse_del_statement(&mut self, scope: ParsingScope) {
        let statement = self.mark();
        self.bump();
        if !self.parse_single_expression(false) {
            self.error(EXPRESSION_EXPECTED);
        }
        while self.eat(TokenKind::Comma) {
            if !self.at_end_of_statement() && !self.parse_single_expression(false) {
                self.error(EXPRESSION_EXPECTED);
            }
        }
        self.check_end_of_statement(scope);
        statement.commit(self, NodeKind::DelStatement);
    }

    fn parse_raise_statement(&mut self, scope: ParsingScope) {
        let statement = self.mark();
        self.bump();
        if !self.at_end_of_statement() {
            self.parse_single_expression(false);
            if self.eat(TokenKind::Comma) {
                self.parse_single_expression(false);
                if self.eat(TokenKind::Comma) {
                    self.parse_single_expression(false);
                }
            } else if self.eat(TokenKind::FromKeyword) && !self.parse_single_expression(false) {
                self.error(EXPRESSION_EXPECTED);
            }
        }
        self.check_end_of_statement(scope);
        statement.commit(self, NodeKind::RaiseStatement);
    }

    fn parse_assert_statement(&mut self, scope: ParsingScope) {
        let statement = self.mark();
        self.bump();
        if self.parse_single_expression(false) {
            if self.eat(TokenKind::Comma) && !self.parse_single_expression(false) {
                self.error(EXPRESSION_EXPECTED);
            }
            self.check_end_of_statement(scope);
        } else {
            self.error(EXPRESSION_EXPECTED);
        }
        statement.commit(self, NodeKind::AssertStatement);
    }

    fn parse_exec_statement(&mut self, scope: ParsingScope) {
        let statement = self.mark();
        self.bump();
        self.parse_expression_with(true, false);
        if self.eat(TokenKind::InKeyword) {
            self.parse_single_expression(false);
            if self.eat(TokenKind::Comma) {
                self.parse_single_expression(false);
            }
        }
        self.check_end_of_statement(scope);
        statement.commit(self, NodeKind::ExecStatement);
    }

    /// `global` / `nonlocal` name lists.
    fn parse_name_defining_statement(&mut self, kind: NodeKind, scope: ParsingScope) {
        let statement = self.mark();
        self.bump();
        self.parse_identifier(NodeKind::TargetExpression);
        while self.eat(TokenKind::Comma) {
            self.parse_identifier(NodeKind::TargetExpression);
        }
        self.check_end_of_statement(scope);
        statement.commit(self, kind);
    }

    /// A single identifier wrapped in a `kind` node.  Returns its text, or
    /// records "Identifier expected".
    pub(crate) fn parse_identifier(&mut self, kind: NodeKind) -> Option<&'src str> {
        if !self.at(TokenKind::Identifier) {
            self.error(IDENTIFIER_EXPECTED);
            return None;
        }
        let text = self.text();
        let node = self.mark();
        self.bump();
        node.commit(self, kind);
        Some(text)
    }

    // ── Imports ───────────────────────────────────────────────────────────────

    fn parse_import_statement(&mut self, scope: ParsingScope) {
        let statement = self.mark();
        self.bump();
        self.parse_import_elements(true, false, false);
        self.check_end_of_statement(scope);
        statement.commit(self, NodeKind::ImportStatement);
    }

    /// `from [.]* [dotted] import (* | (names) | names)`, including the
    /// `__future__` form that switches on later soft keywords.
    fn parse_from_import_statement(&mut self, scope: ParsingScope) {
        self.stream.state.phase = FuturePhase::From;
        let statement = self.mark();
        self.bump();

        let mut from_future = false;
        let mut had_dots = false;
        while self.eat(TokenKind::Dot) {
            had_dots = true;
        }
        if self.parse_dotted_name(false, had_dots) {
            self.expect(TokenKind::ImportKeyword, "'import' expected");
            if self.stream.state.phase == FuturePhase::Future {
                self.stream.state.phase = FuturePhase::Import;
                from_future = true;
            }
            if self.at(TokenKind::Mult) {
                let star = self.mark();
                self.bump();
                star.commit(self, NodeKind::StarImportElement);
            } else if self.eat(TokenKind::LPar) {
                self.parse_import_elements(false, true, from_future);
                self.expect(TokenKind::RPar, "')' expected");
            } else {
                self.parse_import_elements(false, false, from_future);
            }
        }
        self.check_end_of_statement(scope);
        statement.commit(self, NodeKind::FromImportStatement);
        self.stream.state.phase = FuturePhase::None;
    }

    fn parse_import_elements(&mut self, module_import: bool, in_parens: bool, from_future: bool) {
        loop {
            let element = self.mark();
            if module_import {
                if !self.parse_dotted_name(true, false) {
                    element.discard(self);
                    break;
                }
            } else {
                let name = self.parse_identifier(NodeKind::ReferenceExpression);
                if from_future {
                    if let Some(feature) = name.and_then(FutureFeature::from_import_name) {
                        self.stream.state.futures.insert(feature);
                    }
                }
            }
            if self.with_expect_as(true, |p| p.eat(TokenKind::AsKeyword)) {
                self.parse_identifier(NodeKind::TargetExpression);
            }
            element.commit(self, NodeKind::ImportElement);

            if !self.eat(TokenKind::Comma) || (in_parens && self.at(TokenKind::RPar)) {
                break;
            }
        }
    }

    /// `a.b.c` as nested reference nodes.  Returns false after recording
    /// "Identifier expected"; an `optional` name may be absent entirely.
    pub(crate) fn parse_dotted_name(&mut self, expect_as: bool, optional: bool) -> bool {
        if !self.at(TokenKind::Identifier) {
            if optional {
                return true;
            }
            self.error(IDENTIFIER_EXPECTED);
            return false;
        }
        let head = self.mark();
        self.bump();
        let mut name = head.commit(self, NodeKind::ReferenceExpression);
        self.with_expect_as(expect_as, |p| {
            while p.at(TokenKind::Dot) {
                let qualified = name.precede(p);
                p.bump();
                p.expect(TokenKind::Identifier, IDENTIFIER_EXPECTED);
                name = qualified.commit(p, NodeKind::ReferenceExpression);
            }
        });
        true
    }

    // ── Compound statements ───────────────────────────────────────────────────

    fn parse_if_statement(&mut self, scope: ParsingScope) {
        let statement = self.mark();
        let if_part = self.mark();
        self.bump();
        self.parse_expression();
        self.parse_colon_and_suite(scope);
        if_part.commit(self, NodeKind::IfPartIf);

        while self.at(TokenKind::ElifKeyword) {
            let elif_part = self.mark();
            self.bump();
            self.parse_expression();
            self.parse_colon_and_suite(scope);
            elif_part.commit(self, NodeKind::IfPartElif);
        }
        self.parse_else_part(scope);
        statement.commit(self, NodeKind::IfStatement);
    }

    fn parse_else_part(&mut self, scope: ParsingScope) {
        if self.at(TokenKind::ElseKeyword) {
            let else_part = self.mark();
            self.bump();
            self.parse_colon_and_suite(scope);
            else_part.commit(self, NodeKind::ElsePart);
        }
    }

    fn parse_for_statement(&mut self, scope: ParsingScope) {
        let statement = self.mark();
        let for_part = self.mark();
        self.bump();
        self.parse_expression_with(true, true);
        self.expect(TokenKind::InKeyword, "'in' expected");
        self.parse_expression();
        self.parse_colon_and_suite(scope);
        for_part.commit(self, NodeKind::ForPart);
        self.parse_else_part(scope);
        statement.commit(self, NodeKind::ForStatement);
    }

    fn parse_while_statement(&mut self, scope: ParsingScope) {
        let statement = self.mark();
        let while_part = self.mark();
        self.bump();
        if !self.parse_single_expression(false) {
            self.error(EXPRESSION_EXPECTED);
        }
        self.parse_colon_and_suite(scope);
        while_part.commit(self, NodeKind::WhilePart);
        self.parse_else_part(scope);
        statement.commit(self, NodeKind::WhileStatement);
    }

    fn parse_try_statement(&mut self, scope: ParsingScope) {
        let statement = self.mark();
        let try_part = self.mark();
        self.bump();
        self.parse_colon_and_suite(scope);
        try_part.commit(self, NodeKind::TryPart);

        let have_except = self.at(TokenKind::ExceptKeyword);
        while self.at(TokenKind::ExceptKeyword) {
            let except_part = self.mark();
            self.bump();
            if !self.at(TokenKind::Colon) {
                if !self.parse_single_expression(false) {
                    self.error(EXPRESSION_EXPECTED);
                }
                let binds = self.with_expect_as(true, |p| {
                    p.eat(TokenKind::Comma) || p.eat(TokenKind::AsKeyword)
                });
                if binds && !self.parse_single_expression(true) {
                    self.error(EXPRESSION_EXPECTED);
                }
            }
            self.parse_colon_and_suite(scope);
            except_part.commit(self, NodeKind::ExceptPart);
        }
        if have_except {
            self.parse_else_part(scope);
        }

        if self.at(TokenKind::FinallyKeyword) {
            let finally_part = self.mark();
            self.bump();
            self.parse_colon_and_suite(scope);
            finally_part.commit(self, NodeKind::FinallyPart);
        } else if !have_except {
            self.error("'except' or 'finally' expected");
        }
        statement.commit(self, NodeKind::TryExceptStatement);
    }

    fn parse_with_statement(&mut self, scope: ParsingScope) {
        let statement = self.mark();
        self.bump();
        loop {
            let item = self.mark();
            self.parse_expression();
            if self.with_expect_as(true, |p| p.eat(TokenKind::AsKeyword)) {
                self.parse_single_expression(true);
            }
            item.commit(self, NodeKind::WithItem);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.parse_colon_and_suite(scope);
        statement.commit(self, NodeKind::WithStatement);
    }

    fn parse_class_declaration(&mut self, scope: ParsingScope) {
        let class = self.mark();
        self.parse_class_declaration_with(class, scope);
    }

    /// Class body after an already opened marker (decorators may precede).
    pub(crate) fn parse_class_declaration_with(&mut self, class: Marker, scope: ParsingScope) {
        self.bump();
        self.expect(TokenKind::Identifier, IDENTIFIER_EXPECTED);
        if self.at(TokenKind::LPar) {
            self.parse_argument_list();
        } else {
            let bases = self.mark();
            bases.commit(self, NodeKind::ArgumentList);
        }
        self.parse_colon_and_suite(scope.with_class(true));
        class.commit(self, NodeKind::ClassDeclaration);
    }

    // ── Suites ────────────────────────────────────────────────────────────────

    /// Consume `:`, or record "Colon expected" and swallow one statement
    /// break.
    pub(crate) fn expect_colon(&mut self) -> bool {
        if self.eat(TokenKind::Colon) {
            return true;
        }
        let missing = self.mark();
        self.eat(TokenKind::StatementBreak);
        missing.error(self, "Colon expected");
        false
    }

    pub(crate) fn parse_colon_and_suite(&mut self, scope: ParsingScope) {
        if self.expect_colon() {
            self.parse_suite(scope, None);
        } else {
            let empty = self.mark();
            empty.commit(self, NodeKind::StatementList);
        }
    }

    /// Indented block or single-line suite.  When `owner` is given it is
    /// committed right after the statement list, before the closing dedent.
    pub(crate) fn parse_suite(&mut self, scope: ParsingScope, owner: Option<(Marker, NodeKind)>) {
        if self.eat(TokenKind::StatementBreak) {
            let list = self.mark();
            if !self.at(TokenKind::Indent) {
                self.error("Indent expected");
            } else {
                self.bump();
                if self.at_eof() {
                    self.error("Indented block expected");
                } else {
                    while !self.at_eof() && !self.at(TokenKind::Dedent) {
                        self.parse_statement(scope);
                    }
                }
            }
            list.commit_block(self, NodeKind::StatementList);
            if let Some((marker, kind)) = owner {
                marker.commit(self, kind);
            }
            if !self.at_eof() {
                self.expect(TokenKind::Dedent, "Dedent expected");
            }
        } else {
            let list = self.mark();
            let inline = scope.with_suite(true);
            if self.at_eof() {
                self.error("Statement expected");
            } else {
                self.parse_simple_statement(inline);
                while self.eat(TokenKind::Semicolon) {
                    if self.eat(TokenKind::StatementBreak) {
                        break;
                    }
                    self.parse_simple_statement(inline);
                }
            }
            list.commit(self, NodeKind::StatementList);
            if let Some((marker, kind)) = owner {
                marker.commit(self, kind);
            }
        }
    }
}
