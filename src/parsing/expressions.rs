//! Expression parsing by precedence climbing.
//!
//! Every `parse_*` returning `bool` reports `false` only when it consumed
//! nothing and recorded nothing, so callers can treat it as "no expression
//! here" and decide whether that is an error.

use crate::parsing::builder::CompletedMarker;
use crate::parsing::parser::{EXPRESSION_EXPECTED, IDENTIFIER_EXPECTED, Parser};
use crate::parsing::tokens::TokenKind;
use crate::parsing::tree::NodeKind;

type Operand<'src> = fn(&mut Parser<'src>, bool) -> bool;

impl<'src> Parser<'src> {
    // ── Entry points ──────────────────────────────────────────────────────────

    /// Expression list; records "Expression expected" when absent.
    pub fn parse_expression(&mut self) -> bool {
        self.parse_expression_with(false, false)
    }

    /// Expression list.  `stop_on_in` leaves a top-level `in` unconsumed
    /// (`for x in …`); `is_target` turns assignable names into targets.
    pub fn parse_expression_with(&mut self, stop_on_in: bool, is_target: bool) -> bool {
        if self.parse_tuple_expression(stop_on_in, is_target) {
            true
        } else {
            self.error(EXPRESSION_EXPECTED);
            false
        }
    }

    /// Expression list, without an error when absent.
    pub fn parse_expression_optional(&mut self) -> bool {
        self.parse_tuple_expression(false, false)
    }

    /// One `test` expression: conditional, lambda or anything below.
    pub fn parse_single_expression(&mut self, is_target: bool) -> bool {
        self.parse_test_expression(false, is_target)
    }

    pub fn parse_yield_or_tuple_expression(&mut self, is_target: bool) -> bool {
        if !self.at(TokenKind::YieldKeyword) {
            return self.parse_tuple_expression(false, is_target);
        }
        let expr = self.mark();
        self.bump();
        self.parse_tuple_expression(false, is_target);
        expr.commit(self, NodeKind::YieldExpression);
        true
    }

    fn parse_tuple_expression(&mut self, stop_on_in: bool, is_target: bool) -> bool {
        let tuple = self.mark();
        if !self.parse_tuple_element(stop_on_in, is_target) {
            tuple.discard(self);
            return false;
        }
        if self.at(TokenKind::Comma) {
            while self.eat(TokenKind::Comma) {
                if !self.parse_tuple_element(stop_on_in, is_target) {
                    break;
                }
            }
            tuple.commit(self, NodeKind::TupleExpression);
        } else {
            tuple.discard(self);
        }
        true
    }

    /// A tuple member; Python 3 also allows `*rest`.
    fn parse_tuple_element(&mut self, stop_on_in: bool, is_target: bool) -> bool {
        if self.at(TokenKind::Mult) && self.is_py3k() {
            let star = self.mark();
            self.bump();
            if !self.parse_bitwise_or(is_target) {
                self.error(EXPRESSION_EXPECTED);
            }
            star.commit(self, NodeKind::StarExpression);
            return true;
        }
        self.parse_test_expression(stop_on_in, is_target)
    }

    fn parse_test_expression(&mut self, stop_on_in: bool, is_target: bool) -> bool {
        if self.at(TokenKind::LambdaKeyword) {
            self.parse_lambda_expression();
            return true;
        }
        let expr = self.mark();
        if !self.parse_or_test(stop_on_in, is_target) {
            expr.discard(self);
            return false;
        }
        if self.eat(TokenKind::IfKeyword) {
            if !self.parse_or_test(stop_on_in, false) {
                self.error(EXPRESSION_EXPECTED);
            }
            self.expect(TokenKind::ElseKeyword, "'else' expected");
            if !self.parse_test_expression(stop_on_in, false) {
                self.error(EXPRESSION_EXPECTED);
            }
            expr.commit(self, NodeKind::ConditionalExpression);
        } else {
            expr.discard(self);
        }
        true
    }

    fn parse_lambda_expression(&mut self) {
        let lambda = self.mark();
        self.bump();
        self.parse_lambda_parameters();
        self.expect(TokenKind::Colon, "':' expected");
        if !self.parse_single_expression(false) {
            self.error(EXPRESSION_EXPECTED);
        }
        lambda.commit(self, NodeKind::LambdaExpression);
    }

    // ── Boolean and comparison levels ─────────────────────────────────────────

    fn parse_or_test(&mut self, stop_on_in: bool, is_target: bool) -> bool {
        let mut expr = self.mark();
        if !self.parse_and_test(stop_on_in, is_target) {
            expr.discard(self);
            return false;
        }
        while self.eat(TokenKind::OrKeyword) {
            if !self.parse_and_test(stop_on_in, false) {
                self.error(EXPRESSION_EXPECTED);
            }
            expr = expr.commit(self, NodeKind::BinaryExpression).precede(self);
        }
        expr.discard(self);
        true
    }

    fn parse_and_test(&mut self, stop_on_in: bool, is_target: bool) -> bool {
        let mut expr = self.mark();
        if !self.parse_not_test(stop_on_in, is_target) {
            expr.discard(self);
            return false;
        }
        while self.eat(TokenKind::AndKeyword) {
            if !self.parse_not_test(stop_on_in, false) {
                self.error(EXPRESSION_EXPECTED);
            }
            expr = expr.commit(self, NodeKind::BinaryExpression).precede(self);
        }
        expr.discard(self);
        true
    }

    fn parse_not_test(&mut self, stop_on_in: bool, is_target: bool) -> bool {
        if !self.at(TokenKind::NotKeyword) {
            return self.parse_comparison(stop_on_in, is_target);
        }
        let expr = self.mark();
        self.bump();
        if !self.parse_not_test(stop_on_in, false) {
            self.error(EXPRESSION_EXPECTED);
        }
        expr.commit(self, NodeKind::PrefixExpression);
        true
    }

    fn parse_comparison(&mut self, stop_on_in: bool, is_target: bool) -> bool {
        let mut expr = self.mark();
        if !self.parse_bitwise_or(is_target) {
            expr.discard(self);
            return false;
        }
        while self.eat_comparison_operator(stop_on_in) {
            if !self.parse_bitwise_or(false) {
                self.error(EXPRESSION_EXPECTED);
            }
            expr = expr.commit(self, NodeKind::BinaryExpression).precede(self);
        }
        expr.discard(self);
        true
    }

    /// Consume one comparison operator, including `not in` and `is not`.
    fn eat_comparison_operator(&mut self, stop_on_in: bool) -> bool {
        match self.current() {
            kind if kind.is_comparison_operator() => self.bump(),
            TokenKind::InKeyword if !stop_on_in => self.bump(),
            TokenKind::IsKeyword => {
                self.bump();
                self.eat(TokenKind::NotKeyword);
            }
            TokenKind::NotKeyword if !stop_on_in && self.nth(1) == TokenKind::InKeyword => {
                self.bump();
                self.bump();
            }
            _ => return false,
        }
        true
    }

    // ── Arithmetic levels ─────────────────────────────────────────────────────

    /// Left-associative binary level over `operand`.
    fn parse_binary_level(
        &mut self,
        is_target: bool,
        is_operator: fn(TokenKind) -> bool,
        operand: Operand<'src>,
    ) -> bool {
        let mut expr = self.mark();
        if !operand(self, is_target) {
            expr.discard(self);
            return false;
        }
        while is_operator(self.current()) {
            self.bump();
            if !operand(self, false) {
                self.error(EXPRESSION_EXPECTED);
            }
            expr = expr.commit(self, NodeKind::BinaryExpression).precede(self);
        }
        expr.discard(self);
        true
    }

    fn parse_bitwise_or(&mut self, is_target: bool) -> bool {
        self.parse_binary_level(is_target, |k| k == TokenKind::Or, Self::parse_bitwise_xor)
    }

    fn parse_bitwise_xor(&mut self, is_target: bool) -> bool {
        self.parse_binary_level(is_target, |k| k == TokenKind::Xor, Self::parse_bitwise_and)
    }

    fn parse_bitwise_and(&mut self, is_target: bool) -> bool {
        self.parse_binary_level(is_target, |k| k == TokenKind::And, Self::parse_shift)
    }

    fn parse_shift(&mut self, is_target: bool) -> bool {
        self.parse_binary_level(
            is_target,
            |k| matches!(k, TokenKind::LtLt | TokenKind::GtGt),
            Self::parse_arithmetic,
        )
    }

    fn parse_arithmetic(&mut self, is_target: bool) -> bool {
        self.parse_binary_level(
            is_target,
            |k| matches!(k, TokenKind::Plus | TokenKind::Minus),
            Self::parse_term,
        )
    }

    fn parse_term(&mut self, is_target: bool) -> bool {
        self.parse_binary_level(
            is_target,
            |k| {
                matches!(
                    k,
                    TokenKind::Mult
                        | TokenKind::Div
                        | TokenKind::FloorDiv
                        | TokenKind::Perc
                        | TokenKind::At
                )
            },
            Self::parse_factor,
        )
    }

    fn parse_factor(&mut self, is_target: bool) -> bool {
        if !matches!(
            self.current(),
            TokenKind::Plus | TokenKind::Minus | TokenKind::Tilde
        ) {
            return self.parse_power(is_target);
        }
        let expr = self.mark();
        self.bump();
        if !self.parse_factor(false) {
            self.error(EXPRESSION_EXPECTED);
        }
        expr.commit(self, NodeKind::PrefixExpression);
        true
    }

    /// `primary ** factor`, right-associative through `parse_factor`.
    fn parse_power(&mut self, is_target: bool) -> bool {
        let expr = self.mark();
        if !self.parse_primary(is_target) {
            expr.discard(self);
            return false;
        }
        if self.eat(TokenKind::Exp) {
            if !self.parse_factor(false) {
                self.error(EXPRESSION_EXPECTED);
            }
            expr.commit(self, NodeKind::BinaryExpression);
        } else {
            expr.discard(self);
        }
        true
    }

    // ── Primaries ─────────────────────────────────────────────────────────────

    /// Atom followed by attribute, call and subscript trailers.  In target
    /// position a trailing name or attribute becomes a target node.
    fn parse_primary(&mut self, is_target: bool) -> bool {
        let mut expr = self.mark();
        let Some(mut last) = self.parse_atom(is_target) else {
            expr.discard(self);
            return false;
        };
        loop {
            let kind = match self.current() {
                TokenKind::Dot => {
                    self.bump();
                    self.expect(TokenKind::Identifier, IDENTIFIER_EXPECTED);
                    NodeKind::ReferenceExpression
                }
                TokenKind::LPar => {
                    self.parse_argument_list();
                    NodeKind::CallExpression
                }
                TokenKind::LBracket => self.parse_subscription(),
                _ => break,
            };
            last = expr.commit(self, kind);
            expr = last.precede(self);
        }
        expr.discard(self);
        if is_target && last.kind() == NodeKind::ReferenceExpression {
            last.change_kind(self, NodeKind::TargetExpression);
        }
        true
    }

    fn parse_atom(&mut self, is_target: bool) -> Option<CompletedMarker> {
        let kind = match self.current() {
            TokenKind::Identifier | TokenKind::DebugKeyword => NodeKind::ReferenceExpression,
            TokenKind::Integer => NodeKind::IntegerLiteral,
            TokenKind::Float => NodeKind::FloatLiteral,
            TokenKind::Imaginary => NodeKind::ImaginaryLiteral,
            TokenKind::NoneKeyword => NodeKind::NoneLiteral,
            TokenKind::TrueKeyword | TokenKind::FalseKeyword => NodeKind::BoolLiteral,
            TokenKind::String => {
                let literal = self.mark();
                while self.at(TokenKind::String) {
                    self.bump();
                }
                return Some(literal.commit(self, NodeKind::StringLiteral));
            }
            TokenKind::Dot
                if self.nth(1) == TokenKind::Dot && self.nth(2) == TokenKind::Dot =>
            {
                let ellipsis = self.mark();
                for _ in 0..3 {
                    self.bump();
                }
                return Some(ellipsis.commit(self, NodeKind::EllipsisLiteral));
            }
            TokenKind::LPar => return Some(self.parse_parenthesized(is_target)),
            TokenKind::LBracket => return Some(self.parse_list(is_target)),
            TokenKind::LBrace => return Some(self.parse_dict_or_set()),
            TokenKind::Backtick => return Some(self.parse_repr()),
            _ => return None,
        };
        let atom = self.mark();
        self.bump();
        Some(atom.commit(self, kind))
    }

    fn parse_parenthesized(&mut self, is_target: bool) -> CompletedMarker {
        let paren = self.mark();
        self.bump();
        if self.eat(TokenKind::RPar) {
            return paren.commit(self, NodeKind::TupleExpression);
        }
        if self.at(TokenKind::YieldKeyword) {
            self.parse_yield_or_tuple_expression(false);
        } else {
            let tuple = self.mark();
            if !self.parse_tuple_element(false, is_target) {
                tuple.discard(self);
                self.error(EXPRESSION_EXPECTED);
            } else if self.at(TokenKind::ForKeyword) {
                tuple.discard(self);
                self.parse_comprehension_clauses(false);
                self.expect(TokenKind::RPar, "')' expected");
                return paren.commit(self, NodeKind::GeneratorExpression);
            } else if self.at(TokenKind::Comma) {
                while self.eat(TokenKind::Comma) {
                    if !self.parse_tuple_element(false, is_target) {
                        break;
                    }
                }
                tuple.commit(self, NodeKind::TupleExpression);
            } else {
                tuple.discard(self);
            }
        }
        self.expect(TokenKind::RPar, "')' expected");
        paren.commit(self, NodeKind::ParenthesizedExpression)
    }

    fn parse_list(&mut self, is_target: bool) -> CompletedMarker {
        let list = self.mark();
        self.bump();
        if self.eat(TokenKind::RBracket) {
            return list.commit(self, NodeKind::ListLiteral);
        }
        if !self.parse_tuple_element(false, is_target) {
            self.error(EXPRESSION_EXPECTED);
        } else if self.at(TokenKind::ForKeyword) {
            self.parse_comprehension_clauses(true);
            self.expect(TokenKind::RBracket, "']' expected");
            return list.commit(self, NodeKind::ListCompExpression);
        } else {
            while self.eat(TokenKind::Comma) {
                if self.at(TokenKind::RBracket) || !self.parse_tuple_element(false, is_target) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "']' expected");
        list.commit(self, NodeKind::ListLiteral)
    }

    fn parse_dict_or_set(&mut self) -> CompletedMarker {
        let literal = self.mark();
        self.bump();
        if self.eat(TokenKind::RBrace) {
            return literal.commit(self, NodeKind::DictLiteral);
        }

        let first = self.mark();
        if !self.parse_single_expression(false) {
            first.discard(self);
            self.error(EXPRESSION_EXPECTED);
            self.expect(TokenKind::RBrace, "'}' expected");
            return literal.commit(self, NodeKind::DictLiteral);
        }

        let kind = if self.eat(TokenKind::Colon) {
            if !self.parse_single_expression(false) {
                self.error(EXPRESSION_EXPECTED);
            }
            first.commit(self, NodeKind::KeyValue);
            if self.at(TokenKind::ForKeyword) {
                self.parse_comprehension_clauses(false);
                NodeKind::DictCompExpression
            } else {
                while self.eat(TokenKind::Comma) {
                    if self.at(TokenKind::RBrace) {
                        break;
                    }
                    let pair = self.mark();
                    if !self.parse_single_expression(false) {
                        pair.discard(self);
                        break;
                    }
                    self.expect(TokenKind::Colon, "':' expected");
                    if !self.parse_single_expression(false) {
                        self.error(EXPRESSION_EXPECTED);
                    }
                    pair.commit(self, NodeKind::KeyValue);
                }
                NodeKind::DictLiteral
            }
        } else {
            first.discard(self);
            if self.at(TokenKind::ForKeyword) {
                self.parse_comprehension_clauses(false);
                NodeKind::SetCompExpression
            } else {
                while self.eat(TokenKind::Comma) {
                    if self.at(TokenKind::RBrace) || !self.parse_single_expression(false) {
                        break;
                    }
                }
                NodeKind::SetLiteral
            }
        };
        self.expect(TokenKind::RBrace, "'}' expected");
        literal.commit(self, kind)
    }

    /// Python 2 backquote repr.
    fn parse_repr(&mut self) -> CompletedMarker {
        let repr = self.mark();
        self.bump();
        if !self.parse_tuple_expression(false, false) {
            self.error(EXPRESSION_EXPECTED);
        }
        self.expect(TokenKind::Backtick, "'`' expected");
        repr.commit(self, NodeKind::ReprExpression)
    }

    /// `for targets in iterable` followed by any mix of further `for` and
    /// `if` clauses.  List comprehensions accept a bare tuple as iterable.
    fn parse_comprehension_clauses(&mut self, list_comp: bool) {
        loop {
            if self.eat(TokenKind::ForKeyword) {
                if !self.parse_tuple_expression(true, true) {
                    self.error(EXPRESSION_EXPECTED);
                }
                self.expect(TokenKind::InKeyword, "'in' expected");
                let iterable = self.mark();
                if !self.parse_or_test(false, false) {
                    iterable.discard(self);
                    self.error(EXPRESSION_EXPECTED);
                } else if list_comp && self.at(TokenKind::Comma) {
                    while self.eat(TokenKind::Comma) {
                        if !self.parse_or_test(false, false) {
                            break;
                        }
                    }
                    iterable.commit(self, NodeKind::TupleExpression);
                } else {
                    iterable.discard(self);
                }
            } else if self.eat(TokenKind::IfKeyword) {
                if !self.parse_or_test(false, false) {
                    self.error(EXPRESSION_EXPECTED);
                }
            } else {
                break;
            }
        }
    }

    // ── Trailers ──────────────────────────────────────────────────────────────

    /// `[ … ]` after a primary.  Returns the node kind for the whole
    /// trailer: a slice if any item contains `:`.
    fn parse_subscription(&mut self) -> NodeKind {
        self.bump();
        let items = self.mark();
        let mut is_slice = false;
        let mut had_comma = false;
        loop {
            match self.parse_subscript_item() {
                Some(slice) => is_slice |= slice,
                None => {
                    self.error(EXPRESSION_EXPECTED);
                    break;
                }
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
            had_comma = true;
            if self.at(TokenKind::RBracket) {
                break;
            }
        }
        if had_comma {
            items.commit(self, NodeKind::TupleExpression);
        } else {
            items.discard(self);
        }
        self.expect(TokenKind::RBracket, "']' expected");
        if is_slice {
            NodeKind::SliceExpression
        } else {
            NodeKind::SubscriptionExpression
        }
    }

    /// `Some(true)` for a slice item, `Some(false)` for a plain index,
    /// `None` when nothing was there.
    fn parse_subscript_item(&mut self) -> Option<bool> {
        let item = self.mark();
        let has_lower = self.parse_single_expression(false);
        if !self.eat(TokenKind::Colon) {
            item.discard(self);
            return has_lower.then_some(false);
        }
        if !self.at_slice_bound_end() {
            self.parse_single_expression(false);
        }
        if self.eat(TokenKind::Colon) && !self.at_slice_bound_end() {
            self.parse_single_expression(false);
        }
        item.commit(self, NodeKind::SliceItem);
        Some(true)
    }

    fn at_slice_bound_end(&self) -> bool {
        matches!(
            self.current(),
            TokenKind::Colon | TokenKind::Comma | TokenKind::RBracket
        )
    }

    /// `( args )`.  The current token must be `(`.
    pub fn parse_argument_list(&mut self) -> CompletedMarker {
        let args = self.mark();
        self.bump();
        while !self.at(TokenKind::RPar) && !self.at_eof() {
            if matches!(self.current(), TokenKind::Mult | TokenKind::Exp) {
                let star = self.mark();
                self.bump();
                if !self.parse_single_expression(false) {
                    self.error(EXPRESSION_EXPECTED);
                }
                star.commit(self, NodeKind::StarArgument);
            } else if self.nth_raw(0) == TokenKind::Identifier && self.nth_raw(1) == TokenKind::Eq {
                let keyword = self.mark();
                self.bump();
                self.bump();
                if !self.parse_single_expression(false) {
                    self.error(EXPRESSION_EXPECTED);
                }
                keyword.commit(self, NodeKind::KeywordArgument);
            } else {
                let arg = self.mark();
                if !self.parse_single_expression(false) {
                    arg.discard(self);
                    self.error(EXPRESSION_EXPECTED);
                    break;
                }
                if self.at(TokenKind::ForKeyword) {
                    self.parse_comprehension_clauses(false);
                    arg.commit(self, NodeKind::GeneratorExpression);
                } else {
                    arg.discard(self);
                }
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RPar, "')' expected");
        args.commit(self, NodeKind::ArgumentList)
    }
}

#[cfg(test)]
mod tests {
    use crate::parsing::context::{LanguageLevel, ParsingContext};
    use crate::parsing::parser::parse_module;
    use crate::parsing::tree::{NodeId, NodeKind, SyntaxTree};

    fn parse(src: &str) -> SyntaxTree {
        parse_module(src, &ParsingContext::default())
    }

    /// The single expression of a one-line expression statement.
    fn expr(tree: &SyntaxTree) -> NodeId {
        let stmt = tree.child_nodes(tree.root()).next().unwrap();
        assert_eq!(tree.kind(stmt), NodeKind::ExpressionStatement);
        tree.child_nodes(stmt).next().unwrap()
    }

    fn shape(src: &str) -> NodeKind {
        let tree = parse(src);
        assert!(tree.errors.is_empty(), "{src}: {:?}", tree.errors);
        tree.kind(expr(&tree))
    }

    #[test]
    fn test_literals() {
        assert_eq!(shape("1\n"), NodeKind::IntegerLiteral);
        assert_eq!(shape("1.5\n"), NodeKind::FloatLiteral);
        assert_eq!(shape("2j\n"), NodeKind::ImaginaryLiteral);
        assert_eq!(shape("'a' \"b\"\n"), NodeKind::StringLiteral);
        assert_eq!(shape("x[...]\n"), NodeKind::SubscriptionExpression);
    }

    #[test]
    fn test_containers() {
        assert_eq!(shape("()\n"), NodeKind::TupleExpression);
        assert_eq!(shape("(a)\n"), NodeKind::ParenthesizedExpression);
        assert_eq!(shape("[1, 2,]\n"), NodeKind::ListLiteral);
        assert_eq!(shape("{}\n"), NodeKind::DictLiteral);
        assert_eq!(shape("{1: 2, 3: 4}\n"), NodeKind::DictLiteral);
        assert_eq!(shape("{1, 2}\n"), NodeKind::SetLiteral);
        assert_eq!(shape("`x`\n"), NodeKind::ReprExpression);
        assert_eq!(shape("a, b\n"), NodeKind::TupleExpression);
    }

    #[test]
    fn test_comprehensions() {
        assert_eq!(shape("[x for x in y if x]\n"), NodeKind::ListCompExpression);
        assert_eq!(shape("[x for x in 1, 2]\n"), NodeKind::ListCompExpression);
        assert_eq!(shape("(x for x in y)\n"), NodeKind::GeneratorExpression);
        assert_eq!(shape("{k: v for k, v in items}\n"), NodeKind::DictCompExpression);
        assert_eq!(shape("{x for x in y}\n"), NodeKind::SetCompExpression);
        let tree = parse("sum(x for x in y)\n");
        assert!(tree.errors.is_empty());
        assert_eq!(tree.find_all(NodeKind::GeneratorExpression).len(), 1);
    }

    #[test]
    fn test_comprehension_targets() {
        let src = "[a for a, b in c]\n";
        let tree = parse(src);
        let targets: Vec<_> = tree
            .find_all(NodeKind::TargetExpression)
            .into_iter()
            .map(|t| tree.text(t, src))
            .collect();
        assert_eq!(targets, vec!["a", "b"]);
    }

    #[test]
    fn test_operators_and_precedence() {
        let src = "a + b * c\n";
        let tree = parse(src);
        let top = expr(&tree);
        assert_eq!(tree.kind(top), NodeKind::BinaryExpression);
        let parts: Vec<_> = tree.child_nodes(top).map(|n| tree.kind(n)).collect();
        assert_eq!(parts, vec![NodeKind::ReferenceExpression, NodeKind::BinaryExpression]);
    }

    #[test]
    fn test_left_associativity() {
        let src = "a - b - c\n";
        let tree = parse(src);
        let top = expr(&tree);
        let left = tree.child_nodes(top).next().unwrap();
        assert_eq!(tree.text(left, src), "a - b");
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(shape("a not in b\n"), NodeKind::BinaryExpression);
        assert_eq!(shape("a is not b\n"), NodeKind::BinaryExpression);
        assert_eq!(shape("a <> b\n"), NodeKind::BinaryExpression);
        assert_eq!(shape("not a\n"), NodeKind::PrefixExpression);
        assert_eq!(shape("-a ** 2\n"), NodeKind::PrefixExpression);
    }

    #[test]
    fn test_conditional_and_lambda() {
        assert_eq!(shape("a if b else c\n"), NodeKind::ConditionalExpression);
        assert_eq!(shape("lambda x, y=1, *a, **k: x\n"), NodeKind::LambdaExpression);
        assert_eq!(shape("lambda: 0\n"), NodeKind::LambdaExpression);
        let tree = parse("a if b\n");
        assert_eq!(tree.errors[0].message, "'else' expected");
    }

    #[test]
    fn test_trailers() {
        let src = "a.b(c, d=1, *e, **f)[2][1:2:3]\n";
        let tree = parse(src);
        assert!(tree.errors.is_empty(), "{:?}", tree.errors);
        assert_eq!(tree.kind(expr(&tree)), NodeKind::SliceExpression);
        assert_eq!(tree.find_all(NodeKind::KeywordArgument).len(), 1);
        assert_eq!(tree.find_all(NodeKind::StarArgument).len(), 2);
        assert_eq!(tree.find_all(NodeKind::SubscriptionExpression).len(), 1);
        let call = tree.find_all(NodeKind::CallExpression)[0];
        assert_eq!(tree.text(call, src), "a.b(c, d=1, *e, **f)");
    }

    #[test]
    fn test_slices() {
        for src in ["x[:]\n", "x[1:]\n", "x[:2]\n", "x[::2]\n", "x[1:2, 3]\n"] {
            assert_eq!(shape(src), NodeKind::SliceExpression, "{src}");
        }
        assert_eq!(shape("x[1, 2]\n"), NodeKind::SubscriptionExpression);
    }

    #[test]
    fn test_unclosed_brackets_report() {
        let tree = parse("f(a\n");
        assert_eq!(tree.errors[0].message, "')' expected");
        let tree = parse("[a\n");
        assert_eq!(tree.errors[0].message, "']' expected");
        let tree = parse("{a: b\n");
        assert_eq!(tree.errors[0].message, "'}' expected");
    }

    #[test]
    fn test_py3_star_target_and_constants() {
        let ctx = ParsingContext::new(LanguageLevel::Python30);
        let tree = parse_module("a, *b = c\nx = True\n", &ctx);
        assert!(tree.errors.is_empty(), "{:?}", tree.errors);
        assert_eq!(tree.find_all(NodeKind::StarExpression).len(), 1);
        assert_eq!(tree.find_all(NodeKind::TargetExpression).len(), 3);
        assert_eq!(tree.find_all(NodeKind::BoolLiteral).len(), 1);
    }

    #[test]
    fn test_py2_true_is_a_name() {
        let tree = parse("True\n");
        assert_eq!(tree.kind(expr(&tree)), NodeKind::ReferenceExpression);
    }

    #[test]
    fn test_parenthesized_target_tuple() {
        let src = "(a, b) = c\n";
        let tree = parse(src);
        assert!(tree.errors.is_empty());
        assert_eq!(tree.find_all(NodeKind::TargetExpression).len(), 2);
    }

    #[test]
    fn test_yield_in_parens() {
        let tree = parse("def g():\n    x = (yield)\n");
        assert!(tree.errors.is_empty(), "{:?}", tree.errors);
        assert_eq!(tree.find_all(NodeKind::YieldExpression).len(), 1);
    }
}
