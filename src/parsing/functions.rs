//! `def`, decorators, and parameter lists (shared with `lambda`).

use crate::parsing::builder::Marker;
use crate::parsing::context::ParsingScope;
use crate::parsing::parser::{EXPRESSION_EXPECTED, IDENTIFIER_EXPECTED, Parser};
use crate::parsing::tokens::TokenKind;
use crate::parsing::tree::NodeKind;

impl<'src> Parser<'src> {
    pub fn parse_function_declaration(&mut self) {
        let function = self.mark();
        self.parse_function_innards(function);
    }

    /// Everything from `def` on, closing `function` before the body's
    /// dedent so the dedent belongs to the enclosing block.
    fn parse_function_innards(&mut self, function: Marker) {
        self.bump();
        self.expect(TokenKind::Identifier, IDENTIFIER_EXPECTED);
        if self.at(TokenKind::LPar) {
            self.parse_parameter_list();
        } else {
            self.error("'(' expected");
            let empty = self.mark();
            empty.commit(self, NodeKind::ParameterList);
        }
        if self.is_py3k() && self.at(TokenKind::RArrow) {
            let annotation = self.mark();
            self.bump();
            if !self.parse_single_expression(false) {
                self.error(EXPRESSION_EXPECTED);
            }
            annotation.commit(self, NodeKind::Annotation);
        }
        if self.expect_colon() {
            self.parse_suite(
                ParsingScope::default(),
                Some((function, NodeKind::FunctionDeclaration)),
            );
        } else {
            let empty = self.mark();
            empty.commit(self, NodeKind::StatementList);
            function.commit(self, NodeKind::FunctionDeclaration);
        }
    }

    /// One or more `@decorator` lines followed by `def` or `class`.
    pub fn parse_decorated_declaration(&mut self, scope: ParsingScope) {
        let declaration = self.mark();
        let decorators = self.mark();
        while self.at(TokenKind::At) {
            let decorator = self.mark();
            self.bump();
            self.parse_dotted_name(false, false);
            if self.at(TokenKind::LPar) {
                self.parse_argument_list();
            }
            decorator.commit(self, NodeKind::Decorator);
            self.expect(TokenKind::StatementBreak, "Statement break expected");
        }
        decorators.commit(self, NodeKind::DecoratorList);

        match self.current() {
            TokenKind::DefKeyword => self.parse_function_innards(declaration),
            TokenKind::ClassKeyword => self.parse_class_declaration_with(declaration, scope),
            _ => {
                self.error("'def' or 'class' expected");
                declaration.discard(self);
            }
        }
    }

    // ── Parameters ────────────────────────────────────────────────────────────

    /// `( params )`.  The current token must be `(`.
    fn parse_parameter_list(&mut self) {
        let list = self.mark();
        self.bump();
        self.parse_parameters(TokenKind::RPar, self.is_py3k());
        self.expect(TokenKind::RPar, "')' expected");
        list.commit(self, NodeKind::ParameterList);
    }

    /// Lambda parameters, up to the `:`.
    pub(crate) fn parse_lambda_parameters(&mut self) {
        let list = self.mark();
        self.parse_parameters(TokenKind::Colon, false);
        list.commit(self, NodeKind::ParameterList);
    }

    fn parse_parameters(&mut self, end: TokenKind, annotations: bool) {
        while !self.at(end) && !self.at_end_of_statement() {
            if !self.parse_parameter(end, annotations) {
                break;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
    }

    fn parse_parameter(&mut self, end: TokenKind, annotations: bool) -> bool {
        let param = self.mark();
        match self.current() {
            TokenKind::Mult if matches!(self.nth(1), TokenKind::Comma) || self.nth(1) == end => {
                // Bare `*` before keyword-only parameters.
                self.bump();
                param.commit(self, NodeKind::SingleStarParameter);
                return true;
            }
            TokenKind::Mult | TokenKind::Exp => {
                self.bump();
                self.expect(TokenKind::Identifier, IDENTIFIER_EXPECTED);
                if annotations {
                    self.parse_parameter_annotation();
                }
            }
            TokenKind::LPar => {
                self.parse_tuple_parameter();
                self.parse_parameter_default();
                param.discard(self);
                return true;
            }
            TokenKind::Identifier => {
                self.bump();
                if annotations {
                    self.parse_parameter_annotation();
                }
                self.parse_parameter_default();
            }
            _ => {
                param.discard(self);
                let bad = self.mark();
                self.bump();
                bad.error(self, "Formal parameter name expected");
                return false;
            }
        }
        param.commit(self, NodeKind::NamedParameter);
        true
    }

    /// Python 2 `(a, (b, c))` unpacking parameter.
    fn parse_tuple_parameter(&mut self) {
        let tuple = self.mark();
        self.bump();
        while !self.at(TokenKind::RPar) && !self.at_end_of_statement() {
            match self.current() {
                TokenKind::LPar => self.parse_tuple_parameter(),
                TokenKind::Identifier => {
                    let name = self.mark();
                    self.bump();
                    name.commit(self, NodeKind::NamedParameter);
                }
                _ => {
                    self.error(IDENTIFIER_EXPECTED);
                    break;
                }
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RPar, "')' expected");
        tuple.commit(self, NodeKind::TupleParameter);
    }

    fn parse_parameter_annotation(&mut self) {
        if !self.at(TokenKind::Colon) {
            return;
        }
        let annotation = self.mark();
        self.bump();
        if !self.parse_single_expression(false) {
            self.error(EXPRESSION_EXPECTED);
        }
        annotation.commit(self, NodeKind::Annotation);
    }

    fn parse_parameter_default(&mut self) {
        if self.eat(TokenKind::Eq) && !self.parse_single_expression(false) {
            self.error(EXPRESSION_EXPECTED);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parsing::context::{LanguageLevel, ParsingContext};
    use crate::parsing::parser::parse_module;
    use crate::parsing::tokens::TokenKind;
    use crate::parsing::tree::{NodeKind, SyntaxTree};

    fn parse(src: &str) -> SyntaxTree {
        parse_module(src, &ParsingContext::default())
    }

    fn parse3(src: &str) -> SyntaxTree {
        parse_module(src, &ParsingContext::new(LanguageLevel::Python31))
    }

    #[test]
    fn test_function_shape() {
        let src = "def f(a, b=1, *args, **kw):\n    return a\n";
        let tree = parse(src);
        assert!(tree.errors.is_empty(), "{:?}", tree.errors);
        let f = tree.find_all(NodeKind::FunctionDeclaration)[0];
        let parts: Vec<_> = tree.child_nodes(f).map(|n| tree.kind(n)).collect();
        assert_eq!(parts, vec![NodeKind::ParameterList, NodeKind::StatementList]);
        assert_eq!(tree.find_all(NodeKind::NamedParameter).len(), 4);
    }

    #[test]
    fn test_function_closes_before_dedent() {
        let src = "def f():\n    pass\nx\n";
        let tree = parse(src);
        let f = tree.find_all(NodeKind::FunctionDeclaration)[0];
        assert!(tree.child_tokens(f).all(|t| t.kind != TokenKind::Dedent));
        let root_tokens: Vec<_> = tree.child_tokens(tree.root()).map(|t| t.kind).collect();
        assert_eq!(root_tokens, vec![TokenKind::Dedent]);
    }

    #[test]
    fn test_tuple_parameters() {
        let tree = parse("def f(a, (b, (c, d))=x):\n    pass\n");
        assert!(tree.errors.is_empty(), "{:?}", tree.errors);
        assert_eq!(tree.find_all(NodeKind::TupleParameter).len(), 2);
    }

    #[test]
    fn test_py3_annotations_and_bare_star() {
        let src = "def f(a: int, *, b: str = 'x') -> bool:\n    pass\n";
        let tree = parse3(src);
        assert!(tree.errors.is_empty(), "{:?}", tree.errors);
        assert_eq!(tree.find_all(NodeKind::Annotation).len(), 3);
        assert_eq!(tree.find_all(NodeKind::SingleStarParameter).len(), 1);
    }

    #[test]
    fn test_missing_parens() {
        let tree = parse("def f:\n    pass\n");
        assert_eq!(tree.errors[0].message, "'(' expected");
        assert_eq!(tree.find_all(NodeKind::ParameterList).len(), 1);
    }

    #[test]
    fn test_bad_parameter() {
        let tree = parse("def f(1):\n    pass\n");
        assert_eq!(tree.errors[0].message, "Formal parameter name expected");
    }

    #[test]
    fn test_decorators() {
        let src = "@a.b\n@c(1)\ndef f():\n    pass\n@d\nclass C:\n    pass\n";
        let tree = parse(src);
        assert!(tree.errors.is_empty(), "{:?}", tree.errors);
        assert_eq!(tree.find_all(NodeKind::Decorator).len(), 3);
        let f = tree.find_all(NodeKind::FunctionDeclaration)[0];
        assert!(tree.text(f, src).starts_with("@a.b"));
        let c = tree.find_all(NodeKind::ClassDeclaration)[0];
        let first = tree.child_nodes(c).next().unwrap();
        assert_eq!(tree.kind(first), NodeKind::DecoratorList);
    }

    #[test]
    fn test_decorator_without_target() {
        let tree = parse("@a\nx = 1\n");
        assert_eq!(tree.errors[0].message, "'def' or 'class' expected");
        assert_eq!(tree.find_all(NodeKind::AssignmentStatement).len(), 1);
    }
}
