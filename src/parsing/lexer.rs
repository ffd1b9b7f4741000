//! Zero-copy Python lexer.
//!
//! Produces [`Token`]s carrying byte ranges into the source buffer; no heap
//! allocation for identifiers or string content.
//!
//! Handles:
//! - Hard keywords (soft keywords such as `as`, `with`, `print` stay
//!   [`TokenKind::Identifier`]; the parser's reclassifier promotes them)
//! - STATEMENT_BREAK / INDENT / DEDENT via an indentation stack, plus
//!   INCONSISTENT_DEDENT for unindents that match no outer level
//! - Implicit line continuation inside `(`, `[`, `{`
//! - Explicit line continuation via trailing `\`
//! - All string literal forms: single/triple-quoted, raw, bytes, unicode
//! - Comments (skipped, but their ranges are kept as trivia)

use crate::location::TextRange;
use crate::parsing::tokens::{Token, TokenKind};

/// Output of [`tokenize`].
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    /// Significant tokens; always terminated by exactly one [`TokenKind::Eof`].
    pub tokens: Vec<Token>,
    /// Ranges of `#` comments, in source order.
    pub comments: Vec<TextRange>,
}

/// Tokenize a whole source buffer.
pub fn tokenize(src: &str) -> Lexed {
    Lexer::new(src).run()
}

// ── Lexer ─────────────────────────────────────────────────────────────────────

pub struct Lexer<'src> {
    src: &'src [u8],
    /// Current byte position.
    pos: usize,
    /// Indentation stack; always starts with [0].
    indent_stack: Vec<usize>,
    /// Whether the next logical line should trigger indent/dedent analysis.
    at_line_start: bool,
    /// Nesting depth of `()`, `[]`, `{}`.  When > 0 newlines are ignored.
    bracket_depth: i32,
    tokens: Vec<Token>,
    comments: Vec<TextRange>,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            indent_stack: vec![0],
            at_line_start: true,
            bracket_depth: 0,
            tokens: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub fn run(mut self) -> Lexed {
        while self.pos < self.src.len() {
            if self.at_line_start && self.bracket_depth == 0 {
                self.at_line_start = false;
                self.handle_indent();
                continue;
            }

            let start = self.pos;
            let b = self.src[self.pos];
            match b {
                b' ' | b'\t' | b'\r' | b'\x0c' => self.pos += 1,
                b'\n' => {
                    self.pos += 1;
                    // Inside brackets: implicit continuation, ignore newline.
                    if self.bracket_depth == 0 {
                        self.push(TokenKind::StatementBreak, start);
                        self.at_line_start = true;
                    }
                }
                b'\\' if self.continuation_len() > 0 => self.pos += self.continuation_len(),
                b'#' => self.skip_comment(),
                _ if self.is_string_start() => self.lex_string(start),
                b'0'..=b'9' => self.lex_number(start),
                b'.' if self.peek_byte(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.lex_number(start)
                }
                _ if b.is_ascii_alphabetic() || b == b'_' || b >= 0x80 => self.lex_name(start),
                _ => self.lex_operator(start),
            }
        }

        // Close the last logical line even when the file lacks a trailing
        // newline, so every statement sees its break.
        if self
            .tokens
            .last()
            .is_some_and(|t| t.kind != TokenKind::StatementBreak)
        {
            self.push_empty(TokenKind::StatementBreak);
        }
        // Flush remaining DEDENT tokens before EOF.
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.push_empty(TokenKind::Dedent);
        }
        self.push_empty(TokenKind::Eof);

        Lexed {
            tokens: self.tokens,
            comments: self.comments,
        }
    }

    // ── helpers ──────────────────────────────────────────────────────────────

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.src.get(self.pos + ahead).copied()
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token {
            kind,
            range: TextRange::new(start as u32, self.pos as u32),
        });
    }

    fn push_empty(&mut self, kind: TokenKind) {
        self.tokens.push(Token {
            kind,
            range: TextRange::empty(self.pos as u32),
        });
    }

    /// Length of a `\` + line-ending sequence at the cursor, or 0.
    fn continuation_len(&self) -> usize {
        match (self.peek_byte(1), self.peek_byte(2)) {
            (Some(b'\n'), _) => 2,
            (Some(b'\r'), Some(b'\n')) => 3,
            _ => 0,
        }
    }

    fn skip_comment(&mut self) {
        let start = self.pos;
        while self.pos < self.src.len() && self.src[self.pos] != b'\n' {
            self.pos += 1;
        }
        let mut end = self.pos;
        if end > start && self.src[end - 1] == b'\r' {
            end -= 1;
        }
        self.comments
            .push(TextRange::new(start as u32, end as u32));
    }

    // ── Indentation handling ──────────────────────────────────────────────────

    /// Called when `at_line_start` is true.  Scans leading whitespace of the
    /// next non-blank, non-comment line and emits INDENT / DEDENT tokens as
    /// needed.  Blank and comment-only lines produce no tokens at all.
    fn handle_indent(&mut self) {
        loop {
            let mut col = 0usize;
            while self.pos < self.src.len() {
                match self.src[self.pos] {
                    b' ' => col += 1,
                    b'\t' => col = (col + 8) & !7, // tab stop at 8
                    b'\x0c' => col = 0,
                    _ => break,
                }
                self.pos += 1;
            }

            // EOF after whitespace-only content.
            if self.pos >= self.src.len() {
                return;
            }
            match self.src[self.pos] {
                b'\n' => {
                    self.pos += 1;
                    continue;
                }
                b'\r' => {
                    self.pos += 1;
                    continue;
                }
                b'#' => {
                    self.skip_comment();
                    if self.pos < self.src.len() {
                        self.pos += 1; // consume '\n'
                    }
                    continue;
                }
                _ => {}
            }

            let top = *self.indent_stack.last().unwrap_or(&0);
            if col > top {
                self.indent_stack.push(col);
                self.push_empty(TokenKind::Indent);
            } else if col < top {
                while self.indent_stack.len() > 1
                    && self.indent_stack.last().is_some_and(|&level| level > col)
                {
                    self.indent_stack.pop();
                    self.push_empty(TokenKind::Dedent);
                }
                if self.indent_stack.last().is_some_and(|&level| level != col) {
                    self.push_empty(TokenKind::InconsistentDedent);
                }
            }
            return;
        }
    }

    // ── Identifier / keyword lexing ───────────────────────────────────────────

    fn lex_name(&mut self, start: usize) {
        while self.pos < self.src.len() {
            let b = self.src[self.pos];
            if b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80 {
                self.pos += 1;
            } else {
                break;
            }
        }
        let kind = keyword_kind(&self.src[start..self.pos]).unwrap_or(TokenKind::Identifier);
        self.push(kind, start);
    }

    // ── Number lexing ─────────────────────────────────────────────────────────

    fn lex_number(&mut self, start: usize) {
        while self.pos < self.src.len() {
            let b = self.src[self.pos];
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
                self.pos += 1;
            } else if (b == b'+' || b == b'-')
                && matches!(self.src[self.pos - 1], b'e' | b'E')
                && !is_hex_literal(&self.src[start..self.pos])
            {
                // Exponent sign in float literal.
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = &self.src[start..self.pos];
        let kind = if matches!(text.last(), Some(b'j' | b'J')) {
            TokenKind::Imaginary
        } else if !is_hex_literal(text)
            && text.iter().any(|&c| matches!(c, b'.' | b'e' | b'E'))
        {
            TokenKind::Float
        } else {
            TokenKind::Integer
        };
        self.push(kind, start);
    }

    // ── String literals ───────────────────────────────────────────────────────

    fn is_string_start(&self) -> bool {
        let b = self.src[self.pos];
        match b {
            b'"' | b'\'' => true,
            b'r' | b'R' | b'b' | b'B' | b'u' | b'U' => match self.peek_byte(1) {
                Some(b'"' | b'\'') => true,
                // Two-char prefix like ur, br, rb
                Some(b'r' | b'R' | b'b' | b'B') => {
                    matches!(self.peek_byte(2), Some(b'"' | b'\''))
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn lex_string(&mut self, start: usize) {
        while matches!(
            self.src[self.pos],
            b'r' | b'R' | b'b' | b'B' | b'u' | b'U'
        ) {
            self.pos += 1;
        }

        let q = self.src[self.pos];
        let triple = self.peek_byte(1) == Some(q) && self.peek_byte(2) == Some(q);
        self.pos += if triple { 3 } else { 1 };

        while self.pos < self.src.len() {
            let b = self.src[self.pos];
            if b == b'\\' {
                self.pos += 2; // skip escaped char
                continue;
            }
            if triple {
                if b == q && self.peek_byte(1) == Some(q) && self.peek_byte(2) == Some(q) {
                    self.pos += 3;
                    break;
                }
            } else if b == q {
                self.pos += 1;
                break;
            } else if b == b'\n' {
                // Unterminated single-quoted string ends at the line end.
                break;
            }
            self.pos += 1;
        }
        self.pos = self.pos.min(self.src.len());
        self.push(TokenKind::String, start);
    }

    // ── Operators and punctuation ─────────────────────────────────────────────

    fn lex_operator(&mut self, start: usize) {
        let b = self.src[self.pos];
        let next = self.peek_byte(1);
        let after = self.peek_byte(2);
        let (kind, len) = match (b, next, after) {
            (b'(', _, _) => {
                self.bracket_depth += 1;
                (TokenKind::LPar, 1)
            }
            (b')', _, _) => {
                self.bracket_depth = (self.bracket_depth - 1).max(0);
                (TokenKind::RPar, 1)
            }
            (b'[', _, _) => {
                self.bracket_depth += 1;
                (TokenKind::LBracket, 1)
            }
            (b']', _, _) => {
                self.bracket_depth = (self.bracket_depth - 1).max(0);
                (TokenKind::RBracket, 1)
            }
            (b'{', _, _) => {
                self.bracket_depth += 1;
                (TokenKind::LBrace, 1)
            }
            (b'}', _, _) => {
                self.bracket_depth = (self.bracket_depth - 1).max(0);
                (TokenKind::RBrace, 1)
            }
            (b',', _, _) => (TokenKind::Comma, 1),
            (b';', _, _) => (TokenKind::Semicolon, 1),
            (b':', _, _) => (TokenKind::Colon, 1),
            (b'.', _, _) => (TokenKind::Dot, 1),
            (b'`', _, _) => (TokenKind::Backtick, 1),
            (b'~', _, _) => (TokenKind::Tilde, 1),
            (b'@', Some(b'='), _) => (TokenKind::AtEq, 2),
            (b'@', _, _) => (TokenKind::At, 1),
            (b'=', Some(b'='), _) => (TokenKind::EqEq, 2),
            (b'=', _, _) => (TokenKind::Eq, 1),
            (b'!', Some(b'='), _) => (TokenKind::Ne, 2),
            (b'<', Some(b'<'), Some(b'=')) => (TokenKind::LtLtEq, 3),
            (b'<', Some(b'<'), _) => (TokenKind::LtLt, 2),
            (b'<', Some(b'='), _) => (TokenKind::Le, 2),
            (b'<', Some(b'>'), _) => (TokenKind::NeOld, 2),
            (b'<', _, _) => (TokenKind::Lt, 1),
            (b'>', Some(b'>'), Some(b'=')) => (TokenKind::GtGtEq, 3),
            (b'>', Some(b'>'), _) => (TokenKind::GtGt, 2),
            (b'>', Some(b'='), _) => (TokenKind::Ge, 2),
            (b'>', _, _) => (TokenKind::Gt, 1),
            (b'*', Some(b'*'), Some(b'=')) => (TokenKind::ExpEq, 3),
            (b'*', Some(b'*'), _) => (TokenKind::Exp, 2),
            (b'*', Some(b'='), _) => (TokenKind::MultEq, 2),
            (b'*', _, _) => (TokenKind::Mult, 1),
            (b'/', Some(b'/'), Some(b'=')) => (TokenKind::FloorDivEq, 3),
            (b'/', Some(b'/'), _) => (TokenKind::FloorDiv, 2),
            (b'/', Some(b'='), _) => (TokenKind::DivEq, 2),
            (b'/', _, _) => (TokenKind::Div, 1),
            (b'+', Some(b'='), _) => (TokenKind::PlusEq, 2),
            (b'+', _, _) => (TokenKind::Plus, 1),
            (b'-', Some(b'>'), _) => (TokenKind::RArrow, 2),
            (b'-', Some(b'='), _) => (TokenKind::MinusEq, 2),
            (b'-', _, _) => (TokenKind::Minus, 1),
            (b'%', Some(b'='), _) => (TokenKind::PercEq, 2),
            (b'%', _, _) => (TokenKind::Perc, 1),
            (b'&', Some(b'='), _) => (TokenKind::AndEq, 2),
            (b'&', _, _) => (TokenKind::And, 1),
            (b'|', Some(b'='), _) => (TokenKind::OrEq, 2),
            (b'|', _, _) => (TokenKind::Or, 1),
            (b'^', Some(b'='), _) => (TokenKind::XorEq, 2),
            (b'^', _, _) => (TokenKind::Xor, 1),
            _ => (TokenKind::BadCharacter, 1),
        };
        self.pos += len;
        self.push(kind, start);
    }
}

fn is_hex_literal(text: &[u8]) -> bool {
    text.len() > 1 && text[0] == b'0' && matches!(text[1], b'x' | b'X')
}

fn keyword_kind(word: &[u8]) -> Option<TokenKind> {
    let kind = match word {
        b"and" => TokenKind::AndKeyword,
        b"assert" => TokenKind::AssertKeyword,
        b"break" => TokenKind::BreakKeyword,
        b"class" => TokenKind::ClassKeyword,
        b"continue" => TokenKind::ContinueKeyword,
        b"def" => TokenKind::DefKeyword,
        b"del" => TokenKind::DelKeyword,
        b"elif" => TokenKind::ElifKeyword,
        b"else" => TokenKind::ElseKeyword,
        b"except" => TokenKind::ExceptKeyword,
        b"finally" => TokenKind::FinallyKeyword,
        b"for" => TokenKind::ForKeyword,
        b"from" => TokenKind::FromKeyword,
        b"global" => TokenKind::GlobalKeyword,
        b"if" => TokenKind::IfKeyword,
        b"import" => TokenKind::ImportKeyword,
        b"in" => TokenKind::InKeyword,
        b"is" => TokenKind::IsKeyword,
        b"lambda" => TokenKind::LambdaKeyword,
        b"not" => TokenKind::NotKeyword,
        b"or" => TokenKind::OrKeyword,
        b"pass" => TokenKind::PassKeyword,
        b"raise" => TokenKind::RaiseKeyword,
        b"return" => TokenKind::ReturnKeyword,
        b"try" => TokenKind::TryKeyword,
        b"while" => TokenKind::WhileKeyword,
        b"yield" => TokenKind::YieldKeyword,
        _ => return None,
    };
    Some(kind)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).tokens.iter().map(|t| t.kind).collect()
    }

    fn text<'a>(src: &'a str, token: &Token) -> &'a str {
        &src[token.range.start as usize..token.range.end as usize]
    }

    #[test]
    fn test_simple_name() {
        let src = "hello";
        let lexed = tokenize(src);
        assert_eq!(lexed.tokens[0].kind, TokenKind::Identifier);
        assert_eq!(text(src, &lexed.tokens[0]), "hello");
    }

    #[test]
    fn test_keyword_import() {
        assert_eq!(
            kinds("import os\n"),
            vec![
                TokenKind::ImportKeyword,
                TokenKind::Identifier,
                TokenKind::StatementBreak,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_soft_keywords_stay_identifiers() {
        for word in ["as", "with", "print", "None", "True", "nonlocal", "exec"] {
            assert_eq!(kinds(word)[0], TokenKind::Identifier, "{word}");
        }
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(kinds("iffy")[0], TokenKind::Identifier);
        assert_eq!(kinds("import_x")[0], TokenKind::Identifier);
    }

    #[test]
    fn test_indent_dedent() {
        assert_eq!(
            kinds("if x:\n    y\nz\n"),
            vec![
                TokenKind::IfKeyword,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::StatementBreak,
                TokenKind::Indent,
                TokenKind::Identifier,
                TokenKind::StatementBreak,
                TokenKind::Dedent,
                TokenKind::Identifier,
                TokenKind::StatementBreak,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_dedents_flushed_before_eof() {
        let k = kinds("if a:\n  if b:\n    c");
        let tail: Vec<_> = k.iter().rev().take(4).rev().copied().collect();
        assert_eq!(
            tail,
            vec![
                TokenKind::StatementBreak,
                TokenKind::Dedent,
                TokenKind::Dedent,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_inconsistent_dedent() {
        let k = kinds("if a:\n    b\n  c\n");
        assert!(k.contains(&TokenKind::InconsistentDedent));
    }

    #[test]
    fn test_blank_and_comment_lines_produce_no_tokens() {
        let src = "x\n\n   # note\n\ny\n";
        let lexed = tokenize(src);
        let k: Vec<_> = lexed.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            k,
            vec![
                TokenKind::Identifier,
                TokenKind::StatementBreak,
                TokenKind::Identifier,
                TokenKind::StatementBreak,
                TokenKind::Eof
            ]
        );
        assert_eq!(lexed.comments.len(), 1);
        assert_eq!(&src[6..12], "# note");
        assert_eq!(lexed.comments[0], TextRange::new(6, 12));
    }

    #[test]
    fn test_newlines_ignored_inside_brackets() {
        let k = kinds("f(a,\n  b)\n");
        assert_eq!(
            k.iter()
                .filter(|&&t| t == TokenKind::StatementBreak)
                .count(),
            1
        );
        assert!(!k.contains(&TokenKind::Indent));
    }

    #[test]
    fn test_backslash_continuation() {
        let k = kinds("x = 1 + \\\n    2\n");
        assert!(!k.contains(&TokenKind::Indent));
        assert_eq!(
            k.iter()
                .filter(|&&t| t == TokenKind::StatementBreak)
                .count(),
            1
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds(">> <> ** //= -> != <<= @"),
            vec![
                TokenKind::GtGt,
                TokenKind::NeOld,
                TokenKind::Exp,
                TokenKind::FloorDivEq,
                TokenKind::RArrow,
                TokenKind::Ne,
                TokenKind::LtLtEq,
                TokenKind::At,
                TokenKind::StatementBreak,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_augassign() {
        let k = kinds("x += 1");
        assert_eq!(k[1], TokenKind::PlusEq);
        assert!(k[1].is_aug_assign());
    }

    #[test]
    fn test_number_kinds() {
        assert_eq!(kinds("42")[0], TokenKind::Integer);
        assert_eq!(kinds("42L")[0], TokenKind::Integer);
        assert_eq!(kinds("0xEF")[0], TokenKind::Integer);
        assert_eq!(kinds("1.5e-3")[0], TokenKind::Float);
        assert_eq!(kinds(".5")[0], TokenKind::Float);
        assert_eq!(kinds("3j")[0], TokenKind::Imaginary);
    }

    #[test]
    fn test_string_forms() {
        for src in ["'a'", "\"b\"", "'''c\nd'''", "r'\\d'", "ur'x'", "b\"y\""] {
            let k = kinds(src);
            assert_eq!(k[0], TokenKind::String, "{src}");
            assert_eq!(k[1], TokenKind::StatementBreak, "{src}");
        }
    }

    #[test]
    fn test_relative_dots_are_separate_tokens() {
        assert_eq!(
            &kinds("from ... import x")[..4],
            &[
                TokenKind::FromKeyword,
                TokenKind::Dot,
                TokenKind::Dot,
                TokenKind::Dot
            ]
        );
    }

    #[test]
    fn test_final_break_added_without_trailing_newline() {
        let lexed = tokenize("pass");
        assert_eq!(lexed.tokens[1].kind, TokenKind::StatementBreak);
        assert!(lexed.tokens[1].range.is_empty());
    }

    #[test]
    fn test_empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("\n\n# c\n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_unicode_identifier() {
        let src = "naïve = 1";
        let lexed = tokenize(src);
        assert_eq!(text(src, &lexed.tokens[0]), "naïve");
    }
}
