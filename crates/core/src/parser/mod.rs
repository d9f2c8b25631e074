//! Recursive-descent parser producing the syntax tree in `crate::ast`.
//! No name resolution or type checking happens here -- that is the job of
//! the semantic passes.

use crate::ast::{Definition, Location};
use crate::error::CompileError;
use crate::lexer::{Spanned, Token};

mod definitions;
mod values;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    fn peek_next(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)].token
    }

    fn cur_loc(&self) -> Location {
        self.cur().loc
    }

    fn advance(&mut self) -> &Spanned {
        let t = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn err(&self, msg: impl Into<String>) -> CompileError {
        CompileError::syntax(self.cur_loc(), msg)
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<Location, CompileError> {
        if self.peek() == &expected {
            let loc = self.cur_loc();
            self.advance();
            Ok(loc)
        } else {
            Err(self.err(format!("expected {}, got {}", what, describe(self.peek()))))
        }
    }

    fn is_ident(&self, w: &str) -> bool {
        matches!(self.peek(), Token::Ident(x) if x == w)
    }

    fn take_ident(&mut self) -> Result<(String, Location), CompileError> {
        if let Token::Ident(w) = self.peek().clone() {
            let loc = self.cur_loc();
            self.advance();
            Ok((w, loc))
        } else {
            Err(self.err(format!("expected identifier, got {}", describe(self.peek()))))
        }
    }

    fn take_str(&mut self) -> Result<String, CompileError> {
        if let Token::Str(s) = self.peek().clone() {
            self.advance();
            Ok(s)
        } else {
            Err(self.err(format!(
                "expected string literal, got {}",
                describe(self.peek())
            )))
        }
    }

    /// Optional separator between struct fields and service methods.
    fn skip_comma(&mut self) {
        if self.peek() == &Token::Comma {
            self.advance();
        }
    }

    // -- Document -----------------------------------------------

    fn parse_document(&mut self) -> Result<Vec<Definition>, CompileError> {
        let mut definitions = Vec::new();
        while self.peek() != &Token::Eof {
            definitions.push(self.parse_definition()?);
        }
        if definitions.is_empty() {
            return Err(self.err("expected at least one definition"));
        }
        Ok(definitions)
    }

    fn parse_definition(&mut self) -> Result<Definition, CompileError> {
        let loc = self.cur_loc();
        match self.peek().clone() {
            Token::Ident(w) => match w.as_str() {
                "const" => self.parse_const(loc).map(Definition::Const),
                "struct" => self.parse_struct(loc).map(Definition::Struct),
                "service" => self.parse_service(loc).map(Definition::Service),
                "options" => self.parse_options(loc).map(Definition::Options),
                _ => Err(self.err(format!("unexpected token '{}'", w))),
            },
            other => Err(self.err(format!(
                "expected 'const', 'struct', 'service' or 'options', got {}",
                describe(&other)
            ))),
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(w) => format!("'{}'", w),
        Token::Str(s) => format!("string \"{}\"", s),
        Token::Int(n) => format!("integer {}", n),
        Token::Float(x) => format!("float {}", x),
        Token::LBrace => "'{'".to_owned(),
        Token::RBrace => "'}'".to_owned(),
        Token::LParen => "'('".to_owned(),
        Token::RParen => "')'".to_owned(),
        Token::Lt => "'<'".to_owned(),
        Token::Gt => "'>'".to_owned(),
        Token::Colon => "':'".to_owned(),
        Token::Comma => "','".to_owned(),
        Token::Eq => "'='".to_owned(),
        Token::Arrow => "'->'".to_owned(),
        Token::Eof => "end of input".to_owned(),
    }
}

pub fn parse(tokens: &[Spanned]) -> Result<Vec<Definition>, CompileError> {
    let mut p = Parser::new(tokens);
    p.parse_document()
}

/// Lex and parse a source document.
pub fn parse_source(src: &str) -> Result<Vec<Definition>, CompileError> {
    let tokens = crate::lexer::lex(src)?;
    parse(&tokens)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::error::ErrorKind;

    #[test]
    fn parses_all_four_definition_kinds() {
        let src = r#"
const N = 4
struct Point { x: float, y: float }
service Nav { route: Point -> Point }
options { namespace = "nav" }
"#;
        let defs = parse_source(src).expect("should parse");
        assert_eq!(defs.len(), 4);
        assert!(matches!(defs[0], Definition::Const(_)));
        assert!(matches!(defs[1], Definition::Struct(_)));
        assert!(matches!(defs[2], Definition::Service(_)));
        assert!(matches!(defs[3], Definition::Options(_)));
        assert_eq!(defs[1].location(), Location::new(3, 1));
    }

    #[test]
    fn empty_document_is_a_syntax_error() {
        let err = parse_source("# nothing here\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("at least one definition"));
    }

    #[test]
    fn unknown_top_level_keyword() {
        let err = parse_source("enum Color { Red }").unwrap_err();
        assert_eq!(err.message, "unexpected token 'enum'");
        assert_eq!(err.location, Some(Location::new(1, 1)));
    }

    #[test]
    fn missing_closing_brace_reports_end_of_input() {
        let err = parse_source("struct A {\n  x: int32_t\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("end of input"), "{}", err.message);
    }
}
