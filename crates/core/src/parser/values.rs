use super::{describe, Parser};
use crate::ast::{LengthNode, ScalarNode, TypeNode, ValueNode};
use crate::error::CompileError;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    // -- Type parsing -------------------------------------------

    pub(super) fn parse_typename(&mut self) -> Result<TypeNode, CompileError> {
        if self.is_ident("vector") && self.peek_next() == &Token::Lt {
            self.advance();
            self.advance();
            let (element, _) = self.take_ident()?;
            self.expect(Token::Gt, "'>'")?;
            let length = if self.peek() == &Token::LParen {
                self.advance();
                let length = self.parse_length()?;
                self.expect(Token::RParen, "')'")?;
                Some(length)
            } else {
                None
            };
            return Ok(TypeNode::Vector { element, length });
        }
        let (name, _) = self.take_ident()?;
        Ok(TypeNode::Simple(name))
    }

    fn parse_length(&mut self) -> Result<LengthNode, CompileError> {
        let loc = self.cur_loc();
        match self.peek().clone() {
            Token::Int(value) => {
                self.advance();
                Ok(LengthNode::Literal { value, loc })
            }
            Token::Ident(name) => {
                self.advance();
                Ok(LengthNode::Constant { name, loc })
            }
            other => Err(self.err(format!(
                "expected integer or constant name in vector length, got {}",
                describe(&other)
            ))),
        }
    }

    // -- Value parsing ------------------------------------------

    pub(super) fn parse_value(&mut self) -> Result<ValueNode, CompileError> {
        let loc = self.cur_loc();
        if self.peek() != &Token::LBrace {
            let scalar = self.parse_scalar()?;
            return Ok(ValueNode::Scalar { scalar, loc });
        }
        self.advance();
        // `{}` is accepted here and rejected by value evaluation, which
        // reports it with the same kind as a mixed list.
        let mut elements = Vec::new();
        if self.peek() != &Token::RBrace {
            elements.push(self.parse_scalar()?);
            while self.peek() == &Token::Comma {
                self.advance();
                elements.push(self.parse_scalar()?);
            }
        }
        self.expect(Token::RBrace, "'}'")?;
        Ok(ValueNode::Vector { elements, loc })
    }

    fn parse_scalar(&mut self) -> Result<ScalarNode, CompileError> {
        let scalar = match self.peek().clone() {
            Token::Int(n) => ScalarNode::Int(n),
            Token::Float(x) => ScalarNode::Float(x),
            Token::Str(s) => ScalarNode::Str(s),
            other => {
                return Err(self.err(format!("expected literal value, got {}", describe(&other))))
            }
        };
        self.advance();
        Ok(scalar)
    }
}
