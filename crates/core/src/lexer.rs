use crate::ast::Location;
use crate::error::CompileError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifiers and keywords -- distinguished in the parser
    Ident(String),
    /// Quoted string literal (content without quotes, escapes resolved)
    Str(String),
    /// Integer literal; decimal, `0x` hex and `0b` binary all land here
    Int(i64),
    Float(f64),
    // Punctuation
    LBrace,
    RBrace,
    LParen,
    RParen,
    Lt,
    Gt,
    Colon,
    Comma,
    Eq,
    Arrow, // ->
    // End of input
    Eof,
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub loc: Location,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn loc(&self) -> Location {
        Location::new(self.line, self.column)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek_at(0) {
            if !pred(c) {
                break;
            }
            s.push(c);
            self.bump();
        }
        s
    }

    fn lex_string(&mut self, start: Location) -> Result<Token, CompileError> {
        self.bump(); // opening quote
        let mut s = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(CompileError::syntax(start, "unterminated string literal"))
                }
                Some('"') => return Ok(Token::Str(s)),
                Some('\\') => match self.bump() {
                    None => {
                        return Err(CompileError::syntax(start, "unterminated escape in string"))
                    }
                    Some('"') => s.push('"'),
                    Some('\\') => s.push('\\'),
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some(other) => {
                        s.push('\\');
                        s.push(other);
                    }
                },
                Some(c) => s.push(c),
            }
        }
    }

    fn lex_number(&mut self, start: Location) -> Result<Token, CompileError> {
        let negative = self.peek_at(0) == Some('-');
        if negative {
            self.bump();
        }

        let radix = match (self.peek_at(0), self.peek_at(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };
        let token = if let Some(radix) = radix {
            self.bump();
            self.bump();
            let digits = self.take_while(|c| c.is_digit(radix));
            if digits.is_empty() {
                return Err(CompileError::syntax(
                    start,
                    format!("malformed base-{} integer literal", radix),
                ));
            }
            Token::Int(to_i64(&digits, radix, negative, start)?)
        } else {
            let mut text = self.take_while(|c| c.is_ascii_digit());
            let mut is_float = false;
            if self.peek_at(0) == Some('.') {
                is_float = true;
                text.push('.');
                self.bump();
                text.push_str(&self.take_while(|c| c.is_ascii_digit()));
            }
            if matches!(self.peek_at(0), Some('e' | 'E')) {
                let exp_digit = match self.peek_at(1) {
                    Some('+' | '-') => self.peek_at(2),
                    other => other,
                };
                if exp_digit.is_some_and(|c| c.is_ascii_digit()) {
                    is_float = true;
                    text.push('e');
                    self.bump();
                    if let Some(sign @ ('+' | '-')) = self.peek_at(0) {
                        text.push(sign);
                        self.bump();
                    }
                    text.push_str(&self.take_while(|c| c.is_ascii_digit()));
                }
            }
            if is_float {
                let n: f64 = text.parse().map_err(|_| {
                    CompileError::syntax(start, format!("invalid float literal '{}'", text))
                })?;
                if !n.is_finite() {
                    return Err(CompileError::syntax(start, "float literal out of range"));
                }
                Token::Float(if negative { -n } else { n })
            } else {
                Token::Int(to_i64(&text, 10, negative, start)?)
            }
        };

        if self
            .peek_at(0)
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(CompileError::syntax(start, "malformed numeric literal"));
        }
        Ok(token)
    }
}

fn to_i64(digits: &str, radix: u32, negative: bool, at: Location) -> Result<i64, CompileError> {
    let out_of_range = || CompileError::syntax(at, "integer literal out of range");
    let magnitude = i128::from_str_radix(digits, radix).map_err(|_| out_of_range())?;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).map_err(|_| out_of_range())
}

/// A number starts with a digit or `.digit`, optionally preceded by `-`.
fn starts_number(lx: &Lexer) -> bool {
    let offset = usize::from(lx.peek_at(0) == Some('-'));
    let digit_at = |i: usize| lx.peek_at(i).is_some_and(|c| c.is_ascii_digit());
    digit_at(offset) || (lx.peek_at(offset) == Some('.') && digit_at(offset + 1))
}

pub fn lex(src: &str) -> Result<Vec<Spanned>, CompileError> {
    let mut lx = Lexer {
        chars: src.chars().collect(),
        pos: 0,
        line: 1,
        column: 1,
    };
    let mut tokens = Vec::new();

    while let Some(c) = lx.peek_at(0) {
        // Line comment
        if c == '#' {
            while lx.peek_at(0).is_some_and(|c| c != '\n') {
                lx.bump();
            }
            continue;
        }

        if c.is_whitespace() {
            lx.bump();
            continue;
        }

        let loc = lx.loc();

        if c == '"' {
            let token = lx.lex_string(loc)?;
            tokens.push(Spanned { token, loc });
            continue;
        }

        if starts_number(&lx) {
            let token = lx.lex_number(loc)?;
            tokens.push(Spanned { token, loc });
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let word = lx.take_while(|c| c.is_alphanumeric() || c == '_');
            tokens.push(Spanned {
                token: Token::Ident(word),
                loc,
            });
            continue;
        }

        let token = match c {
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '<' => Token::Lt,
            '>' => Token::Gt,
            ':' => Token::Colon,
            ',' => Token::Comma,
            '=' => Token::Eq,
            '-' if lx.peek_at(1) == Some('>') => {
                lx.bump();
                Token::Arrow
            }
            _ => {
                return Err(CompileError::syntax(
                    loc,
                    format!("unexpected character '{}'", c),
                ))
            }
        };
        lx.bump();
        tokens.push(Spanned { token, loc });
    }

    tokens.push(Spanned {
        token: Token::Eof,
        loc: lx.loc(),
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn kinds(src: &str) -> Vec<Token> {
        lex(src)
            .expect("lex should succeed")
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn integer_radixes_normalize_to_int() {
        assert_eq!(
            kinds("10 0x1F 0b101 -7"),
            vec![
                Token::Int(10),
                Token::Int(31),
                Token::Int(5),
                Token::Int(-7),
                Token::Eof
            ]
        );
    }

    #[test]
    fn floats_with_fraction_and_exponent() {
        assert_eq!(
            kinds("1.5 2e3 -0.25"),
            vec![
                Token::Float(1.5),
                Token::Float(2000.0),
                Token::Float(-0.25),
                Token::Eof
            ]
        );
    }

    #[test]
    fn floats_with_bare_dot() {
        assert_eq!(
            kinds(".5 5. -.25 .5e1"),
            vec![
                Token::Float(0.5),
                Token::Float(5.0),
                Token::Float(-0.25),
                Token::Float(5.0),
                Token::Eof
            ]
        );
        let toks = lex("x = .5").unwrap();
        assert_eq!(toks[2].loc, Location::new(1, 5));
        assert!(lex(". 5").is_err());
    }

    #[test]
    fn non_finite_float_rejected() {
        let err = lex("const F = 1e999").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.message, "float literal out of range");
        assert_eq!(err.location, Some(Location::new(1, 11)));
        assert!(lex("-1e999").is_err());
    }

    #[test]
    fn arrow_and_punctuation() {
        assert_eq!(
            kinds("a : B -> C"),
            vec![
                Token::Ident("a".into()),
                Token::Colon,
                Token::Ident("B".into()),
                Token::Arrow,
                Token::Ident("C".into()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn comments_are_skipped_and_positions_tracked() {
        let toks = lex("# header\n  const X = 1 # trailing\n").unwrap();
        assert_eq!(toks[0].token, Token::Ident("const".into()));
        assert_eq!(toks[0].loc, Location::new(2, 3));
        assert_eq!(toks[1].loc, Location::new(2, 9));
        assert_eq!(toks.len(), 5);
    }

    #[test]
    fn string_escapes_resolved() {
        assert_eq!(
            kinds(r#""a\"b\\c\n""#),
            vec![Token::Str("a\"b\\c\n".into()), Token::Eof]
        );
    }

    #[test]
    fn unterminated_string_reports_start() {
        let err = lex("const S = \"abc\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.location, Some(Location::new(1, 11)));
    }

    #[test]
    fn malformed_numbers_rejected() {
        assert!(lex("0x").is_err());
        assert!(lex("0b102").is_err());
        assert!(lex("12abc").is_err());
        assert!(lex("99999999999999999999").is_err());
    }

    #[test]
    fn unexpected_character_rejected() {
        let err = lex("struct A { x: int32_t; }").unwrap_err();
        assert!(err.message.contains("unexpected character ';'"));
        assert_eq!(err.location, Some(Location::new(1, 22)));
    }
}
