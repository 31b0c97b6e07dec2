use crate::error::CalcError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub slice: &'a str,
    pub offset: usize,
    pub kind: TokenKind,
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Number,
    Ident,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Bang,
    LeftParen,
    RightParen,
    Comma,
}

/// Streaming tokenizer over one expression.
///
/// A minus sign is always its own token, never part of a number literal;
/// unary negation is the parser's business, which keeps `3-2` and
/// `3 - -2` both working.
#[derive(Debug)]
pub struct Lexer<'a> {
    rest: &'a str,
    byte: usize,
    pub peeked: Option<Result<Token<'a>, CalcError>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            byte: 0,
            peeked: None,
        }
    }

    pub fn peek(&mut self) -> Option<&Result<Token<'a>, CalcError>> {
        if self.peeked.is_some() {
            return self.peeked.as_ref();
        }

        self.peeked = self.next();
        self.peeked.as_ref()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, CalcError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(next) = self.peeked.take() {
            return Some(next);
        }

        loop {
            let mut chars = self.rest.chars();
            let c = chars.next()?;
            let offset = self.byte;
            let slice = &self.rest[..c.len_utf8()];
            let c_onwards = self.rest;
            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            let make_token = |kind: TokenKind| {
                Some(Ok(Token {
                    slice,
                    offset,
                    kind,
                }))
            };

            match c {
                '(' => return make_token(TokenKind::LeftParen),
                ')' => return make_token(TokenKind::RightParen),
                ',' => return make_token(TokenKind::Comma),
                '+' => return make_token(TokenKind::Plus),
                '-' => return make_token(TokenKind::Minus),
                '*' => return make_token(TokenKind::Star),
                '/' => return make_token(TokenKind::Slash),
                '^' => return make_token(TokenKind::Caret),
                '!' => return make_token(TokenKind::Bang),
                '0'..='9' => {
                    let end = c_onwards
                        .find(|c: char| !c.is_ascii_digit() && c != '.')
                        .unwrap_or(c_onwards.len());
                    let literal = &c_onwards[..end];
                    let extra_byte = literal.len() - c.len_utf8();
                    self.byte += extra_byte;
                    self.rest = &self.rest[extra_byte..];

                    if literal.parse::<f64>().is_err() {
                        return Some(Err(CalcError::syntax(
                            format!("invalid number literal '{literal}'"),
                            offset,
                            literal.len(),
                        )));
                    }

                    return Some(Ok(Token {
                        slice: literal,
                        offset,
                        kind: TokenKind::Number,
                    }));
                }
                c if c.is_alphabetic() => {
                    let end = c_onwards
                        .find(|c: char| !c.is_alphabetic())
                        .unwrap_or(c_onwards.len());
                    let literal = &c_onwards[..end];
                    let extra_byte = literal.len() - c.len_utf8();
                    self.byte += extra_byte;
                    self.rest = &self.rest[extra_byte..];

                    return Some(Ok(Token {
                        slice: literal,
                        offset,
                        kind: TokenKind::Ident,
                    }));
                }
                c if c.is_whitespace() => continue,
                _ => {
                    return Some(Err(CalcError::syntax(
                        format!("unexpected character {c:?}"),
                        offset,
                        c.len_utf8(),
                    )))
                }
            }
        }
    }
}

/// Eagerly lexes a whole expression, stopping at the first bad character.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, CalcError> {
    Lexer::new(input).collect()
}
