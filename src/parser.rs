use crate::{
    error::CalcError,
    functions::{self, Function},
    lexer::{Token, TokenKind},
    Lexer,
};

// Bound on expression nesting, so pathological input (thousands of
// opening parentheses) cannot blow the call stack.
const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Neg,
    Fact,
    Deg,
    Rad,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                UnaryOp::Neg => "-",
                UnaryOp::Fact => "!",
                UnaryOp::Deg => "deg",
                UnaryOp::Rad => "rad",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BinOp::Add => "+",
                BinOp::Sub => "-",
                BinOp::Mul => "*",
                BinOp::Div => "/",
                BinOp::Pow => "^",
            }
        )
    }
}

/// A parsed expression. Function names and arities are already checked
/// against the catalogue, so evaluation never revisits either.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(f64),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(Function, Vec<Expr>),
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(n) => write!(f, "{n}"),
            Expr::Unary(UnaryOp::Fact, operand) => write!(f, "({operand}!)"),
            Expr::Unary(UnaryOp::Neg, operand) => write!(f, "(-{operand})"),
            Expr::Unary(op, operand) => write!(f, "({op} {operand})"),
            Expr::Binary(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
            Expr::Call(function, args) => {
                write!(f, "{function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Precedence-climbing parser over the token stream.
///
/// Binding strength, tightest first: factorial postfix `!`, power `^`
/// (right-associative), unary prefix (`-`, `deg`, `rad`), `*`/`/`,
/// `+`/`-`. A `deg` or `rad` identifier doubles as a prefix operator
/// when no `(` follows it, so `sin(deg 90)` works.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    end: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            end: input.len(),
        }
    }

    /// Consumes the whole input: exactly one tree or exactly one error.
    pub fn parse(&mut self) -> Result<Expr, CalcError> {
        let expr = self.parse_additive(0)?;
        match self.lexer.next() {
            None => Ok(expr),
            Some(Ok(token)) => Err(CalcError::syntax(
                format!("trailing input '{}' after expression", token.slice),
                token.offset,
                token.slice.len(),
            )),
            Some(Err(err)) => Err(err),
        }
    }

    fn peek_token(&mut self) -> Option<Token<'a>> {
        match self.lexer.peek() {
            Some(Ok(token)) => Some(*token),
            _ => None,
        }
    }

    fn peek_kind(&mut self) -> Option<TokenKind> {
        self.peek_token().map(|token| token.kind)
    }

    fn check_depth(&mut self, depth: usize) -> Result<(), CalcError> {
        if depth > MAX_DEPTH {
            let offset = self.peek_token().map_or(self.end, |token| token.offset);
            return Err(CalcError::syntax("expression nested too deeply", offset, 0));
        }
        Ok(())
    }

    fn eof_error(&self, message: &str) -> CalcError {
        CalcError::syntax(message, self.end, 0)
    }

    fn parse_additive(&mut self, depth: usize) -> Result<Expr, CalcError> {
        self.check_depth(depth)?;
        let mut lhs = self.parse_multiplicative(depth)?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => break,
            };
            self.lexer.next();
            let rhs = self.parse_multiplicative(depth)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self, depth: usize) -> Result<Expr, CalcError> {
        let mut lhs = self.parse_unary(depth)?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                _ => break,
            };
            self.lexer.next();
            let rhs = self.parse_unary(depth)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self, depth: usize) -> Result<Expr, CalcError> {
        self.check_depth(depth)?;
        match self.peek_token() {
            Some(token) if token.kind == TokenKind::Minus => {
                self.lexer.next();
                let operand = self.parse_unary(depth + 1)?;
                Ok(Expr::Unary(UnaryOp::Neg, Box::new(operand)))
            }
            Some(token)
                if token.kind == TokenKind::Ident && matches!(token.slice, "deg" | "rad") =>
            {
                self.lexer.next();
                if self.peek_kind() == Some(TokenKind::LeftParen) {
                    // Ordinary call form, deg(x) / rad(x).
                    let call = self.parse_call(token, depth)?;
                    self.parse_power_tail(call, depth)
                } else {
                    let op = if token.slice == "deg" {
                        UnaryOp::Deg
                    } else {
                        UnaryOp::Rad
                    };
                    let operand = self.parse_unary(depth + 1)?;
                    Ok(Expr::Unary(op, Box::new(operand)))
                }
            }
            _ => {
                let primary = self.parse_primary(depth)?;
                self.parse_power_tail(primary, depth)
            }
        }
    }

    // Postfix `!` binds tighter than `^`; the exponent re-enters the
    // unary tier, which makes `^` right-associative and lets `2 ^ -3`
    // parse.
    fn parse_power_tail(&mut self, mut expr: Expr, depth: usize) -> Result<Expr, CalcError> {
        while self.peek_kind() == Some(TokenKind::Bang) {
            self.lexer.next();
            expr = Expr::Unary(UnaryOp::Fact, Box::new(expr));
        }
        if self.peek_kind() == Some(TokenKind::Caret) {
            self.lexer.next();
            let exponent = self.parse_unary(depth + 1)?;
            expr = Expr::Binary(BinOp::Pow, Box::new(expr), Box::new(exponent));
        }
        Ok(expr)
    }

    fn parse_primary(&mut self, depth: usize) -> Result<Expr, CalcError> {
        match self.lexer.next() {
            Some(Ok(token)) if token.kind == TokenKind::Number => {
                let value = token.slice.parse::<f64>().map_err(|_| {
                    CalcError::syntax(
                        format!("invalid number literal '{}'", token.slice),
                        token.offset,
                        token.slice.len(),
                    )
                })?;
                Ok(Expr::Literal(value))
            }
            Some(Ok(token)) if token.kind == TokenKind::Ident => {
                if self.peek_kind() == Some(TokenKind::LeftParen) {
                    return self.parse_call(token, depth);
                }
                if let Some(value) = functions::constant(token.slice) {
                    return Ok(Expr::Literal(value));
                }
                if functions::lookup(token.slice).is_some() {
                    return Err(CalcError::syntax(
                        format!("expected '(' after function name '{}'", token.slice),
                        token.offset,
                        token.slice.len(),
                    ));
                }
                Err(CalcError::UnknownFunction {
                    name: token.slice.to_string(),
                    span: (token.offset, token.slice.len()).into(),
                })
            }
            Some(Ok(token)) if token.kind == TokenKind::LeftParen => {
                let expr = self.parse_additive(depth + 1)?;
                match self.lexer.next() {
                    Some(Ok(token)) if token.kind == TokenKind::RightParen => Ok(expr),
                    Some(Ok(token)) => Err(CalcError::syntax(
                        format!("expected ')', found '{}'", token.slice),
                        token.offset,
                        token.slice.len(),
                    )),
                    Some(Err(err)) => Err(err),
                    None => Err(self.eof_error("unclosed parenthesis")),
                }
            }
            Some(Ok(token)) => Err(CalcError::syntax(
                format!("expected an expression, found '{}'", token.slice),
                token.offset,
                token.slice.len(),
            )),
            Some(Err(err)) => Err(err),
            None => Err(self.eof_error("unexpected end of input")),
        }
    }

    // Caller has consumed the name and peeked the `(`.
    fn parse_call(&mut self, name: Token<'a>, depth: usize) -> Result<Expr, CalcError> {
        self.lexer.next();

        let Some((function, arity)) = functions::lookup(name.slice) else {
            return Err(CalcError::UnknownFunction {
                name: name.slice.to_string(),
                span: (name.offset, name.slice.len()).into(),
            });
        };

        let mut args = Vec::new();
        if self.peek_kind() == Some(TokenKind::RightParen) {
            self.lexer.next();
        } else {
            loop {
                args.push(self.parse_additive(depth + 1)?);
                match self.lexer.next() {
                    Some(Ok(token)) if token.kind == TokenKind::Comma => continue,
                    Some(Ok(token)) if token.kind == TokenKind::RightParen => break,
                    Some(Ok(token)) => {
                        return Err(CalcError::syntax(
                            format!("expected ',' or ')', found '{}'", token.slice),
                            token.offset,
                            token.slice.len(),
                        ))
                    }
                    Some(Err(err)) => return Err(err),
                    None => return Err(self.eof_error("unclosed argument list")),
                }
            }
        }

        if args.len() != arity {
            return Err(CalcError::ArityMismatch {
                name: name.slice.to_string(),
                expected: arity,
                got: args.len(),
                span: (name.offset, name.slice.len()).into(),
            });
        }

        Ok(Expr::Call(function, args))
    }
}
