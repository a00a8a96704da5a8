//! Arithmetic expression AST, parser and evaluator
//!
//! Script directives carry numeric arguments written as small arithmetic
//! expressions (`32/2`, `x + 1.5`, `-(4*3)`). This grammar is closed: numbers,
//! `+ - * /`, unary minus, parentheses and at most one named variable. Anything
//! else is a parse error, so no script text is ever interpreted beyond that.

/// AST node for directive expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal number
    Const(f64),
    /// Variable reference (the axis being assigned: `x` or `y`)
    Var(String),
    /// Binary operation
    BinOp(Box<Expr>, BinOp, Box<Expr>),
    /// Unary minus
    Neg(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error("unexpected token {0}")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("expression nested deeper than {MAX_DEPTH} levels")]
    TooDeep,

    #[error("expression has more than {MAX_OPERATORS} operators")]
    TooLong,
}

pub type Result<T> = std::result::Result<T, ExprError>;

/// Nesting limit for unary operators and parentheses
pub const MAX_DEPTH: usize = 64;

/// Binary operators allowed in one expression; chains build left-deep trees.
pub const MAX_OPERATORS: usize = 256;

/// Token for lexer
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    LParen,
    RParen,
    Plus,
    Minus,
    Star,
    Slash,
    Other(char),
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Ident(s) => format!("'{s}'"),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Other(c) => format!("'{c}'"),
            Token::Eof => "end of input".into(),
        }
    }
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Token::Eof,
        };

        if c.is_ascii_digit() || c == '.' {
            return self.read_number();
        }

        if c.is_alphabetic() || c == '_' {
            return self.read_ident();
        }

        self.next_char();

        match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            _ => Token::Other(c),
        }
    }

    fn read_number(&mut self) -> Token {
        let start = self.pos;
        let mut seen_dot = false;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.next_char();
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                self.next_char();
            } else {
                break;
            }
        }
        let s = &self.input[start..self.pos];
        match s.parse() {
            Ok(n) => Token::Number(n),
            // A lone "." is not a number
            Err(_) => Token::Other('.'),
        }
    }

    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                self.next_char();
            } else {
                break;
            }
        }
        Token::Ident(self.input[start..self.pos].to_string())
    }
}

/// Recursive descent parser over the closed grammar
///
/// ```text
/// expr    := term (('+' | '-') term)*
/// term    := unary (('*' | '/') unary)*
/// unary   := '-' unary | '+' unary | primary
/// primary := number | ident | '(' expr ')'
/// ```
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    depth: usize,
    operators: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self { lexer, current, depth: 0, operators: 0 }
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn binary(&mut self, left: Expr, op: BinOp, right: Expr) -> Result<Expr> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(ExprError::TooLong);
        }
        Ok(Expr::BinOp(Box::new(left), op, Box::new(right)))
    }

    fn unexpected(&self) -> ExprError {
        match self.current {
            Token::Eof => ExprError::UnexpectedEnd,
            ref other => ExprError::UnexpectedToken(other.describe()),
        }
    }

    /// Parse the full input; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.parse_additive()?;
        if self.current != Token::Eof {
            return Err(self.unexpected());
        }
        Ok(expr)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match &self.current {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(left, op, right)?;
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match &self.current {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = self.binary(left, op, right)?;
        }
        Ok(left)
    }

    /// Every recursive path passes through here, so the depth is tracked once.
    fn parse_unary(&mut self) -> Result<Expr> {
        if self.depth >= MAX_DEPTH {
            return Err(ExprError::TooDeep);
        }
        self.depth += 1;
        let expr = self.parse_unary_inner();
        self.depth -= 1;
        expr
    }

    fn parse_unary_inner(&mut self) -> Result<Expr> {
        match &self.current {
            Token::Minus => {
                self.advance();
                let expr = self.parse_unary()?;
                Ok(Expr::Neg(Box::new(expr)))
            }
            Token::Plus => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.current.clone() {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::Const(n))
            }
            Token::Ident(name) => {
                self.advance();
                Ok(Expr::Var(name))
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_additive()?;
                if self.current != Token::RParen {
                    return Err(self.unexpected());
                }
                self.advance();
                Ok(expr)
            }
            _ => Err(self.unexpected()),
        }
    }
}

impl Expr {
    /// Evaluate with an optional single variable binding.
    pub fn eval(&self, binding: Option<(&str, f64)>) -> Result<f64> {
        match self {
            Expr::Const(n) => Ok(*n),
            Expr::Var(name) => match binding {
                Some((bound, value)) if bound == name => Ok(value),
                _ => Err(ExprError::UnknownVariable(name.clone())),
            },
            Expr::Neg(inner) => Ok(-inner.eval(binding)?),
            Expr::BinOp(lhs, op, rhs) => {
                let a = lhs.eval(binding)?;
                let b = rhs.eval(binding)?;
                match op {
                    BinOp::Add => Ok(a + b),
                    BinOp::Sub => Ok(a - b),
                    BinOp::Mul => Ok(a * b),
                    BinOp::Div => {
                        if b == 0.0 {
                            Err(ExprError::DivisionByZero)
                        } else {
                            Ok(a / b)
                        }
                    }
                }
            }
        }
    }
}

/// Parse an expression string
pub fn parse_expression(input: &str) -> Result<Expr> {
    Parser::new(input).parse()
}

/// Parse and evaluate an expression that references no variables.
pub fn evaluate(input: &str) -> Result<f64> {
    parse_expression(input)?.eval(None)
}

/// Parse and evaluate an expression in which `name` is bound to `value`.
pub fn evaluate_with(input: &str, name: &str, value: f64) -> Result<f64> {
    parse_expression(input)?.eval(Some((name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        let expr = parse_expression("42").unwrap();
        assert_eq!(expr, Expr::Const(42.0));
        assert_eq!(evaluate(".5").unwrap(), 0.5);
        assert_eq!(evaluate("5.").unwrap(), 5.0);
    }

    #[test]
    fn test_precedence() {
        // Should parse as 1 + (2 * 3)
        match parse_expression("1 + 2 * 3").unwrap() {
            Expr::BinOp(_, BinOp::Add, _) => {}
            other => panic!("Expected Add at top level, got {other:?}"),
        }
        assert_eq!(evaluate("1 + 2 * 3").unwrap(), 7.0);
        assert_eq!(evaluate("(1 + 2) * 3").unwrap(), 9.0);
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), 3.0);
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(evaluate("-4").unwrap(), -4.0);
        assert_eq!(evaluate("2 * -(1 + 1)").unwrap(), -4.0);
        assert_eq!(evaluate("--3").unwrap(), 3.0);
    }

    #[test]
    fn test_division_is_real_valued() {
        assert_eq!(evaluate("3/2").unwrap(), 1.5);
        assert_eq!(evaluate("32/2").unwrap(), 16.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("1/0"), Err(ExprError::DivisionByZero));
        assert_eq!(evaluate("1/(2-2)"), Err(ExprError::DivisionByZero));
    }

    #[test]
    fn test_variable_binding() {
        assert_eq!(evaluate_with("x + 2", "x", 10.0).unwrap(), 12.0);
        assert_eq!(evaluate_with("y*2 - 1", "y", 3.0).unwrap(), 5.0);
        assert_eq!(
            evaluate_with("x + 2", "y", 3.0),
            Err(ExprError::UnknownVariable("x".into()))
        );
        assert_eq!(
            evaluate("playerx + 1"),
            Err(ExprError::UnknownVariable("playerx".into()))
        );
    }

    #[test]
    fn test_rejects_outside_grammar() {
        assert!(matches!(evaluate("2 ^ 3"), Err(ExprError::UnexpectedToken(_))));
        assert!(matches!(evaluate("abs(1)"), Err(ExprError::UnexpectedToken(_))));
        assert!(matches!(evaluate("1 2"), Err(ExprError::UnexpectedToken(_))));
        assert_eq!(evaluate(""), Err(ExprError::UnexpectedEnd));
        assert_eq!(evaluate("5-"), Err(ExprError::UnexpectedEnd));
        assert_eq!(evaluate("(1"), Err(ExprError::UnexpectedEnd));
        assert!(evaluate(".").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep_neg = format!("{}1", "-".repeat(100_000));
        assert_eq!(evaluate(&deep_neg), Err(ExprError::TooDeep));

        let deep_parens = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(evaluate(&deep_parens), Err(ExprError::TooDeep));

        let long_chain = format!("1{}", "+1".repeat(100_000));
        assert_eq!(evaluate(&long_chain), Err(ExprError::TooLong));
        assert_eq!(evaluate(&format!("1{}", "*1".repeat(200))).unwrap(), 1.0);

        let shallow = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(evaluate(&shallow).unwrap(), 1.0);
        assert_eq!(evaluate("----2").unwrap(), 2.0);
    }
}
