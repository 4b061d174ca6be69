//! Transpile-time evaluation of pure arithmetic.
//!
//! Accepts the subset of Python expressions built from numerals, `+ - * /`
//! (and therefore `//` and `**`), parentheses and whitespace, and evaluates it
//! with Python's numeric rules so the folded literal prints exactly what the
//! interpreter would have computed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Int(i64),
    Float(f64),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    LParen,
    RParen,
}

/// A Python `int` (bounded) or `float`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Why folding gave up; the caller keeps the original text in every case.
#[derive(Debug, Clone, PartialEq)]
pub enum FoldError {
    Syntax(String),
    DivisionByZero,
    Overflow,
    /// The result has no plain-decimal Python rendering (NaN, inf, exponent form).
    Unrepresentable,
}

impl fmt::Display for FoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoldError::Syntax(msg) => write!(f, "syntax error: {}", msg),
            FoldError::DivisionByZero => write!(f, "division by zero"),
            FoldError::Overflow => write!(f, "integer overflow"),
            FoldError::Unrepresentable => write!(f, "result has no literal form"),
        }
    }
}

impl std::error::Error for FoldError {}

/// True when `expr` only uses characters of the arithmetic grammar.
pub fn is_arithmetic(expr: &str) -> bool {
    expr.chars().any(|c| c.is_ascii_digit())
        && expr
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || "+-*/.()".contains(c))
}

/// Evaluate an arithmetic expression and render the result as Python would.
pub fn fold(expr: &str) -> Result<String, FoldError> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.parse_expr(0)?;
    if parser.pos < parser.tokens.len() {
        return Err(FoldError::Syntax("unexpected trailing tokens".into()));
    }
    render(value)
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

fn tokenize(expr: &str) -> Result<Vec<Token>, FoldError> {
    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                tokens.push(numeral(&text)?);
            }
            '+' => {
                i += 1;
                tokens.push(Token::Plus);
            }
            '-' => {
                i += 1;
                tokens.push(Token::Minus);
            }
            '*' => {
                i += 1;
                if chars.get(i) == Some(&'*') {
                    i += 1;
                    tokens.push(Token::StarStar);
                } else {
                    tokens.push(Token::Star);
                }
            }
            '/' => {
                i += 1;
                if chars.get(i) == Some(&'/') {
                    i += 1;
                    tokens.push(Token::SlashSlash);
                } else {
                    tokens.push(Token::Slash);
                }
            }
            '(' => {
                i += 1;
                tokens.push(Token::LParen);
            }
            ')' => {
                i += 1;
                tokens.push(Token::RParen);
            }
            c => return Err(FoldError::Syntax(format!("unexpected character '{}'", c))),
        }
    }

    Ok(tokens)
}

fn numeral(text: &str) -> Result<Token, FoldError> {
    match text.matches('.').count() {
        0 => {
            if text.len() > 1 && text.starts_with('0') && !text.chars().all(|c| c == '0') {
                return Err(FoldError::Syntax("leading zeros in integer literal".into()));
            }
            text.parse::<i64>()
                .map(Token::Int)
                .map_err(|_| FoldError::Overflow)
        }
        1 if text != "." => text
            .parse::<f64>()
            .map(Token::Float)
            .map_err(|e| FoldError::Syntax(e.to_string())),
        _ => Err(FoldError::Syntax(format!("invalid numeral '{}'", text))),
    }
}

// ---------------------------------------------------------------------------
// Pratt parser, evaluating as it goes
// ---------------------------------------------------------------------------

const BP_ADDITIVE: u8 = 2; // + -
const BP_MULTIPLICATIVE: u8 = 4; // * / //
const BP_UNARY: u8 = 6; // unary + -
const BP_POWER: u8 = 8; // ** (right-assoc)

/// Deepest nesting of parentheses, signs and `**` operands the parser follows.
pub const MAX_DEPTH: usize = 200;

/// Largest integer magnitude that converts to `f64` exactly.
const EXACT_F64_INT: u64 = 1 << 53;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).copied();
        self.pos += 1;
        token
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<Number, FoldError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FoldError::Syntax("nesting too deep".into()));
        }
        let result = self.parse_operators(min_bp);
        self.depth -= 1;
        result
    }

    fn parse_operators(&mut self, min_bp: u8) -> Result<Number, FoldError> {
        let mut left = self.parse_prefix()?;

        while let Some(op) = self.peek() {
            let Some((l_bp, r_bp)) = infix_bp(op) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.pos += 1;
            let right = self.parse_expr(r_bp)?;
            left = apply(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Number, FoldError> {
        match self.advance() {
            Some(Token::Int(n)) => Ok(Number::Int(n)),
            Some(Token::Float(x)) => Ok(Number::Float(x)),
            Some(Token::Minus) => negate(self.parse_expr(BP_UNARY)?),
            Some(Token::Plus) => self.parse_expr(BP_UNARY),
            Some(Token::LParen) => {
                let inner = self.parse_expr(0)?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(FoldError::Syntax("unclosed parenthesis".into())),
                }
            }
            Some(other) => Err(FoldError::Syntax(format!("unexpected {:?}", other))),
            None => Err(FoldError::Syntax("unexpected end of expression".into())),
        }
    }
}

fn infix_bp(token: Token) -> Option<(u8, u8)> {
    match token {
        Token::Plus | Token::Minus => Some((BP_ADDITIVE, BP_ADDITIVE + 1)),
        Token::Star | Token::Slash | Token::SlashSlash => {
            Some((BP_MULTIPLICATIVE, BP_MULTIPLICATIVE + 1))
        }
        // The right operand may carry its own unary sign: 2 ** -1.
        Token::StarStar => Some((BP_POWER, BP_UNARY)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Python numeric semantics
// ---------------------------------------------------------------------------

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }
}

fn negate(n: Number) -> Result<Number, FoldError> {
    match n {
        Number::Int(i) => i.checked_neg().map(Number::Int).ok_or(FoldError::Overflow),
        Number::Float(x) => Ok(Number::Float(-x)),
    }
}

fn apply(op: Token, left: Number, right: Number) -> Result<Number, FoldError> {
    use Number::{Float, Int};

    let result = match (op, left, right) {
        (Token::Plus, Int(a), Int(b)) => Int(a.checked_add(b).ok_or(FoldError::Overflow)?),
        (Token::Minus, Int(a), Int(b)) => Int(a.checked_sub(b).ok_or(FoldError::Overflow)?),
        (Token::Star, Int(a), Int(b)) => Int(a.checked_mul(b).ok_or(FoldError::Overflow)?),
        (Token::Plus, a, b) => Float(a.as_f64() + b.as_f64()),
        (Token::Minus, a, b) => Float(a.as_f64() - b.as_f64()),
        (Token::Star, a, b) => Float(a.as_f64() * b.as_f64()),

        (Token::Slash, Int(a), Int(b)) => {
            if b == 0 {
                return Err(FoldError::DivisionByZero);
            }
            // Python rounds the exact quotient once; that only matches an f64
            // division when both operands are exact in f64.
            if a.unsigned_abs() > EXACT_F64_INT || b.unsigned_abs() > EXACT_F64_INT {
                return Err(FoldError::Unrepresentable);
            }
            Float(a as f64 / b as f64)
        }
        (Token::Slash, a, b) => {
            if b.as_f64() == 0.0 {
                return Err(FoldError::DivisionByZero);
            }
            Float(a.as_f64() / b.as_f64())
        }

        (Token::SlashSlash, Int(a), Int(b)) => {
            if b == 0 {
                return Err(FoldError::DivisionByZero);
            }
            let q = a.checked_div(b).ok_or(FoldError::Overflow)?;
            if a % b != 0 && ((a < 0) != (b < 0)) {
                Int(q - 1)
            } else {
                Int(q)
            }
        }
        (Token::SlashSlash, a, b) => {
            if b.as_f64() == 0.0 {
                return Err(FoldError::DivisionByZero);
            }
            Float(float_floor_div(a.as_f64(), b.as_f64()))
        }

        (Token::StarStar, Int(a), Int(b)) if b >= 0 => {
            let exp = u32::try_from(b).map_err(|_| FoldError::Overflow)?;
            Int(a.checked_pow(exp).ok_or(FoldError::Overflow)?)
        }
        (Token::StarStar, a, b) => {
            let (a, b) = (a.as_f64(), b.as_f64());
            if a == 0.0 && b < 0.0 {
                return Err(FoldError::DivisionByZero);
            }
            Float(a.powf(b))
        }

        _ => return Err(FoldError::Syntax(format!("unexpected operator {:?}", op))),
    };

    match result {
        Float(x) if !x.is_finite() => Err(FoldError::Unrepresentable),
        other => Ok(other),
    }
}

/// Python's float `//`: derived from `fmod` rather than from `a / b`, whose
/// rounding can land on the wrong side of an integer.
fn float_floor_div(a: f64, b: f64) -> f64 {
    let m = a % b;
    let mut div = (a - m) / b;
    if m != 0.0 && (b < 0.0) != (m < 0.0) {
        div -= 1.0;
    }
    if div == 0.0 {
        return 0.0_f64.copysign(a / b);
    }
    let floor = div.floor();
    if div - floor > 0.5 { floor + 1.0 } else { floor }
}

/// Render a value the way Python's `repr` does, refusing exponent notation.
fn render(value: Number) -> Result<String, FoldError> {
    match value {
        Number::Int(n) => Ok(n.to_string()),
        Number::Float(x) => {
            let magnitude = x.abs();
            if !x.is_finite() || magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
                return Err(FoldError::Unrepresentable);
            }
            let text = x.to_string();
            if text.contains('.') {
                Ok(text)
            } else {
                Ok(format!("{}.0", text))
            }
        }
    }
}
