//! Arithmetic expression evaluator
//!
//! Grammar (standard precedence, left associative):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-') factor | number | '(' expr ')'
//! ```
//!
//! Input is restricted to ASCII digits, `.`, the four operators, parentheses
//! and whitespace. Anything else is rejected up front rather than stripped,
//! so the evaluated expression is always exactly what the caller wrote.

use voice_dispatch_core::ToolError;

/// Nesting limit for parentheses and unary signs
const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
        }
    }
}

/// Evaluate an arithmetic expression to a finite number
pub fn evaluate(expression: &str) -> Result<f64, ToolError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(ToolError::evaluation("expression is empty"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;

    if let Some((token, position)) = parser.peek() {
        return Err(ToolError::evaluation(format!(
            "unexpected {} at position {}",
            token.describe(),
            position
        )));
    }

    if !value.is_finite() {
        return Err(ToolError::evaluation("result is not a finite number"));
    }

    Ok(value)
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ToolError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let token = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value: f64 = literal.parse().map_err(|_| {
                    ToolError::evaluation(format!(
                        "malformed number '{}' at position {}",
                        literal, start
                    ))
                })?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => {
                return Err(ToolError::evaluation(format!(
                    "unsupported character '{}' at position {}",
                    other, i
                )))
            }
        };
        tokens.push((token, i));
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<(Token, usize)> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<f64, ToolError> {
        let mut value = self.term()?;
        while let Some((token, _)) = self.peek() {
            match token {
                Token::Plus => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Token::Minus => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, ToolError> {
        let mut value = self.factor()?;
        while let Some((token, position)) = self.peek() {
            match token {
                Token::Star => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Token::Slash => {
                    self.pos += 1;
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err(ToolError::evaluation(format!(
                            "division by zero at position {}",
                            position
                        )));
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, ToolError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ToolError::evaluation("expression is nested too deeply"));
        }
        let value = self.primary();
        self.depth -= 1;
        value
    }

    fn primary(&mut self) -> Result<f64, ToolError> {
        match self.next() {
            Some((Token::Number(n), _)) => Ok(n),
            Some((Token::Plus, _)) => self.factor(),
            Some((Token::Minus, _)) => Ok(-self.factor()?),
            Some((Token::LParen, position)) => {
                let value = self.expr()?;
                match self.next() {
                    Some((Token::RParen, _)) => Ok(value),
                    Some((token, at)) => Err(ToolError::evaluation(format!(
                        "expected ')' at position {}, found {}",
                        at,
                        token.describe()
                    ))),
                    None => Err(ToolError::evaluation(format!(
                        "missing closing parenthesis for '(' at position {}",
                        position
                    ))),
                }
            }
            Some((token, position)) => Err(ToolError::evaluation(format!(
                "unexpected {} at position {}",
                token.describe(),
                position
            ))),
            None => Err(ToolError::evaluation("unexpected end of expression")),
        }
    }
}
