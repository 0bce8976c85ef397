//! a module turns a String expression into a symbolic expression
//!
//! Two passes: `tokenize` turns the text into tokens (constants are folded into numbers,
//! identifiers are resolved to functions or variables right away, a minus is marked unary
//! when nothing it could subtract from precedes it), then the shunting-yard pass reorders
//! the tokens into postfix and a stack machine reduces them into an `Expr`.
//!
//! precedence table
//!   | operator      | precedence | associativity |
//!   |---------------|------------|---------------|
//!   | +  -          | 1          | left          |
//!   | *  /          | 2          | left          |
//!   | ^             | 3          | right         |
//!   | unary -       | 4          | right         |
//!   | f(...)        | binds to the parenthesized argument that follows it |
//!
//!# Example
//! ```
//! use RustedODE::symbolic::symbolic_engine::Expr;
//! let parsed_expression = Expr::parse_expression("-x^2 + 2*pi").unwrap();
//! println!(" parsed_expression {}", parsed_expression);
//! assert!(Expr::parse_expression("x +").is_err());
//! ```
use crate::symbolic::symbolic_engine::{DEPENDENT_VAR, Expr, Function, INDEPENDENT_VAR};
use crate::symbolic::symbolic_errors::ParseError;
use log::debug;
use std::str::FromStr;

/// deepest expression tree the parser accepts
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Var(String),
    Func(Function),
    /// binary operator: one of + - * / ^
    Op(char),
    /// unary minus
    Neg,
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Var(name) => name.clone(),
            Token::Func(f) => f.to_string(),
            Token::Op(op) => op.to_string(),
            Token::Neg => "-".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Comma => ",".to_string(),
        }
    }
}

fn binary_precedence(op: char) -> u8 {
    match op {
        '+' | '-' => 1,
        '*' | '/' => 2,
        _ => 3,
    }
}

const NEG_PRECEDENCE: u8 = 4;

fn is_right_associative(op: char) -> bool {
    op == '^'
}

/// a minus is unary at the start of input and after an operator, `(` or `,`
fn minus_is_unary(previous: Option<&Token>) -> bool {
    matches!(
        previous,
        None | Some(Token::Op(_)) | Some(Token::Neg) | Some(Token::LParen) | Some(Token::Comma)
    )
}

fn resolve_identifier(ident: &str) -> Result<Token, ParseError> {
    let lower = ident.to_ascii_lowercase();
    match lower.as_str() {
        "pi" => return Ok(Token::Number(std::f64::consts::PI)),
        "e" => return Ok(Token::Number(std::f64::consts::E)),
        INDEPENDENT_VAR | DEPENDENT_VAR => return Ok(Token::Var(lower)),
        _ => {}
    }
    Function::from_str(&lower)
        .map(Token::Func)
        .map_err(|_| ParseError::UnknownIdentifier(ident.to_string()))
}

/// Splits the input into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens: Vec<Token> = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let literal: String = chars[start..i].iter().collect();
            if literal.matches('.').count() > 1 {
                return Err(ParseError::MalformedNumber(literal));
            }
            let value = literal
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| ParseError::MalformedNumber(literal.clone()))?;
            tokens.push(Token::Number(value));
            continue;
        }
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let ident: String = chars[start..i].iter().collect();
            tokens.push(resolve_identifier(&ident)?);
            continue;
        }
        let token = match c {
            '-' | '−' => {
                if minus_is_unary(tokens.last()) {
                    Token::Neg
                } else {
                    Token::Op('-')
                }
            }
            '+' => Token::Op('+'),
            '*' | '×' | '·' => Token::Op('*'),
            '/' | '÷' => Token::Op('/'),
            '^' => Token::Op('^'),
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            'π' => Token::Number(std::f64::consts::PI),
            _ => return Err(ParseError::InvalidCharacter { ch: c, pos: i }),
        };
        tokens.push(token);
        i += 1;
    }
    Ok(tokens)
}

/// Shunting-yard: infix tokens to postfix.
fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token> = Vec::new();
    let mut previous: Option<Token> = None;
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        match &token {
            Token::Number(_) | Token::Var(_) => output.push(token.clone()),
            Token::Func(function) => {
                if iter.peek() != Some(&Token::LParen) {
                    return Err(ParseError::FunctionArity(function.to_string()));
                }
                operators.push(token.clone());
            }
            Token::Neg | Token::LParen => operators.push(token.clone()),
            Token::Op(op) => {
                let prec = binary_precedence(*op);
                while let Some(top) = operators.last() {
                    let top_prec = match top {
                        Token::Op(top_op) => binary_precedence(*top_op),
                        Token::Neg => NEG_PRECEDENCE,
                        _ => break,
                    };
                    if top_prec > prec || (top_prec == prec && !is_right_associative(*op)) {
                        if let Some(popped) = operators.pop() {
                            output.push(popped);
                        }
                    } else {
                        break;
                    }
                }
                operators.push(token.clone());
            }
            Token::Comma => {
                pop_until_paren(&mut operators, &mut output)?;
                // every known function takes exactly one argument
                let below_paren = operators.len().checked_sub(2).map(|i| &operators[i]);
                return Err(match below_paren {
                    Some(Token::Func(function)) => ParseError::FunctionArity(function.to_string()),
                    _ => ParseError::NotSingleExpression,
                });
            }
            Token::RParen => {
                if previous == Some(Token::LParen) {
                    let below = operators.len().checked_sub(2).map(|i| &operators[i]);
                    return Err(match below {
                        Some(Token::Func(function)) => {
                            ParseError::FunctionArity(function.to_string())
                        }
                        _ => ParseError::MissingOperand("()".to_string()),
                    });
                }
                pop_until_paren(&mut operators, &mut output)?;
                operators.pop();
                if let Some(Token::Func(_)) = operators.last() {
                    if let Some(function) = operators.pop() {
                        output.push(function);
                    }
                }
            }
        }
        previous = Some(token);
    }
    while let Some(top) = operators.pop() {
        if top == Token::LParen {
            return Err(ParseError::MismatchedParentheses);
        }
        output.push(top);
    }
    Ok(output)
}

/// moves operators to the output until a `(` is on top of the stack, the `(` stays
fn pop_until_paren(operators: &mut Vec<Token>, output: &mut Vec<Token>) -> Result<(), ParseError> {
    loop {
        match operators.last() {
            None => return Err(ParseError::MismatchedParentheses),
            Some(Token::LParen) => return Ok(()),
            Some(_) => {
                if let Some(top) = operators.pop() {
                    output.push(top);
                }
            }
        }
    }
}

/// Stack machine: postfix tokens to a tree. Depth is tracked per stack entry, so the
/// bound is enforced without recursion.
fn reduce_postfix(postfix: Vec<Token>) -> Result<Expr, ParseError> {
    let mut stack: Vec<(Expr, usize)> = Vec::new();
    for token in postfix {
        let (node, depth) = match token {
            Token::Number(value) => (Expr::Const(value), 1),
            Token::Var(name) => (Expr::Var(name), 1),
            Token::Neg => {
                let (arg, depth) = stack
                    .pop()
                    .ok_or_else(|| ParseError::MissingOperand("-".to_string()))?;
                (Expr::Neg(arg.boxed()), depth + 1)
            }
            Token::Func(function) => {
                let (arg, depth) = stack
                    .pop()
                    .ok_or_else(|| ParseError::FunctionArity(function.to_string()))?;
                (Expr::Func(function, arg.boxed()), depth + 1)
            }
            Token::Op(op) => {
                let missing = || ParseError::MissingOperand(op.to_string());
                let (right, right_depth) = stack.pop().ok_or_else(missing)?;
                let (left, left_depth) = stack.pop().ok_or_else(missing)?;
                let (left, right) = (left.boxed(), right.boxed());
                let node = match op {
                    '+' => Expr::Add(left, right),
                    '-' => Expr::Sub(left, right),
                    '*' => Expr::Mul(left, right),
                    '/' => Expr::Div(left, right),
                    _ => Expr::Pow(left, right),
                };
                (node, left_depth.max(right_depth) + 1)
            }
            other => return Err(ParseError::MissingOperand(other.describe())),
        };
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep(MAX_DEPTH));
        }
        stack.push((node, depth));
    }
    match stack.len() {
        1 => stack
            .pop()
            .map(|(expr, _)| expr)
            .ok_or(ParseError::NotSingleExpression),
        _ => Err(ParseError::NotSingleExpression),
    }
}

/// Parses `input` into a simplified expression.
pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let tokens = tokenize(input)?;
    let postfix = to_postfix(tokens)?;
    let expr = reduce_postfix(postfix)?;
    debug!("parsed '{}' into {}", input.trim(), expr);
    Ok(expr.simplify())
}

impl Expr {
    /// Parses a string into a simplified symbolic expression.
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        parse_expression(input)
    }
}
