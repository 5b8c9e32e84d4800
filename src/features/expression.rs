//! Arithmetic expression evaluation
//!
//! The formula resolver hands every expression whose cell references have
//! already been substituted to an [`ExpressionEvaluator`]. The crate ships
//! [`MathEvaluator`], which converts the infix expression to postfix with the
//! shunting-yard algorithm and evaluates the postfix sequence on a value stack.
//!
//! Supported syntax:
//!
//! - numbers: `12`, `1.5`, `.5`
//! - operators: `+ - * / % ^` with the usual precedence, `^` right associative
//! - unary `-` and `+` (`-2^2` is `-4`, `2^-1` is `0.5`)
//! - parentheses and function calls with comma separated arguments
//! - constants `pi` and `e`
//!
//! ```rust
//! use gridmark::features::expression::{ExpressionEvaluator, MathEvaluator};
//!
//! let eval = MathEvaluator::new();
//! assert_eq!(eval.evaluate("1+2*3").unwrap(), "7");
//! assert_eq!(eval.evaluate("sum(1,2,3)/2").unwrap(), "3");
//! ```

use std::fmt;

use crate::data::constants::RESULT_SIGNIFICANT_DIGITS;
use crate::data::functions::{lookup_constant, lookup_function, MathFunction};

/// Evaluates a reference-free arithmetic expression
pub trait ExpressionEvaluator {
    /// Evaluate `expression` and return the result as text
    fn evaluate(&self, expression: &str) -> Result<String, ExpressionError>;
}

impl<F> ExpressionEvaluator for F
where
    F: Fn(&str) -> Result<String, ExpressionError>,
{
    fn evaluate(&self, expression: &str) -> Result<String, ExpressionError> {
        self(expression)
    }
}

/// Reasons an expression cannot be evaluated
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionError {
    Empty,
    DivisionByZero,
    UndefinedVariable(String),
    UnknownFunction(String),
    WrongArgumentCount { function: String, given: usize },
    MismatchedParentheses,
    UnexpectedToken(String),
    Syntax,
    NotFinite,
    /// Reason reported by a custom evaluator
    Other(String),
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionError::Empty => write!(f, "empty expression"),
            ExpressionError::DivisionByZero => write!(f, "division by zero"),
            ExpressionError::UndefinedVariable(name) => {
                write!(f, "undefined variable '{}'", name)
            }
            ExpressionError::UnknownFunction(name) => write!(f, "unknown function '{}'", name),
            ExpressionError::WrongArgumentCount { function, given } => write!(
                f,
                "wrong number of arguments ({} given) for function '{}'",
                given, function
            ),
            ExpressionError::MismatchedParentheses => write!(f, "mismatched parentheses"),
            ExpressionError::UnexpectedToken(token) => write!(f, "unexpected '{}'", token),
            ExpressionError::Syntax => write!(f, "syntax error"),
            ExpressionError::NotFinite => write!(f, "result is not a finite number"),
            ExpressionError::Other(reason) => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for ExpressionError {}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
    Comma,
}

/// Postfix instruction
#[derive(Debug, Clone, Copy, PartialEq)]
enum Item {
    Number(f64),
    Binary(char),
    Negate,
    Call(MathFunction, usize),
}

/// Operator stack entry during infix to postfix conversion
#[derive(Debug, Clone, Copy, PartialEq)]
enum Pending {
    Binary(char),
    Negate,
    LParen,
    Function(MathFunction),
}

const NEGATE_PRECEDENCE: u8 = 3;

fn precedence(op: char) -> u8 {
    match op {
        '+' | '-' => 1,
        '*' | '/' | '%' => 2,
        '^' => 4,
        _ => 0,
    }
}

fn is_right_associative(op: char) -> bool {
    op == '^'
}

/// Default evaluator: shunting-yard conversion plus stack evaluation
#[derive(Debug, Clone, Copy, Default)]
pub struct MathEvaluator;

impl MathEvaluator {
    pub fn new() -> Self {
        MathEvaluator
    }

    /// Evaluate to a number without formatting
    pub fn evaluate_number(&self, expression: &str) -> Result<f64, ExpressionError> {
        let tokens = tokenize(expression)?;
        let postfix = to_postfix(tokens)?;
        let value = eval_postfix(&postfix)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ExpressionError::NotFinite)
        }
    }
}

impl ExpressionEvaluator for MathEvaluator {
    fn evaluate(&self, expression: &str) -> Result<String, ExpressionError> {
        self.evaluate_number(expression).map(format_number)
    }
}

/// Format a result with 14 significant digits and no trailing fraction zeros
pub fn format_number(value: f64) -> String {
    let rounded = format!("{:.*e}", RESULT_SIGNIFICANT_DIGITS - 1, value)
        .parse::<f64>()
        .unwrap_or(value);
    if rounded == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{}", rounded)
}

fn tokenize(expression: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = expression.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ExpressionError::UnexpectedToken(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' {
                        name.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push(Token::Op(c));
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            ',' => {
                tokens.push(Token::Comma);
                chars.next();
            }
            other => return Err(ExpressionError::UnexpectedToken(other.to_string())),
        }
    }

    Ok(tokens)
}

fn pending_to_item(pending: Pending) -> Result<Item, ExpressionError> {
    match pending {
        Pending::Binary(op) => Ok(Item::Binary(op)),
        Pending::Negate => Ok(Item::Negate),
        Pending::LParen | Pending::Function(_) => Err(ExpressionError::MismatchedParentheses),
    }
}

/// Shunting-yard conversion with argument counting for function calls
fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Item>, ExpressionError> {
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }

    let mut output = Vec::new();
    let mut stack: Vec<Pending> = Vec::new();
    // one counter per open function call
    let mut arg_counts: Vec<usize> = Vec::new();
    let mut expect_operand = true;
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        match token {
            Token::Number(value) => {
                if !expect_operand {
                    return Err(ExpressionError::UnexpectedToken(format_number(value)));
                }
                output.push(Item::Number(value));
                expect_operand = false;
            }
            Token::Ident(name) => {
                if !expect_operand {
                    return Err(ExpressionError::UnexpectedToken(name));
                }
                if tokens.peek() == Some(&Token::LParen) {
                    let function = lookup_function(&name)
                        .ok_or_else(|| ExpressionError::UnknownFunction(name.to_lowercase()))?;
                    tokens.next();
                    stack.push(Pending::Function(function));
                    stack.push(Pending::LParen);
                    let first = if tokens.peek() == Some(&Token::RParen) {
                        0
                    } else {
                        1
                    };
                    arg_counts.push(first);
                    expect_operand = true;
                } else {
                    let value = lookup_constant(&name)
                        .ok_or_else(|| ExpressionError::UndefinedVariable(name.clone()))?;
                    output.push(Item::Number(value));
                    expect_operand = false;
                }
            }
            Token::Op(op) => {
                if expect_operand {
                    match op {
                        '-' => stack.push(Pending::Negate),
                        '+' => {}
                        _ => return Err(ExpressionError::UnexpectedToken(op.to_string())),
                    }
                    continue;
                }

                let incoming = precedence(op);
                while let Some(&top) = stack.last() {
                    let pop = match top {
                        Pending::Binary(other) => {
                            let existing = precedence(other);
                            existing > incoming
                                || (existing == incoming && !is_right_associative(op))
                        }
                        Pending::Negate => NEGATE_PRECEDENCE > incoming,
                        Pending::LParen | Pending::Function(_) => false,
                    };
                    if !pop {
                        break;
                    }
                    if let Some(pending) = stack.pop() {
                        output.push(pending_to_item(pending)?);
                    }
                }
                stack.push(Pending::Binary(op));
                expect_operand = true;
            }
            Token::LParen => {
                if !expect_operand {
                    return Err(ExpressionError::UnexpectedToken("(".to_string()));
                }
                stack.push(Pending::LParen);
            }
            Token::Comma => {
                if expect_operand || !stack.contains(&Pending::LParen) {
                    return Err(ExpressionError::UnexpectedToken(",".to_string()));
                }
                pop_until_paren(&mut stack, &mut output)?;
                let in_call = stack.len() >= 2
                    && matches!(stack[stack.len() - 2], Pending::Function(_));
                match arg_counts.last_mut() {
                    Some(count) if in_call => *count += 1,
                    _ => return Err(ExpressionError::UnexpectedToken(",".to_string())),
                }
                expect_operand = true;
            }
            Token::RParen => {
                let empty_call =
                    stack.last() == Some(&Pending::LParen) && arg_counts.last() == Some(&0);
                if expect_operand && !empty_call {
                    return Err(ExpressionError::UnexpectedToken(")".to_string()));
                }
                pop_until_paren(&mut stack, &mut output)?;
                stack.pop();
                if let Some(Pending::Function(function)) = stack.last().copied() {
                    stack.pop();
                    let count = arg_counts
                        .pop()
                        .ok_or(ExpressionError::MismatchedParentheses)?;
                    output.push(Item::Call(function, count));
                }
                expect_operand = false;
            }
        }
    }

    if expect_operand {
        return Err(ExpressionError::Syntax);
    }

    while let Some(pending) = stack.pop() {
        output.push(pending_to_item(pending)?);
    }

    Ok(output)
}

/// Move operators to the output until an opening parenthesis is on top
fn pop_until_paren(stack: &mut Vec<Pending>, output: &mut Vec<Item>) -> Result<(), ExpressionError> {
    loop {
        match stack.last() {
            Some(Pending::LParen) => return Ok(()),
            Some(_) => {
                if let Some(pending) = stack.pop() {
                    output.push(pending_to_item(pending)?);
                }
            }
            None => return Err(ExpressionError::MismatchedParentheses),
        }
    }
}

fn eval_postfix(items: &[Item]) -> Result<f64, ExpressionError> {
    let mut values: Vec<f64> = Vec::new();

    for item in items {
        match *item {
            Item::Number(value) => values.push(value),
            Item::Negate => {
                let value = values.pop().ok_or(ExpressionError::Syntax)?;
                values.push(-value);
            }
            Item::Binary(op) => {
                let right = values.pop().ok_or(ExpressionError::Syntax)?;
                let left = values.pop().ok_or(ExpressionError::Syntax)?;
                values.push(apply_binary(op, left, right)?);
            }
            Item::Call(function, count) => {
                if !function.arity().accepts(count) {
                    return Err(ExpressionError::WrongArgumentCount {
                        function: format!("{:?}", function).to_lowercase(),
                        given: count,
                    });
                }
                if values.len() < count {
                    return Err(ExpressionError::Syntax);
                }
                let args = values.split_off(values.len() - count);
                values.push(apply_function(function, &args)?);
            }
        }
    }

    match values.as_slice() {
        [value] => Ok(*value),
        _ => Err(ExpressionError::Syntax),
    }
}

fn apply_binary(op: char, left: f64, right: f64) -> Result<f64, ExpressionError> {
    match op {
        '+' => Ok(left + right),
        '-' => Ok(left - right),
        '*' => Ok(left * right),
        '/' | '%' if right == 0.0 => Err(ExpressionError::DivisionByZero),
        '/' => Ok(left / right),
        '%' => Ok(left % right),
        '^' => Ok(left.powf(right)),
        other => Err(ExpressionError::UnexpectedToken(other.to_string())),
    }
}

fn apply_function(function: MathFunction, args: &[f64]) -> Result<f64, ExpressionError> {
    use MathFunction::*;

    let first = args.first().copied().unwrap_or(0.0);
    let second = args.get(1).copied();

    let value = match function {
        Sum => args.iter().sum(),
        Product => args.iter().product(),
        Average => args.iter().sum::<f64>() / args.len() as f64,
        Median => {
            let mut sorted = args.to_vec();
            sorted.sort_by(f64::total_cmp);
            let mid = sorted.len() / 2;
            if sorted.len() % 2 == 0 {
                (sorted[mid - 1] + sorted[mid]) / 2.0
            } else {
                sorted[mid]
            }
        }
        Range => max_of(args) - min_of(args),
        Min => min_of(args),
        Max => max_of(args),
        Counta => args.len() as f64,
        Mod => {
            let divisor = second.unwrap_or(0.0);
            if divisor == 0.0 {
                return Err(ExpressionError::DivisionByZero);
            }
            first % divisor
        }
        Power => first.powf(second.unwrap_or(1.0)),
        Round => {
            let places = second.unwrap_or(0.0).trunc();
            let factor = 10f64.powf(places);
            (first * factor).round() / factor
        }
        Abs => first.abs(),
        Sqrt => first.sqrt(),
        Exp => first.exp(),
        Ln => first.ln(),
        Log => match second {
            Some(base) => first.log(base),
            None => first.log10(),
        },
        Floor => first.floor(),
        Ceil => first.ceil(),
        Sin => first.sin(),
        Cos => first.cos(),
        Tan => first.tan(),
        Asin => first.asin(),
        Acos => first.acos(),
        Atan => first.atan(),
        Atan2 => first.atan2(second.unwrap_or(1.0)),
        Pi => std::f64::consts::PI,
    };

    Ok(value)
}

fn min_of(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max_of(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
