//! Expression parser
//!
//! Splits a request line on whitespace and recognizes prefix or infix form.

use crate::error::RequestError;
use super::Operation;

/// Number of tokens in every valid expression
const EXPECTED_TOKENS: usize = 3;

/// A successfully parsed request line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expression {
    pub operation: Operation,
    pub lhs: f64,
    pub rhs: f64,
}

/// Parse one request line into an [`Expression`].
///
/// - fewer than 3 tokens → `BadFormat`, more than 3 → `TooManyArgs`
/// - token 1 is an operation → prefix `OP A B`
/// - otherwise infix `A OP B`: operands are checked before the middle token,
///   so `foo 1 2` is `InvalidNumber` and `1 foo 2` is `UnknownOp`
///
/// A line whose first token is an operation is always prefix, even if it
/// would also read as infix (`ADD ADD 2` fails with `InvalidNumber`).
pub fn parse_expression(line: &str) -> Result<Expression, RequestError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    if tokens.len() < EXPECTED_TOKENS {
        return Err(RequestError::BadFormat);
    }
    if tokens.len() > EXPECTED_TOKENS {
        return Err(RequestError::TooManyArgs);
    }

    let (first, middle, last) = (tokens[0], tokens[1], tokens[2]);

    // Prefix form: OP A B
    if let Some(operation) = Operation::from_token(first) {
        return Ok(Expression {
            operation,
            lhs: parse_operand(middle)?,
            rhs: parse_operand(last)?,
        });
    }

    // Infix form: A OP B
    let lhs = parse_operand(first)?;
    let rhs = parse_operand(last)?;
    let operation =
        Operation::from_token(middle).ok_or_else(|| RequestError::UnknownOp(middle.to_string()))?;

    Ok(Expression { operation, lhs, rhs })
}

fn parse_operand(token: &str) -> Result<f64, RequestError> {
    token
        .parse::<f64>()
        .map_err(|_| RequestError::InvalidNumber(token.to_string()))
}
