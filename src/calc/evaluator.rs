//! Evaluator
//!
//! Applies a parsed expression and renders the result for the wire.

use crate::error::RequestError;
use super::{parse_expression, Expression, Operation};

/// Largest magnitude rendered through `i64` (2^63)
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Evaluate an expression
///
/// Division by exactly `0.0` (either sign) is rejected; there is no epsilon.
pub fn evaluate(expr: &Expression) -> Result<f64, RequestError> {
    let Expression { operation, lhs, rhs } = *expr;

    let value = match operation {
        Operation::Add => lhs + rhs,
        Operation::Subtract => lhs - rhs,
        Operation::Multiply => lhs * rhs,
        Operation::Divide => {
            if rhs == 0.0 {
                return Err(RequestError::DivByZero);
            }
            lhs / rhs
        }
    };

    Ok(value)
}

/// Parse, evaluate and render one line in a single step
pub fn evaluate_line(line: &str) -> Result<String, RequestError> {
    let expr = parse_expression(line)?;
    evaluate(&expr).map(render_value)
}

/// Render a result for the `Value` header.
///
/// Whole numbers print as integers (`30`, not `30.0`); everything else uses
/// the shortest representation that round-trips (`3.5`, `0.1`, `NaN`, `inf`).
pub fn render_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < I64_BOUND {
        // `as` also folds -0.0 into 0
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}
