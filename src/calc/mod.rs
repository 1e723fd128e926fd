//! Calc Module
//!
//! Turns one request line into a number.
//!
//! ## Pipeline
//! ```text
//! "10 + 20" ──► parse_expression ──► Expression { Add, 10.0, 20.0 }
//!                                          │
//!                                          ▼
//!                                      evaluate ──► 30.0 ──► render_value ──► "30"
//! ```
//!
//! ## Accepted Forms
//! - Prefix: `OP A B`   (e.g. `ADD 10 20`, `/ 9 3`)
//! - Infix:  `A OP B`   (e.g. `10 + 20`, `9 div 3`)
//!
//! Operation tokens are case-insensitive. Prefix is tried first.

mod operation;
mod parser;
mod evaluator;

pub use operation::Operation;
pub use parser::{parse_expression, Expression};
pub use evaluator::{evaluate, evaluate_line, render_value};
