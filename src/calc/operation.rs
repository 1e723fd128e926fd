//! Operation definitions
//!
//! The closed set of arithmetic operations and their wire tokens.

use std::fmt;

/// An arithmetic operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Token → operation lookup table.
///
/// Mnemonics are stored upper-case; lookups fold ASCII case first.
const TOKEN_TABLE: [(&str, Operation); 8] = [
    ("ADD", Operation::Add),
    ("+", Operation::Add),
    ("SUB", Operation::Subtract),
    ("-", Operation::Subtract),
    ("MUL", Operation::Multiply),
    ("*", Operation::Multiply),
    ("DIV", Operation::Divide),
    ("/", Operation::Divide),
];

impl Operation {
    /// All operations, in table order
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Resolve a token (mnemonic or symbol, any case) to an operation
    pub fn from_token(token: &str) -> Option<Self> {
        TOKEN_TABLE
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(token))
            .map(|&(_, op)| op)
    }

    /// Mnemonic form (`ADD`, `SUB`, ...)
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Operation::Add => "ADD",
            Operation::Subtract => "SUB",
            Operation::Multiply => "MUL",
            Operation::Divide => "DIV",
        }
    }

    /// Symbolic form (`+`, `-`, ...)
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
