//! Error types for calcd
//!
//! Two layers of errors live here:
//! - [`CalcError`]: transport, protocol and configuration failures. These end
//!   a session (or stop the server) and are logged, never sent to a client.
//! - [`RequestError`]: everything that can go wrong with a single request
//!   line. These always turn into an ERROR response and the session goes on.

use thiserror::Error;

/// Result type alias using CalcError
pub type Result<T> = std::result::Result<T, CalcError>;

/// Unified error type for calcd operations
#[derive(Debug, Error)]
pub enum CalcError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a single request line could not be answered with a value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    // -------------------------------------------------------------------------
    // Malformed input (parser)
    // -------------------------------------------------------------------------
    #[error("expected 3 tokens, got fewer")]
    BadFormat,

    #[error("expected 3 tokens, got more")]
    TooManyArgs,

    #[error("not a number: {0:?}")]
    InvalidNumber(String),

    #[error("unknown operation token: {0:?}")]
    UnknownOp(String),

    #[error("line longer than {0} bytes")]
    LineTooLong(usize),

    // -------------------------------------------------------------------------
    // Semantically invalid (evaluator)
    // -------------------------------------------------------------------------
    #[error("division by zero")]
    DivByZero,

    // -------------------------------------------------------------------------
    // Internal failure
    // -------------------------------------------------------------------------
    #[error("internal error: {0}")]
    Internal(String),
}

impl RequestError {
    /// Numeric status placed on the response status line
    pub fn status(&self) -> u16 {
        match self {
            RequestError::BadFormat
            | RequestError::TooManyArgs
            | RequestError::InvalidNumber(_)
            | RequestError::LineTooLong(_) => 400,
            RequestError::UnknownOp(_) => 404,
            RequestError::DivByZero => 422,
            RequestError::Internal(_) => 500,
        }
    }

    /// Reason phrase paired with [`status`](Self::status)
    pub fn reason(&self) -> &'static str {
        match self {
            RequestError::BadFormat
            | RequestError::TooManyArgs
            | RequestError::InvalidNumber(_)
            | RequestError::LineTooLong(_) => "BadRequest",
            RequestError::UnknownOp(_) => "UnknownOperation",
            RequestError::DivByZero => "InvalidOperation",
            RequestError::Internal(_) => "ServerError",
        }
    }

    /// Machine-readable code for the `Error-Code` header
    pub fn code(&self) -> &'static str {
        match self {
            RequestError::BadFormat | RequestError::LineTooLong(_) => "BAD_FORMAT",
            RequestError::TooManyArgs => "TOO_MANY_ARGS",
            RequestError::InvalidNumber(_) => "INVALID_NUMBER",
            RequestError::UnknownOp(_) => "UNKNOWN_OP",
            RequestError::DivByZero => "DIV_BY_ZERO",
            RequestError::Internal(_) => "SERVER_ERROR",
        }
    }

    /// Short human message for the `Error-Message` header.
    ///
    /// Fixed per variant. The offending token only shows up in `Display`
    /// (logs), never on the wire.
    pub fn message(&self) -> &'static str {
        match self {
            RequestError::BadFormat => "bad format",
            RequestError::LineTooLong(_) => "line too long",
            RequestError::TooManyArgs => "too many arguments",
            RequestError::InvalidNumber(_) => "invalid number",
            RequestError::UnknownOp(_) => "unsupported operation",
            RequestError::DivByZero => "divided by zero",
            RequestError::Internal(_) => "server error",
        }
    }
}
