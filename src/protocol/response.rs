//! Response definitions
//!
//! Represents responses to clients.

use std::fmt;

use crate::error::RequestError;

/// Value of the `Type` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    Answer,
    Error,
}

impl ResponseType {
    /// Wire form (`ANSWER` / `ERROR`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Answer => "ANSWER",
            ResponseType::Error => "ERROR",
        }
    }

    /// Parse the wire form, ignoring case
    pub fn from_wire(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("ANSWER") {
            Some(ResponseType::Answer)
        } else if s.eq_ignore_ascii_case("ERROR") {
            Some(ResponseType::Error)
        } else {
            None
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A response to send to client
///
/// Responses built with [`Response::ok`] or [`Response::bad`] carry exactly
/// one of `value` and (`error_code`, `error_message`), matching `kind`.
/// Every header field is an `Option` since the client-side decoder keeps
/// only the headers that actually arrive.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code (HTTP-like)
    pub status: u16,

    /// Reason phrase following the status code
    pub reason: String,

    /// Correlation id, fresh per request line
    pub id: Option<String>,

    /// ANSWER or ERROR
    pub kind: Option<ResponseType>,

    /// Rendered result (ANSWER only)
    pub value: Option<String>,

    /// Machine error code (ERROR only)
    pub error_code: Option<String>,

    /// Human error message (ERROR only)
    pub error_message: Option<String>,
}

impl Response {
    /// Create a 200 OK answer
    pub fn ok(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            status: 200,
            reason: "OK".to_string(),
            id: Some(id.into()),
            kind: Some(ResponseType::Answer),
            value: Some(value.into()),
            error_code: None,
            error_message: None,
        }
    }

    /// Create an ERROR response from its raw parts
    pub fn bad(
        id: impl Into<String>,
        status: u16,
        reason: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            reason: reason.into(),
            id: Some(id.into()),
            kind: Some(ResponseType::Error),
            value: None,
            error_code: Some(code.into()),
            error_message: Some(message.into()),
        }
    }

    /// Create an ERROR response for a failed request
    pub fn error(id: impl Into<String>, err: &RequestError) -> Self {
        Self::bad(id, err.status(), err.reason(), err.code(), err.message())
    }

    /// Build the response for an evaluated line
    pub fn from_result(id: impl Into<String>, result: &Result<String, RequestError>) -> Self {
        match result {
            Ok(value) => Self::ok(id, value.as_str()),
            Err(e) => Self::error(id, e),
        }
    }

    /// True for a 200 ANSWER
    pub fn is_answer(&self) -> bool {
        self.status == 200 && self.kind == Some(ResponseType::Answer)
    }
}
