//! Protocol Module
//!
//! Defines the text wire protocol for client-server communication.
//!
//! ## Protocol Format (CALC/1.0 - Line Based, UTF-8)
//!
//! ### Request Format
//! One expression per line, terminated by `\n` (a preceding `\r` is ignored):
//! ```text
//! ADD 10 20
//! 7 * 0.5
//! bye
//! ```
//! `bye` (any case) closes the connection and gets no response. A line over
//! the configured limit is skipped and answered with `400 BAD_FORMAT`.
//!
//! ### Response Format
//! ```text
//! CALC/1.0 <status> <reason>
//! Id: <uuid>
//! Type: ANSWER|ERROR
//! Value: <number>            (ANSWER only)
//! Error-Code: <CODE>         (ERROR only)
//! Error-Message: <text>      (ERROR only)
//! <blank line>
//! ```
//! The blank line is the only end-of-message marker.
//!
//! ### Status Codes
//! - 200 OK:               ANSWER
//! - 400 BadRequest:       BAD_FORMAT, TOO_MANY_ARGS, INVALID_NUMBER
//! - 404 UnknownOperation: UNKNOWN_OP
//! - 422 InvalidOperation: DIV_BY_ZERO
//! - 500 ServerError:      SERVER_ERROR

mod response;
mod codec;

pub use response::{Response, ResponseType};
pub use codec::{
    decode_response, encode_response, is_bye, read_line, read_request_line, read_response,
    write_line, write_response, RequestLine, BYE, PROTOCOL_VERSION,
};
