//! Protocol codec
//!
//! Line framing for requests and the text encoding of responses.
//!
//! ## Wire Format
//!
//! ### Request
//! ```text
//! ┌──────────────────────────────┬──────────┐
//! │   expression (UTF-8 text)    │ \n       │
//! └──────────────────────────────┴──────────┘
//! ```
//!
//! ### Response
//! ```text
//! ┌─────────────────────────────────────┐
//! │ CALC/1.0 <status> <reason>\n        │  status line
//! ├─────────────────────────────────────┤
//! │ <Header>: <value>\n                 │  0..5 headers, fixed order:
//! │ ...                                 │  Id, Type, Value,
//! │                                     │  Error-Code, Error-Message
//! ├─────────────────────────────────────┤
//! │ \n                                  │  terminator
//! └─────────────────────────────────────┘
//! ```

use std::io::{BufRead, Read, Write};

use crate::error::{CalcError, Result};
use super::{Response, ResponseType};

/// Protocol name and version on every status line
pub const PROTOCOL_VERSION: &str = "CALC/1.0";

/// Client line that closes the session
pub const BYE: &str = "bye";

/// Line limit used when reading responses on the client side
const MAX_RESPONSE_LINE: usize = 64 * 1024;

// Header names
const HEADER_ID: &str = "Id";
const HEADER_TYPE: &str = "Type";
const HEADER_VALUE: &str = "Value";
const HEADER_ERROR_CODE: &str = "Error-Code";
const HEADER_ERROR_MESSAGE: &str = "Error-Message";

// =============================================================================
// Request Framing
// =============================================================================

/// One framed request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestLine {
    /// A complete line, terminator stripped
    Text(String),

    /// A line longer than the limit; its bytes were discarded through the `\n`
    TooLong,
}

/// Read one request line for the server.
///
/// Same framing as [`read_line`], except an oversized line does not fail
/// the stream: the rest of it is skipped and `RequestLine::TooLong` is
/// returned, so the session can answer with an error and keep reading.
pub fn read_request_line<R: BufRead>(
    reader: &mut R,
    max_len: usize,
) -> Result<Option<RequestLine>> {
    match read_bounded(reader, max_len)? {
        Some(RequestLine::TooLong) => {
            let skipped = discard_line(reader)?;
            tracing::trace!("Discarded {} bytes of an oversized line", max_len + 1 + skipped);
            Ok(Some(RequestLine::TooLong))
        }
        other => Ok(other),
    }
}

/// Read one line, without its terminator.
///
/// - `Ok(None)` on end-of-stream with nothing buffered
/// - a trailing `\r` is dropped together with the `\n`
/// - a final line without `\n` is still returned
/// - invalid UTF-8 is replaced, not rejected
/// - more than `max_len` bytes before the `\n` is a `Protocol` error
pub fn read_line<R: BufRead>(reader: &mut R, max_len: usize) -> Result<Option<String>> {
    match read_bounded(reader, max_len)? {
        Some(RequestLine::Text(line)) => Ok(Some(line)),
        Some(RequestLine::TooLong) => Err(CalcError::Protocol(format!(
            "Line too long: more than {} bytes",
            max_len
        ))),
        None => Ok(None),
    }
}

/// Read at most `max_len + 1` bytes of one line
fn read_bounded<R: BufRead>(reader: &mut R, max_len: usize) -> Result<Option<RequestLine>> {
    let mut buf = Vec::new();
    let limit = max_len as u64 + 1;
    let n = reader.by_ref().take(limit).read_until(b'\n', &mut buf)?;

    if n == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if buf.len() > max_len {
        return Ok(Some(RequestLine::TooLong));
    }

    Ok(Some(RequestLine::Text(String::from_utf8_lossy(&buf).into_owned())))
}

/// Skip input through the next `\n` (or end-of-stream) without buffering it.
/// Returns the number of bytes skipped.
fn discard_line<R: BufRead>(reader: &mut R) -> Result<usize> {
    let mut skipped = 0;

    loop {
        let (found, used) = {
            let available = reader.fill_buf()?;
            if available.is_empty() {
                return Ok(skipped);
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (true, i + 1),
                None => (false, available.len()),
            }
        };

        reader.consume(used);
        skipped += used;

        if found {
            return Ok(skipped);
        }
    }
}

/// Write one request line and flush
pub fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// True if the line asks the server to close the session
pub fn is_bye(line: &str) -> bool {
    line.eq_ignore_ascii_case(BYE)
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to its canonical text form
///
/// Headers are emitted only when present, always in the same order.
pub fn encode_response(response: &Response) -> String {
    let mut out = format!("{} {} {}\n", PROTOCOL_VERSION, response.status, response.reason);

    let headers = [
        (HEADER_ID, response.id.as_deref()),
        (HEADER_TYPE, response.kind.as_ref().map(ResponseType::as_str)),
        (HEADER_VALUE, response.value.as_deref()),
        (HEADER_ERROR_CODE, response.error_code.as_deref()),
        (HEADER_ERROR_MESSAGE, response.error_message.as_deref()),
    ];

    for (name, value) in headers {
        if let Some(value) = value {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }

    out.push('\n');
    out
}

/// Decode a response from text
///
/// Reads the status line, then headers up to the first blank line (or the
/// end of the text). Header names and values are trimmed; unknown headers
/// are skipped.
pub fn decode_response(text: &str) -> Result<Response> {
    let mut lines = text.lines();

    let status_line = lines
        .next()
        .ok_or_else(|| CalcError::Protocol("Empty response".to_string()))?;
    let mut response = decode_status_line(status_line)?;

    for line in lines {
        if line.trim().is_empty() {
            break;
        }
        apply_header(&mut response, line)?;
    }

    Ok(response)
}

/// Parse `CALC/1.0 <status> <reason>` into an empty response
fn decode_status_line(line: &str) -> Result<Response> {
    let mut parts = line.trim().splitn(3, ' ');

    let version = parts.next().unwrap_or_default();
    if version != PROTOCOL_VERSION {
        return Err(CalcError::Protocol(format!(
            "Unexpected protocol version: {:?}",
            version
        )));
    }

    let status = parts
        .next()
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| CalcError::Protocol(format!("Malformed status line: {:?}", line)))?;
    let reason = parts.next().unwrap_or_default().trim().to_string();

    Ok(Response {
        status,
        reason,
        id: None,
        kind: None,
        value: None,
        error_code: None,
        error_message: None,
    })
}

/// Apply one `Name: value` header line
fn apply_header(response: &mut Response, line: &str) -> Result<()> {
    let Some((name, value)) = line.split_once(':') else {
        return Ok(());
    };
    let (name, value) = (name.trim(), value.trim().to_string());

    match name {
        HEADER_ID => response.id = Some(value),
        HEADER_TYPE => {
            let kind = ResponseType::from_wire(&value).ok_or_else(|| {
                CalcError::Protocol(format!("Unknown response type: {:?}", value))
            })?;
            response.kind = Some(kind);
        }
        HEADER_VALUE => response.value = Some(value),
        HEADER_ERROR_CODE => response.error_code = Some(value),
        HEADER_ERROR_MESSAGE => response.error_message = Some(value),
        _ => {}
    }

    Ok(())
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a response to a stream and flush
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(encode_response(response).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Read one complete response from a stream
///
/// Blocks until the blank terminator line (or end-of-stream after the
/// status line). End-of-stream before any status line is a `Protocol` error.
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<Response> {
    let status_line = read_line(reader, MAX_RESPONSE_LINE)?
        .ok_or_else(|| CalcError::Protocol("Connection closed before response".to_string()))?;

    let mut text = status_line;
    text.push('\n');

    while let Some(line) = read_line(reader, MAX_RESPONSE_LINE)? {
        if line.trim().is_empty() {
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }

    decode_response(&text)
}
