//! Codec Tests
//!
//! Tests for response encoding/decoding and request line framing.

use std::io::Cursor;

use calcd::calc::evaluate_line;
use calcd::protocol::{
    decode_response, encode_response, is_bye, read_line, read_request_line, read_response,
    write_line, write_response, RequestLine, Response, ResponseType,
};
use calcd::{CalcError, RequestError};

const ID: &str = "0b8f6a1e-3c57-4d1c-9a3e-2f6d7c1b5e90";

// =============================================================================
// Response Model Tests
// =============================================================================

#[test]
fn test_ok_response_fields() {
    let resp = Response::ok(ID, "30");

    assert_eq!(resp.status, 200);
    assert_eq!(resp.reason, "OK");
    assert_eq!(resp.kind, Some(ResponseType::Answer));
    assert_eq!(resp.value.as_deref(), Some("30"));
    assert!(resp.error_code.is_none());
    assert!(resp.error_message.is_none());
    assert!(resp.is_answer());
}

#[test]
fn test_error_response_fields() {
    let resp = Response::error(ID, &RequestError::DivByZero);

    assert_eq!(resp.status, 422);
    assert_eq!(resp.reason, "InvalidOperation");
    assert_eq!(resp.kind, Some(ResponseType::Error));
    assert!(resp.value.is_none());
    assert_eq!(resp.error_code.as_deref(), Some("DIV_BY_ZERO"));
    assert_eq!(resp.error_message.as_deref(), Some("divided by zero"));
    assert!(!resp.is_answer());
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_ok_response() {
    let encoded = encode_response(&Response::ok(ID, "30"));

    assert_eq!(
        encoded,
        format!("CALC/1.0 200 OK\nId: {}\nType: ANSWER\nValue: 30\n\n", ID)
    );
}

#[test]
fn test_encode_error_response() {
    let encoded = encode_response(&Response::bad(
        ID,
        400,
        "BadRequest",
        "INVALID_NUMBER",
        "invalid number",
    ));

    assert_eq!(
        encoded,
        format!(
            "CALC/1.0 400 BadRequest\nId: {}\nType: ERROR\n\
             Error-Code: INVALID_NUMBER\nError-Message: invalid number\n\n",
            ID
        )
    );
}

#[test]
fn test_encode_skips_missing_headers() {
    let resp = Response {
        status: 500,
        reason: "ServerError".to_string(),
        id: None,
        kind: None,
        value: None,
        error_code: None,
        error_message: Some("server error".to_string()),
    };

    assert_eq!(
        encode_response(&resp),
        "CALC/1.0 500 ServerError\nError-Message: server error\n\n"
    );
}

#[test]
fn test_encode_ends_with_single_blank_line() {
    let encoded = encode_response(&Response::ok(ID, "1"));

    assert!(encoded.ends_with("\n\n"));
    assert!(!encoded.ends_with("\n\n\n"));
    assert_eq!(encoded.matches("\n\n").count(), 1);
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_recovers_encoded_response() {
    for resp in [
        Response::ok(ID, "3.5"),
        Response::error(ID, &RequestError::TooManyArgs),
        Response::error(ID, &RequestError::UnknownOp("%".into())),
    ] {
        let decoded = decode_response(&encode_response(&resp)).unwrap();
        assert_eq!(decoded, resp);
    }
}

#[test]
fn test_decode_evaluated_values_exactly() {
    for line in ["ADD 10 20", "7 * 0.5", "1 / 3", "SUB 0.1 0.3", "MUL 1e10 1e10"] {
        let expected = evaluate_line(line).unwrap();
        let resp = Response::from_result(ID, &Ok(expected.clone()));
        let decoded = decode_response(&encode_response(&resp)).unwrap();
        assert_eq!(decoded.value, Some(expected));
    }
}

#[test]
fn test_decode_trims_and_ignores_unknown_headers() {
    let text = "CALC/1.0 200 OK\nId:abc\nX-Extra: whatever\nType:  answer \nValue:   42\n\n";
    let resp = decode_response(text).unwrap();

    assert_eq!(resp.id.as_deref(), Some("abc"));
    assert_eq!(resp.kind, Some(ResponseType::Answer));
    assert_eq!(resp.value.as_deref(), Some("42"));
}

#[test]
fn test_decode_stops_at_blank_line() {
    let text = "CALC/1.0 200 OK\nValue: 1\n\nValue: 2\n\n";
    let resp = decode_response(text).unwrap();

    assert_eq!(resp.value.as_deref(), Some("1"));
}

#[test]
fn test_decode_wrong_version() {
    let result = decode_response("HTTP/1.1 200 OK\n\n");
    assert!(matches!(result, Err(CalcError::Protocol(_))));
}

#[test]
fn test_decode_bad_status() {
    let result = decode_response("CALC/1.0 abc OK\n\n");
    assert!(matches!(result, Err(CalcError::Protocol(_))));
}

#[test]
fn test_decode_unknown_type() {
    let result = decode_response("CALC/1.0 200 OK\nType: MAYBE\n\n");
    assert!(matches!(result, Err(CalcError::Protocol(_))));
}

#[test]
fn test_decode_empty() {
    assert!(matches!(decode_response(""), Err(CalcError::Protocol(_))));
}

// =============================================================================
// Stream-based I/O Tests
// =============================================================================

#[test]
fn test_read_responses_back_to_back() {
    let mut buffer = Vec::new();
    write_response(&mut buffer, &Response::ok("a", "1")).unwrap();
    write_response(&mut buffer, &Response::error("b", &RequestError::BadFormat)).unwrap();

    let mut cursor = Cursor::new(buffer);
    let first = read_response(&mut cursor).unwrap();
    let second = read_response(&mut cursor).unwrap();

    assert_eq!(first.id.as_deref(), Some("a"));
    assert_eq!(first.value.as_deref(), Some("1"));
    assert_eq!(second.id.as_deref(), Some("b"));
    assert_eq!(second.error_code.as_deref(), Some("BAD_FORMAT"));
}

#[test]
fn test_read_response_on_closed_stream() {
    let mut cursor = Cursor::new(Vec::<u8>::new());
    let result = read_response(&mut cursor);

    assert!(matches!(result, Err(CalcError::Protocol(_))));
}

// =============================================================================
// Line Framing Tests
// =============================================================================

#[test]
fn test_read_line_sequence() {
    let mut cursor = Cursor::new(b"ADD 1 2\n3 * 4\n".to_vec());

    assert_eq!(read_line(&mut cursor, 64).unwrap().as_deref(), Some("ADD 1 2"));
    assert_eq!(read_line(&mut cursor, 64).unwrap().as_deref(), Some("3 * 4"));
    assert_eq!(read_line(&mut cursor, 64).unwrap(), None);
}

#[test]
fn test_read_line_strips_crlf() {
    let mut cursor = Cursor::new(b"bye\r\n".to_vec());
    assert_eq!(read_line(&mut cursor, 64).unwrap().as_deref(), Some("bye"));
}

#[test]
fn test_read_line_unterminated_final_line() {
    let mut cursor = Cursor::new(b"1 + 1".to_vec());

    assert_eq!(read_line(&mut cursor, 64).unwrap().as_deref(), Some("1 + 1"));
    assert_eq!(read_line(&mut cursor, 64).unwrap(), None);
}

#[test]
fn test_read_line_empty_line() {
    let mut cursor = Cursor::new(b"\n".to_vec());
    assert_eq!(read_line(&mut cursor, 64).unwrap().as_deref(), Some(""));
}

#[test]
fn test_read_line_invalid_utf8_is_replaced() {
    let mut cursor = Cursor::new(vec![b'1', b' ', 0xFF, b' ', b'2', b'\n']);
    let line = read_line(&mut cursor, 64).unwrap().unwrap();

    assert_eq!(line, "1 \u{FFFD} 2");
}

#[test]
fn test_read_line_exactly_at_limit() {
    let mut cursor = Cursor::new(b"12345678\n".to_vec());
    assert_eq!(read_line(&mut cursor, 8).unwrap().as_deref(), Some("12345678"));
}

#[test]
fn test_read_line_over_limit() {
    let mut cursor = Cursor::new(b"123456789\n".to_vec());
    let result = read_line(&mut cursor, 8);

    assert!(matches!(result, Err(CalcError::Protocol(_))));
}

#[test]
fn test_read_request_line_skips_oversized_line() {
    let mut input = vec![b'7'; 100];
    input.extend_from_slice(b"\nADD 1 2\n");
    let mut cursor = Cursor::new(input);

    assert_eq!(
        read_request_line(&mut cursor, 8).unwrap(),
        Some(RequestLine::TooLong)
    );
    assert_eq!(
        read_request_line(&mut cursor, 8).unwrap(),
        Some(RequestLine::Text("ADD 1 2".to_string()))
    );
    assert_eq!(read_request_line(&mut cursor, 8).unwrap(), None);
}

#[test]
fn test_read_request_line_oversized_without_newline() {
    let mut cursor = Cursor::new(vec![b'1'; 50]);

    assert_eq!(
        read_request_line(&mut cursor, 8).unwrap(),
        Some(RequestLine::TooLong)
    );
    assert_eq!(read_request_line(&mut cursor, 8).unwrap(), None);
}

#[test]
fn test_read_request_line_within_limit() {
    let mut cursor = Cursor::new(b"1 + 2\r\n".to_vec());

    assert_eq!(
        read_request_line(&mut cursor, 8).unwrap(),
        Some(RequestLine::Text("1 + 2".to_string()))
    );
}

#[test]
fn test_write_line_appends_newline() {
    let mut buffer = Vec::new();
    write_line(&mut buffer, "ADD 1 2").unwrap();

    assert_eq!(buffer, b"ADD 1 2\n");
}

#[test]
fn test_is_bye_any_case() {
    assert!(is_bye("bye"));
    assert!(is_bye("BYE"));
    assert!(is_bye("ByE"));
    assert!(!is_bye(" bye"));
    assert!(!is_bye("bye now"));
    assert!(!is_bye(""));
}
