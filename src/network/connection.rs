//! Connection Handler
//!
//! Handles individual client connections.
//!
//! ## Session Lifecycle
//! ```text
//! Open ──► Reading ──► Responding ──► Reading ──► ... ──► Closed
//! ```
//! Closed is reached on `bye`, end-of-stream, idle timeout or I/O error.

use std::io::{self, BufReader, BufWriter};
use std::net::{Shutdown, TcpStream};
use std::panic::{self, UnwindSafe};
use std::time::Duration;

use uuid::Uuid;

use crate::calc::evaluate_line;
use crate::error::{CalcError, RequestError, Result};
use crate::protocol::{is_bye, read_request_line, write_response, RequestLine, Response};

/// Build the response for one request line.
///
/// Each call gets a fresh correlation id. Nothing in here can fail the
/// session: malformed input becomes an ERROR response, and a panic while
/// evaluating becomes a 500.
pub fn handle_request(line: &str) -> Response {
    respond_with(line, evaluate_line)
}

/// [`handle_request`] with the evaluation step supplied by the caller
pub fn respond_with<F>(line: &str, eval: F) -> Response
where
    F: FnOnce(&str) -> std::result::Result<String, RequestError> + UnwindSafe,
{
    let id = Uuid::new_v4().to_string();

    let result = panic::catch_unwind(|| eval(line)).unwrap_or_else(|_| {
        Err(RequestError::Internal("panic while evaluating".to_string()))
    });

    if let Err(ref e) = result {
        tracing::trace!("Request {} failed: {}", id, e);
    }

    Response::from_result(id, &result)
}

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Longest request line accepted
    max_line_len: usize,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O on two handles to the same socket
    pub fn new(stream: TcpStream, max_line_len: usize) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Responses are small and latency bound
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            max_line_len,
            peer_addr,
        })
    }

    /// Configure connection timeouts; 0 leaves a timeout unset
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads request lines in a loop and answers each one in order.
    /// Returns `Ok` for every normal way a session ends and `Err` only for
    /// unexpected transport or framing failures. The socket is shut down
    /// before returning either way.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let result = self.serve();
        self.close();

        result
    }

    fn serve(&mut self) -> Result<()> {
        loop {
            let frame = match read_request_line(&mut self.reader, self.max_line_len) {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Err(CalcError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!("Connection dropped by client {}: {}", self.peer_addr, e);
                    return Ok(());
                }
                Err(CalcError::Io(ref e)) if is_timeout(e.kind()) => {
                    // WouldBlock on Unix, TimedOut on Windows
                    tracing::debug!("Idle timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    // No response: the stream is in an unknown state
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            let response = match frame {
                RequestLine::Text(line) => {
                    if is_bye(&line) {
                        tracing::debug!("Client {} said bye", self.peer_addr);
                        return Ok(());
                    }

                    let response = handle_request(&line);
                    tracing::trace!(
                        "{} {:?} -> {} {}",
                        self.peer_addr,
                        line,
                        response.status,
                        response.reason
                    );
                    response
                }
                RequestLine::TooLong => {
                    tracing::debug!(
                        "Client {} sent a line over {} bytes",
                        self.peer_addr,
                        self.max_line_len
                    );
                    Response::error(
                        Uuid::new_v4().to_string(),
                        &RequestError::LineTooLong(self.max_line_len),
                    )
                }
            };

            if let Err(e) = write_response(&mut self.writer, &response) {
                if let CalcError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    fn close(&self) {
        if let Err(e) = self.reader.get_ref().shutdown(Shutdown::Both) {
            // Usually the peer is already gone
            tracing::trace!("Shutdown of {} failed: {}", self.peer_addr, e);
        }
        tracing::debug!("Connection to {} closed", self.peer_addr);
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
    )
}

fn is_timeout(kind: io::ErrorKind) -> bool {
    matches!(kind, io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}
