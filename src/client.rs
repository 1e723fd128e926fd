//! Client
//!
//! Blocking client for the CALC/1.0 protocol: one line out, one response in.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{CalcError, Result};
use crate::protocol::{read_response, write_line, Response, BYE};

/// A connected client
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
        })
    }

    /// Bound how long to wait for a response
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        Ok(())
    }

    /// Send one expression and wait for its response
    pub fn send(&mut self, expression: &str) -> Result<Response> {
        if expression.contains('\n') {
            return Err(CalcError::Protocol(
                "expression must be a single line".to_string(),
            ));
        }

        write_line(&mut self.writer, expression)?;
        read_response(&mut self.reader)
    }

    /// Tell the server we are done; no response is expected
    pub fn bye(mut self) -> Result<()> {
        write_line(&mut self.writer, BYE)
    }
}
