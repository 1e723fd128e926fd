//! # calcd
//!
//! A line-oriented arithmetic server speaking CALC/1.0 over TCP:
//! - One expression per line, prefix (`ADD 10 20`) or infix (`10 + 20`)
//! - Structured status + header responses, blank-line terminated
//! - One worker per connection from a fixed-size thread pool
//! - Per-connection idle timeout
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Listener / Dispatcher                      │
//! │                  (accept + idle timeout)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ unbounded queue
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Worker Pool                              │
//! │               (one session per worker)                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Connection Handler                           │
//! │          read line ─► respond ─► write, until bye            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Calc     │ ───────► │  Protocol   │
//!   │(parse, eval)│          │ (Response)  │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod calc;
pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CalcError, RequestError, Result};
pub use config::ServerConfig;
pub use client::Client;
pub use network::Server;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of calcd
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
