//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread (the caller of [`Server::run`])
//! - Fixed-size worker pool, one worker per active connection
//! - Unbounded job queue: accept never waits for a free worker
//! - Sessions share nothing; each owns its socket until it closes

mod pool;
mod server;
mod connection;

pub use pool::WorkerPool;
pub use server::{Server, ShutdownHandle};
pub use connection::{handle_request, respond_with, Connection};
