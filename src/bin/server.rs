//! calcd Server Binary
//!
//! Starts the CALC/1.0 TCP server.

use std::net::SocketAddr;

use calcd::{Server, ServerConfig};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// calcd Server
#[derive(Parser, Debug)]
#[command(name = "calcd-server")]
#[command(about = "Line-oriented arithmetic server (CALC/1.0 over TCP)")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:9999")]
    listen: String,

    /// Override the port of --listen
    #[arg(short, long)]
    port: Option<u16>,

    /// Worker threads (clamped to [2, available parallelism])
    #[arg(short, long)]
    workers: Option<usize>,

    /// Idle read timeout per connection in milliseconds
    #[arg(short = 't', long, default_value = "20000")]
    read_timeout_ms: u64,

    /// Longest accepted request line in bytes
    #[arg(long, default_value = "8192")]
    max_line_len: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,calcd=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("calcd Server v{}", calcd::VERSION);

    let listen = match apply_port(&args.listen, args.port) {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Build config from args
    let mut builder = ServerConfig::builder()
        .listen_addr(listen)
        .read_timeout_ms(args.read_timeout_ms)
        .max_line_len(args.max_line_len);
    if let Some(workers) = args.workers {
        builder = builder.worker_threads(workers);
    }
    let config = builder.build();

    let server = match Server::bind(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Replace the port of `listen` when `--port` is given
fn apply_port(listen: &str, port: Option<u16>) -> Result<String, String> {
    let Some(port) = port else {
        return Ok(listen.to_string());
    };

    let mut addr: SocketAddr = listen
        .parse()
        .map_err(|e| format!("Invalid listen address {:?}: {}", listen, e))?;
    addr.set_port(port);
    Ok(addr.to_string())
}
