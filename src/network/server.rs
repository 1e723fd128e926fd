//! TCP Server
//!
//! Accepts connections and dispatches them to the worker pool.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::error::Result;
use super::{Connection, WorkerPool};

/// Pause after a failed accept (e.g. out of file descriptors)
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// TCP server for calcd
///
/// Holds no per-request state: it binds, accepts, configures each socket
/// and hands it to the pool.
pub struct Server {
    config: ServerConfig,
    listener: TcpListener,
    local_addr: SocketAddr,
    pool: WorkerPool,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Validate the config, bind the listening socket and start the workers.
    ///
    /// `std` sets `SO_REUSEADDR` on Unix listeners, so a restarted server
    /// can rebind while old connections sit in TIME_WAIT.
    pub fn bind(config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(config.socket_addr()?)?;
        let local_addr = listener.local_addr()?;
        let pool = WorkerPool::new(config.effective_workers())?;

        tracing::info!(
            "Server listening on {} ({} workers, idle timeout {} ms)",
            local_addr,
            pool.size(),
            config.read_timeout_ms
        );

        Ok(Self {
            config,
            listener,
            local_addr,
            pool,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle that can stop [`Server::run`] from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            wake_addr: wake_addr(self.local_addr),
        }
    }

    /// Run the accept loop (blocking) until shut down
    ///
    /// On return the pool has drained: sessions already accepted run to
    /// completion before this returns.
    pub fn run(self) -> Result<()> {
        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            match stream {
                Ok(stream) => self.dispatch(stream),
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    thread::sleep(ACCEPT_BACKOFF);
                }
            }
        }

        tracing::info!(
            "Accept loop stopped, waiting for {} queued sessions",
            self.pool.queued()
        );

        // Dropping the pool joins every worker
        drop(self.pool);
        tracing::info!("Server stopped");

        Ok(())
    }

    /// Configure an accepted socket and queue its session
    fn dispatch(&self, stream: TcpStream) {
        let mut connection = match Connection::new(stream, self.config.max_line_len) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Failed to set up connection: {}", e);
                return;
            }
        };

        if let Err(e) =
            connection.set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)
        {
            tracing::warn!("Failed to set timeouts for {}: {}", connection.peer_addr(), e);
            return;
        }

        tracing::info!("Accepted connection from {}", connection.peer_addr());

        let queued = self.pool.execute(move || {
            if let Err(e) = connection.handle() {
                tracing::warn!("Session with {} ended with error: {}", connection.peer_addr(), e);
            }
        });

        if let Err(e) = queued {
            tracing::warn!("Could not queue connection: {}", e);
        }
    }
}

/// Stops a running [`Server`]
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    /// Ask the accept loop to stop.
    ///
    /// The loop is parked in `accept`, so this also opens a throwaway
    /// connection to wake it.
    pub fn shutdown(&self) {
        if self.flag.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("Shutdown requested");

        if let Err(e) = TcpStream::connect(self.wake_addr) {
            tracing::warn!("Could not wake accept loop: {}", e);
        }
    }

    /// True once shutdown has been requested
    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Loopback address to reach a listener bound to `addr`
fn wake_addr(addr: SocketAddr) -> SocketAddr {
    let ip = match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, addr.port())
}
