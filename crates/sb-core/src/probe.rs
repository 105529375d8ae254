//! Port-based liveness probe.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::trace;

const HOST: &str = "localhost";

/// Default connect timeout when none is configured.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// "Is something accepting TCP connections on this local port?"
///
/// Implementations must be side-effect free and bounded by a timeout. The
/// orchestrator calls them from the blocking pool.
pub trait PortProbe: Send + Sync {
    fn is_listening(&self, port: u16) -> bool;
}

/// Probe that attempts a real TCP connect to `localhost:port`.
#[derive(Debug, Clone)]
pub struct TcpPortProbe {
    timeout: Duration,
}

impl TcpPortProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for TcpPortProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

impl PortProbe for TcpPortProbe {
    /// True only if a connection completes within the timeout. `localhost`
    /// may resolve to both IPv6 and IPv4 addresses; every address shares the
    /// same overall deadline.
    fn is_listening(&self, port: u16) -> bool {
        let Ok(addrs) = (HOST, port).to_socket_addrs() else {
            return false;
        };

        let deadline = Instant::now() + self.timeout;

        for addr in addrs {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            if TcpStream::connect_timeout(&addr, remaining).is_ok() {
                trace!(port, %addr, "Port is listening");
                return true;
            }
        }

        false
    }
}
