use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3333;
pub const CACHE_TTL: Duration = Duration::from_secs(60);
pub const MAX_HISTORY_LENGTH: usize = 10;

/// Runtime settings. The binary always runs with [`Config::default`];
/// other values exist so tests can shorten the TTL or bind an ephemeral port.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cache_ttl: Duration,
    pub history_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cache_ttl: CACHE_TTL,
            history_capacity: MAX_HISTORY_LENGTH,
        }
    }
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
