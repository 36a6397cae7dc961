use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Page size used by the pagination endpoint when the client omits one.
    pub default_page_size: u64,
    /// Upper bound on request body size, in bytes.
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn default() -> ServerConfig {
        ServerConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            default_page_size: 2,
            max_body_bytes: 64 * 1024,
        }
    }

    /// Load configuration from environment variables, falling back to the
    /// defaults (with a warning) on unparseable or out-of-range values.
    pub fn from_env() -> ServerConfig {
        let mut config = ServerConfig::default();

        if let Ok(host) = std::env::var("TRADEBOOK_HOST") {
            match host.parse::<IpAddr>() {
                Ok(value) => config.host = value,
                Err(e) => tracing::warn!(
                    "Failed to parse TRADEBOOK_HOST '{}': {}, using default: {}",
                    host,
                    e,
                    config.host
                ),
            }
        }

        if let Ok(port) = std::env::var("TRADEBOOK_PORT") {
            match port.parse::<u16>() {
                Ok(value) => config.port = value,
                Err(e) => tracing::warn!(
                    "Failed to parse TRADEBOOK_PORT '{}': {}, using default: {}",
                    port,
                    e,
                    config.port
                ),
            }
        }

        if let Ok(page_size) = std::env::var("TRADEBOOK_DEFAULT_PAGE_SIZE") {
            match page_size.parse::<u64>() {
                Ok(value) if value > 0 => config.default_page_size = value,
                Ok(value) => tracing::warn!(
                    "Invalid TRADEBOOK_DEFAULT_PAGE_SIZE value: {} (must be greater than 0), using default: {}",
                    value,
                    config.default_page_size
                ),
                Err(e) => tracing::warn!(
                    "Failed to parse TRADEBOOK_DEFAULT_PAGE_SIZE '{}': {}, using default: {}",
                    page_size,
                    e,
                    config.default_page_size
                ),
            }
        }

        if let Ok(max_body) = std::env::var("TRADEBOOK_MAX_BODY_BYTES") {
            match max_body.parse::<usize>() {
                Ok(value) if value > 0 => config.max_body_bytes = value,
                Ok(value) => tracing::warn!(
                    "Invalid TRADEBOOK_MAX_BODY_BYTES value: {} (must be greater than 0), using default: {}",
                    value,
                    config.max_body_bytes
                ),
                Err(e) => tracing::warn!(
                    "Failed to parse TRADEBOOK_MAX_BODY_BYTES '{}': {}, using default: {}",
                    max_body,
                    e,
                    config.max_body_bytes
                ),
            }
        }

        config
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
