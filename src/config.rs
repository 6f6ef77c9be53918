//! Runtime configuration
//!
//! Values come from CLI flags (with environment fallbacks, see `main.rs`) and
//! are validated here before anything is started.

use anyhow::{Result, bail};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 universal-apidocs";

/// HTTP client settings for the fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Submissions allowed per domain within a sliding window.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    /// One request per domain every 5 seconds
    fn default() -> Self {
        Self {
            max_requests: 1,
            window: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub rate_limit: RateLimitConfig,
    /// Retry failed JSON/YAML extraction as HTML
    pub html_fallback: bool,
    pub fetch: FetchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            rate_limit: RateLimitConfig::default(),
            html_fallback: false,
            fetch: FetchConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rate_limit.max_requests == 0 {
            bail!("rate limit must allow at least one request per window");
        }
        if self.rate_limit.window.is_zero() {
            bail!("rate limit window must be longer than zero seconds");
        }
        if self.fetch.timeout.is_zero() {
            bail!("fetch timeout must be longer than zero seconds");
        }
        Ok(())
    }
}
