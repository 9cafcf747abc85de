//! Connect request assembly

use crate::error::{ClientError, ClientResult};
use std::collections::BTreeMap;
use std::time::Duration;
use webcast_common::{AppConfig, HeartbeatConfig};
use webcast_core::RoomParameters;

/// Name of the session cookie header
pub const COOKIE_HEADER: &str = "Cookie";

/// Everything the transport needs to open the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    /// Full endpoint URL including the query string
    pub url: String,
    /// Handshake headers in send order
    pub headers: Vec<(String, String)>,
    /// Fixed origin header identifying the web host
    pub origin: String,
}

impl ConnectRequest {
    /// Assemble `<base>?<room query><fixed query>` plus cookie and caller headers
    ///
    /// Caller headers replace a header of the same name (case-insensitive),
    /// including the cookie header.
    pub fn build(
        base_url: &str,
        params: &RoomParameters,
        fixed_query: &str,
        cookie: Option<String>,
        headers: &BTreeMap<String, String>,
        origin: &str,
    ) -> ClientResult<Self> {
        let query = params
            .to_query_string()
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        let mut request_headers = Vec::with_capacity(headers.len() + 1);
        if let Some(cookie) = cookie {
            request_headers.push((COOKIE_HEADER.to_string(), cookie));
        }
        for (name, value) in headers {
            request_headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            request_headers.push((name.clone(), value.clone()));
        }

        Ok(Self {
            url: format!("{base_url}?{query}{fixed_query}"),
            headers: request_headers,
            origin: origin.to_string(),
        })
    }

    /// Look up a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Per-connection options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Period between heartbeats after the first one
    pub heartbeat_interval: Duration,
}

impl ConnectOptions {
    /// Default heartbeat period (10 seconds)
    pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(10_000);

    #[must_use]
    pub fn new() -> Self {
        Self {
            heartbeat_interval: Self::DEFAULT_HEARTBEAT_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&HeartbeatConfig> for ConnectOptions {
    fn from(config: &HeartbeatConfig) -> Self {
        Self::new().with_heartbeat_interval(Duration::from_millis(config.interval_ms))
    }
}

impl From<&AppConfig> for ConnectOptions {
    fn from(config: &AppConfig) -> Self {
        Self::from(&config.heartbeat)
    }
}
