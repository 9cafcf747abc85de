//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub endpoint: EndpointConfig,
    pub heartbeat: HeartbeatConfig,
    pub session: SessionConfig,
    pub room: RoomConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Push endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Base URL the query string is appended to
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Origin header sent with the handshake
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Fixed string appended after the room query
    #[serde(default = "default_fixed_query")]
    pub fixed_query: String,
}

/// Heartbeat configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatConfig {
    #[serde(default = "default_heartbeat_interval_ms")]
    pub interval_ms: u64,
}

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Raw `name=value; name2=value2` cookie string
    #[serde(default)]
    pub cookie: Option<String>,
    /// Capacity of the client event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

/// Room to observe
#[derive(Debug, Clone, Deserialize)]
pub struct RoomConfig {
    pub room_id: String,
    /// Extra query parameters sent with the connect request
    #[serde(default)]
    pub client_params: BTreeMap<String, String>,
}

// Default value functions
fn default_app_name() -> String {
    "webcast-client".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_ws_url() -> String {
    "wss://webcast16-ws-useast1a.tiktok.com/webcast/im/ws_proxy/ws_reuse_supplement/".to_string()
}

fn default_origin() -> String {
    "https://www.tiktok.com".to_string()
}

fn default_fixed_query() -> String {
    "&version_code=180800&webcast_sdk_version=1.3.0&update_version_code=1.3.0".to_string()
}

fn default_heartbeat_interval_ms() -> u64 {
    10_000
}

fn default_event_buffer() -> usize {
    256
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            endpoint: EndpointConfig {
                ws_url: lookup("WEBCAST_WS_URL").unwrap_or_else(default_ws_url),
                origin: lookup("WEBCAST_ORIGIN").unwrap_or_else(default_origin),
                fixed_query: lookup("WEBCAST_FIXED_QUERY").unwrap_or_else(default_fixed_query),
            },
            heartbeat: HeartbeatConfig {
                interval_ms: parse_or(
                    &lookup,
                    "WEBCAST_HEARTBEAT_INTERVAL_MS",
                    default_heartbeat_interval_ms,
                )?,
            },
            session: SessionConfig {
                cookie: lookup("WEBCAST_SESSION_COOKIE").filter(|s| !s.trim().is_empty()),
                event_buffer: parse_or(&lookup, "WEBCAST_EVENT_BUFFER", default_event_buffer)?,
            },
            room: RoomConfig {
                room_id: lookup("WEBCAST_ROOM_ID")
                    .filter(|s| !s.trim().is_empty())
                    .ok_or(ConfigError::MissingVar("WEBCAST_ROOM_ID"))?,
                client_params: lookup("WEBCAST_CLIENT_PARAMS")
                    .map(|s| {
                        serde_urlencoded::from_str::<BTreeMap<String, String>>(&s).map_err(|e| {
                            ConfigError::InvalidValue("WEBCAST_CLIENT_PARAMS", e.to_string())
                        })
                    })
                    .transpose()?
                    .unwrap_or_default(),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
