//! Client configuration.
//!
//! The API key is the only setting a caller must supply. The rest exist so
//! the client can be pointed at a local mock server or given a transport
//! timeout.

use std::fmt;
use std::time::Duration;

use crate::error::SteamError;

pub const DEFAULT_BASE_URL: &str = "https://api.steampowered.com";

/// Account looked up by the validation probe.
pub const DEFAULT_PROBE_STEAM_ID: &str = "76561197960435530";

pub const API_KEY_ENV: &str = "STEAM_API_KEY";
pub const BASE_URL_ENV: &str = "STEAM_API_BASE_URL";

#[derive(Clone)]
pub struct SteamConfig {
    pub api_key: String,
    pub base_url: String,
    pub probe_steam_id: String,
    pub user_agent: Option<String>,
    /// `None` leaves the transport's own default in place.
    pub timeout: Option<Duration>,
}

impl SteamConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            probe_steam_id: DEFAULT_PROBE_STEAM_ID.to_string(),
            user_agent: None,
            timeout: None,
        }
    }

    /// Read `STEAM_API_KEY` (required) and `STEAM_API_BASE_URL` (optional).
    pub fn from_env() -> Result<Self, SteamError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SteamError> {
        let api_key = lookup(API_KEY_ENV)
            .ok_or_else(|| SteamError::Config(format!("{API_KEY_ENV} is not set")))?;
        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url;
        }
        Ok(config)
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn probe_steam_id(mut self, steam_id: impl Into<String>) -> Self {
        self.probe_steam_id = steam_id.into();
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for SteamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SteamConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("probe_steam_id", &self.probe_steam_id)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}
