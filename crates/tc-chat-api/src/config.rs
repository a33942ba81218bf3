//! Chat API server configuration, loadable from TOML or environment.

use std::str::FromStr;

use serde::Deserialize;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Sessions idle for longer than this are purged.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// How often the session reaper runs.
    #[serde(default = "default_reap_interval_secs")]
    pub reap_interval_secs: u64,
    /// Dialogue engine settings.
    #[serde(default)]
    pub dialogue: DialogueConfig,
}

/// Which dialogue engine strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DialogueMode {
    /// `/model/parse` for entities, optional webhook reply.
    #[default]
    Parse,
    /// Webhook reply plus per-sender tracker slots.
    Tracker,
    /// No engine; regex fallback only.
    Disabled,
}

impl FromStr for DialogueMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parse" => Ok(Self::Parse),
            "tracker" => Ok(Self::Tracker),
            "disabled" | "off" | "none" => Ok(Self::Disabled),
            other => anyhow::bail!("unknown dialogue mode: {other}"),
        }
    }
}

/// Connection settings for the dialogue engine.
#[derive(Debug, Clone, Deserialize)]
pub struct DialogueConfig {
    #[serde(default)]
    pub mode: DialogueMode,
    /// Engine HTTP API base URL.
    #[serde(default = "default_engine_url")]
    pub url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Parse mode only: also ask the webhook for a reply text.
    #[serde(default)]
    pub generate_reply: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_session_ttl_secs() -> u64 {
    1800
}

fn default_reap_interval_secs() -> u64 {
    60
}

fn default_engine_url() -> String {
    "http://localhost:5005".into()
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            mode: DialogueMode::default(),
            url: default_engine_url(),
            timeout_secs: default_timeout_secs(),
            generate_reply: false,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            session_ttl_secs: default_session_ttl_secs(),
            reap_interval_secs: default_reap_interval_secs(),
            dialogue: DialogueConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config from environment variables, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup (environment in production).
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(host) = get("TC_HOST") {
            config.host = host;
        }
        if let Some(port) = get("TC_PORT") {
            config.port = port.parse()?;
        }
        if let Some(origins) = get("TC_CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(ttl) = get("TC_SESSION_TTL_SECS") {
            config.session_ttl_secs = ttl.parse()?;
        }
        if let Some(interval) = get("TC_REAP_INTERVAL_SECS") {
            config.reap_interval_secs = interval.parse()?;
        }
        if let Some(mode) = get("RASA_MODE") {
            config.dialogue.mode = mode.parse()?;
        }
        if let Some(url) = get("RASA_URL") {
            config.dialogue.url = url;
        }
        if let Some(timeout) = get("RASA_TIMEOUT_SECS") {
            config.dialogue.timeout_secs = timeout.parse()?;
        }
        if let Some(reply) = get("RASA_GENERATE_REPLY") {
            config.dialogue.generate_reply = reply.eq_ignore_ascii_case("true") || reply == "1";
        }

        Ok(config)
    }
}
