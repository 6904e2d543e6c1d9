use serde::Deserialize;

use crate::services::FailurePolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the remote recommendation service
    #[serde(default = "default_recommendation_api_url")]
    pub recommendation_api_url: String,

    /// Number of items requested per search
    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// How the gallery aggregation reacts to a failed category
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Run one gallery aggregation with the default query at startup
    #[serde(default = "default_warm_gallery")]
    pub warm_gallery: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_recommendation_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_top_k() -> u32 {
    6
}

fn default_warm_gallery() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
