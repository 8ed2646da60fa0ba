//! Runtime configuration for the access core.
//!
//! Read from the environment at startup:
//! - `OPSDESK_API_URL`: directory base URL (default `http://localhost:8080`)
//! - `OPSDESK_AUTH_TOKEN`: bearer token for directory queries (optional)
//! - `OPSDESK_HTTP_TIMEOUT_MS`: directory request timeout (default 10000)
//! - `OPSDESK_ROLE_TABLE`: path to a JSON role level table overriding the default

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use opsdesk_auth::RoleHierarchy;

#[derive(Debug, Clone)]
pub struct AccessConfig {
    pub api_url: String,
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
    pub hierarchy: Arc<RoleHierarchy>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            auth_token: None,
            request_timeout: Duration::from_secs(10),
            hierarchy: Arc::new(RoleHierarchy::default()),
        }
    }
}

impl AccessConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("OPSDESK_API_URL") {
            config.api_url = url;
        }

        config.auth_token = lookup("OPSDESK_AUTH_TOKEN").filter(|t| !t.is_empty());

        if let Some(ms) = lookup("OPSDESK_HTTP_TIMEOUT_MS") {
            let ms: u64 = ms
                .parse()
                .with_context(|| format!("OPSDESK_HTTP_TIMEOUT_MS must be milliseconds, got {ms:?}"))?;
            config.request_timeout = Duration::from_millis(ms);
        }

        if let Some(path) = lookup("OPSDESK_ROLE_TABLE") {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read role table at {path:?}"))?;
            let hierarchy = RoleHierarchy::from_json(&json)
                .with_context(|| format!("invalid role table at {path:?}"))?;
            config.hierarchy = Arc::new(hierarchy);
        }

        Ok(config)
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_hierarchy(mut self, hierarchy: RoleHierarchy) -> Self {
        self.hierarchy = Arc::new(hierarchy);
        self
    }
}
