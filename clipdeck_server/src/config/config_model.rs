use anyhow::{anyhow, bail, Result};
use clipdeck_core::config::ClipdeckConfig;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: ServerConfig,
    pub core: ClipdeckConfig,
}

/// Read from `SERVER_`-prefixed variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body, in megabytes.
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_body_limit_mb() -> u64 {
    512
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            body_limit_mb: default_body_limit_mb(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn body_limit_bytes(&self) -> Result<usize> {
        let bytes = self
            .body_limit_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow!("SERVER_BODY_LIMIT_MB is too large"))?;
        Ok(usize::try_from(bytes)?)
    }
}

/// The uploads prefix is mounted as a router path, so it must be absolute
/// and not the root.
pub fn check_uploads_prefix(prefix: &str) -> Result<()> {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("UPLOADS_URL_PREFIX must not be empty or '/'");
    }
    if !trimmed.starts_with('/') {
        bail!("UPLOADS_URL_PREFIX must start with '/', got {prefix:?}");
    }
    Ok(())
}
