use anyhow::Result;
use clipdeck_core::config::ClipdeckConfig;

use super::config_model::{check_uploads_prefix, DotEnvyConfig, ServerConfig};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    load_from(std::env::vars().collect())
}

pub fn load_from(vars: Vec<(String, String)>) -> Result<DotEnvyConfig> {
    let server: ServerConfig = envy::prefixed("SERVER_").from_iter(vars.clone())?;
    let core = ClipdeckConfig::from_vars(vars)?;
    check_uploads_prefix(&core.uploads_url_prefix)?;
    server.body_limit_bytes()?;

    Ok(DotEnvyConfig { server, core })
}
