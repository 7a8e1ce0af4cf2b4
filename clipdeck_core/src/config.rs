use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

static DEFAULT_UPLOADS_DIR: &str = "public/uploads";
static DEFAULT_UPLOADS_URL_PREFIX: &str = "/uploads";

// Read from the process environment, e.g.
// DATABASE_URL=postgres://clipdeck@localhost/clipdeck
// UPLOADS_DIR=public/uploads
// UPLOADS_URL_PREFIX=/uploads

fn default_uploads_dir() -> PathBuf {
    PathBuf::from(DEFAULT_UPLOADS_DIR)
}

fn default_uploads_url_prefix() -> String {
    DEFAULT_UPLOADS_URL_PREFIX.to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClipdeckConfig {
    /// Connection string for the database. Required.
    pub database_url: String,

    /// Directory uploaded video files are written to.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,

    /// URL prefix under which `uploads_dir` is served; stored in `video.file_path`.
    #[serde(default = "default_uploads_url_prefix")]
    pub uploads_url_prefix: String,
}

impl ClipdeckConfig {
    pub fn new(database_url: impl Into<String>, uploads_dir: PathBuf) -> Self {
        ClipdeckConfig {
            database_url: database_url.into(),
            uploads_dir,
            uploads_url_prefix: default_uploads_url_prefix(),
        }
    }

    /// Loads the config from any set of `KEY=value` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }
}
