use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::{
    fs,
    io::{AsyncRead, AsyncWriteExt},
};
use tracing::warn;

use crate::config::ClipdeckConfig;

/// Local directory that uploaded videos are written to, plus the URL prefix
/// it is served under.
#[derive(Clone, Debug)]
pub struct UploadStore {
    root: PathBuf,
    url_prefix: String,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        let url_prefix = url_prefix.into();
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClipdeckConfig) -> Self {
        Self::new(config.uploads_dir.clone(), config.uploads_url_prefix.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// `<millis>-<random>-<sanitized original name>`.
    pub fn unique_file_name(&self, original: &str, now: DateTime<Utc>) -> String {
        let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
        format!(
            "{}-{}-{}",
            now.timestamp_millis(),
            suffix,
            sanitize_file_name(original)
        )
    }

    /// Path stored on the video row and used by clients to fetch the file.
    pub fn public_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.url_prefix, file_name)
    }

    pub fn disk_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    pub async fn write(&self, file_name: &str, data: &[u8]) -> std::io::Result<PathBuf> {
        self.write_from(file_name, data).await
    }

    /// Streams `reader` into `file_name`. On error the partially written
    /// file is removed before the error is returned.
    pub async fn write_from<R>(&self, file_name: &str, mut reader: R) -> std::io::Result<PathBuf>
    where
        R: AsyncRead + Unpin,
    {
        fs::create_dir_all(&self.root).await?;

        let path = self.disk_path(file_name);
        let mut file = fs::File::create(&path).await?;

        let copied = async {
            tokio::io::copy(&mut reader, &mut file).await?;
            file.flush().await
        }
        .await;

        if let Err(error) = copied {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %cleanup, "failed to remove partial upload");
                }
            }
            return Err(error);
        }

        Ok(path)
    }

    pub async fn remove(&self, file_name: &str) -> std::io::Result<()> {
        fs::remove_file(self.disk_path(file_name)).await
    }
}

/// Drops every character outside `[A-Za-z0-9.]`.
pub fn sanitize_file_name(original: &str) -> String {
    original
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect()
}
