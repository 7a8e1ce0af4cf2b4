use bytes::Bytes;
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::entity::prelude::*;

/// Duration recorded for fresh uploads until it is edited.
pub const DEFAULT_DURATION: &str = "0:00";

/// Partial edit of a video; `None` leaves the field as it is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
}

/// A received upload, before anything is persisted.
#[derive(Clone, Debug)]
pub struct VideoUpload {
    /// File name as sent by the client.
    pub file_name: String,
    pub title: Option<String>,
    pub data: Bytes,
}

impl VideoUpload {
    /// Submitted title, or the original file name when it is missing or blank.
    pub fn resolved_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => self.file_name.clone(),
        }
    }
}

impl VideoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.caption.is_none()
            && self.duration.is_none()
            && self.thumbnail_path.is_none()
    }

    pub(crate) fn apply_to(self, existing: VideoModel, now: DateTime<Utc>) -> VideoActiveModel {
        let mut active: VideoActiveModel = existing.into();
        if let Some(title) = self.title {
            active.title = Set(title);
        }
        if let Some(caption) = self.caption {
            active.caption = Set(Some(caption));
        }
        if let Some(duration) = self.duration {
            active.duration = Set(Some(duration));
        }
        if let Some(thumbnail_path) = self.thumbnail_path {
            active.thumbnail_path = Set(Some(thumbnail_path));
        }
        active.updated_at = Set(now);
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(title: Option<&str>) -> VideoUpload {
        VideoUpload {
            file_name: "launch.mp4".to_string(),
            title: title.map(str::to_string),
            data: Bytes::from_static(b"mp4"),
        }
    }

    #[test]
    fn test_title_falls_back_to_file_name() {
        assert_eq!(upload(None).resolved_title(), "launch.mp4");
        assert_eq!(upload(Some("   ")).resolved_title(), "launch.mp4");
        assert_eq!(upload(Some("Launch day")).resolved_title(), "Launch day");
    }

    #[test]
    fn test_empty_changes() {
        assert!(VideoChanges::default().is_empty());
        let changes = VideoChanges {
            caption: Some("new caption".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
