use chrono::Utc;
use sea_orm::DatabaseConnection;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    entity::prelude::*,
    ids::{PostId, VideoId},
    models::video::{VideoChanges, VideoUpload, DEFAULT_DURATION},
    storage::UploadStore,
};

#[derive(Debug, Error)]
pub enum VideosServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("video {0} not found")]
    VideoNotFound(VideoId),

    #[error("post {0} not found")]
    PostNotFound(PostId),

    #[error("failed to store upload")]
    Storage(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct VideosService {
    db: DatabaseConnection,
}

impl VideosService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_video(&self, id: VideoId) -> Result<VideoModel, VideosServiceError> {
        Video::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(VideosServiceError::VideoNotFound(id))
    }

    /// The video a post publishes
    pub async fn get_video_by_post(
        &self,
        post_id: PostId,
    ) -> Result<VideoModel, VideosServiceError> {
        let (post, video) = Post::find_by_id(post_id)
            .find_also_related(Video)
            .one(&self.db)
            .await?
            .ok_or(VideosServiceError::PostNotFound(post_id))?;

        video.ok_or(VideosServiceError::VideoNotFound(post.video_id))
    }

    pub async fn update_video(
        &self,
        id: VideoId,
        changes: VideoChanges,
    ) -> Result<VideoModel, VideosServiceError> {
        let existing = self.get_video(id).await?;
        if changes.is_empty() {
            return Ok(existing);
        }

        let video = changes.apply_to(existing, Utc::now()).update(&self.db).await?;
        info!(video_id = %id, "video updated");
        Ok(video)
    }

    /// Persist an uploaded file and its video row.
    ///
    /// The row is inserted first but only committed once the file is on
    /// disk. A failed write rolls the row back; a failed commit removes the
    /// written file.
    pub async fn store_upload(
        &self,
        store: &UploadStore,
        upload: VideoUpload,
    ) -> Result<VideoModel, VideosServiceError> {
        let now = Utc::now();
        let file_name = store.unique_file_name(&upload.file_name, now);

        let txn = self.db.begin().await?;

        let video = VideoActiveModel {
            id: NotSet,
            title: Set(upload.resolved_title()),
            file_path: Set(store.public_path(&file_name)),
            duration: Set(Some(DEFAULT_DURATION.to_string())),
            caption: Set(None),
            thumbnail_path: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if let Err(error) = store.write(&file_name, &upload.data).await {
            warn!(%file_name, %error, "writing upload failed, rolling back");
            txn.rollback().await?;
            return Err(error.into());
        }

        if let Err(error) = txn.commit().await {
            if let Err(cleanup) = store.remove(&file_name).await {
                warn!(%file_name, error = %cleanup, "failed to remove orphaned upload");
            }
            return Err(error.into());
        }

        info!(
            video_id = %video.id,
            file_path = %video.file_path,
            bytes = upload.data.len(),
            "video uploaded"
        );

        Ok(video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::TimeZone;

    async fn setup_test_service() -> VideosService {
        VideosService::new(crate::test_utils::create_test_db().await)
    }

    fn upload(name: &str, title: Option<&str>) -> VideoUpload {
        VideoUpload {
            file_name: name.to_string(),
            title: title.map(str::to_string),
            data: Bytes::from_static(b"\x00\x00\x00\x18ftypmp42"),
        }
    }

    #[tokio::test]
    async fn test_store_upload_writes_file_and_row() {
        let service = setup_test_service().await;
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), "/uploads");

        let video = service
            .store_upload(&store, upload("My Clip.mp4", None))
            .await
            .expect("Failed to store upload");

        assert_eq!(video.title, "My Clip.mp4");
        assert_eq!(video.duration.as_deref(), Some(DEFAULT_DURATION));
        assert!(video.file_path.starts_with("/uploads/"));
        assert!(video.file_path.ends_with("-MyClip.mp4"));

        let file_name = video.file_path.trim_start_matches("/uploads/");
        let on_disk = tokio::fs::read(store.disk_path(file_name)).await.unwrap();
        assert_eq!(on_disk, b"\x00\x00\x00\x18ftypmp42");

        let fetched = service.get_video(video.id).await.unwrap();
        assert_eq!(fetched, video);
    }

    #[tokio::test]
    async fn test_store_upload_uses_given_title() {
        let service = setup_test_service().await;
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), "/uploads");

        let video = service
            .store_upload(&store, upload("raw.mov", Some("Launch teaser")))
            .await
            .unwrap();

        assert_eq!(video.title, "Launch teaser");
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_row() {
        let service = setup_test_service().await;
        // A regular file where the uploads directory should be.
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let store = UploadStore::new(blocker.path(), "/uploads");

        let result = service.store_upload(&store, upload("a.mp4", None)).await;

        assert!(matches!(result, Err(VideosServiceError::Storage(_))));
        assert_eq!(Video::find().count(&service.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_video_not_found() {
        let service = setup_test_service().await;

        let result = service.get_video(VideoId::new(3)).await;
        assert!(matches!(result, Err(VideosServiceError::VideoNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_video_changes_only_given_fields() {
        let service = setup_test_service().await;
        let video = crate::test_utils::insert_video(&service.db, "Original").await;

        let updated = service
            .update_video(
                video.id,
                VideoChanges {
                    caption: Some("Watch till the end".to_string()),
                    duration: Some("1:42".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Original");
        assert_eq!(updated.caption.as_deref(), Some("Watch till the end"));
        assert_eq!(updated.duration.as_deref(), Some("1:42"));
        assert_eq!(updated.file_path, video.file_path);

        let untouched = service
            .update_video(video.id, VideoChanges::default())
            .await
            .unwrap();
        assert_eq!(untouched, updated);
    }

    #[tokio::test]
    async fn test_get_video_by_post() {
        let service = setup_test_service().await;
        let video = crate::test_utils::insert_video(&service.db, "Posted").await;
        let set = crate::test_utils::insert_account_set(&service.db, "Set").await;
        let at = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap();

        let post = PostActiveModel {
            id: NotSet,
            video_id: Set(video.id),
            account_set_id: Set(set.id),
            scheduled_date: Set(at),
            notes: Set(None),
            created_at: Set(at),
            updated_at: Set(at),
        }
        .insert(&service.db)
        .await
        .unwrap();

        assert_eq!(service.get_video_by_post(post.id).await.unwrap(), video);
        assert!(matches!(
            service.get_video_by_post(PostId::new(99)).await,
            Err(VideosServiceError::PostNotFound(_))
        ));
    }
}
