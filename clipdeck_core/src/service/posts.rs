use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    sea_query::{Alias, Expr, Func, Query},
    DatabaseConnection, FromQueryResult,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    entity::prelude::*,
    ids::{AccountId, AccountSetId, PostId, VideoId},
    models::post::{
        day_bounds, AccountSetSummary, DashboardCounts, DashboardStats, NewPost, PostChanges,
        PostStatusWithAccount, PostWithRelations, DEFAULT_UPCOMING_LIMIT,
    },
    reconcile::group_rows,
};

#[derive(Debug, Error)]
pub enum PostsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("post {0} not found")]
    PostNotFound(PostId),

    #[error("video {0} not found")]
    VideoNotFound(VideoId),

    #[error("account set {0} not found")]
    AccountSetNotFound(AccountSetId),

    #[error("no status for account {account_id} on post {post_id}")]
    StatusNotFound {
        post_id: PostId,
        account_id: AccountId,
    },
}

#[derive(Clone)]
pub struct PostsService {
    db: DatabaseConnection,
}

impl PostsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Schedule a video against an account set. Every account in the set
    /// starts with an unposted status.
    pub async fn create_post(
        &self,
        new_post: NewPost,
    ) -> Result<PostWithRelations, PostsServiceError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        Video::find_by_id(new_post.video_id)
            .one(&txn)
            .await?
            .ok_or(PostsServiceError::VideoNotFound(new_post.video_id))?;

        AccountSet::find_by_id(new_post.account_set_id)
            .one(&txn)
            .await?
            .ok_or(PostsServiceError::AccountSetNotFound(new_post.account_set_id))?;

        let post = PostActiveModel {
            id: NotSet,
            video_id: Set(new_post.video_id),
            account_set_id: Set(new_post.account_set_id),
            scheduled_date: Set(new_post.scheduled_date),
            notes: Set(new_post.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let accounts = Account::find()
            .filter(AccountColumn::AccountSetId.eq(post.account_set_id))
            .all(&txn)
            .await?;

        let statuses: Vec<PostStatusActiveModel> = accounts
            .iter()
            .map(|account| PostStatusActiveModel::unposted(post.id, account.id, now))
            .collect();

        if !statuses.is_empty() {
            PostStatus::insert_many(statuses).exec(&txn).await?;
        }

        txn.commit().await?;

        info!(
            post_id = %post.id,
            account_set_id = %post.account_set_id,
            statuses = accounts.len(),
            scheduled_date = %post.scheduled_date,
            "post scheduled"
        );

        self.get_post(post.id).await
    }

    pub async fn get_post(&self, id: PostId) -> Result<PostWithRelations, PostsServiceError> {
        hydrate(&self.db, Post::find_by_id(id))
            .await?
            .into_iter()
            .next()
            .ok_or(PostsServiceError::PostNotFound(id))
    }

    /// Posts scheduled in `[start, end)`, earliest first
    pub async fn list_posts_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PostWithRelations>, PostsServiceError> {
        let query = Post::find()
            .filter(PostColumn::ScheduledDate.gte(start))
            .filter(PostColumn::ScheduledDate.lt(end))
            .order_by_asc(PostColumn::ScheduledDate)
            .order_by_asc(PostColumn::Id);

        let posts = hydrate(&self.db, query).await?;
        debug!(%start, %end, count = posts.len(), "listed posts");
        Ok(posts)
    }

    pub async fn todays_posts(&self) -> Result<Vec<PostWithRelations>, PostsServiceError> {
        self.todays_posts_at(Utc::now()).await
    }

    /// Posts scheduled on the UTC day containing `now`
    pub async fn todays_posts_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<PostWithRelations>, PostsServiceError> {
        let (start, end) = day_bounds(now);
        self.list_posts_between(start, end).await
    }

    pub async fn upcoming_posts(
        &self,
        limit: Option<u64>,
    ) -> Result<Vec<PostWithRelations>, PostsServiceError> {
        self.upcoming_posts_at(Utc::now(), limit).await
    }

    /// Posts from the start of today onward, earliest first.
    ///
    /// `limit` caps the number of posts, not joined status rows.
    pub async fn upcoming_posts_at(
        &self,
        now: DateTime<Utc>,
        limit: Option<u64>,
    ) -> Result<Vec<PostWithRelations>, PostsServiceError> {
        let (today, _) = day_bounds(now);
        let limit = limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);

        let ids: Vec<PostId> = Post::find()
            .filter(PostColumn::ScheduledDate.gte(today))
            .order_by_asc(PostColumn::ScheduledDate)
            .order_by_asc(PostColumn::Id)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|post| post.id)
            .collect();

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = Post::find()
            .filter(PostColumn::Id.is_in(ids))
            .order_by_asc(PostColumn::ScheduledDate)
            .order_by_asc(PostColumn::Id);

        Ok(hydrate(&self.db, query).await?)
    }

    pub async fn mark_posted(
        &self,
        post_id: PostId,
        account_id: AccountId,
    ) -> Result<PostStatusModel, PostsServiceError> {
        let now = Utc::now();
        self.set_posted(post_id, account_id, true, Some(now), now)
            .await
    }

    pub async fn mark_not_posted(
        &self,
        post_id: PostId,
        account_id: AccountId,
    ) -> Result<PostStatusModel, PostsServiceError> {
        self.set_posted(post_id, account_id, false, None, Utc::now())
            .await
    }

    /// Flip a status in one statement. `posted_at` is derived from the value
    /// being replaced, so concurrent toggles never read a stale flag.
    pub async fn toggle_posted(
        &self,
        post_id: PostId,
        account_id: AccountId,
    ) -> Result<PostStatusModel, PostsServiceError> {
        let now = Utc::now();

        let result = PostStatus::update_many()
            .col_expr(
                PostStatusColumn::PostedAt,
                Expr::case(
                    Expr::col(PostStatusColumn::IsPosted).eq(true),
                    Expr::value(Option::<DateTime<Utc>>::None),
                )
                .finally(Expr::value(now))
                .into(),
            )
            .col_expr(
                PostStatusColumn::IsPosted,
                Expr::col(PostStatusColumn::IsPosted).not(),
            )
            .col_expr(PostStatusColumn::UpdatedAt, Expr::value(now))
            .filter(PostStatusColumn::PostId.eq(post_id))
            .filter(PostStatusColumn::AccountId.eq(account_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(PostsServiceError::StatusNotFound {
                post_id,
                account_id,
            });
        }

        let status = self.find_status(post_id, account_id).await?;
        info!(
            post_id = %post_id,
            account_id = %account_id,
            is_posted = status.is_posted,
            "post status toggled"
        );
        Ok(status)
    }

    pub async fn update_post(
        &self,
        id: PostId,
        changes: PostChanges,
    ) -> Result<PostWithRelations, PostsServiceError> {
        let existing = Post::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PostsServiceError::PostNotFound(id))?;

        let mut active: PostActiveModel = existing.into();
        if let Some(scheduled_date) = changes.scheduled_date {
            active.scheduled_date = Set(scheduled_date);
        }
        if let Some(notes) = changes.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;

        info!(post_id = %id, "post updated");
        self.get_post(id).await
    }

    /// Delete a post and its statuses
    pub async fn delete_post(&self, id: PostId) -> Result<(), PostsServiceError> {
        let txn = self.db.begin().await?;

        Post::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(PostsServiceError::PostNotFound(id))?;

        let statuses = PostStatus::delete_many()
            .filter(PostStatusColumn::PostId.eq(id))
            .exec(&txn)
            .await?;

        Post::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!(post_id = %id, statuses = statuses.rows_affected, "post deleted");
        Ok(())
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, PostsServiceError> {
        self.dashboard_stats_at(Utc::now()).await
    }

    /// Headline counts for the dashboard, computed in a single query.
    ///
    /// `scheduled_posts` counts posts after the start of tomorrow up to and
    /// including seven days from the start of today.
    pub async fn dashboard_stats_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<DashboardStats, PostsServiceError> {
        let (today, tomorrow) = day_bounds(now);
        let week_out = today + Duration::days(7);

        let post_id = || Expr::col((Post, PostColumn::Id));
        let scheduled = || Expr::col((Post, PostColumn::ScheduledDate));
        let is_today = || scheduled().gte(today).and(scheduled().lt(tomorrow));

        let query = Query::select()
            .expr_as(
                Func::count_distinct(post_id()),
                Alias::new("total_posts"),
            )
            .expr_as(
                Func::count_distinct(Expr::case(
                    scheduled().gt(tomorrow).and(scheduled().lte(week_out)),
                    post_id(),
                )),
                Alias::new("scheduled_posts"),
            )
            .expr_as(
                Func::count_distinct(Expr::case(is_today(), post_id())),
                Alias::new("total_today_posts"),
            )
            .expr_as(
                Func::count_distinct(Expr::case(
                    is_today().and(Expr::col((PostStatus, PostStatusColumn::IsPosted)).eq(true)),
                    post_id(),
                )),
                Alias::new("completed_today"),
            )
            .from(Post)
            .left_join(
                PostStatus,
                Expr::col((PostStatus, PostStatusColumn::PostId)).equals((Post, PostColumn::Id)),
            )
            .to_owned();

        let backend = self.db.get_database_backend();
        let counts = DashboardCounts::find_by_statement(backend.build(&query))
            .one(&self.db)
            .await?
            .unwrap_or_default();

        let stats = DashboardStats::from(counts);
        debug!(?stats, "dashboard stats computed");
        Ok(stats)
    }

    async fn set_posted(
        &self,
        post_id: PostId,
        account_id: AccountId,
        is_posted: bool,
        posted_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<PostStatusModel, PostsServiceError> {
        let result = PostStatus::update_many()
            .col_expr(PostStatusColumn::IsPosted, Expr::value(is_posted))
            .col_expr(PostStatusColumn::PostedAt, Expr::value(posted_at))
            .col_expr(PostStatusColumn::UpdatedAt, Expr::value(now))
            .filter(PostStatusColumn::PostId.eq(post_id))
            .filter(PostStatusColumn::AccountId.eq(account_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(PostsServiceError::StatusNotFound {
                post_id,
                account_id,
            });
        }

        info!(post_id = %post_id, account_id = %account_id, is_posted, "post status set");
        self.find_status(post_id, account_id).await
    }

    async fn find_status(
        &self,
        post_id: PostId,
        account_id: AccountId,
    ) -> Result<PostStatusModel, PostsServiceError> {
        PostStatus::find()
            .filter(PostStatusColumn::PostId.eq(post_id))
            .filter(PostStatusColumn::AccountId.eq(account_id))
            .one(&self.db)
            .await?
            .ok_or(PostsServiceError::StatusNotFound {
                post_id,
                account_id,
            })
    }
}

/// Runs `posts` joined with their statuses and attaches video, account set
/// and status accounts. Post order follows `posts`; statuses are ordered by id.
async fn hydrate<C>(conn: &C, posts: Select<Post>) -> Result<Vec<PostWithRelations>, DbErr>
where
    C: ConnectionTrait,
{
    let rows = posts
        .find_also_related(PostStatus)
        .order_by_asc(PostStatusColumn::Id)
        .all(conn)
        .await?;

    let grouped = group_rows(rows, |post| post.id);
    if grouped.is_empty() {
        return Ok(Vec::new());
    }

    let video_ids: Vec<VideoId> = grouped.iter().map(|(post, _)| post.video_id).collect();
    let set_ids: Vec<AccountSetId> = grouped
        .iter()
        .map(|(post, _)| post.account_set_id)
        .collect();
    let account_ids: Vec<AccountId> = grouped
        .iter()
        .flat_map(|(_, statuses)| statuses.iter().map(|status| status.account_id))
        .collect();

    let videos: HashMap<VideoId, VideoModel> = Video::find()
        .filter(VideoColumn::Id.is_in(video_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|video| (video.id, video))
        .collect();

    let sets: HashMap<AccountSetId, AccountSetModel> = AccountSet::find()
        .filter(AccountSetColumn::Id.is_in(set_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|set| (set.id, set))
        .collect();

    let accounts: HashMap<AccountId, AccountModel> = if account_ids.is_empty() {
        HashMap::new()
    } else {
        Account::find()
            .filter(AccountColumn::Id.is_in(account_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|account| (account.id, account))
            .collect()
    };

    grouped
        .into_iter()
        .map(|(post, statuses)| {
            let account_set = sets
                .get(&post.account_set_id)
                .cloned()
                .map(AccountSetSummary::from)
                .ok_or_else(|| {
                    DbErr::RecordNotFound(format!(
                        "account set {} of post {}",
                        post.account_set_id, post.id
                    ))
                })?;

            let statuses = statuses
                .into_iter()
                .filter_map(|status| {
                    let account = accounts.get(&status.account_id).cloned()?;
                    Some(PostStatusWithAccount {
                        status,
                        account: account.into(),
                    })
                })
                .collect();

            Ok(PostWithRelations {
                video: videos.get(&post.video_id).cloned(),
                account_set,
                statuses,
                post,
            })
        })
        .collect()
}
