use chrono::{DateTime, Duration, NaiveTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::{
    entity::prelude::*,
    ids::{AccountId, AccountSetId, VideoId},
};

/// Number of posts returned by the upcoming list when no limit is given.
pub const DEFAULT_UPCOMING_LIMIT: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub video_id: VideoId,
    pub account_set_id: AccountSetId,
    pub scheduled_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial edit of a post; `None` leaves the field as it is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostChanges {
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSetSummary {
    pub id: AccountSetId,
    pub name: String,
}

/// The parts of an account shown next to a post status, without credentials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub platform: Platform,
    pub account_name: String,
    pub account_set_id: AccountSetId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStatusWithAccount {
    #[serde(flatten)]
    pub status: PostStatusModel,
    pub account: AccountSummary,
}

/// A post with everything the schedule views render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithRelations {
    #[serde(flatten)]
    pub post: PostModel,
    pub video: Option<VideoModel>,
    pub account_set: AccountSetSummary,
    pub statuses: Vec<PostStatusWithAccount>,
}

impl PostWithRelations {
    pub fn posted_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|entry| entry.status.is_posted)
            .count()
    }
}

impl From<AccountSetModel> for AccountSetSummary {
    fn from(model: AccountSetModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<AccountModel> for AccountSummary {
    fn from(model: AccountModel) -> Self {
        Self {
            id: model.id,
            platform: model.platform,
            account_name: model.account_name,
            account_set_id: model.account_set_id,
        }
    }
}

/// Raw bucket counts from the dashboard aggregate query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromQueryResult)]
pub struct DashboardCounts {
    pub total_posts: i64,
    pub scheduled_posts: i64,
    pub total_today_posts: i64,
    pub completed_today: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_posts: i64,
    /// Posts after today and up to a week out.
    pub scheduled_posts: i64,
    pub total_today_posts: i64,
    /// Today's posts published on at least one account.
    pub completed_today: i64,
    /// Whole percent, 0 when nothing is scheduled today.
    pub completion_rate: i64,
    pub pending_today_count: i64,
}

impl From<DashboardCounts> for DashboardStats {
    fn from(counts: DashboardCounts) -> Self {
        Self {
            total_posts: counts.total_posts,
            scheduled_posts: counts.scheduled_posts,
            total_today_posts: counts.total_today_posts,
            completed_today: counts.completed_today,
            completion_rate: completion_rate(counts.completed_today, counts.total_today_posts),
            pending_today_count: counts.total_today_posts - counts.completed_today,
        }
    }
}

pub fn completion_rate(completed: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as i64
}

/// Start of the UTC day containing `now`, and the start of the next one.
pub fn day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}
