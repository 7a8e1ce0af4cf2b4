use crate::ids::{AccountId, PostId, PostStatusId};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post_status")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: PostStatusId,
    pub post_id: PostId,
    pub account_id: AccountId,
    pub is_posted: bool,
    pub posted_at: Option<DateTimeUtc>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModel {
    /// A fresh status row for one (post, account) pair, not yet posted.
    pub fn unposted(post_id: PostId, account_id: AccountId, now: DateTimeUtc) -> Self {
        Self {
            id: NotSet,
            post_id: Set(post_id),
            account_id: Set(account_id),
            is_posted: Set(false),
            posted_at: Set(None),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
