use crate::ids::{AccountSetId, PostId, VideoId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: PostId,
    pub video_id: VideoId,
    pub account_set_id: AccountSetId,
    pub scheduled_date: DateTimeUtc,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::video::Entity",
        from = "Column::VideoId",
        to = "super::video::Column::Id"
    )]
    Video,
    #[sea_orm(
        belongs_to = "super::account_set::Entity",
        from = "Column::AccountSetId",
        to = "super::account_set::Column::Id"
    )]
    AccountSet,
    #[sea_orm(has_many = "super::post_status::Entity")]
    PostStatus,
}

impl Related<super::video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Video.def()
    }
}

impl Related<super::account_set::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountSet.def()
    }
}

impl Related<super::post_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostStatus.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
