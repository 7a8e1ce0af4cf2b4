use crate::ids::{AccountId, AccountSetId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Social platform an account logs into. Stored as its display name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum Platform {
    #[sea_orm(string_value = "YouTube")]
    YouTube,
    #[sea_orm(string_value = "TikTok")]
    TikTok,
    #[sea_orm(string_value = "Instagram")]
    Instagram,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: AccountId,
    pub account_set_id: AccountSetId,
    pub platform: Platform,
    pub account_name: String,
    pub username: String,
    pub password: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account_set::Entity",
        from = "Column::AccountSetId",
        to = "super::account_set::Column::Id"
    )]
    AccountSet,
    #[sea_orm(has_many = "super::post_status::Entity")]
    PostStatus,
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
