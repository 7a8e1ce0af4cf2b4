// SeaORM entities
// One module per table; the `prelude` re-exports them under
// table-prefixed names so services can import everything at once.

pub mod account;
pub mod account_set;
pub mod post;
pub mod post_status;
pub mod video;


pub mod prelude {
    // Re-export all entities for convenience
    pub use super::account::{
        ActiveModel as AccountActiveModel, Column as AccountColumn, Entity as Account,
        Model as AccountModel, Platform,
    };
    pub use super::account_set::{
        ActiveModel as AccountSetActiveModel, Column as AccountSetColumn, Entity as AccountSet,
        Model as AccountSetModel,
    };
    pub use super::post::{
        ActiveModel as PostActiveModel, Column as PostColumn, Entity as Post, Model as PostModel,
    };
    pub use super::post_status::{
        ActiveModel as PostStatusActiveModel, Column as PostStatusColumn,
        Entity as PostStatus, Model as PostStatusModel,
    };
    pub use super::video::{
        ActiveModel as VideoActiveModel, Column as VideoColumn, Entity as Video,
        Model as VideoModel,
    };

    // Re-export commonly used SeaORM types and traits
    pub use sea_orm::{
        ActiveModelTrait,
        ActiveValue,

        ColumnTrait,
        ConnectionTrait,

        // Database and connection types
        Database,
        DatabaseConnection,
        DatabaseTransaction,
        // Common result types
        DbErr,

        // Core traits
        EntityTrait,
        ModelTrait,
        NotSet,
        PaginatorTrait,
        QueryFilter,
        QueryOrder,
        QuerySelect,
        Related,
        // Query builders
        Select,
        // Active model helpers
        Set,
        TransactionTrait,
        Unchanged,
    };
}
