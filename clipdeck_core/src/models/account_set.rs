use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::NotSet, Set, Unchanged};
use serde::{Deserialize, Serialize};

use crate::{
    entity::prelude::*,
    ids::{AccountId, AccountSetId},
};

/// Editable fields of an account set, as submitted by the set form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSetInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_password: Option<String>,
}

/// One row of the account roster form. `id` is present for accounts that
/// already exist and absent for accounts added in this submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInput {
    #[serde(default)]
    pub id: Option<AccountId>,
    pub platform: Platform,
    pub account_name: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSetWithAccounts {
    #[serde(flatten)]
    pub account_set: AccountSetModel,
    pub accounts: Vec<AccountModel>,
}

impl AccountSetInput {
    pub(crate) fn into_new_active(self, now: DateTime<Utc>) -> AccountSetActiveModel {
        AccountSetActiveModel {
            id: NotSet,
            name: Set(self.name),
            description: Set(self.description),
            phone: Set(self.phone),
            email: Set(self.email),
            email_password: Set(self.email_password),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    /// Overwrites every editable field of `existing`, keeping its identity
    /// and creation time.
    pub(crate) fn apply_to(
        self,
        existing: AccountSetModel,
        now: DateTime<Utc>,
    ) -> AccountSetActiveModel {
        let mut active: AccountSetActiveModel = existing.into();
        active.name = Set(self.name);
        active.description = Set(self.description);
        active.phone = Set(self.phone);
        active.email = Set(self.email);
        active.email_password = Set(self.email_password);
        active.updated_at = Set(now);
        active
    }
}

impl AccountInput {
    pub(crate) fn into_new_active(
        self,
        account_set_id: AccountSetId,
        now: DateTime<Utc>,
    ) -> AccountActiveModel {
        AccountActiveModel {
            id: NotSet,
            account_set_id: Set(account_set_id),
            platform: Set(self.platform),
            account_name: Set(self.account_name),
            username: Set(self.username),
            password: Set(self.password),
            notes: Set(self.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    /// Field-by-field replacement of an existing account. The owning set is
    /// always rewritten to `account_set_id`.
    pub(crate) fn into_update_active(
        self,
        account_id: AccountId,
        account_set_id: AccountSetId,
        now: DateTime<Utc>,
    ) -> AccountActiveModel {
        AccountActiveModel {
            id: Unchanged(account_id),
            account_set_id: Set(account_set_id),
            platform: Set(self.platform),
            account_name: Set(self.account_name),
            username: Set(self.username),
            password: Set(self.password),
            notes: Set(self.notes),
            created_at: NotSet,
            updated_at: Set(now),
        }
    }
}
