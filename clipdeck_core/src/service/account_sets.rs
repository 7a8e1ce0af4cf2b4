use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    entity::prelude::*,
    ids::{AccountId, AccountSetId},
    models::account_set::{AccountInput, AccountSetInput, AccountSetWithAccounts},
    reconcile::{diff_roster, group_rows},
};

#[derive(Debug, Error)]
pub enum AccountSetsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("account set {0} not found")]
    AccountSetNotFound(AccountSetId),
}

#[derive(Clone)]
pub struct AccountSetsService {
    db: DatabaseConnection,
}

impl AccountSetsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create an account set together with its initial accounts
    pub async fn create_account_set(
        &self,
        account_set: AccountSetInput,
        accounts: Vec<AccountInput>,
    ) -> Result<AccountSetWithAccounts, AccountSetsServiceError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let set = account_set.into_new_active(now).insert(&txn).await?;

        let mut created = Vec::with_capacity(accounts.len());
        for account in accounts {
            created.push(account.into_new_active(set.id, now).insert(&txn).await?);
        }

        txn.commit().await?;

        info!(
            account_set_id = %set.id,
            accounts = created.len(),
            "account set created"
        );

        Ok(AccountSetWithAccounts {
            account_set: set,
            accounts: created,
        })
    }

    /// Get an account set with its accounts
    pub async fn get_account_set(
        &self,
        id: AccountSetId,
    ) -> Result<AccountSetWithAccounts, AccountSetsServiceError> {
        let rows = AccountSet::find_by_id(id)
            .find_also_related(Account)
            .order_by_asc(AccountColumn::Id)
            .all(&self.db)
            .await?;

        group_rows(rows, |set| set.id)
            .into_iter()
            .next()
            .map(|(account_set, accounts)| AccountSetWithAccounts {
                account_set,
                accounts,
            })
            .ok_or(AccountSetsServiceError::AccountSetNotFound(id))
    }

    /// List every account set with its accounts, oldest set first
    pub async fn list_account_sets(
        &self,
    ) -> Result<Vec<AccountSetWithAccounts>, AccountSetsServiceError> {
        let rows = AccountSet::find()
            .order_by_asc(AccountSetColumn::Id)
            .find_also_related(Account)
            .order_by_asc(AccountColumn::Id)
            .all(&self.db)
            .await?;

        let sets: Vec<AccountSetWithAccounts> = group_rows(rows, |set| set.id)
            .into_iter()
            .map(|(account_set, accounts)| AccountSetWithAccounts {
                account_set,
                accounts,
            })
            .collect();

        debug!(count = sets.len(), "listed account sets");
        Ok(sets)
    }

    /// Replace an account set's fields and reconcile its roster with `accounts`.
    ///
    /// Accounts missing from `accounts` are deleted along with their statuses,
    /// accounts carrying a known id are overwritten, and the rest are inserted.
    /// Each inserted account gets an unposted status for every post already
    /// scheduled against the set.
    pub async fn update_account_set(
        &self,
        id: AccountSetId,
        account_set: AccountSetInput,
        accounts: Vec<AccountInput>,
    ) -> Result<AccountSetWithAccounts, AccountSetsServiceError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let existing_set = AccountSet::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AccountSetsServiceError::AccountSetNotFound(id))?;

        let updated_set = account_set.apply_to(existing_set, now).update(&txn).await?;

        let existing_accounts = Account::find()
            .filter(AccountColumn::AccountSetId.eq(id))
            .all(&txn)
            .await?;

        let diff = diff_roster(
            existing_accounts,
            accounts,
            |account| account.id,
            |account| account.id,
        );

        let removed: Vec<AccountId> = diff.removed.iter().map(|account| account.id).collect();
        if !removed.is_empty() {
            PostStatus::delete_many()
                .filter(PostStatusColumn::AccountId.is_in(removed.clone()))
                .exec(&txn)
                .await?;

            Account::delete_many()
                .filter(AccountColumn::AccountSetId.eq(id))
                .filter(AccountColumn::Id.is_in(removed.clone()))
                .exec(&txn)
                .await?;
        }

        let updated = diff.retained.len();
        for (account_id, account) in diff.retained {
            account
                .into_update_active(account_id, id, now)
                .update(&txn)
                .await?;
        }

        let mut inserted = Vec::with_capacity(diff.added.len());
        for account in diff.added {
            inserted.push(account.into_new_active(id, now).insert(&txn).await?);
        }

        let new_ids: Vec<AccountId> = inserted.iter().map(|account| account.id).collect();
        let statuses = fan_out_to_existing_posts(&txn, id, &new_ids, now).await?;

        let accounts = Account::find()
            .filter(AccountColumn::AccountSetId.eq(id))
            .order_by_asc(AccountColumn::Id)
            .all(&txn)
            .await?;

        txn.commit().await?;

        info!(
            account_set_id = %id,
            removed = removed.len(),
            updated,
            inserted = new_ids.len(),
            statuses,
            "account set updated"
        );

        Ok(AccountSetWithAccounts {
            account_set: updated_set,
            accounts,
        })
    }

    /// Add a single account to an existing set
    pub async fn add_account(
        &self,
        account_set_id: AccountSetId,
        account: AccountInput,
    ) -> Result<AccountModel, AccountSetsServiceError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        AccountSet::find_by_id(account_set_id)
            .one(&txn)
            .await?
            .ok_or(AccountSetsServiceError::AccountSetNotFound(account_set_id))?;

        let created = account
            .into_new_active(account_set_id, now)
            .insert(&txn)
            .await?;

        let statuses = fan_out_to_existing_posts(&txn, account_set_id, &[created.id], now).await?;

        txn.commit().await?;

        info!(
            account_set_id = %account_set_id,
            account_id = %created.id,
            statuses,
            "account added"
        );

        Ok(created)
    }

    /// Delete an account set with its accounts, its posts and every status
    /// belonging to either
    pub async fn delete_account_set(&self, id: AccountSetId) -> Result<(), AccountSetsServiceError> {
        let txn = self.db.begin().await?;

        AccountSet::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AccountSetsServiceError::AccountSetNotFound(id))?;

        let post_ids: Vec<_> = Post::find()
            .filter(PostColumn::AccountSetId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|post| post.id)
            .collect();

        let account_ids: Vec<AccountId> = Account::find()
            .filter(AccountColumn::AccountSetId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|account| account.id)
            .collect();

        if !post_ids.is_empty() || !account_ids.is_empty() {
            PostStatus::delete_many()
                .filter(
                    PostStatusColumn::PostId
                        .is_in(post_ids.clone())
                        .or(PostStatusColumn::AccountId.is_in(account_ids.clone())),
                )
                .exec(&txn)
                .await?;
        }

        Post::delete_many()
            .filter(PostColumn::AccountSetId.eq(id))
            .exec(&txn)
            .await?;

        Account::delete_many()
            .filter(AccountColumn::AccountSetId.eq(id))
            .exec(&txn)
            .await?;

        AccountSet::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!(
            account_set_id = %id,
            posts = post_ids.len(),
            accounts = account_ids.len(),
            "account set deleted"
        );

        Ok(())
    }
}

/// Inserts one unposted status per (existing post of the set, new account).
/// Returns the number of statuses created.
async fn fan_out_to_existing_posts<C>(
    conn: &C,
    account_set_id: AccountSetId,
    new_accounts: &[AccountId],
    now: DateTime<Utc>,
) -> Result<usize, DbErr>
where
    C: ConnectionTrait,
{
    if new_accounts.is_empty() {
        return Ok(0);
    }

    let posts = Post::find()
        .filter(PostColumn::AccountSetId.eq(account_set_id))
        .all(conn)
        .await?;

    let statuses: Vec<PostStatusActiveModel> = posts
        .iter()
        .flat_map(|post| {
            new_accounts
                .iter()
                .map(move |account_id| PostStatusActiveModel::unposted(post.id, *account_id, now))
        })
        .collect();

    let created = statuses.len();
    if created > 0 {
        PostStatus::insert_many(statuses).exec(conn).await?;
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, account_input, set_input};
    use chrono::TimeZone;

    async fn setup_test_service() -> AccountSetsService {
        AccountSetsService::new(test_utils::create_test_db().await)
    }

    async fn statuses_for_account(service: &AccountSetsService, id: AccountId) -> Vec<PostStatusModel> {
        PostStatus::find()
            .filter(PostStatusColumn::AccountId.eq(id))
            .all(&service.db)
            .await
            .unwrap()
    }

    async fn schedule_raw_post(service: &AccountSetsService, set_id: AccountSetId) -> PostModel {
        let video = test_utils::insert_video(&service.db, "clip").await;
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        PostActiveModel {
            id: NotSet,
            video_id: Set(video.id),
            account_set_id: Set(set_id),
            scheduled_date: Set(at),
            notes: Set(None),
            created_at: Set(at),
            updated_at: Set(at),
        }
        .insert(&service.db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_account_set_with_accounts() {
        let service = setup_test_service().await;

        let created = service
            .create_account_set(
                set_input("Gaming"),
                vec![
                    account_input(None, Platform::YouTube, "gaming_yt"),
                    account_input(None, Platform::TikTok, "gaming_tt"),
                    account_input(None, Platform::Instagram, "gaming_ig"),
                ],
            )
            .await
            .expect("Failed to create account set");

        assert_eq!(created.account_set.name, "Gaming");
        assert_eq!(created.accounts.len(), 3);
        assert!(created
            .accounts
            .iter()
            .all(|account| account.account_set_id == created.account_set.id));
    }

    #[tokio::test]
    async fn test_create_account_set_without_accounts() {
        let service = setup_test_service().await;

        let created = service
            .create_account_set(set_input("Empty"), vec![])
            .await
            .unwrap();

        let fetched = service.get_account_set(created.account_set.id).await.unwrap();
        assert!(fetched.accounts.is_empty());
    }

    #[tokio::test]
    async fn test_get_account_set_not_found() {
        let service = setup_test_service().await;

        let result = service.get_account_set(AccountSetId::new(404)).await;
        assert!(matches!(
            result,
            Err(AccountSetsServiceError::AccountSetNotFound(id)) if id == AccountSetId::new(404)
        ));
    }

    #[tokio::test]
    async fn test_list_account_sets_groups_accounts() {
        let service = setup_test_service().await;

        service
            .create_account_set(
                set_input("First"),
                vec![
                    account_input(None, Platform::YouTube, "a"),
                    account_input(None, Platform::TikTok, "b"),
                ],
            )
            .await
            .unwrap();
        service
            .create_account_set(set_input("Second"), vec![])
            .await
            .unwrap();
        service
            .create_account_set(
                set_input("Third"),
                vec![account_input(None, Platform::Instagram, "c")],
            )
            .await
            .unwrap();

        let sets = service.list_account_sets().await.unwrap();
        let shape: Vec<(&str, usize)> = sets
            .iter()
            .map(|set| (set.account_set.name.as_str(), set.accounts.len()))
            .collect();

        assert_eq!(shape, vec![("First", 2), ("Second", 0), ("Third", 1)]);
    }

    #[tokio::test]
    async fn test_update_reconciles_roster() {
        let service = setup_test_service().await;

        let created = service
            .create_account_set(
                set_input("Gaming"),
                vec![
                    account_input(None, Platform::YouTube, "keep"),
                    account_input(None, Platform::TikTok, "drop"),
                    account_input(None, Platform::Instagram, "rename"),
                ],
            )
            .await
            .unwrap();
        let set_id = created.account_set.id;
        let keep = created.accounts[0].id;
        let drop = created.accounts[1].id;
        let rename = created.accounts[2].id;

        let updated = service
            .update_account_set(
                set_id,
                AccountSetInput {
                    description: Some("Retro games".to_string()),
                    ..set_input("Gaming v2")
                },
                vec![
                    account_input(Some(keep), Platform::YouTube, "keep"),
                    account_input(Some(rename), Platform::Instagram, "renamed"),
                    account_input(None, Platform::TikTok, "fresh"),
                ],
            )
            .await
            .expect("Failed to update account set");

        assert_eq!(updated.account_set.name, "Gaming v2");
        assert_eq!(updated.account_set.description.as_deref(), Some("Retro games"));
        assert_eq!(updated.account_set.created_at, created.account_set.created_at);

        let ids: Vec<AccountId> = updated.accounts.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&keep));
        assert!(ids.contains(&rename));
        assert!(!ids.contains(&drop));

        let renamed = updated.accounts.iter().find(|a| a.id == rename).unwrap();
        assert_eq!(renamed.account_name, "renamed");

        let fetched = service.get_account_set(set_id).await.unwrap();
        assert_eq!(fetched.accounts, updated.accounts);
    }

    #[tokio::test]
    async fn test_update_missing_set_fails() {
        let service = setup_test_service().await;

        let result = service
            .update_account_set(AccountSetId::new(9), set_input("Nope"), vec![])
            .await;

        assert!(matches!(
            result,
            Err(AccountSetsServiceError::AccountSetNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_new_accounts_get_statuses_for_existing_posts() {
        let service = setup_test_service().await;

        let created = service
            .create_account_set(
                set_input("Cooking"),
                vec![account_input(None, Platform::YouTube, "chef")],
            )
            .await
            .unwrap();
        let set_id = created.account_set.id;

        let first = schedule_raw_post(&service, set_id).await;
        let second = schedule_raw_post(&service, set_id).await;

        let updated = service
            .update_account_set(
                set_id,
                set_input("Cooking"),
                vec![
                    account_input(Some(created.accounts[0].id), Platform::YouTube, "chef"),
                    account_input(None, Platform::TikTok, "chef_tt"),
                ],
            )
            .await
            .unwrap();

        let new_account = updated
            .accounts
            .iter()
            .find(|a| a.account_name == "chef_tt")
            .unwrap();

        let statuses = statuses_for_account(&service, new_account.id).await;
        assert_eq!(statuses.len(), 2);
        assert!(statuses.iter().all(|s| !s.is_posted && s.posted_at.is_none()));

        let mut post_ids: Vec<_> = statuses.iter().map(|s| s.post_id).collect();
        post_ids.sort();
        assert_eq!(post_ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_removed_account_takes_its_statuses() {
        let service = setup_test_service().await;

        let created = service
            .create_account_set(
                set_input("Travel"),
                vec![account_input(None, Platform::Instagram, "wander")],
            )
            .await
            .unwrap();
        let set_id = created.account_set.id;
        let post = schedule_raw_post(&service, set_id).await;

        let added = service
            .add_account(set_id, account_input(None, Platform::TikTok, "short"))
            .await
            .unwrap();
        assert_eq!(statuses_for_account(&service, added.id).await.len(), 1);

        service
            .update_account_set(
                set_id,
                set_input("Travel"),
                vec![account_input(
                    Some(created.accounts[0].id),
                    Platform::Instagram,
                    "wander",
                )],
            )
            .await
            .unwrap();

        assert!(statuses_for_account(&service, added.id).await.is_empty());
        let remaining = PostStatus::find()
            .filter(PostStatusColumn::PostId.eq(post.id))
            .count(&service.db)
            .await
            .unwrap();
        assert_eq!(remaining, 0, "only the fanned-out status existed for this post");
    }

    #[tokio::test]
    async fn test_add_account_to_missing_set_fails() {
        let service = setup_test_service().await;

        let result = service
            .add_account(
                AccountSetId::new(77),
                account_input(None, Platform::YouTube, "ghost"),
            )
            .await;

        assert!(matches!(
            result,
            Err(AccountSetsServiceError::AccountSetNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_account_set_cascades_to_posts() {
        let service = setup_test_service().await;

        let created = service
            .create_account_set(
                set_input("Doomed"),
                vec![account_input(None, Platform::YouTube, "gone")],
            )
            .await
            .unwrap();
        let set_id = created.account_set.id;
        let post = schedule_raw_post(&service, set_id).await;
        service
            .add_account(set_id, account_input(None, Platform::TikTok, "also_gone"))
            .await
            .unwrap();

        service
            .delete_account_set(set_id)
            .await
            .expect("Failed to delete account set");

        assert!(service.get_account_set(set_id).await.is_err());
        assert!(Post::find_by_id(post.id)
            .one(&service.db)
            .await
            .unwrap()
            .is_none());
        assert_eq!(Account::find().count(&service.db).await.unwrap(), 0);
        assert_eq!(PostStatus::find().count(&service.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_set_fails() {
        let service = setup_test_service().await;

        let result = service.delete_account_set(AccountSetId::new(1)).await;
        assert!(result.is_err());
    }
}
