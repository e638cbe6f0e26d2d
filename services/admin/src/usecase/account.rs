use std::collections::HashMap;

use crate::domain::observer::{AccountEvent, AccountObserver};
use crate::domain::repository::{IdentityProvider, ProfileRepository};
use crate::domain::types::{
    AccountMetadata, AccountView, DEFAULT_IS_ACTIVE, DEFAULT_ROLE, NewAccount, Profile,
    ProfilePatch, non_blank,
};
use crate::error::AdminServiceError;

// ── Inputs ───────────────────────────────────────────────────────────────────

/// Raw create request. Only `email` and `password` are required.
#[derive(Debug, Default)]
pub struct CreateAccountInput {
    pub email: Option<String>,
    pub password: Option<String>,
    /// Defaults to `""`.
    pub display_name: Option<String>,
    /// Defaults to [`DEFAULT_ROLE`].
    pub role: Option<String>,
    /// Defaults to [`DEFAULT_IS_ACTIVE`].
    pub is_active: Option<bool>,
}

#[derive(Debug, Default)]
pub struct DeleteAccountInput {
    pub uid: Option<String>,
}

#[derive(Debug, Default)]
pub struct UpdateRoleInput {
    pub uid: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default)]
pub struct UpdatePasswordInput {
    pub uid: Option<String>,
    pub password: Option<String>,
}

// ── AccountReconciler ────────────────────────────────────────────────────────

/// Keeps the identity provider and the profile store consistent without a shared
/// transaction.
///
/// The provider is written first and owns the account id. When a later profile write
/// fails, the provider write is undone with one best-effort delete (never retried)
/// and the profile error is returned. Validation always happens before the first
/// remote call.
pub struct AccountReconciler<P, S, O>
where
    P: IdentityProvider,
    S: ProfileRepository,
    O: AccountObserver,
{
    pub provider: P,
    pub profiles: S,
    pub observer: O,
}

impl<P, S, O> AccountReconciler<P, S, O>
where
    P: IdentityProvider,
    S: ProfileRepository,
    O: AccountObserver,
{
    /// Create the provider account, then its profile. Returns the new account id.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<String, AdminServiceError> {
        let email = non_blank(input.email)
            .ok_or_else(|| AdminServiceError::validation("email and password are required"))?;
        let password = input
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AdminServiceError::validation("email and password are required"))?;
        let metadata = AccountMetadata {
            display_name: input.display_name.unwrap_or_default(),
            role: non_blank(input.role).unwrap_or_else(|| DEFAULT_ROLE.to_owned()),
            is_active: input.is_active.unwrap_or(DEFAULT_IS_ACTIVE),
        };

        // 1. Provider create. Nothing exists yet, so a failure needs no compensation.
        let id = self
            .provider
            .create_user(&NewAccount {
                email,
                password,
                metadata: metadata.clone(),
            })
            .await?;

        // 2. Profile upsert, compensated by deleting the provider account.
        let profile = Profile {
            id: id.clone(),
            role: metadata.role,
            is_active: metadata.is_active,
            display_name: metadata.display_name,
        };
        if let Err(err) = self.profiles.upsert(&profile).await {
            self.observer.record(AccountEvent::ProfileWriteFailed {
                account_id: id.clone(),
                error: err.detail(),
            });
            self.compensate_create(&id).await;
            return Err(err);
        }

        self.observer.record(AccountEvent::AccountCreated {
            account_id: id.clone(),
        });
        Ok(id)
    }

    async fn compensate_create(&self, id: &str) {
        let event = match self.provider.delete_user(id).await {
            Ok(()) => AccountEvent::CompensationSucceeded {
                account_id: id.to_owned(),
            },
            Err(err) => AccountEvent::CompensationFailed {
                account_id: id.to_owned(),
                error: err.detail(),
            },
        };
        self.observer.record(event);
    }

    /// First provider page joined with stored profiles, in provider order.
    pub async fn list_accounts(&self) -> Result<Vec<AccountView>, AdminServiceError> {
        let accounts = self.provider.list_users().await?;
        if accounts.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = accounts.iter().map(|a| a.id.clone()).collect();
        let profiles = self.profiles.find_by_ids(&ids).await?;
        let by_id: HashMap<&str, &Profile> =
            profiles.iter().map(|p| (p.id.as_str(), p)).collect();

        Ok(accounts
            .into_iter()
            .map(|account| {
                let profile = by_id.get(account.id.as_str()).copied();
                AccountView::merge(account, profile)
            })
            .collect())
    }

    /// Delete the profile (best effort), then the provider account.
    ///
    /// A profile failure is reported and skipped: an orphaned profile row is preferred
    /// over a credential that can never be removed.
    pub async fn delete_account(&self, input: DeleteAccountInput) -> Result<(), AdminServiceError> {
        let id = non_blank(input.uid)
            .ok_or_else(|| AdminServiceError::validation("uid is required"))?;

        if let Err(err) = self.profiles.delete(&id).await {
            self.observer.record(AccountEvent::ProfileDeleteFailed {
                account_id: id.clone(),
                error: err.detail(),
            });
        }

        self.provider.delete_user(&id).await?;
        self.observer.record(AccountEvent::AccountDeleted { account_id: id });
        Ok(())
    }

    /// Partial update of the profile's role and/or active flag. The provider is untouched.
    pub async fn update_role_and_active(
        &self,
        input: UpdateRoleInput,
    ) -> Result<(), AdminServiceError> {
        let id = non_blank(input.uid)
            .ok_or_else(|| AdminServiceError::validation("uid is required"))?;
        let patch = ProfilePatch {
            role: input.role,
            is_active: input.is_active,
        };
        if patch.is_empty() {
            return Err(AdminServiceError::validation("nothing to update"));
        }
        if patch.role.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Err(AdminServiceError::validation("role must not be empty"));
        }
        self.profiles.update(&id, &patch).await
    }

    /// Replace the account's password at the provider. The profile store is untouched.
    pub async fn update_password(
        &self,
        input: UpdatePasswordInput,
    ) -> Result<(), AdminServiceError> {
        let id = non_blank(input.uid)
            .ok_or_else(|| AdminServiceError::validation("uid and password are required"))?;
        let password = input
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AdminServiceError::validation("uid and password are required"))?;
        self.provider.update_password(&id, &password).await
    }
}
