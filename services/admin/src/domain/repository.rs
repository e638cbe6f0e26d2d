#![allow(async_fn_in_trait)]

use crate::domain::types::{Account, NewAccount, Profile, ProfilePatch};
use crate::error::AdminServiceError;

/// Port for the external identity provider (service of record for credentials).
///
/// Every method is a single remote round trip; adapters never retry.
pub trait IdentityProvider: Send + Sync {
    /// Create a credential + identity record. Returns the provider-assigned account id.
    async fn create_user(&self, account: &NewAccount) -> Result<String, AdminServiceError>;

    /// First page of accounts, in provider order.
    async fn list_users(&self) -> Result<Vec<Account>, AdminServiceError>;

    async fn delete_user(&self, id: &str) -> Result<(), AdminServiceError>;

    async fn update_password(&self, id: &str, password: &str) -> Result<(), AdminServiceError>;
}

/// Repository for application profiles keyed by provider account id.
///
/// Each write is one atomic statement.
pub trait ProfileRepository: Send + Sync {
    /// Insert the profile, or overwrite every attribute of an existing row.
    async fn upsert(&self, profile: &Profile) -> Result<(), AdminServiceError>;

    /// Profiles whose id is in `ids`. Callers must not pass an empty slice.
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Profile>, AdminServiceError>;

    /// Apply a partial update. Fails with `StoreRejected` if no row has this id.
    async fn update(&self, id: &str, patch: &ProfilePatch) -> Result<(), AdminServiceError>;

    /// Delete a profile. Returns `true` if a row was deleted.
    async fn delete(&self, id: &str) -> Result<bool, AdminServiceError>;
}
