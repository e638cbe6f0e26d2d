use serde::Serialize;

/// Role assigned when neither the request nor the profile store supplies one.
pub const DEFAULT_ROLE: &str = "operador";

/// Active flag assigned when neither the request nor the profile store supplies one.
pub const DEFAULT_IS_ACTIVE: bool = true;

/// Identity-provider account as returned by `listUsers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub email: String,
}

/// Informational metadata attached to the provider record at creation.
///
/// The profile store is the source of truth for these values; nothing reads them back
/// from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountMetadata {
    pub display_name: String,
    pub role: String,
    pub is_active: bool,
}

/// Credentials and metadata for a new provider account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub metadata: AccountMetadata,
}

/// Application-side attributes of an account, keyed by the provider account id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub role: String,
    pub is_active: bool,
    pub display_name: String,
}

impl Profile {
    /// Profile presented for an account that has no row in the profile store.
    pub fn default_for(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            role: DEFAULT_ROLE.to_owned(),
            is_active: DEFAULT_IS_ACTIVE,
            display_name: String::new(),
        }
    }
}

/// Partial profile update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.is_active.is_none()
    }
}

/// Read-only join of a provider account with its profile, used for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    pub uid: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub display_name: String,
}

impl AccountView {
    pub fn merge(account: Account, profile: Option<&Profile>) -> Self {
        let profile = profile.cloned().unwrap_or_else(|| Profile::default_for(&account.id));
        Self {
            uid: account.id,
            email: account.email,
            role: profile.role,
            is_active: profile.is_active,
            display_name: profile.display_name,
        }
    }
}

/// `Some(value)` when the value is present and not blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
