use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use daehan_admin::domain::observer::{AccountEvent, AccountObserver};
use daehan_admin::domain::repository::{IdentityProvider, ProfileRepository};
use daehan_admin::domain::types::{Account, AccountMetadata, NewAccount, Profile, ProfilePatch};
use daehan_admin::error::AdminServiceError;
use daehan_admin::usecase::account::AccountReconciler;

// ── Call log ─────────────────────────────────────────────────────────────────

/// One collaborator call, recorded in the order the reconciler made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ProviderCreate(String),
    ProviderList,
    ProviderDelete(String),
    ProviderUpdatePassword(String),
    StoreUpsert(String),
    StoreFind(Vec<String>),
    StoreUpdate(String),
    StoreDelete(String),
}

impl Call {
    pub fn is_provider(&self) -> bool {
        matches!(
            self,
            Self::ProviderCreate(_)
                | Self::ProviderList
                | Self::ProviderDelete(_)
                | Self::ProviderUpdatePassword(_)
        )
    }

    pub fn is_store(&self) -> bool {
        !self.is_provider()
    }
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

/// How a fake collaborator fails when a failure is armed.
#[derive(Debug, Clone, Copy)]
pub enum Fail {
    Rejected,
    Unavailable,
}

impl Fail {
    fn provider(self) -> AdminServiceError {
        match self {
            Self::Rejected => AdminServiceError::ProviderRejected("provider said no".into()),
            Self::Unavailable => {
                AdminServiceError::Provider(anyhow::anyhow!("connection reset by peer"))
            }
        }
    }

    fn store(self) -> AdminServiceError {
        match self {
            Self::Rejected => AdminServiceError::StoreRejected("constraint violated".into()),
            Self::Unavailable => AdminServiceError::Store(anyhow::anyhow!("pool timed out")),
        }
    }
}

// ── FakeProvider ─────────────────────────────────────────────────────────────

/// In-memory identity provider. Ids are assigned as `u1`, `u2`, ...
#[derive(Default)]
pub struct FakeProvider {
    pub accounts: Arc<Mutex<Vec<Account>>>,
    pub passwords: Arc<Mutex<HashMap<String, String>>>,
    pub metadata: Arc<Mutex<HashMap<String, AccountMetadata>>>,
    pub next_id: Mutex<u32>,
    pub calls: CallLog,
    pub fail_create: Option<Fail>,
    pub fail_list: Option<Fail>,
    pub fail_delete: Option<Fail>,
    pub fail_update_password: Option<Fail>,
}

impl FakeProvider {
    pub fn new(calls: &CallLog) -> Self {
        Self {
            calls: Arc::clone(calls),
            ..Self::default()
        }
    }

    pub fn with_accounts(calls: &CallLog, accounts: Vec<Account>) -> Self {
        let provider = Self::new(calls);
        *provider.next_id.lock().unwrap() = accounts.len() as u32;
        *provider.accounts.lock().unwrap() = accounts;
        provider
    }

    pub fn accounts_handle(&self) -> Arc<Mutex<Vec<Account>>> {
        Arc::clone(&self.accounts)
    }

    pub fn passwords_handle(&self) -> Arc<Mutex<HashMap<String, String>>> {
        Arc::clone(&self.passwords)
    }

    pub fn metadata_handle(&self) -> Arc<Mutex<HashMap<String, AccountMetadata>>> {
        Arc::clone(&self.metadata)
    }

    fn log(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl IdentityProvider for FakeProvider {
    async fn create_user(&self, account: &NewAccount) -> Result<String, AdminServiceError> {
        self.log(Call::ProviderCreate(account.email.clone()));
        if let Some(fail) = self.fail_create {
            return Err(fail.provider());
        }
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(AdminServiceError::ProviderRejected(
                "email already registered".into(),
            ));
        }
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let id = format!("u{next_id}");
        accounts.push(Account {
            id: id.clone(),
            email: account.email.clone(),
        });
        self.passwords
            .lock()
            .unwrap()
            .insert(id.clone(), account.password.clone());
        self.metadata
            .lock()
            .unwrap()
            .insert(id.clone(), account.metadata.clone());
        Ok(id)
    }

    async fn list_users(&self) -> Result<Vec<Account>, AdminServiceError> {
        self.log(Call::ProviderList);
        if let Some(fail) = self.fail_list {
            return Err(fail.provider());
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn delete_user(&self, id: &str) -> Result<(), AdminServiceError> {
        self.log(Call::ProviderDelete(id.to_owned()));
        if let Some(fail) = self.fail_delete {
            return Err(fail.provider());
        }
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|a| a.id != id);
        if accounts.len() == before {
            return Err(AdminServiceError::ProviderRejected("user not found".into()));
        }
        self.passwords.lock().unwrap().remove(id);
        Ok(())
    }

    async fn update_password(&self, id: &str, password: &str) -> Result<(), AdminServiceError> {
        self.log(Call::ProviderUpdatePassword(id.to_owned()));
        if let Some(fail) = self.fail_update_password {
            return Err(fail.provider());
        }
        if !self.accounts.lock().unwrap().iter().any(|a| a.id == id) {
            return Err(AdminServiceError::ProviderRejected("user not found".into()));
        }
        self.passwords
            .lock()
            .unwrap()
            .insert(id.to_owned(), password.to_owned());
        Ok(())
    }
}

// ── FakeProfileRepo ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeProfileRepo {
    pub profiles: Arc<Mutex<BTreeMap<String, Profile>>>,
    pub calls: CallLog,
    pub fail_upsert: Option<Fail>,
    pub fail_find: Option<Fail>,
    pub fail_update: Option<Fail>,
    pub fail_delete: Option<Fail>,
}

impl FakeProfileRepo {
    pub fn new(calls: &CallLog) -> Self {
        Self {
            calls: Arc::clone(calls),
            ..Self::default()
        }
    }

    pub fn with_profiles(calls: &CallLog, profiles: Vec<Profile>) -> Self {
        let repo = Self::new(calls);
        repo.profiles
            .lock()
            .unwrap()
            .extend(profiles.into_iter().map(|p| (p.id.clone(), p)));
        repo
    }

    /// Returns a shared handle to the stored profiles for post-execution inspection.
    pub fn profiles_handle(&self) -> Arc<Mutex<BTreeMap<String, Profile>>> {
        Arc::clone(&self.profiles)
    }

    fn log(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ProfileRepository for FakeProfileRepo {
    async fn upsert(&self, profile: &Profile) -> Result<(), AdminServiceError> {
        self.log(Call::StoreUpsert(profile.id.clone()));
        if let Some(fail) = self.fail_upsert {
            return Err(fail.store());
        }
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Profile>, AdminServiceError> {
        self.log(Call::StoreFind(ids.to_vec()));
        if let Some(fail) = self.fail_find {
            return Err(fail.store());
        }
        let profiles = self.profiles.lock().unwrap();
        Ok(ids.iter().filter_map(|id| profiles.get(id).cloned()).collect())
    }

    async fn update(&self, id: &str, patch: &ProfilePatch) -> Result<(), AdminServiceError> {
        self.log(Call::StoreUpdate(id.to_owned()));
        if let Some(fail) = self.fail_update {
            return Err(fail.store());
        }
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(id)
            .ok_or_else(|| AdminServiceError::StoreRejected("profile not found".into()))?;
        if let Some(role) = &patch.role {
            profile.role = role.clone();
        }
        if let Some(is_active) = patch.is_active {
            profile.is_active = is_active;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AdminServiceError> {
        self.log(Call::StoreDelete(id.to_owned()));
        if let Some(fail) = self.fail_delete {
            return Err(fail.store());
        }
        Ok(self.profiles.lock().unwrap().remove(id).is_some())
    }
}

// ── RecordingObserver ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingObserver {
    pub events: Arc<Mutex<Vec<AccountEvent>>>,
}

impl RecordingObserver {
    pub fn events_handle(&self) -> Arc<Mutex<Vec<AccountEvent>>> {
        Arc::clone(&self.events)
    }
}

impl AccountObserver for RecordingObserver {
    fn record(&self, event: AccountEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub type TestReconciler = AccountReconciler<FakeProvider, FakeProfileRepo, RecordingObserver>;

pub fn reconciler(provider: FakeProvider, profiles: FakeProfileRepo) -> TestReconciler {
    AccountReconciler {
        provider,
        profiles,
        observer: RecordingObserver::default(),
    }
}

pub fn account(id: &str, email: &str) -> Account {
    Account {
        id: id.into(),
        email: email.into(),
    }
}

pub fn profile(id: &str, role: &str, is_active: bool, display_name: &str) -> Profile {
    Profile {
        id: id.into(),
        role: role.into(),
        is_active,
        display_name: display_name.into(),
    }
}
