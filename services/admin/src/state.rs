use std::sync::Arc;

use sea_orm::DatabaseConnection;

use daehan_core::middleware::AdminKey;

use crate::infra::db::DbProfileRepository;
use crate::infra::identity::IdentityClient;
use crate::infra::observer::TracingObserver;
use crate::usecase::account::AccountReconciler;

/// Shared application state passed to every handler via axum `State`.
///
/// Holds only connection handles and immutable configuration; all account state lives
/// in the identity provider and the profile store.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub identity: IdentityClient,
    pub admin_key: AdminKey,
}

impl AppState {
    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: Arc::clone(&self.db),
        }
    }

    pub fn reconciler(
        &self,
    ) -> AccountReconciler<IdentityClient, DbProfileRepository, TracingObserver> {
        AccountReconciler {
            provider: self.identity.clone(),
            profiles: self.profile_repo(),
            observer: TracingObserver,
        }
    }
}
