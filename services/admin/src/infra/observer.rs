use tracing::{error, info, warn};

use crate::domain::observer::{AccountEvent, AccountObserver};

/// Reports reconciler events as structured `tracing` events.
#[derive(Clone, Copy, Default)]
pub struct TracingObserver;

impl AccountObserver for TracingObserver {
    fn record(&self, event: AccountEvent) {
        match event {
            AccountEvent::AccountCreated { account_id } => {
                info!(%account_id, "account created");
            }
            AccountEvent::ProfileWriteFailed { account_id, error } => {
                warn!(%account_id, %error, "profile write failed, compensating");
            }
            AccountEvent::CompensationSucceeded { account_id } => {
                info!(%account_id, "compensated: provider account deleted");
            }
            AccountEvent::CompensationFailed { account_id, error } => {
                error!(
                    %account_id,
                    %error,
                    "compensation failed: provider account left without profile"
                );
            }
            AccountEvent::ProfileDeleteFailed { account_id, error } => {
                warn!(%account_id, %error, "profile delete failed, deleting account anyway");
            }
            AccountEvent::AccountDeleted { account_id } => {
                info!(%account_id, "account deleted");
            }
        }
    }
}
