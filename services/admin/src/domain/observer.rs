/// Outcome of a multi-step account operation worth reporting outside the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountEvent {
    AccountCreated { account_id: String },
    /// The profile write after a successful provider create failed.
    ProfileWriteFailed { account_id: String, error: String },
    /// The provider account was deleted after a failed profile write.
    CompensationSucceeded { account_id: String },
    /// The provider account could not be deleted after a failed profile write;
    /// it now exists without a profile.
    CompensationFailed { account_id: String, error: String },
    /// The profile row could not be deleted; account deletion went ahead.
    ProfileDeleteFailed { account_id: String, error: String },
    AccountDeleted { account_id: String },
}

/// Observability collaborator of the reconciler. Reporting never affects control flow.
pub trait AccountObserver: Send + Sync {
    fn record(&self, event: AccountEvent);
}
