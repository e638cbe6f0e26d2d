use std::time::Duration;

use anyhow::Context as _;
use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::config::IdentityProviderConfig;
use crate::domain::repository::IdentityProvider;
use crate::domain::types::{Account, NewAccount};
use crate::error::AdminServiceError;
use crate::infra::firebase::FirebaseAuthClient;
use crate::infra::supabase::SupabaseAuthClient;

/// Identity provider selected at startup.
#[derive(Clone)]
pub enum IdentityClient {
    Supabase(SupabaseAuthClient),
    Firebase(FirebaseAuthClient),
}

impl IdentityClient {
    pub fn from_config(
        config: &IdentityProviderConfig,
        list_page_size: u32,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("build identity provider HTTP client")?;
        let client = match config {
            IdentityProviderConfig::Supabase(settings) => {
                Self::Supabase(SupabaseAuthClient::new(http, settings, list_page_size))
            }
            IdentityProviderConfig::Firebase(credentials) => Self::Firebase(
                FirebaseAuthClient::new(http, credentials, list_page_size)
                    .context("load Firebase service account key")?,
            ),
        };
        Ok(client)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Supabase(_) => "supabase",
            Self::Firebase(_) => "firebase",
        }
    }
}

impl IdentityProvider for IdentityClient {
    async fn create_user(&self, account: &NewAccount) -> Result<String, AdminServiceError> {
        match self {
            Self::Supabase(client) => client.create_user(account).await,
            Self::Firebase(client) => client.create_user(account).await,
        }
    }

    async fn list_users(&self) -> Result<Vec<Account>, AdminServiceError> {
        match self {
            Self::Supabase(client) => client.list_users().await,
            Self::Firebase(client) => client.list_users().await,
        }
    }

    async fn delete_user(&self, id: &str) -> Result<(), AdminServiceError> {
        match self {
            Self::Supabase(client) => client.delete_user(id).await,
            Self::Firebase(client) => client.delete_user(id).await,
        }
    }

    async fn update_password(&self, id: &str, password: &str) -> Result<(), AdminServiceError> {
        match self {
            Self::Supabase(client) => client.update_password(id, password).await,
            Self::Firebase(client) => client.update_password(id, password).await,
        }
    }
}

// ── Shared response handling ─────────────────────────────────────────────────

/// Send one request. Transport failures and non-2xx responses become provider errors;
/// `extract_message` pulls the provider's message out of an error body.
pub(crate) async fn send(
    request: RequestBuilder,
    provider: &'static str,
    op: &'static str,
    extract_message: fn(&str) -> Option<String>,
) -> Result<Response, AdminServiceError> {
    let response = request.send().await.map_err(|e| {
        AdminServiceError::Provider(anyhow::Error::new(e).context(format!("{provider} {op}")))
    })?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body)
        .or_else(|| status.canonical_reason().map(str::to_owned))
        .unwrap_or_else(|| status.to_string());
    Err(classify(provider, op, status, message))
}

/// Decode a successful JSON response body.
pub(crate) async fn json<T: serde::de::DeserializeOwned>(
    response: Response,
    provider: &'static str,
    op: &'static str,
) -> Result<T, AdminServiceError> {
    response.json::<T>().await.map_err(|e| {
        AdminServiceError::Provider(
            anyhow::Error::new(e).context(format!("{provider} {op}: decode response")),
        )
    })
}

/// Client errors are rejections of this request; bad service credentials and server
/// errors are unexpected failures.
pub(crate) fn classify(
    provider: &str,
    op: &str,
    status: StatusCode,
    message: String,
) -> AdminServiceError {
    let credentials_refused =
        status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN;
    if status.is_client_error() && !credentials_refused {
        AdminServiceError::ProviderRejected(message)
    } else {
        AdminServiceError::Provider(anyhow::anyhow!(
            "{provider} {op} returned {status}: {message}"
        ))
    }
}
