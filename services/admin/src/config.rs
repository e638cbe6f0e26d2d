use std::time::Duration;

use anyhow::{Context as _, bail};

use daehan_core::middleware::AdminKey;

use crate::infra::firebase::FirebaseCredentials;
use crate::infra::supabase::SupabaseSettings;

/// Identity provider credentials, chosen by `IDENTITY_PROVIDER` (`supabase` by default).
#[derive(Debug, Clone)]
pub enum IdentityProviderConfig {
    Supabase(SupabaseSettings),
    Firebase(FirebaseCredentials),
}

/// Admin service configuration, loaded once at startup from environment variables.
#[derive(Debug)]
pub struct AdminConfig {
    /// Shared secret expected in `x-api-key`. Env var: `ADMIN_API_KEY` (required, non-empty).
    pub admin_key: AdminKey,
    /// PostgreSQL connection URL of the profile store.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3001). Env var: `PORT`.
    pub port: u16,
    pub identity: IdentityProviderConfig,
    /// Accounts fetched by one list call (default 1000). Env var: `LIST_PAGE_SIZE`.
    pub list_page_size: u32,
    /// Per-request timeout towards the provider (default 30s). Env var: `PROVIDER_TIMEOUT_SECS`.
    pub provider_timeout: Duration,
}

impl AdminConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| -> anyhow::Result<String> {
            get(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{key} must be set"))
        };

        let admin_key = AdminKey::new(required("ADMIN_API_KEY")?);
        let database_url = required("DATABASE_URL")?;

        let identity = match get("IDENTITY_PROVIDER").as_deref().unwrap_or("supabase") {
            "supabase" => IdentityProviderConfig::Supabase(SupabaseSettings {
                url: required("SUPABASE_URL")?,
                service_role_key: required("SUPABASE_SERVICE_ROLE_KEY")?,
            }),
            "firebase" => IdentityProviderConfig::Firebase(FirebaseCredentials {
                project_id: required("FIREBASE_PROJECT_ID")?,
                client_email: required("FIREBASE_CLIENT_EMAIL")?,
                // Keys pasted into a single-line env var carry literal `\n` sequences.
                private_key: required("FIREBASE_PRIVATE_KEY")?.replace("\\n", "\n"),
                private_key_id: get("FIREBASE_PRIVATE_KEY_ID").filter(|v| !v.is_empty()),
            }),
            other => bail!("IDENTITY_PROVIDER must be `supabase` or `firebase`, got `{other}`"),
        };

        Ok(Self {
            admin_key,
            database_url,
            port: parse_or(&get, "PORT", 3001)?,
            identity,
            list_page_size: parse_or(&get, "LIST_PAGE_SIZE", 1000)?,
            provider_timeout: Duration::from_secs(parse_or(&get, "PROVIDER_TIMEOUT_SECS", 30)?),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} is not valid: `{raw}`")),
        None => Ok(default),
    }
}
