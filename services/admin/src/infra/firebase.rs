//! Firebase Auth client over the Identity Toolkit REST API.
//!
//! Requests are authorised with a self-signed service-account JWT minted per call, so
//! the client keeps no token cache.

use std::fmt;

use anyhow::Context as _;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::domain::repository::IdentityProvider;
use crate::domain::types::{Account, NewAccount};
use crate::error::AdminServiceError;
use crate::infra::identity::{json, send};

const PROVIDER: &str = "firebase";

pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";

/// Audience of self-signed service-account tokens for the Identity Toolkit API.
pub const TOKEN_AUDIENCE: &str = "https://identitytoolkit.googleapis.com/";

const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Service-account fields needed to call the Identity Toolkit admin endpoints.
#[derive(Clone)]
pub struct FirebaseCredentials {
    pub project_id: String,
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    pub private_key_id: Option<String>,
}

impl fmt::Debug for FirebaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseCredentials")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .finish()
    }
}

#[derive(Clone)]
pub struct FirebaseAuthClient {
    http: Client,
    base_url: String,
    project_id: String,
    client_email: String,
    key_id: Option<String>,
    signing_key: EncodingKey,
    page_size: u32,
}

#[derive(Serialize)]
struct ServiceAccountClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    email_verified: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirebaseUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct BatchGetResponse {
    #[serde(default)]
    users: Vec<FirebaseUser>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteBody<'a> {
    local_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePasswordBody<'a> {
    local_id: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    message: String,
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<GoogleErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
}

impl FirebaseAuthClient {
    /// Fails if the private key is not a valid RSA PEM.
    pub fn new(
        http: Client,
        credentials: &FirebaseCredentials,
        page_size: u32,
    ) -> anyhow::Result<Self> {
        let signing_key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
            .context("parse service account private key")?;
        Ok(Self {
            http,
            base_url: IDENTITY_TOOLKIT_URL.to_owned(),
            project_id: credentials.project_id.clone(),
            client_email: credentials.client_email.clone(),
            key_id: credentials.private_key_id.clone(),
            signing_key,
            page_size,
        })
    }

    /// Point the client at another Identity Toolkit host (emulator, test server).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    fn accounts_url(&self, suffix: &str) -> String {
        format!(
            "{}/v1/projects/{}/accounts{}",
            self.base_url, self.project_id, suffix
        )
    }

    fn access_token(&self) -> Result<String, AdminServiceError> {
        let now = Utc::now().timestamp();
        let claims = ServiceAccountClaims {
            iss: &self.client_email,
            sub: &self.client_email,
            aud: TOKEN_AUDIENCE,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();
        jsonwebtoken::encode(&header, &claims, &self.signing_key)
            .context("sign service account token")
            .map_err(AdminServiceError::Provider)
    }

    fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, AdminServiceError> {
        let token = self.access_token()?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }
}

impl IdentityProvider for FirebaseAuthClient {
    async fn create_user(&self, account: &NewAccount) -> Result<String, AdminServiceError> {
        // Sign-up has no field for role or active flag; only the display name travels.
        let request = self
            .request(Method::POST, &self.accounts_url(""))?
            .json(&SignUpBody {
                email: &account.email,
                password: &account.password,
                display_name: Some(account.metadata.display_name.as_str())
                    .filter(|name| !name.is_empty()),
                email_verified: true,
            });
        let response = send(request, PROVIDER, "create user", error_message).await?;
        let created: SignUpResponse = json(response, PROVIDER, "create user").await?;
        Ok(created.local_id)
    }

    async fn list_users(&self) -> Result<Vec<Account>, AdminServiceError> {
        let url = self.accounts_url(&format!(":batchGet?maxResults={}", self.page_size));
        let request = self.request(Method::GET, &url)?;
        let response = send(request, PROVIDER, "list users", error_message).await?;
        let body: BatchGetResponse = json(response, PROVIDER, "list users").await?;
        Ok(body
            .users
            .into_iter()
            .map(|u| Account {
                id: u.local_id,
                email: u.email.unwrap_or_default(),
            })
            .collect())
    }

    async fn delete_user(&self, id: &str) -> Result<(), AdminServiceError> {
        let request = self
            .request(Method::POST, &self.accounts_url(":delete"))?
            .json(&DeleteBody { local_id: id });
        send(request, PROVIDER, "delete user", error_message).await?;
        Ok(())
    }

    async fn update_password(&self, id: &str, password: &str) -> Result<(), AdminServiceError> {
        let request = self
            .request(Method::POST, &self.accounts_url(":update"))?
            .json(&UpdatePasswordBody {
                local_id: id,
                password,
            });
        send(request, PROVIDER, "update password", error_message).await?;
        Ok(())
    }
}
