//! Supabase Auth (GoTrue) admin API client.

use std::fmt;

use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::domain::repository::IdentityProvider;
use crate::domain::types::{Account, AccountMetadata, NewAccount};
use crate::error::AdminServiceError;
use crate::infra::identity::{json, send};

const PROVIDER: &str = "supabase";

/// Project URL and service-role key.
#[derive(Clone)]
pub struct SupabaseSettings {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub url: String,
    pub service_role_key: String,
}

impl fmt::Debug for SupabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseSettings")
            .field("url", &self.url)
            .field("service_role_key", &"<redacted>")
            .finish()
    }
}

/// Stateless client for `/auth/v1/admin/users`.
#[derive(Clone)]
pub struct SupabaseAuthClient {
    http: Client,
    base_url: String,
    service_role_key: String,
    page_size: u32,
}

#[derive(Serialize)]
struct CreateUserBody<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
    user_metadata: &'a AccountMetadata,
}

#[derive(Serialize)]
struct UpdatePasswordBody<'a> {
    password: &'a str,
}

#[derive(Deserialize)]
struct SupabaseUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct ListUsersBody {
    #[serde(default)]
    users: Vec<SupabaseUser>,
}

/// GoTrue reports errors under different keys depending on the endpoint and version.
#[derive(Deserialize)]
struct GoTrueError {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

fn error_message(body: &str) -> Option<String> {
    let err: GoTrueError = serde_json::from_str(body).ok()?;
    err.msg
        .or(err.message)
        .or(err.error_description)
        .or(err.error)
        .filter(|m| !m.is_empty())
}

impl SupabaseAuthClient {
    pub fn new(http: Client, settings: &SupabaseSettings, page_size: u32) -> Self {
        Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_owned(),
            service_role_key: settings.service_role_key.clone(),
            page_size,
        }
    }

    fn users_url(&self) -> String {
        format!("{}/auth/v1/admin/users", self.base_url)
    }

    fn user_url(&self, id: &str) -> String {
        format!("{}/{}", self.users_url(), id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }
}

impl IdentityProvider for SupabaseAuthClient {
    async fn create_user(&self, account: &NewAccount) -> Result<String, AdminServiceError> {
        let request = self
            .request(Method::POST, &self.users_url())
            .json(&CreateUserBody {
                email: &account.email,
                password: &account.password,
                email_confirm: true,
                user_metadata: &account.metadata,
            });
        let response = send(request, PROVIDER, "create user", error_message).await?;
        let user: SupabaseUser = json(response, PROVIDER, "create user").await?;
        Ok(user.id)
    }

    async fn list_users(&self) -> Result<Vec<Account>, AdminServiceError> {
        let url = format!("{}?page=1&per_page={}", self.users_url(), self.page_size);
        let response = send(
            self.request(Method::GET, &url),
            PROVIDER,
            "list users",
            error_message,
        )
        .await?;
        let body: ListUsersBody = json(response, PROVIDER, "list users").await?;
        Ok(body
            .users
            .into_iter()
            .map(|u| Account {
                id: u.id,
                email: u.email.unwrap_or_default(),
            })
            .collect())
    }

    async fn delete_user(&self, id: &str) -> Result<(), AdminServiceError> {
        send(
            self.request(Method::DELETE, &self.user_url(id)),
            PROVIDER,
            "delete user",
            error_message,
        )
        .await?;
        Ok(())
    }

    async fn update_password(&self, id: &str, password: &str) -> Result<(), AdminServiceError> {
        let request = self
            .request(Method::PUT, &self.user_url(id))
            .json(&UpdatePasswordBody { password });
        send(request, PROVIDER, "update password", error_message).await?;
        Ok(())
    }
}
