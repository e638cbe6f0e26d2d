use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use daehan_admin::config::IdentityProviderConfig;
use daehan_admin::domain::repository::IdentityProvider;
use daehan_admin::domain::types::{Account, AccountMetadata, NewAccount};
use daehan_admin::error::AdminServiceError;
use daehan_admin::infra::identity::IdentityClient;
use daehan_admin::infra::supabase::{SupabaseAuthClient, SupabaseSettings};

const SERVICE_ROLE_KEY: &str = "service-role-key";

fn settings(server: &MockServer) -> SupabaseSettings {
    SupabaseSettings {
        url: server.uri(),
        service_role_key: SERVICE_ROLE_KEY.into(),
    }
}

fn client(server: &MockServer) -> SupabaseAuthClient {
    SupabaseAuthClient::new(Client::new(), &settings(server), 50)
}

fn new_account() -> NewAccount {
    NewAccount {
        email: "a@x.com".into(),
        password: "pw123456".into(),
        metadata: AccountMetadata {
            display_name: "Ana".into(),
            role: "operador".into(),
            is_active: true,
        },
    }
}

// ── create_user ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_confirmed_user_with_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/admin/users"))
        .and(header("apikey", SERVICE_ROLE_KEY))
        .and(header("authorization", "Bearer service-role-key"))
        .and(body_partial_json(json!({
            "email": "a@x.com",
            "password": "pw123456",
            "email_confirm": true,
            "user_metadata": {
                "display_name": "Ana",
                "role": "operador",
                "is_active": true
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "email": "a@x.com",
            "aud": "authenticated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = client(&server).create_user(&new_account()).await.unwrap();
    assert_eq!(id, "u1");
}

#[tokio::test]
async fn should_reject_duplicate_email_with_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/admin/users"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": 422,
            "error_code": "email_exists",
            "msg": "A user with this email address has already been registered"
        })))
        .mount(&server)
        .await;

    let result = client(&server).create_user(&new_account()).await;
    assert!(
        matches!(
            result,
            Err(AdminServiceError::ProviderRejected(ref m))
                if m == "A user with this email address has already been registered"
        ),
        "expected ProviderRejected, got {result:?}"
    );
}

#[tokio::test]
async fn should_treat_refused_service_key_as_unexpected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid API key" })),
        )
        .mount(&server)
        .await;

    let result = client(&server).create_user(&new_account()).await;
    assert!(
        matches!(result, Err(AdminServiceError::Provider(_))),
        "expected Provider, got {result:?}"
    );
}

#[tokio::test]
async fn should_treat_server_error_as_unexpected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let result = client(&server).create_user(&new_account()).await;
    let err = result.unwrap_err();
    assert!(matches!(err, AdminServiceError::Provider(_)), "got {err:?}");
    assert!(err.detail().contains("503"), "detail was {}", err.detail());
}

// ── list_users ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_first_page_in_provider_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/admin/users"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                { "id": "u2", "email": "b@x.com" },
                { "id": "u1", "email": "a@x.com" },
                { "id": "u3", "phone": "+821012345678" }
            ],
            "aud": "authenticated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let accounts = client(&server).list_users().await.unwrap();
    assert_eq!(
        accounts,
        vec![
            Account {
                id: "u2".into(),
                email: "b@x.com".into()
            },
            Account {
                id: "u1".into(),
                email: "a@x.com".into()
            },
            Account {
                id: "u3".into(),
                email: String::new()
            },
        ]
    );
}

#[tokio::test]
async fn should_fail_on_undecodable_list_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client(&server).list_users().await;
    assert!(
        matches!(result, Err(AdminServiceError::Provider(_))),
        "expected Provider, got {result:?}"
    );
}

// ── delete_user / update_password ────────────────────────────────────────────

#[tokio::test]
async fn should_delete_user_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/auth/v1/admin/users/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_user("u1").await.unwrap();
}

#[tokio::test]
async fn should_reject_delete_of_unknown_user() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "code": 404, "msg": "User not found" })),
        )
        .mount(&server)
        .await;

    let result = client(&server).delete_user("ghost").await;
    assert!(
        matches!(result, Err(AdminServiceError::ProviderRejected(ref m)) if m == "User not found"),
        "expected ProviderRejected, got {result:?}"
    );
}

#[tokio::test]
async fn should_put_new_password() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/auth/v1/admin/users/u1"))
        .and(body_json(json!({ "password": "new-secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "u1" })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .update_password("u1", "new-secret")
        .await
        .unwrap();
}

// ── transport ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_time_out_slow_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "users": [] }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let identity = IdentityClient::from_config(
        &IdentityProviderConfig::Supabase(settings(&server)),
        50,
        Duration::from_millis(100),
    )
    .unwrap();
    assert_eq!(identity.name(), "supabase");

    let result = identity.list_users().await;
    assert!(
        matches!(result, Err(AdminServiceError::Provider(_))),
        "expected Provider, got {result:?}"
    );
}

#[tokio::test]
async fn should_treat_unreachable_provider_as_unexpected() {
    let settings = SupabaseSettings {
        url: "http://127.0.0.1:1".into(),
        service_role_key: SERVICE_ROLE_KEY.into(),
    };
    let client = SupabaseAuthClient::new(Client::new(), &settings, 50);

    let result = client.list_users().await;
    assert!(
        matches!(result, Err(AdminServiceError::Provider(_))),
        "expected Provider, got {result:?}"
    );
}
