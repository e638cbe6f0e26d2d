use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::domain::types::AccountView;
use crate::error::AdminServiceError;
use crate::state::AppState;
use crate::usecase::account::{
    CreateAccountInput, DeleteAccountInput, UpdatePasswordInput, UpdateRoleInput,
};

// Bodies are extracted as `Result<Json<_>, JsonRejection>` so malformed JSON surfaces as a
// validation error in the common error shape. Every field is optional at the wire level;
// required-field checks belong to the reconciler.

/// Body message of a successful `POST /delete-user`.
pub const USER_DELETED: &str = "Usuario eliminado";

/// Body message of a successful `POST /update-password`.
pub const PASSWORD_UPDATED: &str = "Contraseña actualizada";

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── POST /create-user ────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "displayName")]
    pub display_name: Option<String>,
    pub role: Option<String>,
    #[serde(alias = "isActive")]
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
pub struct CreateUserResponse {
    pub uid: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<CreateUserResponse>, AdminServiceError> {
    let Json(body) = body?;
    let uid = state
        .reconciler()
        .create_account(CreateAccountInput {
            email: body.email,
            password: body.password,
            display_name: body.display_name,
            role: body.role,
            is_active: body.is_active,
        })
        .await?;
    Ok(Json(CreateUserResponse { uid }))
}

// ── GET /list-users ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<AccountView>,
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ListUsersResponse>, AdminServiceError> {
    let users = state.reconciler().list_accounts().await?;
    Ok(Json(ListUsersResponse { users }))
}

// ── POST /delete-user ────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct DeleteUserRequest {
    pub uid: Option<String>,
}

pub async fn delete_user(
    State(state): State<AppState>,
    body: Result<Json<DeleteUserRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AdminServiceError> {
    let Json(body) = body?;
    state
        .reconciler()
        .delete_account(DeleteAccountInput { uid: body.uid })
        .await?;
    Ok(Json(MessageResponse {
        message: USER_DELETED,
    }))
}

// ── POST /update-user-role ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRoleRequest {
    pub uid: Option<String>,
    pub role: Option<String>,
    #[serde(alias = "isActive")]
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

pub async fn update_user_role(
    State(state): State<AppState>,
    body: Result<Json<UpdateUserRoleRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, AdminServiceError> {
    let Json(body) = body?;
    state
        .reconciler()
        .update_role_and_active(UpdateRoleInput {
            uid: body.uid,
            role: body.role,
            is_active: body.is_active,
        })
        .await?;
    Ok(Json(OkResponse { ok: true }))
}

// ── POST /update-password ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePasswordRequest {
    pub uid: Option<String>,
    pub password: Option<String>,
}

pub async fn update_password(
    State(state): State<AppState>,
    body: Result<Json<UpdatePasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AdminServiceError> {
    let Json(body) = body?;
    state
        .reconciler()
        .update_password(UpdatePasswordInput {
            uid: body.uid,
            password: body.password,
        })
        .await?;
    Ok(Json(MessageResponse {
        message: PASSWORD_UPDATED,
    }))
}
