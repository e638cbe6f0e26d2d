use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use daehan_core::error::not_found;
use daehan_core::health::healthz;
use daehan_core::middleware::{
    catch_panic_layer, propagate_request_id_layer, request_id_layer, require_admin_key,
};

use crate::handlers::{
    account::{create_user, delete_user, list_users, update_password, update_user_role},
    health::{readyz, root},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Every administrative route sits behind the shared-secret check.
    let admin = Router::new()
        .route("/create-user", post(create_user))
        .route("/list-users", get(list_users))
        .route("/delete-user", post(delete_user))
        .route("/update-user-role", post(update_user_role))
        .route("/update-password", post(update_password))
        .route_layer(middleware::from_fn_with_state(
            state.admin_key.clone(),
            require_admin_key,
        ));

    Router::new()
        // Health
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .merge(admin)
        .fallback(not_found)
        .layer(catch_panic_layer())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
