use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{auth, health};
use crate::types::AppState;

pub fn create_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/status", get(health::status))
        .route(
            "/nudm-ueau/v1/:ueId/security-information/generate-auth-data",
            post(auth::generate_auth_data),
        )
        .route(
            "/nudm-ueau/v1/:ueId/security-information-rg",
            get(auth::get_rg_auth_context),
        )
        .route(
            "/nudm-ueau/v1/:ueId/auth-events",
            post(auth::create_auth_event),
        )
        .route(
            "/nudm-ueau/v1/:ueId/auth-events/:authEventId",
            put(auth::update_auth_event),
        )
        .route(
            "/nudm-ueau/v1/:ueId/hss-security-information/:hssAuthType/generate-av",
            post(auth::generate_hss_av),
        )
        .route(
            "/nudm-ueau/v1/:ueId/gba-security-information/generate-av",
            post(auth::generate_gba_av),
        )
        .with_state(app_state)
}
