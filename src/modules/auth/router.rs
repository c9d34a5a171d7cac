use axum::{Router, middleware, routing::post};

use crate::middleware::rate_limit::limit_auth;
use crate::state::AppState;

use super::controller::login;

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route_layer(middleware::from_fn_with_state(state, limit_auth))
}
