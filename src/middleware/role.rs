//! Router-level role guards.
//!
//! ```rust,ignore
//! use axum::{Router, middleware};
//! use crate::middleware::role::require_admin;
//!
//! let admin_routes = Router::new()
//!     .route("/sync-logs", get(list_sync_logs))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
//! ```
//!
//! A guard stores the validated [`AuthUser`] in the request extensions so
//! handlers extracting it do not verify the token twice.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use campus_auth::Role;
use campus_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub async fn require_role(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed: Role,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    auth_user.ensure_role(allowed)?;

    parts.extensions.insert(auth_user);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_role(State(state), req, next, Role::Admin).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_student(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_role(State(state), req, next, Role::Student).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
