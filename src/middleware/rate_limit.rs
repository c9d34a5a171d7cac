use std::net::SocketAddr;

use anyhow::anyhow;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use campus_core::AppError;
use tracing::warn;

use crate::metrics::track_login_rate_limited;
use crate::state::AppState;

/// Token bucket per peer IP in front of the login endpoint.
///
/// Requests without a peer address (the server was not started with connect
/// info, as in router tests) are not limited.
pub async fn limit_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if let Some(limiter) = &state.auth_limiter
        && let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>()
        && limiter.check_key(&addr.ip()).is_err()
    {
        warn!(ip = %addr.ip(), "Login rate limit exceeded");
        track_login_rate_limited();
        return AppError::new(
            StatusCode::TOO_MANY_REQUESTS,
            anyhow!("Too many login attempts, try again later"),
        )
        .into_response();
    }

    next.run(req).await
}
