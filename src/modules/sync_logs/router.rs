use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::list_sync_logs;

pub fn init_sync_logs_router() -> Router<AppState> {
    Router::new().route("/", get(list_sync_logs))
}
