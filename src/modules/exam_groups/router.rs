use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{resolve_group, sync_assignments};

pub fn init_exam_groups_router() -> Router<AppState> {
    Router::new().route("/resolve", get(resolve_group))
}

pub fn init_exam_assignments_router() -> Router<AppState> {
    Router::new().route("/sync", post(sync_assignments))
}
