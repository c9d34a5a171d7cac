use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;

use super::controller::{create_planning, delete_planning, list_plannings};

pub fn init_exam_planning_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plannings).post(create_planning))
        .route("/{id}", delete(delete_planning))
}
