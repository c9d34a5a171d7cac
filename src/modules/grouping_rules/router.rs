use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{create_rule, delete_rule, list_rules, update_rule};

pub fn init_grouping_rules_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rules).post(create_rule))
        .route("/{id}", put(update_rule).delete(delete_rule))
}
