use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::verify_document;

pub fn init_documents_router() -> Router<AppState> {
    Router::new().route("/verify", post(verify_document))
}
