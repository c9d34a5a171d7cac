use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    get_grade_stats, get_grades, get_my_exams, get_profile, get_transcript, issue_document,
};

pub fn init_student_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_profile))
        .route("/grades", get(get_grades))
        .route("/grade-stats", get(get_grade_stats))
        .route("/transcript", get(get_transcript))
        .route("/exams", get(get_my_exams))
        .route("/documents", post(issue_document))
}
