use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use super::model::{CreateExamPlanningDto, ExamPlanning, ExamPlanningFilter};
use super::service::ExamPlanningService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List exam planning entries
#[utoipa::path(
    get,
    path = "/api/admin/exam-planning",
    params(ExamPlanningFilter),
    responses(
        (status = 200, description = "Planning entries by date and start time", body = Vec<ExamPlanning>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Exam planning",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_plannings(
    State(state): State<AppState>,
    Query(filter): Query<ExamPlanningFilter>,
) -> Result<Json<Vec<ExamPlanning>>, AppError> {
    let plannings = ExamPlanningService::list(&state.db, filter).await?;
    Ok(Json(plannings))
}

/// Create an exam planning entry
///
/// Assignments are not computed here; run `/api/admin/exam-assignments/sync`.
#[utoipa::path(
    post,
    path = "/api/admin/exam-planning",
    request_body = CreateExamPlanningDto,
    responses(
        (status = 201, description = "Planning entry created", body = ExamPlanning),
        (status = 400, description = "Malformed request or end before start", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Exam planning",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_planning(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateExamPlanningDto>,
) -> Result<(StatusCode, Json<ExamPlanning>), AppError> {
    let planning = ExamPlanningService::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(planning)))
}

/// Delete an exam planning entry and its assignments
#[utoipa::path(
    delete,
    path = "/api/admin/exam-planning/{id}",
    params(("id" = Uuid, Path, description = "Planning entry ID")),
    responses(
        (status = 204, description = "Planning entry deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Planning entry not found", body = ErrorResponse)
    ),
    tag = "Exam planning",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_planning(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ExamPlanningService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
