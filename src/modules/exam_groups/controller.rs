use axum::{
    Json,
    extract::{Query, State},
};
use campus_core::AppError;
use tracing::instrument;

use super::model::{AssignmentSyncResponse, ResolveQuery, ResolvedGroup, SyncAssignmentsRequest};
use super::service::ExamGroupService;
use crate::metrics::{track_assignments_synced, track_group_resolution};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Preview the students of a module group
///
/// `groups` is a specifier such as `G1 (Amphi A)+G2`. Without it, or when it
/// contains `Tous`, every enrolled student is returned.
#[utoipa::path(
    get,
    path = "/api/admin/exam-groups/resolve",
    params(ResolveQuery),
    responses(
        (status = 200, description = "Resolved students ordered by surname, first name, code", body = ResolvedGroup),
        (status = 400, description = "Missing module", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Exam groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn resolve_group(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolvedGroup>, AppError> {
    let module = query.module.trim();
    if module.is_empty() {
        return Err(AppError::bad_request(anyhow::anyhow!("module is required")));
    }

    let resolved = ExamGroupService::resolve(
        &state.db,
        module,
        query.groups.as_deref(),
        query.year.as_deref(),
    )
    .await?;
    track_group_resolution(resolved.total, resolved.unmatched_groups.len());

    Ok(Json(resolved))
}

/// Resolve exam planning entries into assignments
///
/// Each entry is resolved against the current grouping rules and
/// enrollments; students who no longer qualify are removed.
#[utoipa::path(
    post,
    path = "/api/admin/exam-assignments/sync",
    request_body = SyncAssignmentsRequest,
    responses(
        (status = 200, description = "Per entry sync report", body = AssignmentSyncResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Planning entry not found", body = ErrorResponse)
    ),
    tag = "Exam groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn sync_assignments(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SyncAssignmentsRequest>,
) -> Result<Json<AssignmentSyncResponse>, AppError> {
    let response = ExamGroupService::sync_assignments(&state.db, dto.planning_id).await?;

    let (added, removed) = response
        .plannings
        .iter()
        .fold((0, 0), |(a, r), p| (a + p.added, r + p.removed));
    track_assignments_synced(added, removed);

    Ok(Json(response))
}
