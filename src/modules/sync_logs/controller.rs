use axum::{
    Json,
    extract::{Query, State},
};
use campus_core::AppError;
use tracing::instrument;

use super::model::{PaginatedSyncLogs, PaginationParams};
use super::service::SyncLogService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

/// List recent ETL runs, most recent first
#[utoipa::path(
    get,
    path = "/api/admin/sync-logs",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated sync runs", body = PaginatedSyncLogs),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Sync",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_sync_logs(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedSyncLogs>, AppError> {
    let logs = SyncLogService::list(&state.db, &pagination).await?;
    Ok(Json(logs))
}
