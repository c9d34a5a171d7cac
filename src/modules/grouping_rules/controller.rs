use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use super::model::{CreateGroupingRuleDto, GroupingRule, GroupingRuleFilter, UpdateGroupingRuleDto};
use super::service::GroupingRuleService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List grouping rules
#[utoipa::path(
    get,
    path = "/api/admin/grouping-rules",
    params(GroupingRuleFilter),
    responses(
        (status = 200, description = "Grouping rules by module, group and range", body = Vec<GroupingRule>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Grouping rules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_rules(
    State(state): State<AppState>,
    Query(filter): Query<GroupingRuleFilter>,
) -> Result<Json<Vec<GroupingRule>>, AppError> {
    let rules = GroupingRuleService::list(&state.db, filter).await?;
    Ok(Json(rules))
}

/// Create a grouping rule
#[utoipa::path(
    post,
    path = "/api/admin/grouping-rules",
    request_body = CreateGroupingRuleDto,
    responses(
        (status = 201, description = "Rule created", body = GroupingRule),
        (status = 400, description = "Duplicate rule or reversed range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Grouping rules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_rule(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateGroupingRuleDto>,
) -> Result<(StatusCode, Json<GroupingRule>), AppError> {
    let rule = GroupingRuleService::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

/// Update a grouping rule
#[utoipa::path(
    put,
    path = "/api/admin/grouping-rules/{id}",
    params(("id" = Uuid, Path, description = "Rule ID")),
    request_body = UpdateGroupingRuleDto,
    responses(
        (status = 200, description = "Rule updated", body = GroupingRule),
        (status = 400, description = "Duplicate rule or reversed range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Rule not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Grouping rules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateGroupingRuleDto>,
) -> Result<Json<GroupingRule>, AppError> {
    let rule = GroupingRuleService::update(&state.db, id, dto).await?;
    Ok(Json(rule))
}

/// Delete a grouping rule
#[utoipa::path(
    delete,
    path = "/api/admin/grouping-rules/{id}",
    params(("id" = Uuid, Path, description = "Rule ID")),
    responses(
        (status = 204, description = "Rule deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Rule not found", body = ErrorResponse)
    ),
    tag = "Grouping rules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    GroupingRuleService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
