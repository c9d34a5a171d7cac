use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use campus_auth::DocumentRequest;
use campus_core::AppError;
use tracing::instrument;

use super::model::{
    GradeFilter, GradeStats, GradesResponse, IssueDocumentRequest, IssuedDocumentResponse,
    StudentExam, StudentProfile, Transcript, TranscriptFilter,
};
use super::service::StudentService;
use crate::metrics::track_document_issued;
use crate::middleware::auth::RequireStudent;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get the profile of the logged-in student
#[utoipa::path(
    get,
    path = "/api/student/me",
    responses(
        (status = 200, description = "Student profile with graduation records", body = StudentProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
) -> Result<Json<StudentProfile>, AppError> {
    let profile = StudentService::get_profile(&state.db, auth_user.subject()).await?;
    Ok(Json(profile))
}

/// Get the grades of the logged-in student
///
/// Grades are grouped by academic year (most recent first), session, then
/// season and semester.
#[utoipa::path(
    get,
    path = "/api/student/grades",
    params(GradeFilter),
    responses(
        (status = 200, description = "Grouped grades", body = GradesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_grades(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Query(filter): Query<GradeFilter>,
) -> Result<Json<GradesResponse>, AppError> {
    let rows = StudentService::get_grade_rows(&state.db, auth_user.subject(), &filter).await?;
    Ok(Json(GradesResponse::from_rows(&rows)))
}

/// Get grade statistics of the logged-in student
#[utoipa::path(
    get,
    path = "/api/student/grade-stats",
    params(GradeFilter),
    responses(
        (status = 200, description = "Grade statistics", body = GradeStats),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_grade_stats(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Query(filter): Query<GradeFilter>,
) -> Result<Json<GradeStats>, AppError> {
    let rows = StudentService::get_grade_rows(&state.db, auth_user.subject(), &filter).await?;
    Ok(Json(GradeStats::from_rows(&rows)))
}

/// Get the transcript of the logged-in student
///
/// Defaults to the most recent academic year with grades. A resit result
/// replaces the normal session result of the same element.
#[utoipa::path(
    get,
    path = "/api/student/transcript",
    params(TranscriptFilter),
    responses(
        (status = 200, description = "Transcript", body = Transcript),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "No grades for that year", body = ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_transcript(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Query(filter): Query<TranscriptFilter>,
) -> Result<Json<Transcript>, AppError> {
    let transcript =
        StudentService::get_transcript(&state.db, auth_user.subject(), filter.year).await?;
    Ok(Json(transcript))
}

/// List the exams the logged-in student is assigned to
#[utoipa::path(
    get,
    path = "/api/student/exams",
    responses(
        (status = 200, description = "Assigned exams, soonest first", body = Vec<StudentExam>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_exams(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
) -> Result<Json<Vec<StudentExam>>, AppError> {
    let exams = StudentService::get_exams(&state.db, auth_user.subject()).await?;
    Ok(Json(exams))
}

/// Issue a signed document token for the logged-in student
///
/// The token can later be checked by anyone through `/api/documents/verify`.
#[utoipa::path(
    post,
    path = "/api/student/documents",
    request_body = IssueDocumentRequest,
    responses(
        (status = 201, description = "Document issued", body = IssuedDocumentResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn issue_document(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    ValidatedJson(dto): ValidatedJson<IssueDocumentRequest>,
) -> Result<(StatusCode, Json<IssuedDocumentResponse>), AppError> {
    let cod_etu = auth_user.subject();
    StudentService::ensure_exists(&state.db, cod_etu).await?;

    let issued = state.document_issuer.issue(DocumentRequest {
        student_code: cod_etu.to_string(),
        kind: dto.kind,
        semester: dto.semester,
        academic_year: dto.academic_year,
    })?;
    track_document_issued(issued.claims.kind.as_str());

    Ok((
        StatusCode::CREATED,
        Json(IssuedDocumentResponse {
            token: issued.token,
            claims: issued.claims,
        }),
    ))
}
