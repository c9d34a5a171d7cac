use axum::{Json, extract::State};
use campus_core::AppError;
use tracing::{info, instrument};

use super::model::{Verification, VerifyDocumentRequest};
use crate::metrics::track_document_verification;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Verify a document token
///
/// Malformed, tampered and expired tokens are reported as `valid: false`
/// rather than as an error.
#[utoipa::path(
    post,
    path = "/api/documents/verify",
    request_body = VerifyDocumentRequest,
    responses(
        (status = 200, description = "Verification outcome", body = Verification),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Documents"
)]
#[instrument(skip(state, dto))]
pub async fn verify_document(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<VerifyDocumentRequest>,
) -> Result<Json<Verification>, AppError> {
    let verification = state.document_verifier.verify(&dto.token);
    track_document_verification(verification.valid);
    info!(valid = verification.valid, "Document verified");
    Ok(Json(verification))
}
