//! Document issuance and verification bodies.

use campus_auth::{DocumentClaims, DocumentKind};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct IssueDocumentRequest {
    pub kind: DocumentKind,
    #[validate(range(min = 1, max = 8, message = "semester must be between 1 and 8"))]
    pub semester: Option<u8>,
    #[validate(length(equal = 4, message = "academic_year must be a 4 digit year"))]
    pub academic_year: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IssuedDocumentResponse {
    pub token: String,
    pub claims: DocumentClaims,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyDocumentRequest {
    #[validate(length(min = 1, max = 4096, message = "token is required"))]
    pub token: String,
}
