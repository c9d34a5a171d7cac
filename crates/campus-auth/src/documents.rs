//! Signed student documents.
//!
//! Printed attestations carry a token that anyone can submit to the public
//! verification endpoint. The API only relies on the [`DocumentVerifier`] and
//! [`DocumentIssuer`] traits; [`SignedDocuments`] is the shipped
//! implementation (HS256 tokens signed with `DOCUMENT_SECRET`).

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use campus_config::DocumentConfig;
use campus_core::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Attestation de scolarité.
    Attestation,
    /// Relevé de notes.
    Transcript,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Attestation => "attestation",
            DocumentKind::Transcript => "transcript",
        }
    }
}

/// Facts bound to a document token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DocumentClaims {
    /// Document identifier.
    pub jti: String,
    /// Student code (`cod_etu`).
    pub sub: String,
    pub kind: DocumentKind,
    pub semester: Option<u8>,
    /// Academic year (`cod_anu`).
    pub academic_year: Option<String>,
    pub iat: usize,
    pub exp: usize,
}

/// Outcome of a verification. Invalid tokens never carry claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Verification {
    pub valid: bool,
    pub claims: Option<DocumentClaims>,
}

impl Verification {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            claims: None,
        }
    }
}

/// What a student asks to be certified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    pub student_code: String,
    pub kind: DocumentKind,
    pub semester: Option<u8>,
    pub academic_year: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IssuedDocument {
    pub token: String,
    pub claims: DocumentClaims,
}

pub trait DocumentVerifier: Send + Sync + std::fmt::Debug {
    fn verify(&self, token: &str) -> Verification;
}

pub trait DocumentIssuer: Send + Sync + std::fmt::Debug {
    fn issue(&self, request: DocumentRequest) -> Result<IssuedDocument, AppError>;
}

#[derive(Clone)]
pub struct SignedDocuments {
    secret: String,
    ttl: Duration,
}

impl std::fmt::Debug for SignedDocuments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedDocuments")
            .field("ttl_days", &self.ttl.num_days())
            .finish_non_exhaustive()
    }
}

impl SignedDocuments {
    pub fn new(config: &DocumentConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            ttl: Duration::days(config.token_ttl_days),
        }
    }
}

impl DocumentIssuer for SignedDocuments {
    fn issue(&self, request: DocumentRequest) -> Result<IssuedDocument, AppError> {
        let now = Utc::now();
        let claims = DocumentClaims {
            jti: Uuid::new_v4().to_string(),
            sub: request.student_code,
            kind: request.kind,
            semester: request.semester,
            academic_year: request.academic_year,
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp().max(0) as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::internal_error(format!("Failed to sign document: {}", e)))?;

        Ok(IssuedDocument { token, claims })
    }
}

impl DocumentVerifier for SignedDocuments {
    fn verify(&self, token: &str) -> Verification {
        let token = token.trim();
        if token.is_empty() {
            return Verification::invalid();
        }

        match decode::<DocumentClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(data) => Verification {
                valid: true,
                claims: Some(data.claims),
            },
            Err(_) => Verification::invalid(),
        }
    }
}
