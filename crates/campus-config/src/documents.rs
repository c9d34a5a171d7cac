use std::env;

/// Signing settings for student document tokens (attestations).
///
/// Kept apart from [`crate::JwtConfig`] so that rotating the session secret
/// does not invalidate documents already printed.
#[derive(Clone, Debug)]
pub struct DocumentConfig {
    pub secret: String,
    pub token_ttl_days: i64,
}

impl DocumentConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("DOCUMENT_SECRET")
                .unwrap_or_else(|_| "document-secret-change-in-production".to_string()),
            token_ttl_days: crate::parsed_or("DOCUMENT_TOKEN_TTL_DAYS", 365),
        }
    }
}
