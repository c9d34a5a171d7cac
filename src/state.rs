use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use campus_auth::{DocumentIssuer, DocumentVerifier, SignedDocuments};
use campus_config::{AdminConfig, CorsConfig, DocumentConfig, JwtConfig, RateLimitConfig};
use governor::{DefaultKeyedRateLimiter, RateLimiter};
use sqlx::PgPool;

/// Login attempts limiter, keyed by peer IP address.
pub type AuthRateLimiter = DefaultKeyedRateLimiter<IpAddr>;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub admin_config: AdminConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub auth_limiter: Option<Arc<AuthRateLimiter>>,
    pub document_verifier: Arc<dyn DocumentVerifier>,
    pub document_issuer: Arc<dyn DocumentIssuer>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("jwt_expiry", &self.jwt_config.access_token_expiry)
            .field("admin_config", &self.admin_config)
            .field("rate_limit_config", &self.rate_limit_config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        admin_config: AdminConfig,
        cors_config: CorsConfig,
        rate_limit_config: RateLimitConfig,
        document_config: &DocumentConfig,
    ) -> Self {
        let auth_limiter = rate_limit_config
            .auth_quota()
            .map(|quota| Arc::new(RateLimiter::keyed(quota)));
        let documents = Arc::new(SignedDocuments::new(document_config));

        Self {
            db,
            jwt_config,
            admin_config,
            cors_config,
            rate_limit_config,
            auth_limiter,
            document_verifier: documents.clone(),
            document_issuer: documents,
        }
    }

    pub fn from_env(db: PgPool) -> Self {
        Self::new(
            db,
            JwtConfig::from_env(),
            AdminConfig::from_env(),
            CorsConfig::from_env(),
            RateLimitConfig::from_env(),
            &DocumentConfig::from_env(),
        )
    }
}
