//! # Campus Config
//!
//! Configuration types for the Campus portal, loaded from environment
//! variables (a `.env` file is read by the binaries through `dotenvy`).
//!
//! - [`admin`]: Administrator credentials
//! - [`cors`]: CORS allowed origins
//! - [`database`]: PostgreSQL connection settings
//! - [`documents`]: Document token signing
//! - [`jwt`]: JWT authentication
//! - [`oracle`]: Oracle source system connection
//! - [`rate_limit`]: Login rate limiting
//! - [`server`]: Listen addresses
//!
//! # Example
//!
//! ```ignore
//! use campus_config::{JwtConfig, DatabaseConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let database_config = DatabaseConfig::from_env()?;
//! ```

pub mod admin;
pub mod cors;
pub mod database;
pub mod documents;
pub mod jwt;
pub mod oracle;
pub mod rate_limit;
pub mod server;

// Re-export commonly used types at crate root
pub use admin::AdminConfig;
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use documents::DocumentConfig;
pub use jwt::JwtConfig;
pub use oracle::OracleConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// A required environment variable is missing or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} must be set")]
pub struct MissingVar(pub &'static str);

pub(crate) fn required(name: &'static str) -> Result<String, MissingVar> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(MissingVar(name))
}

pub(crate) fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
