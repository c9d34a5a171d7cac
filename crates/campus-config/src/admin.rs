use std::env;

/// Credentials of the single portal administrator.
///
/// `ADMIN_PASSWORD_HASH` holds a bcrypt hash (see `campus-cli hash-password`).
/// Without it, administrator login is disabled.
#[derive(Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password_hash: Option<String>,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AdminConfig {
    pub fn from_env() -> Self {
        Self {
            username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            password_hash: env::var("ADMIN_PASSWORD_HASH")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }
}
