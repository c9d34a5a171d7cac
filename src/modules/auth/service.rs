use anyhow::Context;
use campus_auth::{Role, create_access_token};
use campus_config::{AdminConfig, JwtConfig};
use campus_core::{AppError, verify_password};
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use super::model::{LoginRequest, LoginResponse};
use crate::metrics::{track_jwt_issued, track_login_failure, track_login_success};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Initial student password: the birth date as `DDMMYYYY`.
pub fn birth_date_password(date: NaiveDate) -> String {
    date.format("%d%m%Y").to_string()
}

#[derive(sqlx::FromRow)]
struct StudentCredentials {
    cod_etu: String,
    lib_nom_pat_ind: String,
    lib_pr1_ind: Option<String>,
    date_nai_ind: Option<NaiveDate>,
    password_hash: Option<String>,
}

impl StudentCredentials {
    fn display_name(&self) -> String {
        match self.lib_pr1_ind.as_deref().map(str::trim) {
            Some(first) if !first.is_empty() => format!("{} {}", self.lib_nom_pat_ind, first),
            _ => self.lib_nom_pat_ind.clone(),
        }
    }

    /// An unreadable stored hash rejects the login like a wrong password.
    fn accepts(&self, password: &str) -> bool {
        match self.password_hash.as_deref() {
            Some(hash) => verify_password(password, hash).unwrap_or_else(|e| {
                warn!(
                    cod_etu = %self.cod_etu,
                    error = %e.error,
                    "Stored password hash is unreadable"
                );
                false
            }),
            None => self
                .date_nai_ind
                .is_some_and(|date| birth_date_password(date) == password.trim()),
        }
    }
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config, admin_config), fields(username = %dto.username))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
        admin_config: &AdminConfig,
    ) -> Result<LoginResponse, AppError> {
        let username = dto.username.trim();

        let (subject, role, name) = if username == admin_config.username {
            Self::check_admin(&dto.password, admin_config)?;
            (username.to_string(), Role::Admin, "Administrator".to_string())
        } else {
            let student = Self::check_student(db, username, &dto.password).await?;
            let name = student.display_name();
            (student.cod_etu, Role::Student, name)
        };

        let access_token = create_access_token(&subject, role, &name, jwt_config)?;
        track_jwt_issued();
        track_login_success(role.as_str());
        info!(role = role.as_str(), "Login succeeded");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            role,
            name,
        })
    }

    fn check_admin(password: &str, admin_config: &AdminConfig) -> Result<(), AppError> {
        let Some(hash) = admin_config.password_hash.as_deref() else {
            warn!("Admin login attempted but ADMIN_PASSWORD_HASH is not set");
            track_login_failure("admin_disabled");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(password, hash)? {
            track_login_failure("invalid_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(())
    }

    async fn check_student(
        db: &PgPool,
        cod_etu: &str,
        password: &str,
    ) -> Result<StudentCredentials, AppError> {
        let student = sqlx::query_as::<_, StudentCredentials>(
            r#"SELECT cod_etu, lib_nom_pat_ind, lib_pr1_ind, date_nai_ind, password_hash
               FROM students WHERE cod_etu = $1"#,
        )
        .bind(cod_etu)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student credentials")
        .map_err(AppError::database)?;

        let Some(student) = student else {
            track_login_failure("unknown_user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !student.accepts(password) {
            track_login_failure("invalid_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(student)
    }
}
