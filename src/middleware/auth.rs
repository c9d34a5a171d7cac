use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use campus_auth::{Claims, Role, verify_token};
use campus_core::AppError;

use crate::state::AppState;

/// Extractor that validates the bearer token and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == Role::Admin
    }

    pub fn is_student(&self) -> bool {
        self.0.role == Role::Student
    }

    /// Token subject: the student code for students, the username for the admin.
    pub fn subject(&self) -> &str {
        &self.0.sub
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// 403 unless the token carries `role`.
    pub fn ensure_role(&self, role: Role) -> Result<(), AppError> {
        if self.role() == role {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Access denied. Required role: {}",
                role.as_str()
            )))
        }
    }
}

/// Token of an `Authorization: Bearer <token>` header; the scheme is
/// matched case-insensitively.
fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already validated by a role guard on this route.
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = bearer_token(header_value)
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Defines an extractor that only admits tokens of one role.
#[macro_export]
macro_rules! require_role {
    ($name:ident, $role:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = campus_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;
                auth_user.ensure_role($role)?;
                Ok($name(auth_user))
            }
        }
    };
}

require_role!(RequireStudent, campus_auth::Role::Student);
require_role!(RequireAdmin, campus_auth::Role::Admin);

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: "16004321".to_string(),
            role,
            name: "BENANI Sara".to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_role_helpers() {
        let student = AuthUser(claims(Role::Student));
        assert!(student.is_student());
        assert!(!student.is_admin());
        assert_eq!(student.subject(), "16004321");
        assert_eq!(student.name(), "BENANI Sara");

        let admin = AuthUser(claims(Role::Admin));
        assert!(admin.is_admin());
        assert_eq!(admin.role(), Role::Admin);
    }

    #[test]
    fn test_ensure_role() {
        let student = AuthUser(claims(Role::Student));
        assert!(student.ensure_role(Role::Student).is_ok());
        let err = student.ensure_role(Role::Admin).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer  abc "), Some("abc"));
        assert_eq!(bearer_token("Token abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
