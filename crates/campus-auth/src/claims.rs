//! JWT claims of portal sessions.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Who a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A student, identified by `cod_etu`.
    Student,
    /// The portal administrator configured through the environment.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }
}

/// JWT claims for access tokens.
///
/// - `sub`: student code for students, configured username for the admin
/// - `role`: [`Role`] of the session
/// - `name`: display name
/// - `exp` / `iat`: expiry and issue timestamps (Unix seconds)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub name: String,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize_role_lowercase() {
        let claims = Claims {
            sub: "16004321".to_string(),
            role: Role::Student,
            name: "BENANI Sara".to_string(),
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"16004321""#));
        assert!(serialized.contains(r#""role":"student""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"admin","role":"admin","name":"Administrator","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp, 9999999999);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let json = r#"{"sub":"x","role":"registrar","name":"x","exp":1,"iat":1}"#;
        assert!(serde_json::from_str::<Claims>(json).is_err());
    }

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::Student.as_str(), "student");
        assert_eq!(Role::Admin.as_str(), "admin");
    }
}
