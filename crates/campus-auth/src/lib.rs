//! # Campus Auth
//!
//! Authentication types and token utilities for the Campus portal.
//!
//! - [`claims`]: JWT claims of portal sessions and the [`Role`] they carry
//! - [`jwt`]: Access token creation and verification
//! - [`documents`]: Signed document tokens behind the [`DocumentVerifier`] and
//!   [`DocumentIssuer`] traits
//!
//! # Example
//!
//! ```ignore
//! use campus_auth::{Role, create_access_token, verify_token};
//! use campus_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token("16004321", Role::Student, "BENANI Sara", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, Role::Student);
//! ```

pub mod claims;
pub mod documents;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{Claims, Role};
pub use documents::{
    DocumentClaims, DocumentIssuer, DocumentKind, DocumentRequest, DocumentVerifier,
    IssuedDocument, SignedDocuments, Verification,
};
pub use jwt::{create_access_token, verify_token};
