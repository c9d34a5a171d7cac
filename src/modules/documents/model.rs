pub use campus_auth::{DocumentClaims, Verification};
pub use campus_models::documents::VerifyDocumentRequest;
