//! Request guards.
//!
//! - [`auth`]: `AuthUser` bearer token extractor and the `RequireStudent` /
//!   `RequireAdmin` role extractors
//! - [`role`]: router-level `require_admin` / `require_student` guards
//! - [`rate_limit`]: login attempt limiting per peer IP
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::RequireStudent;
//!
//! async fn my_grades(RequireStudent(user): RequireStudent) -> impl IntoResponse {
//!     // user.subject() is the student code
//! }
//! ```

pub mod auth;
pub mod rate_limit;
pub mod role;
