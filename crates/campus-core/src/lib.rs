//! # Campus Core
//!
//! Core types, errors, and pure domain rules for the Campus portal.
//!
//! This crate has no database or HTTP state of its own. It provides:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination utilities for API responses
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Custom serde helpers for query strings
//! - [`classify`]: Semester / element-type classification of course codes
//! - [`groups`]: Exam group specifiers and surname-range membership rules
//!
//! # Example
//!
//! ```ignore
//! use campus_core::classify::classify;
//! use campus_core::groups::GroupSpec;
//!
//! let c = classify("JMDS1ALG", Some("Algèbre 1"));
//! assert_eq!(c.semester, Some(1));
//!
//! let spec = GroupSpec::parse(Some("G1 (Amphi A)+G2"));
//! assert_eq!(spec.groups(), &["G1".to_string(), "G2".to_string()]);
//! ```

pub mod classify;
pub mod errors;
pub mod groups;
pub mod pagination;
pub mod password;
pub mod serde;

// Re-export commonly used types at crate root
pub use classify::{Classification, ElementType, Season, classify};
pub use errors::AppError;
pub use groups::{GroupFilter, GroupSpec, SurnameRange};
pub use pagination::{PaginationMeta, PaginationParams, SqlWindow};
pub use password::{hash_password, verify_password};
