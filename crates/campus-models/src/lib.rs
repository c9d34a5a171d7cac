//! # Campus Models
//!
//! Domain models and DTOs for the Campus portal: database rows, request and
//! response bodies, and the pure shaping of grade rows into API views.
//!
//! - [`auth`]: Login request/response
//! - [`documents`]: Document issuance and verification bodies
//! - [`elements`]: Pedagogical elements
//! - [`exams`]: Exam planning and assignments
//! - [`grades`]: Grades, grade statistics and transcripts
//! - [`grouping`]: Grouping rules and resolver output
//! - [`students`]: Students and graduation records
//! - [`sync_log`]: ETL run history

pub mod auth;
pub mod documents;
pub mod elements;
pub mod exams;
pub mod grades;
pub mod grouping;
pub mod students;
pub mod sync_log;

// Re-export commonly used types at crate root for convenience
pub use auth::{LoginRequest, LoginResponse};
pub use exams::{ExamPlanning, SessionKind};
pub use grades::{GradeRow, GradeStats, GradesResponse, Transcript};
pub use grouping::{GroupingRule, ResolvedGroup};
pub use students::{Graduation, Student, StudentProfile, StudentSummary};
pub use sync_log::SyncLog;
