//! # Campus API
//!
//! Student portal backend: grades, transcripts, exam planning and signed
//! documents over data synchronized from the university's Apogee system.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Auth extractors, role guards, login rate limiting
//! ├── modules/          # Feature modules
//! │   ├── auth/            # Student and admin login
//! │   ├── student/         # Profile, grades, transcript, exams, documents
//! │   ├── grouping_rules/  # Surname ranges per module and group
//! │   ├── exam_groups/     # Group resolver and assignment sync
//! │   ├── exam_planning/   # Exam calendar
//! │   ├── sync_logs/       # ETL run history
//! │   ├── documents/       # Public document verification
//! │   └── health/
//! ├── docs.rs           # OpenAPI
//! ├── logging.rs        # Tracing subscriber and request logging
//! └── metrics.rs        # Prometheus exporter
//! ```
//!
//! Each feature module has `controller.rs` (handlers), `service.rs`
//! (queries and business rules), `model.rs` (re-exported DTOs) and
//! `router.rs`.
//!
//! Data is loaded by `campus-cli sync`; see the `campus-sync` crate.
//!
//! ## Roles
//!
//! | Role | Logs in with | Access |
//! |------|--------------|--------|
//! | student | `cod_etu` + password (birth date `DDMMYYYY` until one is set) | `/api/student/*` |
//! | admin | `ADMIN_USERNAME` + password matching `ADMIN_PASSWORD_HASH` | `/api/admin/*` |
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use campus_auth;
pub use campus_config;
pub use campus_core;
pub use campus_db;
pub use campus_models;
