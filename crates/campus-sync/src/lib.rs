//! # Campus Sync
//!
//! Pulls students, pedagogical elements, grades, pedagogical situations and
//! graduates from the source system into PostgreSQL.
//!
//! Every job reads its whole batch from a [`SourceSystem`], then upserts it
//! row by row inside one transaction. Rows are keyed on their natural key and
//! only touched when a column actually changed, so re-running a job on the
//! same data inserts nothing and leaves `updated_at` alone. Each run leaves a
//! `sync_log` row, including failed ones.
//!
//! ```ignore
//! use campus_sync::{OracleSource, SyncJob, run_job};
//!
//! let source = OracleSource::new(OracleConfig::from_env()?);
//! let report = run_job(&pool, &source, SyncJob::Grades, Some("2024")).await?;
//! ```

pub mod error;
pub mod jobs;
pub mod log;
#[cfg(feature = "oracle-source")]
pub mod oracle;
pub mod snapshot;
pub mod source;

pub use error::SyncError;
pub use jobs::{JobReport, SyncCounts, SyncJob, classify_elements, run_all, run_job};
#[cfg(feature = "oracle-source")]
pub use oracle::OracleSource;
pub use snapshot::{Snapshot, SnapshotSource};
pub use source::{
    SourceElement, SourceGrade, SourceLaureat, SourceSituation, SourceStudent, SourceSystem,
};
