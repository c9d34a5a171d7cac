//! Synchronization jobs.
//!
//! A job fetches one batch from the source, then upserts it in a single
//! transaction. Each upsert statement returns `inserted = (xmax = 0)` for a
//! written row and nothing when the `IS DISTINCT FROM` guard skipped it,
//! which is how rows are counted as inserted, updated or unchanged.
//!
//! Rows sharing a natural key are collapsed to one before the upsert, and the
//! dropped ones count as unchanged.

mod dedupe;
mod elements;
mod grades;
mod laureats;
mod situation;
mod students;

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use metrics::counter;
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{error, info, instrument, warn};

use crate::error::SyncError;
use crate::log;
use crate::source::SourceSystem;
use dedupe::NaturalKey;

pub use elements::classify_elements;

/// Outcome counts of one run, as stored in `sync_log`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncCounts {
    pub fetched: i32,
    pub inserted: i32,
    pub updated: i32,
    pub unchanged: i32,
}

impl SyncCounts {
    pub(crate) fn fetched(n: usize) -> Self {
        Self {
            fetched: i32::try_from(n).unwrap_or(i32::MAX),
            ..Self::default()
        }
    }

    /// Rows dropped before the upsert because another row had the same key.
    pub(crate) fn collapsed(&mut self, n: usize) {
        self.unchanged += i32::try_from(n).unwrap_or(i32::MAX);
    }

    /// Records the result of one upsert: `Some(true)` inserted,
    /// `Some(false)` updated, `None` skipped as unchanged.
    pub(crate) fn record(&mut self, outcome: Option<bool>) {
        match outcome {
            Some(true) => self.inserted += 1,
            Some(false) => self.updated += 1,
            None => self.unchanged += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncJob {
    Students,
    Elements,
    Grades,
    Situation,
    Laureats,
}

impl SyncJob {
    /// Order used by `all`: referenced entities first.
    pub const ALL: [SyncJob; 5] = [
        SyncJob::Students,
        SyncJob::Elements,
        SyncJob::Grades,
        SyncJob::Situation,
        SyncJob::Laureats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncJob::Students => "students",
            SyncJob::Elements => "elements",
            SyncJob::Grades => "grades",
            SyncJob::Situation => "situation",
            SyncJob::Laureats => "laureats",
        }
    }
}

impl fmt::Display for SyncJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncJob {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SyncJob::ALL
            .into_iter()
            .find(|job| job.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SyncError::UnknownJob(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job: SyncJob,
    pub log_id: i64,
    pub counts: SyncCounts,
    pub elapsed_ms: u128,
}

/// Runs one job and records it in `sync_log`. `year` only applies to grades.
#[instrument(skip(pool, source, job), fields(job = %job))]
pub async fn run_job(
    pool: &PgPool,
    source: &dyn SourceSystem,
    job: SyncJob,
    year: Option<&str>,
) -> Result<JobReport, SyncError> {
    let started = Instant::now();
    let log_id = log::start(pool, job.as_str()).await?;

    let mut counts = SyncCounts::default();
    match execute(pool, source, job, year, &mut counts).await {
        Ok(()) => {
            log::finish(pool, log_id, &counts, None).await?;
            record_metrics(job, &counts);
            info!(
                fetched = counts.fetched,
                inserted = counts.inserted,
                updated = counts.updated,
                unchanged = counts.unchanged,
                "Sync job finished"
            );
            Ok(JobReport {
                job,
                log_id,
                counts,
                elapsed_ms: started.elapsed().as_millis(),
            })
        }
        Err(e) => {
            error!(error = %e, "Sync job failed");
            counter!("sync_jobs_total", "job" => job.as_str(), "status" => "failed").increment(1);
            let message = e.to_string();
            if let Err(log_err) = log::finish(pool, log_id, &counts, Some(&message)).await {
                error!(error = %log_err, "Failed to record sync failure");
            }
            Err(e)
        }
    }
}

/// Row counts as Prometheus counters; a no-op unless a recorder is installed.
fn record_metrics(job: SyncJob, counts: &SyncCounts) {
    counter!("sync_jobs_total", "job" => job.as_str(), "status" => "success").increment(1);
    for (outcome, n) in [
        ("inserted", counts.inserted),
        ("updated", counts.updated),
        ("unchanged", counts.unchanged),
    ] {
        counter!("sync_rows_total", "job" => job.as_str(), "outcome" => outcome)
            .increment(u64::try_from(n).unwrap_or(0));
    }
}

/// Runs every job in [`SyncJob::ALL`] order, stopping at the first failure.
pub async fn run_all(
    pool: &PgPool,
    source: &dyn SourceSystem,
    year: Option<&str>,
) -> Result<Vec<JobReport>, SyncError> {
    let mut reports = Vec::with_capacity(SyncJob::ALL.len());
    for job in SyncJob::ALL {
        reports.push(run_job(pool, source, job, year).await?);
    }
    Ok(reports)
}

async fn execute(
    pool: &PgPool,
    source: &dyn SourceSystem,
    job: SyncJob,
    year: Option<&str>,
    counts: &mut SyncCounts,
) -> Result<(), SyncError> {
    let mut tx = pool.begin().await?;
    match job {
        SyncJob::Students => {
            let rows = collapse(source.students().await?, counts);
            students::upsert(&mut tx, &rows, counts).await?;
        }
        SyncJob::Elements => {
            let rows = collapse(source.elements().await?, counts);
            elements::upsert(&mut tx, &rows, counts).await?;
        }
        SyncJob::Grades => {
            let rows = collapse(source.grades(year).await?, counts);
            grades::upsert(&mut tx, &rows, counts).await?;
        }
        SyncJob::Situation => {
            let rows = collapse(source.situations().await?, counts);
            situation::upsert(&mut tx, &rows, counts).await?;
        }
        SyncJob::Laureats => {
            let rows = collapse(source.laureats().await?, counts);
            laureats::upsert(&mut tx, &rows, counts).await?;
        }
    }
    tx.commit().await?;
    Ok(())
}

/// Sets `fetched` from the source batch and keeps one row per natural key.
fn collapse<T: NaturalKey>(rows: Vec<T>, counts: &mut SyncCounts) -> Vec<T> {
    *counts = SyncCounts::fetched(rows.len());
    let (rows, dropped) = dedupe::collapse(rows);
    if dropped > 0 {
        warn!(dropped, "Collapsed source rows sharing a natural key");
        counts.collapsed(dropped);
    }
    rows
}

pub(crate) type Tx<'a> = Transaction<'a, Postgres>;
