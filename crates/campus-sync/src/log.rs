//! `sync_log` bookkeeping. Log rows are written outside the job transaction
//! so failed runs stay visible after a rollback.

use sqlx::PgPool;

use crate::jobs::SyncCounts;

pub async fn start(pool: &PgPool, job: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO sync_log (job, status) VALUES ($1, 'running') RETURNING id",
    )
    .bind(job)
    .fetch_one(pool)
    .await
}

pub async fn finish(
    pool: &PgPool,
    id: i64,
    counts: &SyncCounts,
    error: Option<&str>,
) -> Result<(), sqlx::Error> {
    let status = if error.is_some() { "failed" } else { "success" };
    sqlx::query(
        r#"UPDATE sync_log
           SET status = $2, finished_at = NOW(), fetched = $3, inserted = $4,
               updated = $5, unchanged = $6, error = $7
           WHERE id = $1"#,
    )
    .bind(id)
    .bind(status)
    .bind(counts.fetched)
    .bind(counts.inserted)
    .bind(counts.updated)
    .bind(counts.unchanged)
    .bind(error)
    .execute(pool)
    .await?;
    Ok(())
}
