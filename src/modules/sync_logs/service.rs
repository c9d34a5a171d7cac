use anyhow::Context;
use campus_core::AppError;
use sqlx::PgPool;
use tracing::instrument;

use super::model::{PaginatedSyncLogs, PaginationMeta, PaginationParams, SyncLog};

pub struct SyncLogService;

impl SyncLogService {
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        pagination: &PaginationParams,
    ) -> Result<PaginatedSyncLogs, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sync_log")
            .fetch_one(db)
            .await
            .context("Failed to count sync logs")
            .map_err(AppError::database)?;

        let window = pagination.sql_window();
        let data = sqlx::query_as::<_, SyncLog>(
            r#"SELECT id, job, status, started_at, finished_at, fetched, inserted, updated,
                      unchanged, error
               FROM sync_log
               ORDER BY started_at DESC, id DESC
               LIMIT $1 OFFSET $2"#,
        )
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch sync logs")
        .map_err(AppError::database)?;

        Ok(PaginatedSyncLogs {
            data,
            meta: PaginationMeta::from_params(pagination, total),
        })
    }
}
