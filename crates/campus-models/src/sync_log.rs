//! ETL run history (`sync_log`).

use campus_core::PaginationMeta;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SyncLog {
    pub id: i64,
    pub job: String,
    /// `running`, `success` or `failed`.
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub fetched: i32,
    pub inserted: i32,
    pub updated: i32,
    pub unchanged: i32,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedSyncLogs {
    pub data: Vec<SyncLog>,
    pub meta: PaginationMeta,
}
