pub use campus_core::{PaginationMeta, PaginationParams};
pub use campus_models::sync_log::{PaginatedSyncLogs, SyncLog};
