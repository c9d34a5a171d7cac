use anyhow::Context;
use campus_core::{AppError, SurnameRange};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{CreateGroupingRuleDto, GroupingRule, GroupingRuleFilter, UpdateGroupingRuleDto};

const RULE_COLUMNS: &str =
    "id, module_pattern, group_name, range_start, range_end, created_at, updated_at";

/// Normalized rule fields, ready to be stored.
#[derive(Debug, PartialEq, Eq)]
struct RuleFields {
    module_pattern: String,
    group_name: String,
    range: SurnameRange,
}

impl RuleFields {
    fn new(
        module_pattern: &str,
        group_name: &str,
        range_start: &str,
        range_end: &str,
    ) -> Result<Self, AppError> {
        let range = SurnameRange::new(range_start, range_end);
        if !range.is_ordered() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "range_start must not sort after range_end"
            )));
        }
        Ok(Self {
            module_pattern: module_pattern.trim().to_uppercase(),
            group_name: group_name.trim().to_string(),
            range,
        })
    }
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::bad_request(anyhow::anyhow!(
            "A rule with this module, group and range start already exists"
        ));
    }
    AppError::database(e)
}

pub struct GroupingRuleService;

impl GroupingRuleService {
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filter: GroupingRuleFilter,
    ) -> Result<Vec<GroupingRule>, AppError> {
        sqlx::query_as::<_, GroupingRule>(&format!(
            r#"SELECT {RULE_COLUMNS} FROM grouping_rules
               WHERE ($1::VARCHAR IS NULL OR module_pattern ILIKE $1)
               ORDER BY module_pattern, group_name, range_start"#
        ))
        .bind(filter.module.as_deref())
        .fetch_all(db)
        .await
        .context("Failed to fetch grouping rules")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn create(db: &PgPool, dto: CreateGroupingRuleDto) -> Result<GroupingRule, AppError> {
        let fields = RuleFields::new(
            &dto.module_pattern,
            &dto.group_name,
            &dto.range_start,
            &dto.range_end,
        )?;

        sqlx::query_as::<_, GroupingRule>(&format!(
            r#"INSERT INTO grouping_rules (module_pattern, group_name, range_start, range_end)
               VALUES ($1, $2, $3, $4)
               RETURNING {RULE_COLUMNS}"#
        ))
        .bind(&fields.module_pattern)
        .bind(&fields.group_name)
        .bind(&fields.range.start)
        .bind(&fields.range.end)
        .fetch_one(db)
        .await
        .map_err(map_write_error)
    }

    #[instrument(skip(db))]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        dto: UpdateGroupingRuleDto,
    ) -> Result<GroupingRule, AppError> {
        let current = Self::get(db, id).await?;

        let fields = RuleFields::new(
            dto.module_pattern.as_deref().unwrap_or(&current.module_pattern),
            dto.group_name.as_deref().unwrap_or(&current.group_name),
            dto.range_start.as_deref().unwrap_or(&current.range_start),
            dto.range_end.as_deref().unwrap_or(&current.range_end),
        )?;

        sqlx::query_as::<_, GroupingRule>(&format!(
            r#"UPDATE grouping_rules
               SET module_pattern = $2, group_name = $3, range_start = $4, range_end = $5,
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {RULE_COLUMNS}"#
        ))
        .bind(id)
        .bind(&fields.module_pattern)
        .bind(&fields.group_name)
        .bind(&fields.range.start)
        .bind(&fields.range.end)
        .fetch_optional(db)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Grouping rule not found")))
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: Uuid) -> Result<GroupingRule, AppError> {
        sqlx::query_as::<_, GroupingRule>(&format!(
            "SELECT {RULE_COLUMNS} FROM grouping_rules WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch grouping rule")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Grouping rule not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM grouping_rules WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete grouping rule")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Grouping rule not found")));
        }
        Ok(())
    }
}
