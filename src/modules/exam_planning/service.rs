use anyhow::Context;
use campus_core::AppError;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{CreateExamPlanningDto, ExamPlanning, ExamPlanningFilter};

// Label and room are stored as '' when absent.
pub const PLANNING_COLUMNS: &str = "id, module_pattern, NULLIF(module_label, '') AS module_label, \
    cod_anu, session_kind, exam_date, start_time, end_time, NULLIF(room, '') AS room, \
    group_spec, created_at, updated_at";

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn check_schedule(dto: &CreateExamPlanningDto) -> Result<(), AppError> {
    if dto.start_time >= dto.end_time {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "start_time must be before end_time"
        )));
    }
    Ok(())
}

pub struct ExamPlanningService;

impl ExamPlanningService {
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filter: ExamPlanningFilter,
    ) -> Result<Vec<ExamPlanning>, AppError> {
        sqlx::query_as::<_, ExamPlanning>(&format!(
            r#"SELECT {PLANNING_COLUMNS} FROM exam_planning
               WHERE ($1::VARCHAR IS NULL OR cod_anu = $1)
                 AND ($2::VARCHAR IS NULL OR module_pattern ILIKE $2)
               ORDER BY exam_date, start_time, module_pattern"#
        ))
        .bind(filter.year.as_deref())
        .bind(filter.module.as_deref())
        .fetch_all(db)
        .await
        .context("Failed to fetch exam planning")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn create(
        db: &PgPool,
        dto: CreateExamPlanningDto,
    ) -> Result<ExamPlanning, AppError> {
        check_schedule(&dto)?;

        sqlx::query_as::<_, ExamPlanning>(&format!(
            r#"INSERT INTO exam_planning
                   (module_pattern, module_label, cod_anu, session_kind, exam_date,
                    start_time, end_time, room, group_spec)
               VALUES ($1, COALESCE($2, ''), $3, $4, $5, $6, $7, COALESCE($8, ''), $9)
               RETURNING {PLANNING_COLUMNS}"#
        ))
        .bind(dto.module_pattern.trim().to_uppercase())
        .bind(blank_to_none(dto.module_label))
        .bind(dto.cod_anu.trim())
        .bind(dto.session_kind.as_str())
        .bind(dto.exam_date)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(blank_to_none(dto.room))
        .bind(blank_to_none(dto.group_spec))
        .fetch_one(db)
        .await
        .context("Failed to create exam planning entry")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM exam_planning WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete exam planning entry")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Exam planning entry not found"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_models::exams::SessionKind;
    use chrono::{NaiveDate, NaiveTime};

    fn dto(start: (u32, u32), end: (u32, u32)) -> CreateExamPlanningDto {
        CreateExamPlanningDto {
            module_pattern: "JMDS1%".to_string(),
            module_label: None,
            cod_anu: "2024".to_string(),
            session_kind: SessionKind::Normale,
            exam_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            room: None,
            group_spec: None,
        }
    }

    #[test]
    fn test_schedule_must_be_ordered() {
        assert!(check_schedule(&dto((9, 0), (11, 0))).is_ok());
        assert!(check_schedule(&dto((11, 0), (9, 0))).is_err());
        assert!(check_schedule(&dto((9, 0), (9, 0))).is_err());
    }

    #[test]
    fn test_blank_to_none() {
        assert_eq!(blank_to_none(Some("  ".to_string())), None);
        assert_eq!(blank_to_none(Some(" Amphi A ".to_string())), Some("Amphi A".to_string()));
        assert_eq!(blank_to_none(None), None);
    }
}
