//! Exam planning and resolved assignments.

use campus_core::serde::deserialize_optional_string;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Normale,
    Rattrapage,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Normale => "normale",
            SessionKind::Rattrapage => "rattrapage",
        }
    }
}

/// One scheduled exam: a module pattern sat by the groups in `group_spec`.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ExamPlanning {
    pub id: Uuid,
    pub module_pattern: String,
    pub module_label: Option<String>,
    pub cod_anu: String,
    pub session_kind: String,
    pub exam_date: NaiveDate,
    #[schema(value_type = String)]
    pub start_time: NaiveTime,
    #[schema(value_type = String)]
    pub end_time: NaiveTime,
    pub room: Option<String>,
    /// Free-text specifier, `None` for everyone.
    pub group_spec: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExamPlanningDto {
    #[validate(length(min = 1, max = 50, message = "module_pattern must be 1-50 characters"))]
    pub module_pattern: String,
    #[validate(length(max = 255))]
    pub module_label: Option<String>,
    #[validate(length(equal = 4, message = "cod_anu must be a 4 digit year"))]
    pub cod_anu: String,
    pub session_kind: SessionKind,
    pub exam_date: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "11:00:00")]
    pub end_time: NaiveTime,
    #[validate(length(max = 100))]
    pub room: Option<String>,
    #[validate(length(max = 255))]
    pub group_spec: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ExamPlanningFilter {
    /// Academic year
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub year: Option<String>,
    /// Case-insensitive `LIKE` filter on the module pattern
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub module: Option<String>,
}

/// An exam as seen by an assigned student.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentExam {
    pub planning_id: Uuid,
    pub module_pattern: String,
    pub module_label: Option<String>,
    pub cod_anu: String,
    pub session_kind: String,
    pub exam_date: NaiveDate,
    #[schema(value_type = String)]
    pub start_time: NaiveTime,
    #[schema(value_type = String)]
    pub end_time: NaiveTime,
    pub room: Option<String>,
    pub group_spec: Option<String>,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct SyncAssignmentsRequest {
    /// Only resolve this planning entry; all entries when absent.
    pub planning_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssignmentSyncReport {
    pub planning_id: Uuid,
    pub module_pattern: String,
    /// Students assigned after the sync.
    pub members: usize,
    pub added: u64,
    pub removed: u64,
    pub unmatched_groups: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentSyncResponse {
    pub plannings: Vec<AssignmentSyncReport>,
    pub total_members: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_planning_deserializes() {
        let dto: CreateExamPlanningDto = serde_json::from_str(
            r#"{
                "module_pattern": "JMDS1%",
                "cod_anu": "2024",
                "session_kind": "rattrapage",
                "exam_date": "2025-01-15",
                "start_time": "09:00:00",
                "end_time": "11:00:00",
                "group_spec": "G1 (Amphi A)+G2"
            }"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.session_kind, SessionKind::Rattrapage);
        assert_eq!(dto.session_kind.as_str(), "rattrapage");
    }

    #[test]
    fn test_create_planning_rejects_bad_year() {
        let dto: CreateExamPlanningDto = serde_json::from_str(
            r#"{
                "module_pattern": "JMDS1%",
                "cod_anu": "24",
                "session_kind": "normale",
                "exam_date": "2025-01-15",
                "start_time": "09:00:00",
                "end_time": "11:00:00"
            }"#,
        )
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_unknown_session_kind_is_rejected() {
        let result = serde_json::from_str::<SessionKind>(r#""summer""#);
        assert!(result.is_err());
    }
}
