//! Student models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A student as synchronized from the source system.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Student {
    pub cod_etu: String,
    /// Surname.
    pub lib_nom_pat_ind: String,
    /// First name.
    pub lib_pr1_ind: String,
    pub date_nai_ind: Option<NaiveDate>,
    /// National student number (CNE).
    pub cod_nne_ind: Option<String>,
    pub cin_ind: Option<String>,
    pub cod_sex_etu: Option<String>,
    pub email: Option<String>,
    pub nb_inscriptions: i32,
    pub last_sync: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.lib_nom_pat_ind, self.lib_pr1_ind)
            .trim()
            .to_string()
    }
}

/// Diploma obtained by a student (`laureats`).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Graduation {
    pub cod_dip: String,
    pub lib_dip: String,
    pub cod_anu: String,
    pub not_vdi: Option<f64>,
    /// Honours code.
    pub cod_men: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentProfile {
    #[serde(flatten)]
    pub student: Student,
    pub graduations: Vec<Graduation>,
}

/// Minimal student identity returned by the group resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct StudentSummary {
    pub cod_etu: String,
    pub lib_nom_pat_ind: String,
    pub lib_pr1_ind: String,
}
