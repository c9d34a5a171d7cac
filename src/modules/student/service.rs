use anyhow::Context;
use campus_core::{AppError, ElementType, classify};
use sqlx::PgPool;
use tracing::instrument;

use super::model::{
    GradeFilter, GradeRow, Graduation, Student, StudentExam, StudentProfile, Transcript,
};

const STUDENT_COLUMNS: &str = "cod_etu, lib_nom_pat_ind, lib_pr1_ind, date_nai_ind, cod_nne_ind, \
    cin_ind, cod_sex_etu, email, nb_inscriptions, last_sync, created_at, updated_at";

/// Fills in semester and type for elements that were never classified,
/// or whose code is missing from `element_pedagogi`.
fn fill_classification(mut row: GradeRow) -> GradeRow {
    if row.semester_number.is_none() && row.element_type.as_deref().is_none_or(|t| t == "module") {
        let c = classify(&row.cod_elp, row.lib_elp.as_deref());
        row.semester_number = c.semester.map(i16::from);
        if c.element_type != ElementType::Module || row.element_type.is_none() {
            row.element_type = Some(c.element_type.as_str().to_string());
        }
    }
    row
}

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, cod_etu: &str) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE cod_etu = $1"
        ))
        .bind(cod_etu)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    #[instrument(skip(db))]
    pub async fn ensure_exists(db: &PgPool, cod_etu: &str) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM students WHERE cod_etu = $1)",
        )
        .bind(cod_etu)
        .fetch_one(db)
        .await
        .context("Failed to check student")
        .map_err(AppError::database)?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_profile(db: &PgPool, cod_etu: &str) -> Result<StudentProfile, AppError> {
        let student = Self::get_student(db, cod_etu).await?;

        let graduations = sqlx::query_as::<_, Graduation>(
            r#"SELECT cod_dip, lib_dip, cod_anu, not_vdi, cod_men
               FROM laureats WHERE cod_etu = $1
               ORDER BY cod_anu DESC, cod_dip"#,
        )
        .bind(cod_etu)
        .fetch_all(db)
        .await
        .context("Failed to fetch graduations")
        .map_err(AppError::database)?;

        Ok(StudentProfile {
            student,
            graduations,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_grade_rows(
        db: &PgPool,
        cod_etu: &str,
        filter: &GradeFilter,
    ) -> Result<Vec<GradeRow>, AppError> {
        let rows = sqlx::query_as::<_, GradeRow>(
            r#"SELECT g.cod_elp, e.lib_elp, g.cod_anu, g.cod_ses, g.note, g.cod_tre,
                      e.nbr_crd_elp, e.semester_number, e.element_type
               FROM grades g
               LEFT JOIN element_pedagogi e ON e.cod_elp = g.cod_elp
               WHERE g.cod_etu = $1
                 AND ($2::VARCHAR IS NULL OR g.cod_anu = $2)
                 AND ($3::VARCHAR IS NULL OR g.cod_ses = $3)
               ORDER BY g.cod_anu DESC, g.cod_ses, g.cod_elp"#,
        )
        .bind(cod_etu)
        .bind(filter.year.as_deref())
        .bind(filter.session.as_deref())
        .fetch_all(db)
        .await
        .context("Failed to fetch grades")
        .map_err(AppError::database)?;

        Ok(rows.into_iter().map(fill_classification).collect())
    }

    /// Transcript of `year`, or of the most recent year with grades.
    #[instrument(skip(db))]
    pub async fn get_transcript(
        db: &PgPool,
        cod_etu: &str,
        year: Option<String>,
    ) -> Result<Transcript, AppError> {
        let student = Self::get_student(db, cod_etu).await?;

        let year = match year {
            Some(year) => year,
            None => sqlx::query_scalar::<_, Option<String>>(
                "SELECT MAX(cod_anu) FROM grades WHERE cod_etu = $1",
            )
            .bind(cod_etu)
            .fetch_one(db)
            .await
            .context("Failed to fetch latest academic year")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No grades found")))?,
        };

        let filter = GradeFilter {
            year: Some(year.clone()),
            session: None,
        };
        let rows = Self::get_grade_rows(db, cod_etu, &filter).await?;
        if rows.is_empty() {
            return Err(AppError::not_found(anyhow::anyhow!(
                "No grades found for academic year {}",
                year
            )));
        }

        Ok(Transcript::build(
            cod_etu,
            &student.display_name(),
            &year,
            &rows,
        ))
    }

    #[instrument(skip(db))]
    pub async fn get_exams(db: &PgPool, cod_etu: &str) -> Result<Vec<StudentExam>, AppError> {
        sqlx::query_as::<_, StudentExam>(
            r#"SELECT p.id AS planning_id, p.module_pattern, p.module_label, p.cod_anu,
                      p.session_kind, p.exam_date, p.start_time, p.end_time, p.room,
                      p.group_spec, a.assigned_at
               FROM exam_assignments a
               JOIN exam_planning p ON p.id = a.planning_id
               WHERE a.cod_etu = $1
               ORDER BY p.exam_date, p.start_time"#,
        )
        .bind(cod_etu)
        .fetch_all(db)
        .await
        .context("Failed to fetch exam assignments")
        .map_err(AppError::database)
    }
}
