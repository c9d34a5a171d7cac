use anyhow::Context;
use campus_core::groups::GroupRule;
use campus_core::{AppError, GroupFilter, GroupSpec};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::modules::exam_planning::service::PLANNING_COLUMNS;

use super::model::{
    AssignmentSyncReport, AssignmentSyncResponse, ExamPlanning, GroupingRule, ResolvedGroup,
    StudentSummary,
};

/// Orders students by surname, first name and code, byte-wise on the
/// upper-cased names.
pub fn sort_students(students: &mut [StudentSummary]) {
    students.sort_by(|a, b| {
        a.lib_nom_pat_ind
            .to_uppercase()
            .cmp(&b.lib_nom_pat_ind.to_uppercase())
            .then_with(|| a.lib_pr1_ind.to_uppercase().cmp(&b.lib_pr1_ind.to_uppercase()))
            .then_with(|| a.cod_etu.cmp(&b.cod_etu))
    });
}

/// Applies a resolved filter to the enrolled candidates.
pub fn select_members(
    filter: &GroupFilter,
    candidates: Vec<StudentSummary>,
) -> Vec<StudentSummary> {
    let mut members: Vec<StudentSummary> = candidates
        .into_iter()
        .filter(|s| filter.admits(&s.lib_nom_pat_ind))
        .collect();
    sort_students(&mut members);
    members.dedup_by(|a, b| a.cod_etu == b.cod_etu);
    members
}

pub struct ExamGroupService;

impl ExamGroupService {
    /// Students of `module` belonging to the groups named in `groups`.
    #[instrument(skip(db))]
    pub async fn resolve(
        db: &PgPool,
        module: &str,
        groups: Option<&str>,
        year: Option<&str>,
    ) -> Result<ResolvedGroup, AppError> {
        let spec = GroupSpec::parse(groups);

        let rules: Vec<GroupRule> = if spec.is_all() {
            Vec::new()
        } else {
            sqlx::query_as::<_, GroupingRule>(
                r#"SELECT id, module_pattern, group_name, range_start, range_end,
                          created_at, updated_at
                   FROM grouping_rules
                   WHERE module_pattern ILIKE $1 AND group_name = ANY($2)"#,
            )
            .bind(module)
            .bind(spec.groups())
            .fetch_all(db)
            .await
            .context("Failed to fetch grouping rules")
            .map_err(AppError::database)?
            .iter()
            .map(GroupRule::from)
            .collect()
        };
        let filter = GroupFilter::build(&spec, module, &rules);

        let candidates = sqlx::query_as::<_, StudentSummary>(
            r#"SELECT DISTINCT s.cod_etu, s.lib_nom_pat_ind, s.lib_pr1_ind
               FROM students s
               JOIN pedagogical_situation p ON p.cod_etu = s.cod_etu
               WHERE p.cod_elp ILIKE $1
                 AND ($2::VARCHAR IS NULL OR p.cod_anu = $2)"#,
        )
        .bind(module)
        .bind(year)
        .fetch_all(db)
        .await
        .context("Failed to fetch enrolled students")
        .map_err(AppError::database)?;

        let students = select_members(&filter, candidates);
        let unmatched_groups = filter.unmatched_groups().to_vec();
        if !unmatched_groups.is_empty() {
            warn!(module, ?unmatched_groups, "Groups without grouping rules");
        }

        Ok(ResolvedGroup {
            module_pattern: module.to_string(),
            groups: spec.groups().to_vec(),
            all: spec.is_all(),
            unmatched_groups,
            total: students.len(),
            students,
        })
    }

    /// Re-resolves one planning entry, or all of them, into `exam_assignments`.
    #[instrument(skip(db))]
    pub async fn sync_assignments(
        db: &PgPool,
        planning_id: Option<Uuid>,
    ) -> Result<AssignmentSyncResponse, AppError> {
        let plannings = sqlx::query_as::<_, ExamPlanning>(&format!(
            r#"SELECT {PLANNING_COLUMNS} FROM exam_planning
               WHERE ($1::UUID IS NULL OR id = $1)
               ORDER BY exam_date, start_time"#
        ))
        .bind(planning_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch exam planning")
        .map_err(AppError::database)?;

        if planning_id.is_some() && plannings.is_empty() {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Exam planning entry not found"
            )));
        }

        let mut reports = Vec::with_capacity(plannings.len());
        for planning in &plannings {
            reports.push(Self::sync_planning(db, planning).await?);
        }

        let total_members = reports.iter().map(|r| r.members).sum();
        info!(plannings = reports.len(), total_members, "Exam assignments synchronized");

        Ok(AssignmentSyncResponse {
            plannings: reports,
            total_members,
        })
    }

    async fn sync_planning(
        db: &PgPool,
        planning: &ExamPlanning,
    ) -> Result<AssignmentSyncReport, AppError> {
        let resolved = Self::resolve(
            db,
            &planning.module_pattern,
            planning.group_spec.as_deref(),
            Some(&planning.cod_anu),
        )
        .await?;
        let codes: Vec<String> = resolved.students.iter().map(|s| s.cod_etu.clone()).collect();

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let removed = sqlx::query(
            "DELETE FROM exam_assignments WHERE planning_id = $1 AND NOT (cod_etu = ANY($2))",
        )
        .bind(planning.id)
        .bind(&codes)
        .execute(&mut *tx)
        .await
        .context("Failed to prune exam assignments")
        .map_err(AppError::database)?
        .rows_affected();

        let added = sqlx::query(
            r#"INSERT INTO exam_assignments (planning_id, cod_etu)
               SELECT $1, UNNEST($2::VARCHAR[])
               ON CONFLICT (planning_id, cod_etu) DO NOTHING"#,
        )
        .bind(planning.id)
        .bind(&codes)
        .execute(&mut *tx)
        .await
        .context("Failed to insert exam assignments")
        .map_err(AppError::database)?
        .rows_affected();

        tx.commit()
            .await
            .context("Failed to commit exam assignments")
            .map_err(AppError::database)?;

        Ok(AssignmentSyncReport {
            planning_id: planning.id,
            module_pattern: planning.module_pattern.clone(),
            members: codes.len(),
            added,
            removed,
            unmatched_groups: resolved.unmatched_groups,
        })
    }
}
