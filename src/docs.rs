use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use campus_auth::{DocumentClaims, DocumentKind, Role, Verification};
use campus_core::{ElementType, PaginationMeta, PaginationParams, Season};
use campus_models::documents::{IssueDocumentRequest, IssuedDocumentResponse, VerifyDocumentRequest};
use campus_models::exams::{
    AssignmentSyncReport, AssignmentSyncResponse, CreateExamPlanningDto, ExamPlanning,
    SessionKind, StudentExam, SyncAssignmentsRequest,
};
use campus_models::grades::{
    GradeEntry, GradeStats, GradesResponse, SeasonGrades, SemesterAverage, SemesterGrades,
    SessionGrades, Transcript, TranscriptLine, TranscriptSemester, YearGrades,
};
use campus_models::grouping::{
    CreateGroupingRuleDto, GroupingRule, ResolvedGroup, UpdateGroupingRuleDto,
};
use campus_models::students::{Graduation, Student, StudentProfile, StudentSummary};
use campus_models::sync_log::{PaginatedSyncLogs, SyncLog};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::modules::health::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health,
        crate::modules::auth::controller::login,
        crate::modules::student::controller::get_profile,
        crate::modules::student::controller::get_grades,
        crate::modules::student::controller::get_grade_stats,
        crate::modules::student::controller::get_transcript,
        crate::modules::student::controller::get_my_exams,
        crate::modules::student::controller::issue_document,
        crate::modules::grouping_rules::controller::list_rules,
        crate::modules::grouping_rules::controller::create_rule,
        crate::modules::grouping_rules::controller::update_rule,
        crate::modules::grouping_rules::controller::delete_rule,
        crate::modules::exam_groups::controller::resolve_group,
        crate::modules::exam_groups::controller::sync_assignments,
        crate::modules::exam_planning::controller::list_plannings,
        crate::modules::exam_planning::controller::create_planning,
        crate::modules::exam_planning::controller::delete_planning,
        crate::modules::sync_logs::controller::list_sync_logs,
        crate::modules::documents::controller::verify_document,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            LoginRequest,
            LoginResponse,
            Role,
            Student,
            StudentProfile,
            StudentSummary,
            Graduation,
            GradesResponse,
            YearGrades,
            SessionGrades,
            SeasonGrades,
            SemesterGrades,
            GradeEntry,
            GradeStats,
            SemesterAverage,
            Transcript,
            TranscriptSemester,
            TranscriptLine,
            Season,
            ElementType,
            GroupingRule,
            CreateGroupingRuleDto,
            UpdateGroupingRuleDto,
            ResolvedGroup,
            ExamPlanning,
            CreateExamPlanningDto,
            SessionKind,
            StudentExam,
            SyncAssignmentsRequest,
            AssignmentSyncReport,
            AssignmentSyncResponse,
            SyncLog,
            PaginatedSyncLogs,
            PaginationMeta,
            PaginationParams,
            DocumentKind,
            DocumentClaims,
            IssueDocumentRequest,
            IssuedDocumentResponse,
            VerifyDocumentRequest,
            Verification,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Student and administrator login"),
        (name = "Student", description = "Profile, grades, transcript and exams of the logged-in student"),
        (name = "Grouping rules", description = "Surname ranges defining exam groups"),
        (name = "Exam groups", description = "Group resolution and exam assignments"),
        (name = "Exam planning", description = "Exam schedule management"),
        (name = "Sync", description = "ETL run history"),
        (name = "Documents", description = "Public verification of issued documents")
    ),
    info(
        title = "Campus API",
        version = "0.1.0",
        description = "Student portal API: grades, transcripts, exam groups and document verification, backed by a PostgreSQL cache of the student information system.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
