pub use campus_models::exams::{
    AssignmentSyncReport, AssignmentSyncResponse, ExamPlanning, SyncAssignmentsRequest,
};
pub use campus_models::grouping::{GroupingRule, ResolveQuery, ResolvedGroup};
pub use campus_models::students::StudentSummary;
