pub mod auth;
pub mod documents;
pub mod exam_groups;
pub mod exam_planning;
pub mod grouping_rules;
pub mod health;
pub mod student;
pub mod sync_logs;

pub use self::auth::model::LoginRequest;
pub use self::exam_groups::ExamGroupService;
