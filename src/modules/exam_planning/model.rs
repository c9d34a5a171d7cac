pub use campus_models::exams::{CreateExamPlanningDto, ExamPlanning, ExamPlanningFilter};
