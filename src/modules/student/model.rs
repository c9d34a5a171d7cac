pub use campus_models::documents::{IssueDocumentRequest, IssuedDocumentResponse};
pub use campus_models::exams::StudentExam;
pub use campus_models::grades::{
    GradeFilter, GradeRow, GradeStats, GradesResponse, Transcript, TranscriptFilter,
};
pub use campus_models::students::{Graduation, Student, StudentProfile};
