pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::*;
pub use router::{init_exam_assignments_router, init_exam_groups_router};
pub use service::ExamGroupService;
