pub use campus_models::auth::{LoginRequest, LoginResponse};
