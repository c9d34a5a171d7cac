use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::role::{require_admin, require_student};
use crate::modules::auth::router::init_auth_router;
use crate::modules::documents::router::init_documents_router;
use crate::modules::exam_groups::router::{
    init_exam_assignments_router, init_exam_groups_router,
};
use crate::modules::exam_planning::router::init_exam_planning_router;
use crate::modules::grouping_rules::router::init_grouping_rules_router;
use crate::modules::health::router::init_health_router;
use crate::modules::student::router::init_student_router;
use crate::modules::sync_logs::router::init_sync_logs_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use campus_config::CorsConfig;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if config.allows_any() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    layer.allow_origin(origins).allow_credentials(true)
}

/// Admin-only routes; every one of them sits behind `require_admin`.
fn init_admin_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/grouping-rules", init_grouping_rules_router())
        .nest("/exam-groups", init_exam_groups_router())
        .nest("/exam-planning", init_exam_planning_router())
        .nest("/exam-assignments", init_exam_assignments_router())
        .nest("/sync-logs", init_sync_logs_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
}

/// Builds the full application: API docs, `/health` and `/api/*`.
pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_health_router())
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router(state.clone()))
                .nest(
                    "/student",
                    init_student_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_student,
                    )),
                )
                .nest("/admin", init_admin_router(&state))
                .nest("/documents", init_documents_router()),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
