//! Prometheus metrics: HTTP request instrumentation and portal counters.
//!
//! Everything here is a no-op when `OBSERVABILITY_ENABLED` is `false` or `0`.
//! The exporter is served by [`metrics_app`] on its own port.

use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tracing::error;

const REQUEST_DURATION: &str = "http_request_duration_seconds";
const ACTIVE_REQUESTS: &str = "http_requests_active";

const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

fn parse_enabled(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_lowercase()) {
        Some(v) => v != "false" && v != "0",
        None => true,
    }
}

pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED
        .get_or_init(|| parse_enabled(std::env::var("OBSERVABILITY_ENABLED").ok().as_deref()))
}

fn when_enabled(record: impl FnOnce()) {
    if is_observability_enabled() {
        record();
    }
}

/// Installs the Prometheus recorder and spawns its upkeep task.
///
/// Returns `None` when observability is disabled or the recorder cannot be
/// installed; the API keeps running without metrics in both cases.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let installed = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), LATENCY_BUCKETS)
        .and_then(|builder| builder.install_recorder());

    let handle = match installed {
        Ok(handle) => handle,
        Err(e) => {
            error!(error = %e, "Failed to install Prometheus recorder");
            return None;
        }
    };

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(UPKEEP_INTERVAL);
        loop {
            ticker.tick().await;
            upkeep.run_upkeep();
        }
    });

    Some(handle)
}

/// Router for the metrics listener.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

fn status_class(status: StatusCode) -> &'static str {
    if status.is_success() {
        "2xx"
    } else if status.is_redirection() {
        "3xx"
    } else if status.is_client_error() {
        "4xx"
    } else if status.is_server_error() {
        "5xx"
    } else {
        "other"
    }
}

/// Keeps the active requests gauge balanced when a request future is dropped.
struct ActiveRequest;

impl ActiveRequest {
    fn start() -> Self {
        gauge!(ACTIVE_REQUESTS).increment(1.0);
        ActiveRequest
    }
}

impl Drop for ActiveRequest {
    fn drop(&mut self) {
        gauge!(ACTIVE_REQUESTS).decrement(1.0);
    }
}

/// Records request count, latency and status class, labelled by the matched
/// route template (`/api/admin/grouping-rules/{id}`), not the raw path.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let method = req.method().as_str().to_owned();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let _active = ActiveRequest::start();
    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();

    let status = response.status();
    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status.as_u16().to_string(),
        "class" => status_class(status),
    )
    .increment(1);
    histogram!(REQUEST_DURATION, "method" => method, "route" => route).record(elapsed);

    response
}

pub fn track_login_success(role: &str) {
    let role = role.to_string();
    when_enabled(|| counter!("logins_total", "role" => role, "outcome" => "success").increment(1));
}

pub fn track_login_failure(reason: &'static str) {
    when_enabled(|| counter!("logins_total", "outcome" => "failure", "reason" => reason).increment(1));
}

pub fn track_login_rate_limited() {
    when_enabled(|| counter!("login_rate_limited_total").increment(1));
}

pub fn track_jwt_issued() {
    when_enabled(|| counter!("jwt_tokens_issued_total").increment(1));
}

pub fn track_document_issued(kind: &'static str) {
    when_enabled(|| counter!("documents_issued_total", "kind" => kind).increment(1));
}

pub fn track_document_verification(valid: bool) {
    let outcome = if valid { "valid" } else { "invalid" };
    when_enabled(|| counter!("document_verifications_total", "outcome" => outcome).increment(1));
}

/// Rows written and pruned by an exam assignment sync.
pub fn track_assignments_synced(assigned: u64, removed: u64) {
    when_enabled(|| {
        counter!("exam_assignments_written_total").increment(assigned);
        counter!("exam_assignments_removed_total").increment(removed);
    });
}

pub fn track_group_resolution(students: usize, unmatched_groups: usize) {
    when_enabled(|| {
        histogram!("exam_group_resolved_students").record(students as f64);
        if unmatched_groups > 0 {
            counter!("exam_group_unmatched_total").increment(unmatched_groups as u64);
        }
    });
}
