//! Tracing setup for the API server and the per-request logging middleware.

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use opentelemetry::{KeyValue, global, trace::TraceError};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    runtime,
    trace::{RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{Instrument, error, info, info_span, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_REQUEST_ID_LEN: usize = 128;

/// Reuses a caller supplied `x-request-id` (a reverse proxy's, typically)
/// or generates one.
fn request_id(req: &Request) -> String {
    req.headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Runs the request inside a `request` span carrying its id, logs the
/// outcome (4xx at `warn`, 5xx at `error`) and echoes the id back in the
/// `x-request-id` response header.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = request_id(&req);
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let span = info_span!("request", request_id = %request_id, method = %method, route = %route);
    let mut response = next.run(req).instrument(span.clone()).await;

    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status();
    span.in_scope(|| log_outcome(status, latency_ms));

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn log_outcome(status: StatusCode, latency_ms: u64) {
    let code = status.as_u16();
    if status.is_server_error() {
        error!(status = code, latency_ms, "Server error");
    } else if status.is_client_error() {
        warn!(status = code, latency_ms, "Client error");
    } else {
        info!(status = code, latency_ms, "Request completed");
    }
}

/// Logging settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    log_dir: PathBuf,
    otel_enabled: bool,
    otlp_endpoint: String,
    environment: String,
}

impl LogSettings {
    fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            log_dir: var("LOG_DIR")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "storage/logs".to_string())
                .into(),
            otel_enabled: var("OTEL_ENABLED")
                .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0"))
                .unwrap_or(true),
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|| "http://localhost:4317".to_string()),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        }
    }
}

fn init_tracer(settings: &LogSettings) -> Result<Tracer, TraceError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = Resource::new(vec![
        KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new("deployment.environment", settings.environment.clone()),
    ]);

    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(settings.otlp_endpoint.clone());

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .install_batch(runtime::Tokio)
}

/// Installs the global subscriber.
///
/// Layers: compact console output filtered by `RUST_LOG`, a daily rolling
/// error file and a daily rolling JSON file under `LOG_DIR`, and OTLP span
/// export unless `OTEL_ENABLED=false`. File logging and OTLP are each
/// skipped, with a note on stderr, when they cannot be set up.
pub fn init_tracing() {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    let settings = LogSettings::from_env();

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,campus_sync=info,tower_http=warn,sqlx=warn,tonic=info",
            env!("CARGO_CRATE_NAME")
        ))
    });
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let file_layers = match std::fs::create_dir_all(&settings.log_dir) {
        Ok(()) => {
            let errors = RollingFileAppender::new(Rotation::DAILY, &settings.log_dir, "campus.log");
            let json = RollingFileAppender::new(Rotation::DAILY, &settings.log_dir, "campus.json");

            let error_layer = fmt::layer()
                .with_writer(errors)
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_filter(EnvFilter::new("error"));
            let json_layer = fmt::layer()
                .json()
                .with_writer(json)
                .with_current_span(true)
                .with_span_list(true)
                .with_filter(EnvFilter::new("info"));

            Some(error_layer.and_then(json_layer))
        }
        Err(e) => {
            eprintln!(
                "Cannot create {}: {}. File logging disabled.",
                settings.log_dir.display(),
                e
            );
            None
        }
    };

    let tracer = if settings.otel_enabled {
        init_tracer(&settings)
            .inspect_err(|e| eprintln!("OpenTelemetry unavailable: {}. Continuing without it.", e))
            .ok()
    } else {
        None
    };
    let with_otel = tracer.is_some();

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layers)
        .with(tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer)))
        .init();

    if with_otel {
        info!(endpoint = %settings.otlp_endpoint, "Tracing initialized with OTLP export");
    } else {
        warn!("Tracing initialized without OpenTelemetry");
    }
}

/// Flushes pending spans.
pub async fn shutdown_tracer() {
    global::shutdown_tracer_provider();
    info!("OpenTelemetry tracer shut down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> LogSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogSettings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_settings_defaults() {
        let s = settings(&[]);
        assert_eq!(s.log_dir, PathBuf::from("storage/logs"));
        assert!(s.otel_enabled);
        assert_eq!(s.otlp_endpoint, "http://localhost:4317");
        assert_eq!(s.environment, "development");
    }

    #[test]
    fn test_settings_overrides() {
        let s = settings(&[
            ("LOG_DIR", "/var/log/campus"),
            ("OTEL_ENABLED", "False"),
            ("ENVIRONMENT", "production"),
        ]);
        assert_eq!(s.log_dir, PathBuf::from("/var/log/campus"));
        assert!(!s.otel_enabled);
        assert_eq!(s.environment, "production");
    }

    #[test]
    fn test_request_id_reuses_header() {
        let req = Request::builder()
            .header("x-request-id", " abc-123 ")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id(&req), "abc-123");
    }

    #[test]
    fn test_request_id_generated_when_missing_or_oversized() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert!(uuid::Uuid::parse_str(&request_id(&req)).is_ok());

        let req = Request::builder()
            .header("x-request-id", "x".repeat(MAX_REQUEST_ID_LEN + 1))
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id(&req).len(), 36);
    }
}
