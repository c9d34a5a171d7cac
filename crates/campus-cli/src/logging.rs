use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CAMPUS_CRATES: &[&str] = &["campus", "campus_cli", "campus_sync", "campus_db"];

fn default_directives(level: &str) -> String {
    let mut directives: Vec<String> = CAMPUS_CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, level))
        .collect();
    directives.push("sqlx=warn".to_string());
    directives.join(",")
}

/// Console logging for one-shot commands, written to stderr so command
/// output on stdout stays pipeable.
///
/// `LOG_LEVEL` sets the level of the campus crates (default `info`).
/// `RUST_LOG` overrides everything.
pub fn init_console_logging() {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level.trim())));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(console_layer).init();
}
