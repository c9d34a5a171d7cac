use std::env;

/// Vite dev server of the portal frontend.
const DEFAULT_ORIGINS: &str = "http://localhost:5173";

/// Browser origins allowed to call the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Reads the comma separated `ALLOWED_ORIGINS`.
    pub fn from_env() -> Self {
        Self::parse(&env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.to_string()))
    }

    /// Origins are trimmed, stripped of a trailing `/` and de-duplicated.
    pub fn parse(origins: &str) -> Self {
        let mut allowed_origins: Vec<String> = Vec::new();
        for origin in origins.split(',').map(|o| o.trim().trim_end_matches('/')) {
            if !origin.is_empty() && !allowed_origins.iter().any(|o| o == origin) {
                allowed_origins.push(origin.to_string());
            }
        }
        Self { allowed_origins }
    }

    /// A `*` entry admits every origin (without credentials).
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_origins() {
        let config = CorsConfig::parse(" https://portal.example.edu/ ,,http://localhost:5173,https://portal.example.edu");
        assert_eq!(
            config.allowed_origins,
            vec!["https://portal.example.edu", "http://localhost:5173"]
        );
        assert!(!config.allows_any());
    }

    #[test]
    fn test_wildcard() {
        assert!(CorsConfig::parse("*").allows_any());
        assert!(CorsConfig::parse("").allowed_origins.is_empty());
    }
}
