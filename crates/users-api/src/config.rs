use std::time::Duration;

use crate::error::ApiError;

/// Strip surrounding whitespace and one layer of matching quotes.
pub fn normalize_env_value(raw: String) -> String {
    let trimmed = raw.trim();

    if let Some(inner) = trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return inner.trim().to_string();
    }
    if let Some(inner) = trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return inner.trim().to_string();
    }

    trimmed.to_string()
}

pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(normalize_env_value)
        .filter(|s| !s.is_empty())
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn with_trailing_slash(url: String) -> String {
    if url.ends_with('/') {
        url
    } else {
        format!("{url}/")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrevoConfig {
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub database_url: String,
    pub api_base_url: String,
    pub web_base_url: String,
    /// Exposes relationships still under development.
    pub dev_mode: bool,
    pub db_max_connections: u32,
    pub db_timeout: Duration,
    pub brevo: Option<BrevoConfig>,
}

impl ApiConfig {
    pub const DEFAULT_API_BASE_URL: &'static str = "http://localhost:8000/v2/";
    pub const DEFAULT_WEB_BASE_URL: &'static str = "http://localhost:5000/";

    /// Configuration for tests and tooling: defaults everywhere.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            web_base_url: Self::DEFAULT_WEB_BASE_URL.to_string(),
            dev_mode: false,
            db_max_connections: 1,
            db_timeout: Duration::from_secs(5),
            brevo: None,
        }
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(env_string)
    }

    /// Builds the configuration from an arbitrary key lookup. Values are
    /// expected to be normalized already.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| ApiError::Config("DATABASE_URL is required".to_string()))?;

        let mut config = Self::new(database_url);

        if let Some(url) = lookup("API_BASE_URL") {
            config.api_base_url = with_trailing_slash(url);
        }
        if let Some(url) = lookup("WEB_BASE_URL") {
            config.web_base_url = with_trailing_slash(url);
        }
        config.dev_mode = lookup("DEV_MODE").is_some_and(|v| parse_flag(&v));

        if let Some(raw) = lookup("DB_MAX_CONNECTIONS") {
            config.db_max_connections = raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                ApiError::Config(format!("DB_MAX_CONNECTIONS must be a positive integer, got {raw:?}"))
            })?;
        }

        let api_key = lookup("BREVO_API_KEY");
        let sender_email = lookup("BREVO_SENDER_EMAIL");
        if let (Some(api_key), Some(sender_email)) = (api_key, sender_email) {
            config.brevo = Some(BrevoConfig {
                api_key,
                sender_email,
                sender_name: lookup("BREVO_SENDER_NAME"),
            });
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), normalize_env_value(v.to_string())))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn quotes_and_whitespace_are_stripped() {
        assert_eq!(normalize_env_value("  \"abc\" ".to_string()), "abc");
        assert_eq!(normalize_env_value("'x y'".to_string()), "x y");
        assert_eq!(normalize_env_value("plain".to_string()), "plain");
    }

    #[test]
    fn database_url_is_required() {
        let err = ApiConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn defaults_apply_when_only_database_is_set() {
        let config = ApiConfig::from_lookup(lookup(&[("DATABASE_URL", "sqlite::memory:")])).unwrap();
        assert_eq!(config.api_base_url, ApiConfig::DEFAULT_API_BASE_URL);
        assert_eq!(config.web_base_url, ApiConfig::DEFAULT_WEB_BASE_URL);
        assert!(!config.dev_mode);
        assert!(config.brevo.is_none());
    }

    #[test]
    fn base_urls_gain_a_trailing_slash() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("API_BASE_URL", "https://api.example.org/v2"),
            ("WEB_BASE_URL", "\"https://example.org\""),
            ("DEV_MODE", "yes"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.org/v2/");
        assert_eq!(config.web_base_url, "https://example.org/");
        assert!(config.dev_mode);
    }

    #[test]
    fn brevo_needs_key_and_sender() {
        let only_key = ApiConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BREVO_API_KEY", "k"),
        ]))
        .unwrap();
        assert!(only_key.brevo.is_none());

        let full = ApiConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BREVO_API_KEY", "k"),
            ("BREVO_SENDER_EMAIL", "noreply@example.org"),
        ]))
        .unwrap();
        assert_eq!(full.brevo.unwrap().sender_email, "noreply@example.org");
    }

    #[test]
    fn bad_pool_size_is_rejected() {
        let err = ApiConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("DB_MAX_CONNECTIONS", "zero"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
