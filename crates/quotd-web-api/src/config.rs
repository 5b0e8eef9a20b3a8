use std::{env, path::PathBuf};

use crate::rate_limiter::RateLimitConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_level: String,
    pub log_format: LogFormat,
    pub api_prefix: String,
    pub quotes_path: PathBuf,
    pub api_version: String,
    pub pretty_json: bool,
    pub security_headers: bool,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone)]
pub enum LogFormat {
    Text,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: Environment::Development,
            log_level: "quotd_web_api=debug,tower_http=debug".to_string(),
            log_format: LogFormat::Text,
            api_prefix: "/api".to_string(),
            quotes_path: PathBuf::from("quotes.json"),
            api_version: "v1".to_string(),
            pretty_json: false,
            security_headers: false,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("QUOTD_HOST") {
            config.host = host;
        }

        if let Ok(port_str) = env::var("QUOTD_PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                config.port = port;
            } else {
                eprintln!(
                    "Warning: Invalid QUOTD_PORT value '{}', using default {}",
                    port_str, config.port
                );
            }
        }

        if let Ok(environment) = env::var("QUOTD_ENV") {
            config.environment = match environment.to_lowercase().as_str() {
                "production" | "prod" => Environment::Production,
                "development" | "dev" => Environment::Development,
                _ => {
                    eprintln!(
                        "Warning: Invalid QUOTD_ENV value '{}', using default {}",
                        environment,
                        config.environment.as_str()
                    );
                    config.environment
                }
            };
        }

        if let Ok(log_level) = env::var("RUST_LOG") {
            config.log_level = log_level;
        } else if let Ok(log_level) = env::var("QUOTD_LOG_LEVEL") {
            config.log_level = log_level;
        }

        if let Ok(log_format) = env::var("QUOTD_LOG_FORMAT") {
            config.log_format = match log_format.to_lowercase().as_str() {
                "text" | "plain" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    eprintln!(
                        "Warning: Invalid QUOTD_LOG_FORMAT value '{}', using default text",
                        log_format
                    );
                    LogFormat::Text
                }
            };
        }

        if let Ok(prefix) = env::var("QUOTD_API_PREFIX") {
            match normalize_prefix(&prefix) {
                Some(prefix) => config.api_prefix = prefix,
                None => {
                    eprintln!(
                        "Warning: Invalid QUOTD_API_PREFIX value '{}', using default {}",
                        prefix, config.api_prefix
                    );
                }
            }
        }

        if let Ok(path) = env::var("QUOTD_QUOTES_PATH") {
            config.quotes_path = PathBuf::from(path);
        }

        if let Ok(version) = env::var("QUOTD_API_VERSION") {
            config.api_version = version;
        }

        if let Ok(pretty) = env::var("QUOTD_PRETTY_JSON") {
            config.pretty_json = pretty == "true";
        }

        if let Ok(headers) = env::var("QUOTD_SECURITY_HEADERS") {
            config.security_headers = headers == "true";
        }

        if let Ok(window_str) = env::var("QUOTD_RATE_LIMIT_WINDOW_MS") {
            match window_str.parse::<i64>() {
                Ok(window_ms) if window_ms > 0 => config.rate_limit.window_ms = window_ms,
                _ => {
                    eprintln!(
                        "Warning: Invalid QUOTD_RATE_LIMIT_WINDOW_MS value '{}', using default {}",
                        window_str, config.rate_limit.window_ms
                    );
                }
            }
        }

        if let Ok(max_str) = env::var("QUOTD_RATE_LIMIT_MAX") {
            if let Ok(max_requests) = max_str.parse::<i64>() {
                config.rate_limit.max_requests = max_requests;
            } else {
                eprintln!(
                    "Warning: Invalid QUOTD_RATE_LIMIT_MAX value '{}', using default {}",
                    max_str, config.rate_limit.max_requests
                );
            }
        }

        if let Ok(cleanup_str) = env::var("QUOTD_RATE_LIMIT_CLEANUP_INTERVAL_SECONDS") {
            match cleanup_str.parse::<u64>() {
                Ok(cleanup) if cleanup > 0 => {
                    config.rate_limit.cleanup_interval_seconds = cleanup;
                }
                _ => {
                    eprintln!(
                        "Warning: Invalid QUOTD_RATE_LIMIT_CLEANUP_INTERVAL_SECONDS value '{}', using default {}",
                        cleanup_str, config.rate_limit.cleanup_interval_seconds
                    );
                }
            }
        }

        config
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn server_url(&self) -> String {
        if self.port == 80 {
            format!("http://{}", self.host)
        } else if self.port == 443 {
            format!("https://{}", self.host)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

/// Normalizes a route prefix to `/segment[/...]` form: a leading slash is
/// added when missing, trailing slashes are stripped. Returns `None` when
/// nothing usable remains, since the data routes cannot be nested at the
/// router root.
fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let stripped = trimmed.strip_prefix('/').unwrap_or(trimmed);
    if stripped.is_empty() {
        return None;
    }
    Some(format!("/{stripped}"))
}
