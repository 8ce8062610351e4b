// config.rs
use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;

const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub upstream_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    pub port: u16,
    // Raw upstream response cache
    pub redis_url: Option<String>,
    pub cache_ttl_secs: usize,
    pub upstream_timeout_secs: u64,
    pub allowed_origins: Vec<String>,
    pub log_level: String,
}

impl Config {
    pub fn init() -> Config {
        let upstream_url = std::env::var("UPSTREAM_API_URL").expect("UPSTREAM_API_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let app_url = std::env::var("APP_URL").expect("APP_URL must be set");

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8000);

        let redis_url = std::env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty());

        let cache_ttl_secs = std::env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(60);
        let upstream_timeout_secs = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(15);

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_ORIGINS.to_string());

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());

        Config {
            upstream_url: upstream_url.trim_end_matches('/').to_string(),
            app_url: app_url.trim_end_matches('/').to_string(),
            jwt_secret,
            port,
            redis_url,
            cache_ttl_secs,
            upstream_timeout_secs,
            allowed_origins: split_origins(&allowed_origins),
            log_level,
        }
    }

    pub fn log_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::DEBUG)
    }

    #[cfg(test)]
    pub fn for_upstream(upstream_url: &str) -> Config {
        Config {
            upstream_url: upstream_url.trim_end_matches('/').to_string(),
            app_url: "https://evtrack.test".to_string(),
            jwt_secret: "test-secret".to_string(),
            port: 0,
            redis_url: None,
            cache_ttl_secs: 60,
            upstream_timeout_secs: 5,
            allowed_origins: split_origins(DEFAULT_ORIGINS),
            log_level: "debug".to_string(),
        }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
