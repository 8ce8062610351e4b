// api/cache.rs
//
// Only raw upstream bodies live here. Derived figures are recomputed on every
// read and never cached.
use redis::{aio::ConnectionManager, AsyncCommands};
use serde_json::Value;

pub const CACHE_PREFIX: &str = "upstream";

pub struct ResponseCache;

impl ResponseCache {
    /// `upstream:{scope}:{path}?{query}`. Scope is the caller's user id, or
    /// `shared` for catalog data that is the same for everyone.
    pub fn key(scope: &str, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}:{}:{}", CACHE_PREFIX, scope, path)
        } else {
            format!("{}:{}:{}?{}", CACHE_PREFIX, scope, path, query)
        }
    }

    pub async fn get(redis: &ConnectionManager, key: &str) -> Result<Option<Value>, redis::RedisError> {
        let mut conn = redis.clone();
        let cached: Option<String> = conn.get(key).await?;

        match cached {
            Some(data) => match super::client::parse_json(&data) {
                Ok(value) => {
                    tracing::debug!("Cache HIT: {}", key);
                    Ok(Some(value))
                }
                Err(_) => {
                    tracing::warn!("Cache entry unreadable, ignoring: {}", key);
                    Ok(None)
                }
            },
            None => {
                tracing::debug!("Cache MISS: {}", key);
                Ok(None)
            }
        }
    }

    pub async fn set(
        redis: &ConnectionManager,
        key: &str,
        value: &Value,
        ttl_seconds: usize,
    ) -> Result<(), redis::RedisError> {
        let mut conn = redis.clone();
        let _: () = conn.set_ex(key, value.to_string(), ttl_seconds).await?;
        tracing::debug!("Cache SET: {} (TTL: {}s)", key, ttl_seconds);
        Ok(())
    }

    /// Deletes every key matching `pattern` using SCAN so large keyspaces do
    /// not block the server.
    pub async fn delete_pattern(redis: &ConnectionManager, pattern: &str) -> Result<usize, redis::RedisError> {
        let mut conn = redis.clone();
        let mut cursor: u64 = 0;
        let mut deleted = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let _: () = conn.del(&keys).await?;
                deleted += keys.len();
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        tracing::debug!("Cache DELETE pattern: {} ({} keys)", pattern, deleted);
        Ok(deleted)
    }
}
