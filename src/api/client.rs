// api/client.rs
use std::{sync::Arc, time::Duration};

use redis::aio::ConnectionManager;
use reqwest::{header::ACCEPT, multipart::Form, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{
    cache::{ResponseCache, CACHE_PREFIX},
    error::ApiError,
};
use crate::{config::Config, models::usermodel::AuthUser};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub const NO_QUERY: &[(&str, &str)] = &[];

/// Parses a JSON body without serde_json's nesting limit. Binary trees come
/// back as nested objects, so deep teams nest far past the default depth.
pub fn parse_json(body: &str) -> Result<Value, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// Some endpoints wrap their payload as `{"<key>": ...}` or `{"data": ...}`.
pub fn unwrap_envelope(raw: Value, key: &str) -> Value {
    match raw {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        Value::Object(mut map) if map.len() <= 3 && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[derive(Clone)]
pub struct ApiClient {
    pub http: reqwest::Client,
    pub base_url: String,
    pub redis_client: Option<Arc<ConnectionManager>>,
    pub cache_ttl: usize,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("redis_client", &self.redis_client.is_some())
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl ApiClient {
    /// Create a client with no response cache
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .user_agent(concat!("evtrack-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ApiClient {
            http,
            base_url: config.upstream_url.trim_end_matches('/').to_string(),
            redis_client: None,
            cache_ttl: config.cache_ttl_secs,
        })
    }

    /// Create a client backed by Redis. A Redis outage is not fatal; the
    /// client just runs uncached.
    pub async fn with_redis(config: &Config, redis_url: &str) -> Result<Self, ApiError> {
        let mut client = Self::new(config)?;

        match redis::Client::open(redis_url) {
            Ok(redis) => match ConnectionManager::new(redis).await {
                Ok(conn) => {
                    tracing::info!("✅ Redis connection established successfully");
                    client.redis_client = Some(Arc::new(conn));
                }
                Err(e) => {
                    tracing::warn!("⚠️ Failed to connect to Redis: {}. Continuing without cache.", e);
                }
            },
            Err(e) => {
                tracing::warn!("⚠️ Failed to create Redis client: {}. Continuing without cache.", e);
            }
        }

        Ok(client)
    }

    pub fn cache_status(&self) -> &str {
        if self.redis_client.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, user: &AuthUser, url: String) -> RequestBuilder {
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!("{} {} [{}]", method, url, request_id);

        self.http
            .request(method, url)
            .bearer_auth(&user.token)
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, request_id)
    }

    async fn read_body(response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("Upstream responded {}: {}", status, body.chars().take(200).collect::<String>());
            return Err(ApiError::from_body(status.as_u16(), &body));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(parse_json(&body)?)
    }

    /// GETs a path for the caller, serving the raw body from the cache when
    /// possible. Entries are scoped to the caller so one user's view is never
    /// served to another.
    pub async fn fetch_raw<Q>(&self, user: &AuthUser, path: &str, query: &Q) -> Result<Value, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        let query_string = serde_urlencoded::to_string(query)?;
        let cache_key = ResponseCache::key(&user.user_id, path, &query_string);

        if let Some(redis) = &self.redis_client {
            match ResponseCache::get(redis, &cache_key).await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(e) => tracing::warn!("Cache read failed for {}: {}", cache_key, e),
            }
        }

        let url = if query_string.is_empty() {
            self.url(path)
        } else {
            format!("{}?{}", self.url(path), query_string)
        };

        let response = self.request(Method::GET, user, url).send().await?;
        let value = Self::read_body(response).await?;

        if let Some(redis) = &self.redis_client {
            if let Err(e) = ResponseCache::set(redis, &cache_key, &value, self.cache_ttl).await {
                tracing::warn!("Cache write failed for {}: {}", cache_key, e);
            }
        }

        Ok(value)
    }

    pub async fn get_json<T, Q>(&self, user: &AuthUser, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let raw = self.fetch_raw(user, path, query).await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Sends a JSON body and drops every cached entry under `path` for all
    /// callers, since writes can change what others see.
    pub async fn send_json<B, T>(&self, method: Method, user: &AuthUser, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(method, user, self.url(path))
            .json(body)
            .send()
            .await?;
        let value = Self::read_body(response).await?;

        self.invalidate(path).await;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn delete(&self, user: &AuthUser, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, user, self.url(path)).send().await?;
        Self::read_body(response).await?;

        self.invalidate(path).await;
        Ok(())
    }

    pub async fn send_multipart<T>(&self, user: &AuthUser, path: &str, form: Form) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, user, self.url(path))
            .multipart(form)
            .send()
            .await?;
        let value = Self::read_body(response).await?;

        self.invalidate(path).await;
        Ok(serde_json::from_value(value)?)
    }

    /// Drops cached responses for `path` and everything beneath it, for
    /// every caller.
    pub async fn invalidate(&self, path: &str) {
        let Some(redis) = &self.redis_client else {
            return;
        };

        let prefix = resource_root(path);
        let pattern = format!("{}:*:{}*", CACHE_PREFIX, prefix);
        if let Err(e) = ResponseCache::delete_pattern(redis, &pattern).await {
            tracing::warn!("Cache invalidation failed for {}: {}", pattern, e);
        }
    }
}

/// `/inventory/vehicles/12/` -> `/inventory/`. Writes to one item also change
/// the listings next to it.
fn resource_root(path: &str) -> String {
    let first = path.trim_start_matches('/').split('/').next().unwrap_or_default();
    format!("/{}/", first)
}
