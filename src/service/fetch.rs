// service/fetch.rs
use std::{fmt::Display, future::Future, time::Duration};

use serde::Serialize;

/// Outcome of one dashboard section. Sections settle independently so a
/// failing upstream call only blanks its own card.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum FetchState<T> {
    /// Not requested.
    Idle,
    /// Still running when the response was assembled.
    Loading,
    Success(T),
    Error(String),
}

impl<T> FetchState<T> {
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => FetchState::Success(value),
            Err(e) => FetchState::Error(e.to_string()),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> FetchState<U> {
        match self {
            FetchState::Idle => FetchState::Idle,
            FetchState::Loading => FetchState::Loading,
            FetchState::Success(value) => FetchState::Success(f(value)),
            FetchState::Error(message) => FetchState::Error(message),
        }
    }
}

/// Runs a section fetch on its own task and waits up to `deadline` for it.
/// A section that misses the deadline reports `Loading`; its task keeps
/// running so the upstream response still lands in the cache for the next
/// poll.
pub async fn settle<T, E, F>(deadline: Duration, fut: F) -> FetchState<T>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    let task = tokio::spawn(fut);

    match tokio::time::timeout(deadline, task).await {
        Ok(Ok(result)) => FetchState::from_result(result),
        Ok(Err(join_error)) => {
            tracing::error!("Dashboard section task failed: {}", join_error);
            FetchState::Error("Section failed to load".to_string())
        }
        Err(_) => {
            tracing::debug!("Dashboard section still loading after {:?}", deadline);
            FetchState::Loading
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_shape() {
        let ok: FetchState<u32> = FetchState::Success(3);
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"state": "success", "data": 3}));

        let idle: FetchState<u32> = FetchState::Idle;
        assert_eq!(serde_json::to_value(&idle).unwrap(), json!({"state": "idle"}));

        let failed: FetchState<u32> = FetchState::from_result(Err::<u32, _>("boom"));
        assert_eq!(serde_json::to_value(&failed).unwrap(), json!({"state": "error", "data": "boom"}));
    }

    #[tokio::test]
    async fn test_settle_reports_each_outcome() {
        let ok = settle(Duration::from_secs(1), async { Ok::<_, String>(7) }).await;
        assert_eq!(ok, FetchState::Success(7));

        let err = settle(Duration::from_secs(1), async { Err::<u32, _>("down".to_string()) }).await;
        assert_eq!(err, FetchState::Error("down".to_string()));

        let slow = settle(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok::<_, String>(1)
        })
        .await;
        assert_eq!(slow, FetchState::Loading);
    }

    #[test]
    fn test_map_keeps_state() {
        let state: FetchState<u32> = FetchState::Success(2);
        assert_eq!(state.map(|n| n * 10), FetchState::Success(20));

        let loading: FetchState<u32> = FetchState::Loading;
        assert_eq!(loading.map(|n| n * 10), FetchState::Loading);
    }
}
