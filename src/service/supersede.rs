// service/supersede.rs
use std::{
    collections::HashMap,
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};

use tokio::sync::watch;

use super::error::ServiceError;

/// Tracks the newest in-flight request per key. Starting a request for a key
/// that already has one in flight cancels the older request.
#[derive(Debug, Default)]
pub struct RequestRegistry {
    inflight: Mutex<HashMap<String, watch::Sender<u64>>>,
    generation: AtomicU64,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per caller and resource, e.g. `42:/wallet/transactions`.
    pub fn key(user_id: &str, resource: &str) -> String {
        format!("{}:{}", user_id, resource)
    }

    fn begin(&self, key: &str) -> (u64, watch::Receiver<u64>) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());

        match inflight.get(key) {
            Some(tx) => {
                tx.send_replace(generation);
                (generation, tx.subscribe())
            }
            None => {
                let (tx, rx) = watch::channel(generation);
                inflight.insert(key.to_string(), tx);
                (generation, rx)
            }
        }
    }

    fn finish(&self, key: &str, generation: u64) {
        let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
        let is_latest = inflight
            .get(key)
            .map_or(false, |tx| *tx.borrow() == generation);

        if is_latest {
            inflight.remove(key);
        }
    }

    pub fn in_flight(&self) -> usize {
        self.inflight.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Runs `fut` unless a newer request for the same key starts first, in
    /// which case `fut` is dropped and `Superseded` is returned.
    pub async fn run_latest<T, F>(&self, key: &str, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        let (generation, mut rx) = self.begin(key);

        let outcome = tokio::select! {
            biased;
            result = fut => result,
            _ = overtaken(&mut rx, generation) => {
                tracing::debug!("Request {} superseded (generation {})", key, generation);
                Err(ServiceError::Superseded(key.to_string()))
            }
        };

        self.finish(key, generation);
        outcome
    }
}

async fn overtaken(rx: &mut watch::Receiver<u64>, generation: u64) {
    loop {
        if *rx.borrow_and_update() != generation {
            return;
        }
        if rx.changed().await.is_err() {
            // Sender gone means a newer request already finished.
            return;
        }
    }
}
