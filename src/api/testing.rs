// api/testing.rs
use std::sync::Arc;

use axum::Router;

use crate::{
    config::Config,
    models::usermodel::{AuthUser, UserRole},
    service::supersede::RequestRegistry,
    utils::token::create_token,
    AppState,
};

use super::client::ApiClient;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn test_user(role: UserRole) -> AuthUser {
    AuthUser {
        user_id: "42".to_string(),
        role,
        token: "upstream-token".to_string(),
    }
}

pub fn test_state(upstream_url: &str) -> Arc<AppState> {
    let env = Config::for_upstream(upstream_url);
    let api_client = ApiClient::new(&env).unwrap();
    Arc::new(AppState {
        env,
        api_client: Arc::new(api_client),
        requests: Arc::new(RequestRegistry::new()),
    })
}

/// A bearer header signed with the test secret.
pub fn bearer(role: UserRole) -> String {
    let token = create_token("42", role, b"test-secret", 3600).unwrap();
    format!("Bearer {}", token)
}
