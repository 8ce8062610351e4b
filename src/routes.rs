// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        admin::admin_handler, deliveries::deliveries_handler, distributor::distributor_handler,
        inventory::inventory_handler, onboarding::onboarding_handler, payouts::payouts_handler,
        wallet::wallet_handler,
    },
    middleware::auth,
    AppState,
};

async fn health_check(Extension(app_state): Extension<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running",
        "cache": app_state.api_client.cache_status(),
        "in_flight_requests": app_state.requests.in_flight(),
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .route("/healthz", get(health_check))
        .nest("/distributor", distributor_handler().layer(middleware::from_fn(auth)))
        .nest("/onboarding", onboarding_handler().layer(middleware::from_fn(auth)))
        .nest("/payouts", payouts_handler().layer(middleware::from_fn(auth)))
        .nest("/wallet", wallet_handler().layer(middleware::from_fn(auth)))
        .nest("/inventory", inventory_handler().layer(middleware::from_fn(auth)))
        .nest("/deliveries", deliveries_handler().layer(middleware::from_fn(auth)))
        .nest("/admin", admin_handler().layer(middleware::from_fn(auth)))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new().nest("/api", api_route)
}
