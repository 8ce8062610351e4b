// handler/wallet.rs
use std::sync::Arc;

use axum::{extract::Query, response::IntoResponse, routing::get, Extension, Json, Router};
use validator::Validate;

use crate::{
    api::walletapi::WalletExt,
    dtos::{common::PaginatedResponse, walletdtos::*},
    error::HttpError,
    models::usermodel::AuthUser,
    service::{error::ServiceError, supersede::RequestRegistry},
    AppState,
};

pub fn wallet_handler() -> Router {
    Router::new().route("/transactions", get(get_transactions))
}

pub async fn get_transactions(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<WalletTransactionQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;

    // Filter changes race each other; only the newest one answers.
    let key = RequestRegistry::key(&user.user_id, "/wallet/transactions");
    let page = app_state
        .requests
        .run_latest(&key, async {
            Ok::<_, ServiceError>(app_state.api_client.list_wallet_transactions(&user, &query).await?)
        })
        .await?;

    Ok(Json(PaginatedResponse::from_page(
        page,
        query.page,
        query.page_size,
        WalletTransactionDto::from,
    )))
}

#[cfg(test)]
mod tests {
    use crate::{
        api::testing::{bearer, spawn_upstream, test_state},
        models::usermodel::UserRole,
        routes::create_router,
    };
    use axum::{
        body::{to_bytes, Body},
        extract::RawQuery,
        http::{Request, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn upstream() -> Router {
        Router::new().route(
            "/wallet/transactions/",
            get(|RawQuery(query): RawQuery| async move {
                Json(json!({
                    "count": 25,
                    "results": [
                        {
                            "id": 7,
                            "type": "payout",
                            "amount": "1500.00",
                            "balance_after": "500.00",
                            "description": query,
                            "created_at": "2024-05-01T10:00:00Z"
                        },
                        {
                            "id": 8,
                            "transaction_type": "pair_commission",
                            "amount": "250.00",
                            "balance_after": null,
                            "description": null,
                            "created_at": "2024-05-02T10:00:00Z"
                        }
                    ],
                    "next": "https://platform.test/wallet/transactions/?page=2",
                    "previous": null
                }))
            }),
        )
    }

    async fn send(uri: &str) -> (StatusCode, Value) {
        let url = spawn_upstream(upstream()).await;
        let app = create_router(test_state(&url));
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header("authorization", bearer(UserRole::Distributor))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_transactions_are_signed_and_paged() {
        let (status, body) = send("/api/wallet/transactions?type=payout&page_size=10").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 25);
        assert_eq!(body["total_pages"], 3);
        assert_eq!(body["has_next"], true);
        assert_eq!(body["has_previous"], false);
        assert_eq!(body["data"][0]["formatted_amount"], "-₹1500.00");
        assert_eq!(body["data"][0]["description"], "page=1&page_size=10&type=payout");
        assert_eq!(body["data"][1]["formatted_amount"], "₹250.00");
    }

    #[tokio::test]
    async fn test_reversed_date_range_is_rejected() {
        let (status, _) = send("/api/wallet/transactions?start_date=2024-03-01&end_date=2024-01-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
