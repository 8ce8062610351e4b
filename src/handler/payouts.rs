// handler/payouts.rs
use std::sync::Arc;

use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Extension, Json, Router};
use validator::Validate;

use crate::{
    api::payoutapi::PayoutExt,
    dtos::{common::*, payoutdtos::*},
    error::HttpError,
    models::usermodel::AuthUser,
    service::{error::ServiceError, supersede::RequestRegistry},
    utils::{currency::paise_to_rupees, decimal::BigDecimalHelpers},
    AppState,
};

pub fn payouts_handler() -> Router {
    Router::new().route("/", get(list_payouts).post(create_payout))
}

pub async fn list_payouts(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PayoutQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;

    let key = RequestRegistry::key(&user.user_id, "/payouts");
    let page = app_state
        .requests
        .run_latest(&key, async {
            Ok::<_, ServiceError>(app_state.api_client.list_payouts(&user, &query).await?)
        })
        .await?;

    let open_total: i64 = page
        .results
        .iter()
        .filter(|payout| payout.status.is_open())
        .map(|payout| payout.requested_amount.to_paise_or_zero())
        .sum();

    Ok(Json(ApiResponse::success(
        "Payouts retrieved successfully",
        PayoutListResponseDto {
            page: PaginatedResponse::from_page(page, query.page, query.page_size, PayoutDto::from),
            open_total: paise_to_rupees(open_total),
        },
    )))
}

pub async fn create_payout(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreatePayoutDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;

    let request = CreatePayoutRequest::from(body);
    let payout = app_state.api_client.create_payout(&user, &request).await?;

    tracing::info!(
        "Payout {} requested by user {} for ₹{}",
        payout.id,
        user.user_id,
        request.requested_amount
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Payout request submitted successfully", PayoutDto::from(payout))),
    ))
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
        extract::Json as UpstreamJson,
        http::{Request, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn payout(id: u32, amount: &str, status: &str) -> Value {
        json!({
            "id": id,
            "requested_amount": amount,
            "bank_name": "HDFC Bank",
            "account_number": "50100012345678",
            "ifsc_code": "HDFC0001234",
            "account_holder_name": "Ravi Kumar",
            "status": status,
            "created_at": "2024-05-01T10:00:00Z"
        })
    }

    fn upstream() -> Router {
        Router::new().route(
            "/payouts/",
            get(|| async {
                Json(json!({
                    "count": 3,
                    "results": [
                        payout(1, "1500.00", "pending"),
                        payout(2, "2500.50", "processing"),
                        payout(3, "9000.00", "completed")
                    ],
                    "next": null,
                    "previous": null
                }))
            })
            .post(|UpstreamJson(body): UpstreamJson<Value>| async move {
                let mut created = payout(4, body["requested_amount"].as_str().unwrap_or("0"), "pending");
                created["ifsc_code"] = body["ifsc_code"].clone();
                (StatusCode::CREATED, Json(created))
            }),
        )
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let url = spawn_upstream(upstream()).await;
        let app = create_router(test_state(&url));
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_list_masks_accounts_and_sums_open() {
        let (status, body) = send(
            Request::builder()
                .uri("/api/payouts?page=1&page_size=10")
                .header("authorization", bearer(UserRole::Distributor))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["total"], 3);
        assert_eq!(data["open_total"], 4000.5);
        assert_eq!(data["data"][0]["account_number"], "XXXXXXXXXX5678");
    }

    #[tokio::test]
    async fn test_page_size_over_limit_is_rejected() {
        let (status, _) = send(
            Request::builder()
                .uri("/api/payouts?page_size=500")
                .header("authorization", bearer(UserRole::Distributor))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_payout_normalizes_ifsc() {
        let (status, body) = send(
            Request::builder()
                .method("POST")
                .uri("/api/payouts")
                .header("authorization", bearer(UserRole::Distributor))
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "amount": 1500.0,
                        "bank_name": "HDFC Bank",
                        "account_number": "50100012345678",
                        "ifsc_code": "hdfc0001234",
                        "account_holder_name": "Ravi Kumar"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["ifsc_code"], "HDFC0001234");
        assert_eq!(body["data"]["requested_amount"], 1500.0);
    }
}
