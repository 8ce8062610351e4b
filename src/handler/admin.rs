// handler/admin.rs
use std::sync::Arc;

use axum::{extract::Query, middleware, response::IntoResponse, routing::get, Extension, Json, Router};
use validator::Validate;

use crate::{
    api::adminapi::AdminExt,
    dtos::{admindtos::*, common::ApiResponse},
    error::HttpError,
    middleware::role_check,
    models::usermodel::{AuthUser, UserRole},
    service::funnel::{biggest_drop, combine_conversion_rates, combine_funnel, complete_stages},
    AppState,
};

pub fn admin_handler() -> Router {
    Router::new()
        .route(
            "/funnel",
            get(get_funnel).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
        .route(
            "/conversions",
            get(get_conversions).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
}

pub async fn get_funnel(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<AnalyticsQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;

    let funnel = app_state.api_client.get_funnel(&user, &query).await?;
    let combined = combine_funnel(&funnel.normal_users, &funnel.staff_users);
    let biggest_drop = biggest_drop(&combined);

    Ok(Json(ApiResponse::success(
        "Funnel retrieved successfully",
        FunnelResponseDto {
            normal_users: complete_stages(&funnel.normal_users),
            staff_users: complete_stages(&funnel.staff_users),
            combined,
            biggest_drop,
        },
    )))
}

pub async fn get_conversions(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<AnalyticsQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;

    let rates = app_state.api_client.get_conversion_rates(&user, &query).await?;
    let combined = combine_conversion_rates(&rates.normal_users, &rates.staff_users);

    Ok(Json(ApiResponse::success(
        "Conversion rates retrieved successfully",
        ConversionResponseDto {
            normal_users: rates.normal_users,
            staff_users: rates.staff_users,
            combined,
        },
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
        http::{Request, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn upstream() -> Router {
        Router::new()
            .route(
                "/admin/analytics/funnel/",
                get(|| async {
                    Json(json!({
                        "normal_users": [
                            {"stage": "Visited", "count": 800},
                            {"stage": "Registered", "count": 400},
                            {"stage": "Purchased", "count": 100}
                        ],
                        "staff_users": [
                            {"stage": "Visited", "count": 200},
                            {"stage": "Registered", "count": 100}
                        ]
                    }))
                }),
            )
            .route(
                "/admin/analytics/conversions/",
                get(|| async {
                    Json(json!({
                        "normal_users": [
                            {"from_stage": "Visited", "to_stage": "Registered", "rate": 50.0, "change": 4.0}
                        ],
                        "staff_users": [
                            {"from_stage": "Visited", "to_stage": "Registered", "rate": 30.0, "change": -2.0}
                        ]
                    }))
                }),
            )
    }

    async fn send(uri: &str, role: UserRole) -> (StatusCode, Value) {
        let url = spawn_upstream(upstream()).await;
        let app = create_router(test_state(&url));
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header("authorization", bearer(role))
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
    async fn test_funnel_is_summed_across_user_types() {
        let (status, body) = send("/api/admin/funnel?period=30d", UserRole::Admin).await;

        assert_eq!(status, StatusCode::OK);
        let combined = body["data"]["combined"].as_array().unwrap();
        assert_eq!(combined.len(), 3);
        assert_eq!(combined[0]["count"], 1000);
        assert_eq!(combined[0]["percentage"], 100.0);
        assert_eq!(combined[1]["count"], 500);
        assert_eq!(combined[1]["drop_off"], 50.0);
        assert_eq!(combined[2]["count"], 100);
        assert_eq!(combined[2]["drop_off"], 80.0);
        assert_eq!(body["data"]["biggest_drop"]["value"], 80.0);
        assert_eq!(body["data"]["biggest_drop"]["label"], "Registered → Purchased");
        assert_eq!(body["data"]["staff_users"][1]["percentage"], 50.0);
    }

    #[tokio::test]
    async fn test_conversions_are_averaged() {
        let (status, body) = send("/api/admin/conversions", UserRole::Admin).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["combined"][0]["rate"], 40.0);
        assert_eq!(body["data"]["combined"][0]["change"], 1.0);
    }

    #[tokio::test]
    async fn test_distributor_is_forbidden() {
        let (status, body) = send("/api/admin/funnel", UserRole::Distributor).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["status"], "fail");
    }

    #[tokio::test]
    async fn test_unknown_period_is_rejected() {
        let (status, _) = send("/api/admin/conversions?period=1y", UserRole::Admin).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
