// handler/deliveries.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    api::deliveryapi::DeliveryExt,
    dtos::{common::*, deliverydtos::*},
    error::HttpError,
    models::usermodel::AuthUser,
    service::{error::ServiceError, supersede::RequestRegistry},
    AppState,
};

pub fn deliveries_handler() -> Router {
    Router::new()
        .route("/", get(list_deliveries))
        .route("/:id", get(get_delivery))
}

pub async fn list_deliveries(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DeliveryQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;

    let key = RequestRegistry::key(&user.user_id, "/deliveries");
    let page = app_state
        .requests
        .run_latest(&key, async {
            Ok::<_, ServiceError>(app_state.api_client.list_deliveries(&user, &query).await?)
        })
        .await?;

    Ok(Json(PaginatedResponse::from_page(
        page,
        query.page,
        query.page_size,
        DeliveryDto::from,
    )))
}

pub async fn get_delivery(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(delivery_id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let delivery = app_state.api_client.get_delivery(&user, &delivery_id).await?;

    Ok(Json(ApiResponse::success(
        "Delivery retrieved successfully",
        DeliveryDetailDto::from(delivery),
    )))
}
