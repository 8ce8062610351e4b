// handler/inventory.rs
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;
use validator::Validate;

use crate::{
    api::inventoryapi::{InventoryExt, UploadFile},
    dtos::{common::*, inventorydtos::*},
    error::HttpError,
    models::usermodel::AuthUser,
    service::{error::ServiceError, inventory::group_variants, supersede::RequestRegistry},
    AppState,
};

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const MAX_IMAGES_PER_UPLOAD: usize = 10;

pub fn inventory_handler() -> Router {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route("/models", get(list_models))
        .route(
            "/vehicles/:variant_id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
        .route(
            "/images",
            post(upload_images).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES * MAX_IMAGES_PER_UPLOAD)),
        )
}

pub async fn list_vehicles(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<VehicleQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;
    let query = query.normalized();

    let key = RequestRegistry::key(&user.user_id, "/inventory/vehicles");
    let page = app_state
        .requests
        .run_latest(&key, async {
            Ok::<_, ServiceError>(app_state.api_client.list_vehicles(&user, &query).await?)
        })
        .await?;

    Ok(Json(PaginatedResponse::from_page(
        page,
        query.page,
        query.page_size,
        VehicleVariantDto::from,
    )))
}

pub async fn list_models(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<VehicleQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;
    let query = query.normalized();

    let variants = app_state.api_client.list_all_vehicles(&user, &query).await?;
    let models: Vec<InventoryModelDto> = group_variants(variants)
        .into_iter()
        .map(InventoryModelDto::from)
        .collect();

    Ok(Json(ApiResponse::success("Inventory models retrieved successfully", models)))
}

pub async fn get_vehicle(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(variant_id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let variant = app_state.api_client.get_vehicle(&user, &variant_id).await?;

    Ok(Json(ApiResponse::success(
        "Vehicle retrieved successfully",
        VehicleVariantDto::from(variant),
    )))
}

pub async fn create_vehicle(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<VehicleUpsertDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;
    let request = body.into_request().map_err(HttpError::bad_request)?;

    let variant = app_state.api_client.create_vehicle(&user, &request).await?;
    tracing::info!("Vehicle variant {} created by user {}", variant.id, user.user_id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Vehicle created successfully", VehicleVariantDto::from(variant))),
    ))
}

pub async fn update_vehicle(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(variant_id): Path<String>,
    Json(body): Json<VehicleUpsertDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;
    let request = body.into_request().map_err(HttpError::bad_request)?;

    let variant = app_state
        .api_client
        .update_vehicle(&user, &variant_id, &request)
        .await?;
    tracing::info!("Vehicle variant {} updated by user {}", variant_id, user.user_id);

    Ok(Json(ApiResponse::success(
        "Vehicle updated successfully",
        VehicleVariantDto::from(variant),
    )))
}

pub async fn delete_vehicle(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(variant_id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.api_client.delete_vehicle(&user, &variant_id).await?;
    tracing::info!("Vehicle variant {} deleted by user {}", variant_id, user.user_id);

    Ok(Json(ApiResponse::success(
        "Vehicle deleted successfully",
        json!({ "id": variant_id }),
    )))
}

pub async fn upload_images(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::bad_request(e.to_string()))?
    {
        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(HttpError::bad_request(format!(
                "Only image files can be uploaded, got '{}'",
                content_type
            )));
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("image-{}", files.len() + 1));
        let bytes = field
            .bytes()
            .await
            .map_err(|e| HttpError::bad_request(e.to_string()))?;

        if bytes.is_empty() {
            return Err(HttpError::bad_request(format!("{} is empty", file_name)));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(HttpError::bad_request(format!("{} is larger than 5 MB", file_name)));
        }

        files.push(UploadFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });

        if files.len() > MAX_IMAGES_PER_UPLOAD {
            return Err(HttpError::bad_request(format!(
                "At most {} images can be uploaded at once",
                MAX_IMAGES_PER_UPLOAD
            )));
        }
    }

    if files.is_empty() {
        return Err(HttpError::bad_request("No images were provided"));
    }

    let images = app_state.api_client.upload_images(&user, files).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Images uploaded successfully", images)),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use crate::{
        api::testing::{bearer, spawn_upstream, test_state},
        models::usermodel::UserRole,
        routes::create_router,
    };
    use axum::{
        body::{to_bytes, Body},
        extract::{Multipart, Path},
        http::{Request, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn variant(id: u32, name: &str, color: &str, price: &str, stock: u32) -> Value {
        json!({
            "id": id,
            "name": name,
            "color": color,
            "battery": "60V",
            "price": price,
            "stock": stock,
            "status": "active",
            "images": [],
            "specifications": {"range": "120 km"},
            "description": null,
            "updated_at": null
        })
    }

    fn upstream(calls: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/inventory/vehicles/",
                get(|| async {
                    Json(json!({
                        "count": 3,
                        "results": [
                            variant(1, "Volt X", "Red", "85000.00", 4),
                            variant(2, "Volt X", "Blue", "92000.00", 2),
                            variant(3, "City Glide", "White", "64000.00", 0)
                        ],
                        "next": null,
                        "previous": null
                    }))
                }),
            )
            .route(
                "/inventory/vehicles/:id/",
                get(|Path(id): Path<u32>| async move { Json(variant(id, "Volt X", "Red", "85000.00", 4)) }),
            )
            .route(
                "/inventory/images/",
                post(move |mut multipart: Multipart| {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        let mut images = Vec::new();
                        while let Ok(Some(field)) = multipart.next_field().await {
                            let name = field.file_name().unwrap_or_default().to_string();
                            images.push(json!({
                                "id": images.len() + 1,
                                "image_url": format!("https://cdn.test/{}", name)
                            }));
                        }
                        (StatusCode::CREATED, Json(json!({ "images": images })))
                    }
                }),
            )
    }

    async fn send(calls: Arc<AtomicUsize>, request: Request<Body>) -> (StatusCode, Value) {
        let url = spawn_upstream(upstream(calls)).await;
        let app = create_router(test_state(&url));
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("authorization", bearer(UserRole::Admin))
            .body(Body::empty())
            .unwrap()
    }

    fn multipart_request(content_type: &str) -> Request<Body> {
        let body = format!(
            "--BOUNDARY\r\n\
             Content-Disposition: form-data; name=\"images\"; filename=\"front.png\"\r\n\
             Content-Type: {}\r\n\r\n\
             fake-image-bytes\r\n\
             --BOUNDARY--\r\n",
            content_type
        );

        Request::builder()
            .method("POST")
            .uri("/api/inventory/images")
            .header("authorization", bearer(UserRole::Admin))
            .header("content-type", "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_models_group_variants_by_name() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (status, body) = send(calls, get_request("/api/inventory/models")).await;

        assert_eq!(status, StatusCode::OK);
        let models = body["data"].as_array().unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0]["name"], "Volt X");
        assert_eq!(models[0]["variant_count"], 2);
        assert_eq!(models[0]["total_stock"], 6);
        assert_eq!(models[0]["price_range"]["min"], 85000.0);
        assert_eq!(models[0]["price_range"]["max"], 92000.0);
        assert_eq!(models[1]["name"], "City Glide");
    }

    #[tokio::test]
    async fn test_vehicle_list_is_paginated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (status, body) = send(calls, get_request("/api/inventory/vehicles?search=volt")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["data"][1]["id"], "2");
        assert_eq!(body["data"][1]["price"], 92000.0);
    }

    #[tokio::test]
    async fn test_vehicle_detail() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (status, body) = send(calls, get_request("/api/inventory/vehicles/9")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], "9");
    }

    #[tokio::test]
    async fn test_invalid_price_is_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let request = Request::builder()
            .method("PUT")
            .uri("/api/inventory/vehicles/1")
            .header("authorization", bearer(UserRole::Admin))
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"name": "Volt X", "price": "abc", "stock": 1}).to_string(),
            ))
            .unwrap();

        let (status, _) = send(calls, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_image_upload_is_forwarded() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (status, body) = send(calls.clone(), multipart_request("image/png")).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(body["data"][0]["id"], "1");
        assert_eq!(body["data"][0]["image_url"], "https://cdn.test/front.png");
    }

    #[tokio::test]
    async fn test_non_image_upload_never_reaches_upstream() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (status, _) = send(calls.clone(), multipart_request("text/plain")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
