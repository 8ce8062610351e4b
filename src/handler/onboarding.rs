// handler/onboarding.rs
use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::post, Extension, Json, Router};
use validator::Validate;

use crate::{
    api::onboardingapi::OnboardingExt,
    dtos::{common::ApiResponse, onboardingdtos::*},
    error::HttpError,
    models::usermodel::AuthUser,
    AppState,
};

pub fn onboarding_handler() -> Router {
    Router::new()
        .route("/application", post(submit_application))
        .route("/documents/accept", post(accept_document))
        .route("/otp/send", post(send_otp))
        .route("/otp/verify", post(verify_otp))
}

pub async fn submit_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<DistributorApplicationDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;

    let application = body.normalized();
    let data = app_state.api_client.submit_application(&user, &application).await?;

    tracing::info!("Distributor application submitted by user {}", user.user_id);
    let ack = OnboardingAckDto::from_upstream("Application submitted successfully", data);
    Ok((StatusCode::CREATED, Json(ApiResponse::success("Application submitted successfully", ack))))
}

pub async fn accept_document(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<AcceptDocumentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;

    let data = app_state.api_client.accept_document(&user, &body).await?;
    let ack = OnboardingAckDto::from_upstream("Document accepted", data);
    Ok(Json(ApiResponse::success("Document accepted", ack)))
}

pub async fn send_otp(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SendOtpDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;

    let data = app_state.api_client.send_otp(&user, &body).await?;
    let ack = OnboardingAckDto::from_upstream("OTP sent", data);
    Ok(Json(ApiResponse::success("OTP sent", ack)))
}

pub async fn verify_otp(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<VerifyOtpDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;

    let data = app_state.api_client.verify_otp(&user, &body).await?;
    let ack = OnboardingAckDto::from_upstream("OTP verified", data);
    Ok(Json(ApiResponse::success("OTP verified", ack)))
}
