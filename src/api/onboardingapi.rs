// api/onboardingapi.rs
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::{client::ApiClient, error::ApiError};
use crate::{
    dtos::onboardingdtos::{AcceptDocumentDto, DistributorApplicationDto, SendOtpDto, VerifyOtpDto},
    models::usermodel::AuthUser,
};

#[async_trait]
pub trait OnboardingExt {
    async fn submit_application(
        &self,
        user: &AuthUser,
        application: &DistributorApplicationDto,
    ) -> Result<Value, ApiError>;

    async fn accept_document(&self, user: &AuthUser, body: &AcceptDocumentDto) -> Result<Value, ApiError>;

    async fn send_otp(&self, user: &AuthUser, body: &SendOtpDto) -> Result<Value, ApiError>;

    async fn verify_otp(&self, user: &AuthUser, body: &VerifyOtpDto) -> Result<Value, ApiError>;
}

#[async_trait]
impl OnboardingExt for ApiClient {
    async fn submit_application(
        &self,
        user: &AuthUser,
        application: &DistributorApplicationDto,
    ) -> Result<Value, ApiError> {
        self.send_json(Method::POST, user, "/distributor/application/", application)
            .await
    }

    async fn accept_document(&self, user: &AuthUser, body: &AcceptDocumentDto) -> Result<Value, ApiError> {
        self.send_json(Method::POST, user, "/distributor/documents/accept/", body)
            .await
    }

    async fn send_otp(&self, user: &AuthUser, body: &SendOtpDto) -> Result<Value, ApiError> {
        self.send_json(Method::POST, user, "/distributor/otp/send/", body).await
    }

    async fn verify_otp(&self, user: &AuthUser, body: &VerifyOtpDto) -> Result<Value, ApiError> {
        self.send_json(Method::POST, user, "/distributor/otp/verify/", body).await
    }
}
