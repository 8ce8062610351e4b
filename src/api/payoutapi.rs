// api/payoutapi.rs
use async_trait::async_trait;
use reqwest::Method;

use super::{client::ApiClient, error::ApiError};
use crate::{
    dtos::payoutdtos::{CreatePayoutRequest, PayoutQueryDto},
    models::{payoutmodel::Payout, usermodel::AuthUser, Paginated},
};

#[async_trait]
pub trait PayoutExt {
    async fn list_payouts(&self, user: &AuthUser, query: &PayoutQueryDto) -> Result<Paginated<Payout>, ApiError>;

    async fn create_payout(&self, user: &AuthUser, request: &CreatePayoutRequest) -> Result<Payout, ApiError>;
}

#[async_trait]
impl PayoutExt for ApiClient {
    async fn list_payouts(&self, user: &AuthUser, query: &PayoutQueryDto) -> Result<Paginated<Payout>, ApiError> {
        self.get_json(user, "/payouts/", query).await
    }

    async fn create_payout(&self, user: &AuthUser, request: &CreatePayoutRequest) -> Result<Payout, ApiError> {
        let payout: Payout = self.send_json(Method::POST, user, "/payouts/", request).await?;
        // A payout moves money out of the wallet, so its history is stale too.
        self.invalidate("/wallet/").await;
        Ok(payout)
    }
}
