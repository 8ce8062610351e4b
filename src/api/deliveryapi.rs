// api/deliveryapi.rs
use async_trait::async_trait;

use super::{
    client::{ApiClient, NO_QUERY},
    error::ApiError,
};
use crate::{
    dtos::deliverydtos::DeliveryQueryDto,
    models::{deliverymodel::Delivery, usermodel::AuthUser, Paginated},
};

#[async_trait]
pub trait DeliveryExt {
    async fn list_deliveries(
        &self,
        user: &AuthUser,
        query: &DeliveryQueryDto,
    ) -> Result<Paginated<Delivery>, ApiError>;

    async fn get_delivery(&self, user: &AuthUser, delivery_id: &str) -> Result<Delivery, ApiError>;
}

#[async_trait]
impl DeliveryExt for ApiClient {
    async fn list_deliveries(
        &self,
        user: &AuthUser,
        query: &DeliveryQueryDto,
    ) -> Result<Paginated<Delivery>, ApiError> {
        self.get_json(user, "/deliveries/", query).await
    }

    async fn get_delivery(&self, user: &AuthUser, delivery_id: &str) -> Result<Delivery, ApiError> {
        self.get_json(user, &format!("/deliveries/{}/", delivery_id), NO_QUERY)
            .await
    }
}
