// api/adminapi.rs
use async_trait::async_trait;

use super::{client::ApiClient, error::ApiError};
use crate::{
    dtos::admindtos::AnalyticsQueryDto,
    models::{
        funnelmodel::{ConversionByUserType, FunnelByUserType},
        usermodel::AuthUser,
    },
};

#[async_trait]
pub trait AdminExt {
    async fn get_funnel(&self, user: &AuthUser, query: &AnalyticsQueryDto) -> Result<FunnelByUserType, ApiError>;

    async fn get_conversion_rates(
        &self,
        user: &AuthUser,
        query: &AnalyticsQueryDto,
    ) -> Result<ConversionByUserType, ApiError>;
}

#[async_trait]
impl AdminExt for ApiClient {
    async fn get_funnel(&self, user: &AuthUser, query: &AnalyticsQueryDto) -> Result<FunnelByUserType, ApiError> {
        self.get_json(user, "/admin/analytics/funnel/", query).await
    }

    async fn get_conversion_rates(
        &self,
        user: &AuthUser,
        query: &AnalyticsQueryDto,
    ) -> Result<ConversionByUserType, ApiError> {
        self.get_json(user, "/admin/analytics/conversions/", query).await
    }
}
