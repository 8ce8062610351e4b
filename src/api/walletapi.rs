// api/walletapi.rs
use async_trait::async_trait;

use super::{client::ApiClient, error::ApiError};
use crate::{
    dtos::walletdtos::WalletTransactionQueryDto,
    models::{usermodel::AuthUser, walletmodels::WalletTransaction, Paginated},
};

#[async_trait]
pub trait WalletExt {
    async fn list_wallet_transactions(
        &self,
        user: &AuthUser,
        query: &WalletTransactionQueryDto,
    ) -> Result<Paginated<WalletTransaction>, ApiError>;
}

#[async_trait]
impl WalletExt for ApiClient {
    async fn list_wallet_transactions(
        &self,
        user: &AuthUser,
        query: &WalletTransactionQueryDto,
    ) -> Result<Paginated<WalletTransaction>, ApiError> {
        self.get_json(user, "/wallet/transactions/", query).await
    }
}
