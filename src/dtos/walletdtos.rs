// dtos/walletdtos.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::common::{default_page, default_page_size};
use crate::{
    models::walletmodels::{WalletTransaction, WalletTransactionType},
    utils::{
        currency::format_paise_as_rupees,
        decimal::BigDecimalHelpers,
    },
};

fn validate_date_range(query: &WalletTransactionQueryDto) -> Result<(), ValidationError> {
    match (query.start_date, query.end_date) {
        (Some(start), Some(end)) if start > end => {
            Err(ValidationError::new("start_date must not be after end_date"))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[validate(schema(function = "validate_date_range"))]
pub struct WalletTransactionQueryDto {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: u32,
    #[serde(rename = "type", alias = "transaction_type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<WalletTransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct WalletTransactionDto {
    pub id: String,
    pub transaction_type: WalletTransactionType,
    pub amount: f64, // In Rupees
    pub formatted_amount: String,
    pub balance_after: Option<f64>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<WalletTransaction> for WalletTransactionDto {
    fn from(tx: WalletTransaction) -> Self {
        let amount_paise = tx.amount.to_paise_or_zero();
        let signed = match tx.transaction_type {
            WalletTransactionType::Debit | WalletTransactionType::Payout => -amount_paise.abs(),
            _ => amount_paise,
        };

        Self {
            id: tx.id,
            transaction_type: tx.transaction_type,
            amount: tx.amount.to_f64_or_zero(),
            formatted_amount: format_paise_as_rupees(signed),
            balance_after: tx.balance_after.as_ref().map(|b| b.to_f64_or_zero()),
            description: tx.description,
            created_at: tx.created_at,
        }
    }
}
