// models/payoutmodel.rs
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_id;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Pending,
    Processing,
    Completed,
    Rejected,
    Cancelled,
}

impl PayoutStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, PayoutStatus::Pending | PayoutStatus::Processing)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Payout {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub requested_amount: BigDecimal,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
    pub status: PayoutStatus,
    pub tds_amount: Option<BigDecimal>,
    pub net_amount: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}
