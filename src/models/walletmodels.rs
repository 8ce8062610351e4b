// models/walletmodels.rs
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_id;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WalletTransactionType {
    Credit,
    Debit,
    ReferralBonus,
    ActivationBonus,
    PairCommission,
    PoolRelease,
    Payout,
    Refund,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WalletTransaction {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(alias = "type")]
    pub transaction_type: WalletTransactionType,
    pub amount: BigDecimal,
    pub balance_after: Option<BigDecimal>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
