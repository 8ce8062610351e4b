// models/distributormodel.rs
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Submitted,
    Verified,
    Rejected,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Nominee {
    pub name: String,
    pub relationship: String,
    pub phone: Option<String>,
    pub dob: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DistributorInfo {
    #[serde(default)]
    pub referral_code: String,
    #[serde(default)]
    pub total_referrals: u32,
    #[serde(default)]
    pub left_count: u32,
    #[serde(default)]
    pub right_count: u32,
    #[serde(default)]
    pub binary_activated: bool,
    pub activation_bonus: Option<BigDecimal>,
    pub pool_money: Option<BigDecimal>,
    #[serde(default)]
    pub pairs_beyond_limit: u32,
    pub verification_status: Option<VerificationStatus>,
    pub nominee: Option<Nominee>,
}

/// Aggregate figures behind the distributor earnings page.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DistributorDashboardStats {
    pub total_earnings: Option<BigDecimal>,
    pub tds_deducted: Option<BigDecimal>,
    pub pool_money: Option<BigDecimal>,
    pub activation_bonus: Option<BigDecimal>,
    #[serde(default)]
    pub total_referrals: u32,
    #[serde(default)]
    pub total_pairs: u32,
    #[serde(default)]
    pub distributor: Option<DistributorInfo>,
}
