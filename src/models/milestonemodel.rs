// models/milestonemodel.rs
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_id;

/// Counter a milestone is measured against.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneCounter {
    Referrals,
    /// Direct referrals, counted only up to the activation threshold.
    ReferralsCapped,
    Pairs,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target: u32,
    pub reward: Option<BigDecimal>,
    #[serde(default)]
    pub achieved: bool,
    pub achieved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub counter: Option<MilestoneCounter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneDefinition {
    pub id: String,
    pub name: String,
    pub counter: MilestoneCounter,
    pub target: u32,
    pub reward_paise: i64,
    pub achieved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneProgress {
    pub id: String,
    pub name: String,
    pub counter: MilestoneCounter,
    pub current: u32,
    pub target: u32,
    pub progress_percent: f64,
    pub achieved: bool,
    pub reward_paise: i64,
    pub achieved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneSummary {
    pub achieved_count: usize,
    pub total_count: usize,
    pub total_rewards_paise: i64,
}
