// models/binarymodel.rs
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_optional_id};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodePosition {
    Root,
    #[default]
    Left,
    Right,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BinaryChildren {
    #[serde(default)]
    pub left: Option<Box<BinaryNode>>,
    #[serde(default)]
    pub right: Option<Box<BinaryNode>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BinaryNode {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub user_id: Option<String>,
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pv: f64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub children: BinaryChildren,
    #[serde(default)]
    pub position: NodePosition,
}

/// One flattened node of the referral tree as shown on the team page.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub user_id: Option<String>,
    pub position: NodePosition,
    pub level: u32,
    /// Size of the subtree below this member, not direct referrals.
    pub referrals: u32,
    pub pv: f64,
    pub is_active: bool,
    pub joined_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BinaryStats {
    #[serde(default)]
    pub left_count: u32,
    #[serde(default)]
    pub right_count: u32,
    #[serde(default)]
    pub left_pv: f64,
    #[serde(default)]
    pub right_pv: f64,
    #[serde(default)]
    pub total_pairs: u32,
    #[serde(default)]
    pub binary_activated: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, rename = "leftPV")]
    pub left_pv: f64,
    #[serde(default, rename = "rightPV")]
    pub right_pv: f64,
    #[serde(default, rename = "matchedPV")]
    pub matched_pv: f64,
    pub commission: Option<BigDecimal>,
    pub tds: Option<BigDecimal>,
    pub pool_money: Option<BigDecimal>,
    pub net_amount: Option<BigDecimal>,
    pub matched_at: Option<DateTime<Utc>>,
}
