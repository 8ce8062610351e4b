// models/funnelmodel.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FunnelStage {
    pub stage: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub drop_off: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FunnelByUserType {
    #[serde(default)]
    pub normal_users: Vec<FunnelStage>,
    #[serde(default)]
    pub staff_users: Vec<FunnelStage>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConversionRate {
    pub from_stage: String,
    pub to_stage: String,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub change: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ConversionByUserType {
    #[serde(default)]
    pub normal_users: Vec<ConversionRate>,
    #[serde(default)]
    pub staff_users: Vec<ConversionRate>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct BiggestDrop {
    pub value: f64,
    pub label: String,
}
