// models/inventorymodel.rs
use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_id;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Active,
    Inactive,
    OutOfStock,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VehicleImage {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub image_url: String,
}

/// A sellable vehicle variant. Its id is the upstream primary key used for
/// edit and delete.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VehicleVariant {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub battery: Option<String>,
    pub price: BigDecimal,
    #[serde(default)]
    pub stock: u32,
    pub status: VehicleStatus,
    #[serde(default)]
    pub images: Vec<VehicleImage>,
    #[serde(default)]
    pub specifications: BTreeMap<String, serde_json::Value>,
    pub description: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Variants sharing a name, grouped for the catalog view.
#[derive(Debug, Serialize, Clone)]
pub struct InventoryModel {
    pub name: String,
    pub price_range: PriceRange,
    pub total_stock: u32,
    pub variants: Vec<VehicleVariant>,
}
