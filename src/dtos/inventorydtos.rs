// dtos/inventorydtos.rs
use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::common::{default_page, default_page_size};
use crate::{
    models::inventorymodel::{InventoryModel, PriceRange, VehicleImage, VehicleStatus, VehicleVariant},
    service::inventory::{sanitize_specifications, sanitize_text},
    utils::{
        currency::parse_amount_to_paise,
        decimal::{paise_to_decimal, BigDecimalHelpers},
    },
};

fn validate_price(price: &str) -> Result<(), ValidationError> {
    match parse_amount_to_paise(price) {
        Ok(paise) if paise > 0 => Ok(()),
        _ => Err(ValidationError::new("price must be a positive amount")),
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct VehicleQueryDto {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "search must be at most 100 characters"))]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VehicleStatus>,
}

impl VehicleQueryDto {
    pub fn normalized(mut self) -> Self {
        self.search = self
            .search
            .map(|s| sanitize_text(&s))
            .filter(|s| !s.is_empty());
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct VehicleUpsertDto {
    #[validate(length(min = 1, max = 100, message = "Model name is required"))]
    pub name: String,

    #[validate(length(max = 50, message = "Color must be at most 50 characters"))]
    pub color: Option<String>,

    #[validate(length(max = 50, message = "Battery must be at most 50 characters"))]
    pub battery: Option<String>,

    /// Rupees as a decimal string, e.g. "84999.00".
    #[validate(custom = "validate_price")]
    pub price: String,

    #[validate(range(max = 100000, message = "Stock must be at most 100000"))]
    pub stock: u32,

    pub status: Option<VehicleStatus>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub specifications: BTreeMap<String, serde_json::Value>,

    /// Ids from a prior image upload.
    #[serde(default)]
    pub image_ids: Vec<String>,
}

/// Markup-free body forwarded to the platform.
#[derive(Debug, Serialize)]
pub struct VehicleUpsertRequest {
    pub name: String,
    pub color: Option<String>,
    pub battery: Option<String>,
    pub price: BigDecimal,
    pub stock: u32,
    pub status: VehicleStatus,
    pub description: Option<String>,
    pub specifications: BTreeMap<String, serde_json::Value>,
    pub image_ids: Vec<String>,
}

impl VehicleUpsertDto {
    pub fn into_request(self) -> Result<VehicleUpsertRequest, String> {
        let price = parse_amount_to_paise(&self.price)?;
        let clean_opt = |value: Option<String>| {
            value.map(|v| sanitize_text(&v)).filter(|v| !v.is_empty())
        };

        let name = sanitize_text(&self.name);
        if name.is_empty() {
            return Err("Model name is required".to_string());
        }

        Ok(VehicleUpsertRequest {
            name,
            color: clean_opt(self.color),
            battery: clean_opt(self.battery),
            price: paise_to_decimal(price),
            stock: self.stock,
            status: self.status.unwrap_or(if self.stock == 0 {
                VehicleStatus::OutOfStock
            } else {
                VehicleStatus::Active
            }),
            description: clean_opt(self.description),
            specifications: sanitize_specifications(&self.specifications),
            image_ids: self.image_ids,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleVariantDto {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub battery: Option<String>,
    pub price: f64, // In Rupees
    pub stock: u32,
    pub status: VehicleStatus,
    pub images: Vec<VehicleImage>,
    pub specifications: BTreeMap<String, serde_json::Value>,
    pub description: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<VehicleVariant> for VehicleVariantDto {
    fn from(variant: VehicleVariant) -> Self {
        Self {
            price: variant.price.to_f64_or_zero(),
            id: variant.id,
            name: variant.name,
            color: variant.color,
            battery: variant.battery,
            stock: variant.stock,
            status: variant.status,
            images: variant.images,
            specifications: variant.specifications,
            description: variant.description,
            updated_at: variant.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InventoryModelDto {
    pub name: String,
    pub price_range: PriceRange,
    pub total_stock: u32,
    pub variant_count: usize,
    pub variants: Vec<VehicleVariantDto>,
}

impl From<InventoryModel> for InventoryModelDto {
    fn from(model: InventoryModel) -> Self {
        Self {
            name: model.name,
            price_range: model.price_range,
            total_stock: model.total_stock,
            variant_count: model.variants.len(),
            variants: model.variants.into_iter().map(VehicleVariantDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upsert() -> VehicleUpsertDto {
        VehicleUpsertDto {
            name: "<b>Volt X</b>".to_string(),
            color: Some("Red".to_string()),
            battery: Some("  ".to_string()),
            price: "84999.50".to_string(),
            stock: 0,
            status: None,
            description: Some("<script>x()</script>Fast and light".to_string()),
            specifications: BTreeMap::new(),
            image_ids: vec!["img-1".to_string()],
        }
    }

    #[test]
    fn test_upsert_validation() {
        assert!(upsert().validate().is_ok());

        let mut bad = upsert();
        bad.price = "free".to_string();
        assert!(bad.validate().is_err());

        let mut bad = upsert();
        bad.price = "0".to_string();
        assert!(bad.validate().is_err());

        for price in ["inf", "NaN", "1e30"] {
            let mut bad = upsert();
            bad.price = price.to_string();
            assert!(bad.validate().is_err(), "{}", price);
            assert!(bad.into_request().is_err(), "{}", price);
        }
    }

    #[test]
    fn test_upsert_request_keeps_ampersands() {
        let mut dto = upsert();
        dto.name = "Volt R&D".to_string();
        dto.description = Some("Range > 120 km & fast charging".to_string());

        let request = dto.into_request().unwrap();
        assert_eq!(request.name, "Volt R&D");
        assert_eq!(request.description.as_deref(), Some("Range > 120 km & fast charging"));
    }

    #[test]
    fn test_upsert_request_is_sanitized() {
        let request = upsert().into_request().unwrap();
        assert_eq!(request.name, "Volt X");
        assert_eq!(request.battery, None);
        assert_eq!(request.description.as_deref(), Some("Fast and light"));
        assert_eq!(request.price.to_string(), "84999.50");
        assert_eq!(request.status, VehicleStatus::OutOfStock);
    }

    #[test]
    fn test_search_is_cleaned() {
        let query = VehicleQueryDto {
            page: 1,
            page_size: 10,
            search: Some("<i></i>".to_string()),
            status: None,
        };
        assert_eq!(query.normalized().search, None);

        let query = VehicleQueryDto {
            page: 1,
            page_size: 10,
            search: Some(" R&D ".to_string()),
            status: None,
        };
        assert_eq!(query.normalized().search.as_deref(), Some("R&D"));
    }
}
