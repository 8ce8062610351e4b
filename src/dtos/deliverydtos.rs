// dtos/deliverydtos.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::{default_page, default_page_size};
use crate::{
    models::deliverymodel::{Delivery, DeliveryStatus, TimelineEvent},
    service::delivery::{progress, validate_timeline, DeliveryProgress},
};

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct DeliveryQueryDto {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeliveryStatus>,
}

#[derive(Debug, Serialize)]
pub struct DeliveryDto {
    pub id: String,
    pub order_id: String,
    pub variant_id: Option<String>,
    pub customer_name: Option<String>,
    pub status: DeliveryStatus,
    pub progress: DeliveryProgress,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl From<Delivery> for DeliveryDto {
    fn from(delivery: Delivery) -> Self {
        Self {
            progress: progress(delivery.status),
            id: delivery.id,
            order_id: delivery.order_id,
            variant_id: delivery.variant_id,
            customer_name: delivery.customer_name,
            status: delivery.status,
            created_at: delivery.created_at,
            delivered_at: delivery.delivered_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeliveryDetailDto {
    #[serde(flatten)]
    pub delivery: DeliveryDto,
    pub timeline: Vec<TimelineEvent>,
    /// Set when the platform's timeline breaks the forward-only progression.
    pub timeline_warning: Option<String>,
}

impl From<Delivery> for DeliveryDetailDto {
    fn from(mut delivery: Delivery) -> Self {
        let timeline_warning = validate_timeline(&delivery).err().map(|e| {
            tracing::warn!("Inconsistent delivery timeline: {}", e);
            e.to_string()
        });
        let timeline = std::mem::take(&mut delivery.timeline);

        Self {
            delivery: delivery.into(),
            timeline,
            timeline_warning,
        }
    }
}
