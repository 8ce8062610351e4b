// models/deliverymodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_optional_id};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Ordered,
    Allocated,
    InTransit,
    OutForDelivery,
    Delivered,
    Failed,
    Rejected,
}

impl DeliveryStatus {
    /// The happy path, in order.
    pub const PROGRESSION: [DeliveryStatus; 5] = [
        DeliveryStatus::Ordered,
        DeliveryStatus::Allocated,
        DeliveryStatus::InTransit,
        DeliveryStatus::OutForDelivery,
        DeliveryStatus::Delivered,
    ];

    pub fn stage_index(&self) -> Option<usize> {
        Self::PROGRESSION.iter().position(|status| status == self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeliveryStatus::Delivered | DeliveryStatus::Failed | DeliveryStatus::Rejected
        )
    }

    pub fn next(&self) -> Option<DeliveryStatus> {
        self.stage_index()
            .and_then(|idx| Self::PROGRESSION.get(idx + 1))
            .copied()
    }

    /// Forward moves along the progression, or into failed/rejected from any
    /// open state. Skipping ahead is allowed; going back is not.
    pub fn can_transition_to(&self, next: DeliveryStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.stage_index(), next.stage_index()) {
            (Some(from), Some(to)) => to > from,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimelineEvent {
    pub status: DeliveryStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Delivery {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub order_id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub variant_id: Option<String>,
    pub customer_name: Option<String>,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}
