// dtos/admindtos.rs
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::funnelmodel::{BiggestDrop, ConversionRate, FunnelStage};

const PERIODS: [&str; 5] = ["7d", "30d", "90d", "365d", "all"];

fn validate_period(period: &str) -> Result<(), ValidationError> {
    if PERIODS.contains(&period) {
        Ok(())
    } else {
        Err(ValidationError::new("period must be one of 7d, 30d, 90d, 365d, all"))
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, Default)]
pub struct AnalyticsQueryDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_period")]
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FunnelResponseDto {
    pub normal_users: Vec<FunnelStage>,
    pub staff_users: Vec<FunnelStage>,
    pub combined: Vec<FunnelStage>,
    pub biggest_drop: Option<BiggestDrop>,
}

#[derive(Debug, Serialize)]
pub struct ConversionResponseDto {
    pub normal_users: Vec<ConversionRate>,
    pub staff_users: Vec<ConversionRate>,
    pub combined: Vec<ConversionRate>,
}
