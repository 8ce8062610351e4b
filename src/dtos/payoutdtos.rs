// dtos/payoutdtos.rs
use std::{borrow::Cow, sync::OnceLock};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::common::{default_page, default_page_size, PaginatedResponse};
use crate::{
    models::payoutmodel::{Payout, PayoutStatus},
    utils::decimal::{rupees_to_decimal, BigDecimalHelpers},
};

fn validate_ifsc(ifsc: &str) -> Result<(), ValidationError> {
    static IFSC: OnceLock<Option<Regex>> = OnceLock::new();
    let ok = IFSC
        .get_or_init(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").ok())
        .as_ref()
        .map_or(false, |re| re.is_match(&ifsc.trim().to_uppercase()));

    if ok {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_ifsc");
        error.message = Some(Cow::from("IFSC code must look like SBIN0001234"));
        Err(error)
    }
}

fn validate_account_number(account_number: &str) -> Result<(), ValidationError> {
    if account_number.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("account_number must contain digits only"))
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePayoutDto {
    #[validate(range(min = 500.0, max = 1000000.0, message = "Amount must be between ₹500 and ₹10,00,000"))]
    pub amount: f64,

    #[validate(length(min = 2, max = 100, message = "Bank name is required"))]
    pub bank_name: String,

    #[validate(
        length(min = 9, max = 18, message = "Account number must be 9 to 18 digits"),
        custom = "validate_account_number"
    )]
    pub account_number: String,

    #[validate(custom = "validate_ifsc")]
    pub ifsc_code: String,

    #[validate(length(min = 2, max = 100, message = "Account holder name is required"))]
    pub account_holder_name: String,
}

/// Body sent to the platform when a payout is requested.
#[derive(Debug, Serialize)]
pub struct CreatePayoutRequest {
    pub requested_amount: BigDecimal,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
}

impl From<CreatePayoutDto> for CreatePayoutRequest {
    fn from(dto: CreatePayoutDto) -> Self {
        Self {
            requested_amount: rupees_to_decimal(dto.amount),
            bank_name: dto.bank_name.trim().to_string(),
            account_number: dto.account_number.trim().to_string(),
            ifsc_code: dto.ifsc_code.trim().to_uppercase(),
            account_holder_name: dto.account_holder_name.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct PayoutQueryDto {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PayoutStatus>,
}

/// Only the last four digits of the account number are ever returned.
pub fn mask_account_number(account_number: &str) -> String {
    let digits: Vec<char> = account_number.chars().collect();
    if digits.len() <= 4 {
        return account_number.to_string();
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("{}{}", "X".repeat(digits.len() - 4), tail)
}

#[derive(Debug, Serialize)]
pub struct PayoutDto {
    pub id: String,
    pub requested_amount: f64, // In Rupees
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
    pub status: PayoutStatus,
    pub tds_amount: Option<f64>,
    pub net_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl From<Payout> for PayoutDto {
    fn from(payout: Payout) -> Self {
        Self {
            id: payout.id,
            requested_amount: payout.requested_amount.to_f64_or_zero(),
            bank_name: payout.bank_name,
            account_number: mask_account_number(&payout.account_number),
            ifsc_code: payout.ifsc_code,
            account_holder_name: payout.account_holder_name,
            status: payout.status,
            tds_amount: payout.tds_amount.as_ref().map(|v| v.to_f64_or_zero()),
            net_amount: payout.net_amount.as_ref().map(|v| v.to_f64_or_zero()),
            created_at: payout.created_at,
            processed_at: payout.processed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PayoutListResponseDto {
    #[serde(flatten)]
    pub page: PaginatedResponse<PayoutDto>,
    /// Sum of pending and processing requests on this page.
    pub open_total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> CreatePayoutDto {
        CreatePayoutDto {
            amount: 2500.0,
            bank_name: "State Bank of India".to_string(),
            account_number: "123456789012".to_string(),
            ifsc_code: "sbin0001234".to_string(),
            account_holder_name: "Ravi Kumar".to_string(),
        }
    }

    #[test]
    fn test_valid_payout_request() {
        assert!(dto().validate().is_ok());

        let request: CreatePayoutRequest = dto().into();
        assert_eq!(request.ifsc_code, "SBIN0001234");
        assert_eq!(request.requested_amount.to_string(), "2500.00");
    }

    #[test]
    fn test_invalid_ifsc_and_account() {
        let mut bad = dto();
        bad.ifsc_code = "SBIN1001234".to_string();
        assert!(bad.validate().is_err());

        let mut bad = dto();
        bad.account_number = "12345678901a".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_amount_bounds() {
        let mut bad = dto();
        bad.amount = 100.0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_mask_account_number() {
        assert_eq!(mask_account_number("123456789012"), "XXXXXXXX9012");
        assert_eq!(mask_account_number("1234"), "1234");
    }
}
