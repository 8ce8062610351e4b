// dtos/onboardingdtos.rs
use std::{borrow::Cow, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use super::common::validate_phone;
use crate::{api::error::extract_message, models::binarymodel::NodePosition};

fn pattern_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

fn validate_pan(pan: &str) -> Result<(), ValidationError> {
    static PAN: OnceLock<Option<Regex>> = OnceLock::new();
    let ok = PAN
        .get_or_init(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").ok())
        .as_ref()
        .map_or(false, |re| re.is_match(pan));

    if ok {
        Ok(())
    } else {
        Err(pattern_error("invalid_pan", "PAN must look like ABCDE1234F"))
    }
}

fn validate_pincode(pincode: &str) -> Result<(), ValidationError> {
    if pincode.len() == 6 && pincode.chars().all(|c| c.is_ascii_digit()) && !pincode.starts_with('0') {
        Ok(())
    } else {
        Err(pattern_error("invalid_pincode", "Pincode must be 6 digits"))
    }
}

fn validate_otp(otp: &str) -> Result<(), ValidationError> {
    if otp.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(pattern_error("invalid_otp", "OTP must contain digits only"))
    }
}

fn validate_accepted(accepted: &bool) -> Result<(), ValidationError> {
    if *accepted {
        Ok(())
    } else {
        Err(pattern_error("not_accepted", "The document must be accepted"))
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct DistributorApplicationDto {
    #[validate(length(min = 2, max = 100, message = "Full name must be between 2 and 100 characters"))]
    pub full_name: String,

    #[validate(custom = "validate_phone")]
    pub phone: String,

    #[validate(email(message = "Email is invalid"))]
    pub email: Option<String>,

    #[validate(custom = "validate_pan")]
    pub pan_number: String,

    #[validate(length(min = 5, max = 255, message = "Address must be between 5 and 255 characters"))]
    pub address: String,

    #[validate(length(min = 2, max = 100, message = "City is required"))]
    pub city: String,

    #[validate(length(min = 2, max = 100, message = "State is required"))]
    pub state: String,

    #[validate(custom = "validate_pincode")]
    pub pincode: String,

    #[validate(length(min = 4, max = 20, message = "Referral code is invalid"))]
    pub referral_code: Option<String>,

    /// Preferred leg under the sponsor.
    pub position: Option<NodePosition>,
}

impl DistributorApplicationDto {
    pub fn normalized(mut self) -> Self {
        self.full_name = self.full_name.trim().to_string();
        self.pan_number = self.pan_number.trim().to_uppercase();
        self.referral_code = self
            .referral_code
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty());
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct AcceptDocumentDto {
    #[validate(length(min = 1, max = 50, message = "Document type is required"))]
    pub document_type: String,

    pub version: Option<String>,

    #[validate(custom = "validate_accepted")]
    pub accepted: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SendOtpDto {
    #[validate(custom = "validate_phone")]
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct VerifyOtpDto {
    #[validate(custom = "validate_phone")]
    pub phone: String,

    #[validate(
        length(min = 6, max = 6, message = "OTP must be 6 digits"),
        custom = "validate_otp"
    )]
    pub otp: String,
}

/// Whatever the platform answered, plus its message when it sent one.
#[derive(Debug, Serialize)]
pub struct OnboardingAckDto {
    pub message: String,
    pub data: Value,
}

impl OnboardingAckDto {
    pub fn from_upstream(fallback: &str, data: Value) -> Self {
        let message = extract_message(&data).unwrap_or_else(|| fallback.to_string());
        Self { message, data }
    }
}
