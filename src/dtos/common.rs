// dtos/common.rs
use std::{borrow::Cow, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::Paginated;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

pub fn default_page() -> u32 {
    1
}

pub fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, Copy)]
pub struct PageQueryDto {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: u32,
}

impl Default for PageQueryDto {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Indian mobile number, 10 digits starting 6-9.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    static PHONE: OnceLock<Option<Regex>> = OnceLock::new();
    let matches = PHONE
        .get_or_init(|| Regex::new(r"^[6-9][0-9]{9}$").ok())
        .as_ref()
        .map_or(false, |re| re.is_match(phone));

    if matches {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_phone");
        error.message = Some(Cow::from("Phone number must be 10 digits"));
        Err(error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub status: String,
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> PaginatedResponse<T> {
    pub fn from_page<U, F>(page: Paginated<U>, current: u32, page_size: u32, f: F) -> Self
    where
        F: FnMut(U) -> T,
    {
        let total_pages = page.total_pages(page_size);
        let has_next = page.next.is_some() || current < total_pages;
        let has_previous = page.previous.is_some() || current > 1;
        let total = page.count;

        Self {
            status: "success".to_string(),
            data: page.results.into_iter().map(f).collect(),
            total,
            page: current,
            page_size,
            total_pages,
            has_next,
            has_previous,
        }
    }
}
