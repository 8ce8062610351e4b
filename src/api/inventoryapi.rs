// api/inventoryapi.rs
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Method,
};

use super::{
    client::{unwrap_envelope, ApiClient, NO_QUERY},
    error::ApiError,
};
use crate::{
    dtos::{
        common::MAX_PAGE_SIZE,
        inventorydtos::{VehicleQueryDto, VehicleUpsertRequest},
    },
    models::{
        inventorymodel::{VehicleImage, VehicleVariant},
        usermodel::AuthUser,
        Paginated,
    },
};

/// Upper bound on pages walked when the whole catalog is needed.
const MAX_CATALOG_PAGES: u32 = 20;

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

fn variant_path(variant_id: &str) -> String {
    format!("/inventory/vehicles/{}/", variant_id)
}

#[async_trait]
pub trait InventoryExt {
    async fn list_vehicles(
        &self,
        user: &AuthUser,
        query: &VehicleQueryDto,
    ) -> Result<Paginated<VehicleVariant>, ApiError>;

    /// Every variant matching the filters, across pages.
    async fn list_all_vehicles(
        &self,
        user: &AuthUser,
        query: &VehicleQueryDto,
    ) -> Result<Vec<VehicleVariant>, ApiError>;

    async fn get_vehicle(&self, user: &AuthUser, variant_id: &str) -> Result<VehicleVariant, ApiError>;

    async fn create_vehicle(
        &self,
        user: &AuthUser,
        body: &VehicleUpsertRequest,
    ) -> Result<VehicleVariant, ApiError>;

    async fn update_vehicle(
        &self,
        user: &AuthUser,
        variant_id: &str,
        body: &VehicleUpsertRequest,
    ) -> Result<VehicleVariant, ApiError>;

    async fn delete_vehicle(&self, user: &AuthUser, variant_id: &str) -> Result<(), ApiError>;

    async fn upload_images(&self, user: &AuthUser, files: Vec<UploadFile>) -> Result<Vec<VehicleImage>, ApiError>;
}

#[async_trait]
impl InventoryExt for ApiClient {
    async fn list_vehicles(
        &self,
        user: &AuthUser,
        query: &VehicleQueryDto,
    ) -> Result<Paginated<VehicleVariant>, ApiError> {
        self.get_json(user, "/inventory/vehicles/", query).await
    }

    async fn list_all_vehicles(
        &self,
        user: &AuthUser,
        query: &VehicleQueryDto,
    ) -> Result<Vec<VehicleVariant>, ApiError> {
        let mut page_query = query.clone();
        page_query.page = 1;
        page_query.page_size = MAX_PAGE_SIZE;

        let mut variants = Vec::new();
        loop {
            let page = self.list_vehicles(user, &page_query).await?;
            let has_next = page.next.is_some() && !page.results.is_empty();
            variants.extend(page.results);

            if !has_next {
                break;
            }
            if page_query.page >= MAX_CATALOG_PAGES {
                tracing::warn!("Catalog truncated at {} pages", MAX_CATALOG_PAGES);
                break;
            }
            page_query.page += 1;
        }

        Ok(variants)
    }

    async fn get_vehicle(&self, user: &AuthUser, variant_id: &str) -> Result<VehicleVariant, ApiError> {
        self.get_json(user, &variant_path(variant_id), NO_QUERY).await
    }

    async fn create_vehicle(
        &self,
        user: &AuthUser,
        body: &VehicleUpsertRequest,
    ) -> Result<VehicleVariant, ApiError> {
        self.send_json(Method::POST, user, "/inventory/vehicles/", body).await
    }

    async fn update_vehicle(
        &self,
        user: &AuthUser,
        variant_id: &str,
        body: &VehicleUpsertRequest,
    ) -> Result<VehicleVariant, ApiError> {
        self.send_json(Method::PUT, user, &variant_path(variant_id), body).await
    }

    async fn delete_vehicle(&self, user: &AuthUser, variant_id: &str) -> Result<(), ApiError> {
        self.delete(user, &variant_path(variant_id)).await
    }

    async fn upload_images(&self, user: &AuthUser, files: Vec<UploadFile>) -> Result<Vec<VehicleImage>, ApiError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)?;
            form = form.part("images", part);
        }

        let raw: serde_json::Value = self.send_multipart(user, "/inventory/images/", form).await?;
        Ok(serde_json::from_value(unwrap_envelope(raw, "images"))?)
    }
}
