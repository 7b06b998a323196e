//! Catalog DTOs for offerings and their add-on options.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::parse_price;
use crate::error::AppError;
use crate::models::{
    NewOffering, Offering, OfferingKind, OfferingOption, UpdateOffering, UpdateOfferingOption,
};

/// Request body for creating an offering.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateOfferingRequest {
    pub kind: OfferingKind,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    /// Decimal amount as a string, e.g. "1500.50"
    pub price: String,
    pub category: Option<String>,
}

impl CreateOfferingRequest {
    pub fn into_new_offering(self) -> Result<NewOffering, AppError> {
        Ok(NewOffering {
            kind: self.kind,
            title: self.title,
            description: self.description,
            price: parse_price(&self.price)?,
            category: self.category,
        })
    }
}

/// Request body for editing offering metadata.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateOfferingRequest {
    #[validate(length(min = 1, max = 255, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
}

impl UpdateOfferingRequest {
    pub fn into_update_offering(self) -> Result<UpdateOffering, AppError> {
        Ok(UpdateOffering {
            title: self.title,
            description: self.description,
            price: self.price.as_deref().map(parse_price).transpose()?,
            category: self.category,
        })
    }
}

/// Request body for a price-only update.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdatePriceRequest {
    /// Decimal amount as a string
    #[validate(length(min = 1, message = "Price is required"))]
    pub price: String,
}

/// Request body for adding an add-on option to an offering.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateOptionRequest {
    #[validate(length(min = 1, max = 255, message = "Option name is required"))]
    pub name: String,
    pub price: String,
}

/// Request body for editing an add-on option.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateOptionRequest {
    #[validate(length(min = 1, max = 255, message = "Option name must not be empty"))]
    pub name: Option<String>,
    pub price: Option<String>,
}

impl UpdateOptionRequest {
    pub fn into_update_option(self) -> Result<UpdateOfferingOption, AppError> {
        Ok(UpdateOfferingOption {
            name: self.name,
            price: self.price.as_deref().map(parse_price).transpose()?,
        })
    }
}

/// Offering data as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct OfferingResponse {
    pub id: i32,
    pub kind: OfferingKind,
    pub title: String,
    pub description: Option<String>,
    pub price: String,
    pub category: Option<String>,
    pub created_at: String,
}

impl From<Offering> for OfferingResponse {
    fn from(offering: Offering) -> Self {
        Self {
            id: offering.id,
            kind: offering.kind,
            title: offering.title,
            description: offering.description,
            price: offering.price.to_string(),
            category: offering.category,
            created_at: offering.created_at.to_jiff().to_string(),
        }
    }
}

/// Add-on option data.
#[derive(Debug, Serialize, ToSchema)]
pub struct OfferingOptionResponse {
    pub id: i32,
    pub offering_id: i32,
    pub name: String,
    pub price: String,
}

impl From<OfferingOption> for OfferingOptionResponse {
    fn from(option: OfferingOption) -> Self {
        Self {
            id: option.id,
            offering_id: option.offering_id,
            name: option.name,
            price: option.price.to_string(),
        }
    }
}
