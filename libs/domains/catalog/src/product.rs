use axum_helpers::AppError;
use crud_handlers::{Payload, Presentation, ResourceDef, to_document};
use query_engine::{CollectionSchema, Document, Populate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::validation::{trimmed, trimmed_opt, validate_object_id, validate_object_ids};

pub const COLLECTION: &str = "products";

pub fn schema() -> CollectionSchema {
    CollectionSchema::new("Product")
        .required(&[
            "title",
            "slug",
            "description",
            "quantity",
            "price",
            "imageCover",
            "category",
        ])
        .unique(&["slug"])
        .references(&["category", "subcategories", "brand"])
}

pub fn resource(base_url: &str) -> ResourceDef {
    ResourceDef::new("Product")
        .search(&["title", "description"])
        .slug_from("title")
        .populate(Populate::new("category", crate::category::COLLECTION, &["name"]))
        .presentation(
            Presentation::new(base_url)
                .image("imageCover", COLLECTION)
                .images("images", COLLECTION),
        )
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_create_discount"))]
pub struct CreateProduct {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    pub title: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(
        min = 10,
        max = 2000,
        message = "Description must be between 10 and 2000 characters"
    ))]
    pub description: String,
    #[validate(range(min = 1, message = "Quantity must be a positive integer"))]
    pub quantity: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Sold must be a non-negative integer"))]
    pub sold: i64,
    #[validate(range(min = 0.0, max = 200_000.0, message = "Price must be between 0 and 200000"))]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Price after discount must be a non-negative number"))]
    pub price_after_discount: Option<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[validate(length(min = 1, message = "Image cover is required"))]
    pub image_cover: String,
    #[validate(custom(function = "validate_object_id", message = "Invalid category id"))]
    pub category: String,
    #[serde(default)]
    #[validate(custom(function = "validate_object_ids", message = "Invalid subcategory id"))]
    pub subcategories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_object_id", message = "Invalid brand id"))]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1.0 and 5.0"))]
    pub ratings_average: Option<f64>,
}

impl Payload for CreateProduct {
    fn into_document(self) -> Result<Document, AppError> {
        let mut document = to_document(self)?;
        document.insert("numOfReviews".to_string(), Value::from(0));
        Ok(document)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_update_discount"))]
pub struct UpdateProduct {
    #[serde(
        default,
        deserialize_with = "trimmed_opt",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "trimmed_opt",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(
        min = 10,
        max = 2000,
        message = "Description must be between 10 and 2000 characters"
    ))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Quantity must be a positive integer"))]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Sold must be a non-negative integer"))]
    pub sold: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 200_000.0, message = "Price must be between 0 and 200000"))]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Price after discount must be a non-negative number"))]
    pub price_after_discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Image cover cannot be empty"))]
    pub image_cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_object_id", message = "Invalid category id"))]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_object_ids", message = "Invalid subcategory id"))]
    pub subcategories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_object_id", message = "Invalid brand id"))]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1.0 and 5.0"))]
    pub ratings_average: Option<f64>,
}

impl Payload for UpdateProduct {}

fn discount_error(message: &'static str) -> ValidationError {
    ValidationError::new("price_after_discount").with_message(message.into())
}

fn check_discount(price: Option<f64>, discounted: Option<f64>) -> Result<(), ValidationError> {
    match (price, discounted) {
        (_, None) => Ok(()),
        (None, Some(_)) => Err(discount_error(
            "Original price is required to calculate price after discount",
        )),
        (Some(price), Some(discounted)) if discounted >= price => Err(discount_error(
            "Price after discount cannot be greater than or equal to the original price",
        )),
        _ => Ok(()),
    }
}

fn check_create_discount(product: &CreateProduct) -> Result<(), ValidationError> {
    check_discount(Some(product.price), product.price_after_discount)
}

fn check_update_discount(product: &UpdateProduct) -> Result<(), ValidationError> {
    check_discount(product.price, product.price_after_discount)
}
