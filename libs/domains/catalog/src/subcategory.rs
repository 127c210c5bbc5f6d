use crud_handlers::{Payload, ResourceDef};
use query_engine::{CollectionSchema, Populate};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{trimmed, trimmed_opt, validate_object_id};

pub const COLLECTION: &str = "subcategories";

/// Field linking a subcategory to its category.
pub const PARENT_FIELD: &str = "category";

pub fn schema() -> CollectionSchema {
    CollectionSchema::new("SubCategory")
        .required(&["name", "slug", "category"])
        .unique(&["name", "slug"])
        .references(&["category"])
}

pub fn resource() -> ResourceDef {
    ResourceDef::new("SubCategory")
        .plural("SubCategories")
        .search(&["name"])
        .slug_from("name")
        .populate(Populate::new("category", crate::category::COLLECTION, &["name"]))
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSubCategory {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = 32, message = "Name must be between 2 and 32 characters"))]
    pub name: String,
    #[validate(custom(function = "validate_object_id", message = "Invalid category id"))]
    pub category: String,
}

impl Payload for CreateSubCategory {}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSubCategory {
    #[serde(
        default,
        deserialize_with = "trimmed_opt",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(min = 2, max = 32, message = "Name must be between 2 and 32 characters"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_object_id", message = "Invalid category id"))]
    pub category: Option<String>,
}

impl Payload for UpdateSubCategory {}
