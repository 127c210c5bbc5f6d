use crud_handlers::{Payload, Presentation, ResourceDef};
use query_engine::CollectionSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{trimmed, trimmed_opt};

pub const COLLECTION: &str = "brands";

pub fn schema() -> CollectionSchema {
    CollectionSchema::new("Brand")
        .required(&["name", "slug"])
        .unique(&["name", "slug"])
}

pub fn resource(base_url: &str) -> ResourceDef {
    ResourceDef::new("Brand")
        .search(&["name"])
        .slug_from("name")
        .presentation(Presentation::new(base_url).image("image", COLLECTION))
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBrand {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 3, max = 32, message = "Name must be between 3 and 32 characters"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Payload for CreateBrand {}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBrand {
    #[serde(
        default,
        deserialize_with = "trimmed_opt",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(min = 3, max = 32, message = "Name must be between 3 and 32 characters"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Payload for UpdateBrand {}
