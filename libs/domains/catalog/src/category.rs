use crud_handlers::{Payload, Presentation, ResourceDef};
use query_engine::CollectionSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{trimmed, trimmed_opt};

pub const COLLECTION: &str = "categories";

pub fn schema() -> CollectionSchema {
    CollectionSchema::new("Category")
        .required(&["name", "slug"])
        .unique(&["name", "slug"])
}

pub fn resource(base_url: &str) -> ResourceDef {
    ResourceDef::new("Category")
        .plural("Categories")
        .search(&["name"])
        .slug_from("name")
        .presentation(Presentation::new(base_url).image("image", COLLECTION))
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategory {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 3, max = 32, message = "Name must be between 3 and 32 characters"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Payload for CreateCategory {}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCategory {
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

impl Payload for UpdateCategory {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_is_trimmed_before_validation() {
        let payload: CreateCategory = serde_json::from_value(json!({"name": "  TV  "})).unwrap();
        assert_eq!(payload.name, "TV");
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_update_only_writes_sent_fields() {
        let payload: UpdateCategory = serde_json::from_value(json!({"image": "tv.png"})).unwrap();
        let document = payload.into_document().unwrap();
        assert_eq!(document.len(), 1);
        assert_eq!(document["image"], "tv.png");
    }
}
