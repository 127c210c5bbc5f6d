use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use axum_helpers::AppError;
use crud_handlers::{Payload, Presentation, ResourceDef, to_document};
use query_engine::{CollectionSchema, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};
use validator::Validate;

use crate::validation::{trimmed, trimmed_opt, validate_phone};

pub const COLLECTION: &str = "users";

/// User roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

pub fn schema() -> CollectionSchema {
    CollectionSchema::new("User")
        .required(&["name", "slug", "email", "password", "phone"])
        .unique(&["slug", "email", "phone"])
}

pub fn resource(base_url: &str) -> ResourceDef {
    ResourceDef::new("User")
        .search(&["name", "email"])
        .slug_from("name")
        .presentation(
            Presentation::new(base_url)
                .image("profileImage", COLLECTION)
                .hide("password"),
        )
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 3, max = 32, message = "Name must be between 3 and 32 characters"))]
    pub name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub is_phone_verified: bool,
}

impl Payload for CreateUser {
    fn into_document(mut self) -> Result<Document, AppError> {
        self.email = self.email.to_lowercase();
        self.password = hash_password(&self.password)?;
        let role = self.role;

        let mut document = to_document(self)?;
        document.insert("role".to_string(), Value::String(role.to_string()));
        document.insert("isActive".to_string(), Value::Bool(true));
        Ok(document)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(
        default,
        deserialize_with = "trimmed_opt",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(min = 3, max = 32, message = "Name must be between 3 and 32 characters"))]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "trimmed_opt",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: Option<String>,
    #[serde(
        default,
        deserialize_with = "trimmed_opt",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_phone_verified: Option<bool>,
}

impl Payload for UpdateUser {
    fn into_document(mut self) -> Result<Document, AppError> {
        self.email = self.email.map(|email| email.to_lowercase());
        self.password = self.password.as_deref().map(hash_password).transpose()?;
        to_document(self)
    }
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{PasswordHash, PasswordVerifier};
    use serde_json::json;
    use std::str::FromStr;

    fn create() -> CreateUser {
        serde_json::from_value(json!({
            "name": "Jane Doe",
            "email": "Jane@Example.COM",
            "password": "correct horse",
            "phone": "+201012345678"
        }))
        .unwrap()
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::default().to_string(), "user");
        assert!(Role::from_str("root").is_err());
    }

    #[test]
    fn test_create_hashes_password_and_lowercases_email() {
        let user = create();
        assert!(user.validate().is_ok());

        let document = user.into_document().unwrap();
        assert_eq!(document["email"], "jane@example.com");
        assert_eq!(document["role"], "user");
        assert_eq!(document["isActive"], true);
        assert_eq!(document["profileImage"], Value::Null);

        let stored = document["password"].as_str().unwrap();
        assert_ne!(stored, "correct horse");
        let parsed = PasswordHash::new(stored).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"correct horse", &parsed)
                .is_ok()
        );
    }

    #[test]
    fn test_validation_rules() {
        let mut user = create();
        user.password = "short".to_string();
        let err = AppError::from(user.validate().unwrap_err());
        assert_eq!(err.to_string(), "Password must be at least 8 characters long");

        let mut user = create();
        user.email = "not-an-email".to_string();
        assert!(user.validate().is_err());

        let mut user = create();
        user.phone = "12".to_string();
        let err = AppError::from(user.validate().unwrap_err());
        assert_eq!(err.to_string(), "Invalid phone number format");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result: Result<CreateUser, _> = serde_json::from_value(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "password": "correct horse",
            "phone": "+201012345678",
            "role": "root"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_hashes_new_password_only_when_sent() {
        let update = UpdateUser {
            name: Some("Jane Roe".to_string()),
            ..Default::default()
        };
        let document = update.into_document().unwrap();
        assert_eq!(document.len(), 1);

        let update = UpdateUser {
            password: Some("new password".to_string()),
            ..Default::default()
        };
        let document = update.into_document().unwrap();
        assert!(document["password"].as_str().unwrap().starts_with("$argon2"));
    }
}
