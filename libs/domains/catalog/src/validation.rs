//! Field rules shared by the catalog payloads.

use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::LazyLock;
use validator::ValidationError;

static OBJECT_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").unwrap());

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{3}[)]?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}$").unwrap()
});

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

pub fn validate_object_id(value: &str) -> Result<(), ValidationError> {
    if !OBJECT_ID.is_match(value) {
        return Err(invalid("object_id", "Invalid id format"));
    }
    Ok(())
}

pub fn validate_object_ids(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|v| !OBJECT_ID.is_match(v)) {
        return Err(invalid("object_id", "Invalid id format"));
    }
    Ok(())
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if !PHONE.is_match(value) {
        return Err(invalid("phone", "Invalid phone number format"));
    }
    Ok(())
}

/// Deserialize a string with surrounding whitespace removed.
pub fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

pub fn trimmed_opt<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id() {
        assert!(validate_object_id("507f1f77bcf86cd799439011").is_ok());
        assert!(validate_object_id("507f1f77bcf86cd79943901").is_err());
        assert!(validate_object_id("zzzf1f77bcf86cd799439011").is_err());
    }

    #[test]
    fn test_object_ids() {
        let ids = vec!["507f1f77bcf86cd799439011".to_string()];
        assert!(validate_object_ids(&ids).is_ok());
        assert!(validate_object_ids(&[]).is_ok());
        assert!(validate_object_ids(&["nope".to_string()]).is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("+201012345678").is_ok());
        assert!(validate_phone("(555)123-4567").is_ok());
        assert!(validate_phone("555.123.4567").is_ok());
        assert!(validate_phone("01012345678").is_ok());
        assert!(validate_phone("12-34").is_err());
    }
}
