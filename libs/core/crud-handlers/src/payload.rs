use axum_helpers::AppError;
use query_engine::Document;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use validator::Validate;

/// A validated request body that turns into stored fields.
///
/// The default conversion serializes the payload; `None` fields should be
/// skipped with `#[serde(skip_serializing_if = "Option::is_none")]` so
/// partial updates only touch what the client sent.
pub trait Payload: DeserializeOwned + Validate + Serialize + Send + 'static {
    fn into_document(self) -> Result<Document, AppError> {
        to_document(self)
    }
}

/// Serialize a payload into stored fields.
pub fn to_document<T: Serialize>(value: T) -> Result<Document, AppError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(_) => Err(AppError::Validation(
            "Request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// Deserialize and validate an already-parsed body.
pub fn parse_payload<P: Payload>(body: Value) -> Result<P, AppError> {
    let payload: P =
        serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))?;
    payload.validate()?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    struct UpdateBrand {
        #[serde(skip_serializing_if = "Option::is_none")]
        #[validate(length(min = 3, message = "Name must be at least 3 characters long"))]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    }

    impl Payload for UpdateBrand {}

    #[test]
    fn test_absent_fields_are_not_written() {
        let document = UpdateBrand {
            name: Some("Acme".to_string()),
            image: None,
        }
        .into_document()
        .unwrap();

        assert_eq!(document.len(), 1);
        assert_eq!(document["name"], "Acme");
    }

    #[test]
    fn test_parse_payload_validates() {
        let err = parse_payload::<UpdateBrand>(json!({"name": "Ac"})).unwrap_err();
        assert_eq!(err.to_string(), "Name must be at least 3 characters long");
        assert_eq!(err.status_code().as_u16(), 400);
    }

    #[test]
    fn test_parse_payload_rejects_wrong_types() {
        let err = parse_payload::<UpdateBrand>(json!({"name": 5})).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
