//! Field selection: `fields=name,price` or `fields=-description`.

use serde_json::{Map, Value};

use crate::error::QueryError;

pub const VERSION_FIELD: &str = "__v";
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Only these fields; `_id` too unless `with_id` is false.
    Include { fields: Vec<String>, with_id: bool },
    /// Everything except these fields.
    Exclude(Vec<String>),
}

impl Projection {
    /// Absent or blank input hides the version key.
    ///
    /// Inclusions and exclusions cannot be mixed, except that `-_id` may
    /// accompany an inclusion list.
    pub fn parse(raw: Option<&str>) -> Result<Self, QueryError> {
        let tokens: Vec<&str> = raw
            .unwrap_or_default()
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty() && *t != "-")
            .collect();

        if tokens.is_empty() {
            return Ok(Self::default());
        }

        let (excluded, included): (Vec<&str>, Vec<&str>) =
            tokens.iter().partition(|t| t.starts_with('-'));
        let excluded: Vec<String> = excluded
            .iter()
            .map(|t| t.trim_start_matches('-').to_string())
            .collect();
        let included: Vec<String> = included
            .iter()
            .map(|t| t.trim_start_matches('+').to_string())
            .collect();

        if included.is_empty() {
            return Ok(Self::Exclude(excluded));
        }

        match excluded.as_slice() {
            [] => Ok(Self::Include {
                fields: included,
                with_id: true,
            }),
            [only] if only == ID_FIELD => Ok(Self::Include {
                fields: included,
                with_id: false,
            }),
            _ => Err(QueryError::InvalidProjection(
                "cannot mix included and excluded fields".to_string(),
            )),
        }
    }

    /// Apply to a top-level document.
    pub fn apply(&self, document: Map<String, Value>) -> Map<String, Value> {
        match self {
            Self::Include { fields, with_id } => document
                .into_iter()
                .filter(|(k, _)| (k == ID_FIELD && *with_id) || fields.contains(k))
                .collect(),
            Self::Exclude(fields) => document
                .into_iter()
                .filter(|(k, _)| !fields.contains(k))
                .collect(),
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::Exclude(vec![VERSION_FIELD.to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Map<String, Value> {
        json!({"_id": "1", "name": "Acme", "price": 10, "__v": 0})
            .as_object()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_default_hides_version_key() {
        let projection = Projection::parse(None).unwrap();
        let out = projection.apply(doc());
        assert!(!out.contains_key("__v"));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_inclusion_keeps_id() {
        let out = Projection::parse(Some("name")).unwrap().apply(doc());
        assert_eq!(Value::Object(out), json!({"_id": "1", "name": "Acme"}));
    }

    #[test]
    fn test_inclusion_without_id() {
        let out = Projection::parse(Some("name,-_id")).unwrap().apply(doc());
        assert_eq!(Value::Object(out), json!({"name": "Acme"}));
    }

    #[test]
    fn test_exclusion() {
        let out = Projection::parse(Some("-price -__v")).unwrap().apply(doc());
        assert_eq!(Value::Object(out), json!({"_id": "1", "name": "Acme"}));
    }

    #[test]
    fn test_mixed_selection_is_rejected() {
        assert!(matches!(
            Projection::parse(Some("name,-price")),
            Err(QueryError::InvalidProjection(_))
        ));
    }
}
