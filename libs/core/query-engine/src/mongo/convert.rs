//! BSON ↔ JSON conversion at the storage boundary.
//!
//! Ids leave the database as hex strings and dates as RFC 3339 strings with
//! millisecond precision; on the way in, reference and timestamp fields are
//! turned back into `ObjectId` and `DateTime`.

use chrono::{DateTime as ChronoDateTime, NaiveDate, SecondsFormat, Utc};
use mongodb::bson::{self, Bson, DateTime, oid::ObjectId};
use serde_json::{Map, Number, Value};

use crate::error::StorageError;
use crate::repository::{CollectionSchema, Document, StorageResult};

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(n) => Value::from(n),
        Bson::Int64(n) => Value::from(n),
        Bson::Double(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        Bson::String(s) => Value::String(s),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(format_datetime(dt)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(doc) => Value::Object(document_to_json(doc)),
        other => other.into_relaxed_extjson(),
    }
}

pub fn document_to_json(document: bson::Document) -> Document {
    document
        .into_iter()
        .map(|(k, v)| (k, bson_to_json(v)))
        .collect()
}

pub fn format_datetime(dt: DateTime) -> String {
    ChronoDateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| dt.timestamp_millis().to_string())
}

pub fn parse_object_id(path: &str, raw: &str) -> StorageResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| StorageError::cast(path, raw))
}

/// RFC 3339, or a bare `YYYY-MM-DD` read as midnight UTC.
pub fn parse_datetime(path: &str, raw: &str) -> StorageResult<DateTime> {
    let millis = match ChronoDateTime::parse_from_rfc3339(raw) {
        Ok(d) => d.timestamp_millis(),
        Err(_) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc().timestamp_millis())
            .ok_or_else(|| StorageError::cast(path, raw))?,
    };
    Ok(DateTime::from_millis(millis))
}

/// Plain structural conversion, no schema awareness.
pub fn json_to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i32::try_from(i).map_or(Bson::Int64(i), Bson::Int32),
            (None, Some(f)) => Bson::Double(f),
            (None, None) => Bson::Null,
        },
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(json_to_bson).collect()),
        Value::Object(map) => Bson::Document(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_bson(v)))
                .collect(),
        ),
    }
}

/// Convert a value destined for `field`, casting ids and dates per schema.
pub fn field_to_bson(schema: &CollectionSchema, field: &str, value: &Value) -> StorageResult<Bson> {
    if schema.is_object_id_field(field) {
        return match value {
            Value::String(s) => Ok(Bson::ObjectId(parse_object_id(field, s)?)),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(Bson::ObjectId(parse_object_id(field, s)?)),
                    other => Err(StorageError::cast(field, other.to_string())),
                })
                .collect::<StorageResult<Vec<_>>>()
                .map(Bson::Array),
            Value::Null => Ok(Bson::Null),
            other => Err(StorageError::cast(field, other.to_string())),
        };
    }
    if schema.is_timestamp_field(field) {
        if let Value::String(s) = value {
            return Ok(Bson::DateTime(parse_datetime(field, s)?));
        }
    }
    Ok(json_to_bson(value))
}

pub fn json_to_document(schema: &CollectionSchema, document: &Document) -> StorageResult<bson::Document> {
    document
        .iter()
        .map(|(k, v)| Ok((k.clone(), field_to_bson(schema, k, v)?)))
        .collect()
}
