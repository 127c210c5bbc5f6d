//! Query types → MongoDB documents.

use mongodb::bson::{self, Bson, doc};

use super::convert::{field_to_bson, json_to_bson};
use crate::error::StorageError;
use crate::filter::{Condition, equality_candidates, is_operator, range_operand};
use crate::projection::{ID_FIELD, Projection};
use crate::repository::{CollectionSchema, StorageResult};
use crate::sort::SortSpec;
use crate::spec::Criteria;

/// Filter document for `criteria`. Filters and keyword search are combined
/// with `$and` so neither can shadow the other.
pub fn filter_document(schema: &CollectionSchema, criteria: &Criteria) -> StorageResult<bson::Document> {
    let mut filter = bson::Document::new();

    for (field, condition) in criteria.filter.iter() {
        if is_operator(field) {
            return Err(StorageError::cast("filter", field.as_str()));
        }
        let value = match condition {
            Condition::Eq(expected) => equality(schema, field, expected)?,
            Condition::Range(ops) => {
                let mut range = bson::Document::new();
                for (op, operand) in ops {
                    range.insert(op.operator(), field_to_bson(schema, field, &range_operand(operand))?);
                }
                Bson::Document(range)
            }
        };
        filter.insert(field.clone(), value);
    }

    let search = criteria.search.as_ref().map(|search| {
        let pattern = search.pattern();
        let clauses: Vec<Bson> = search
            .fields()
            .iter()
            .map(|field| {
                let mut clause = bson::Document::new();
                clause.insert(field.clone(), doc! { "$regex": pattern.clone(), "$options": "i" });
                Bson::Document(clause)
            })
            .collect();
        doc! { "$or": clauses }
    });

    Ok(match search {
        None => filter,
        Some(search) if filter.is_empty() => search,
        Some(search) => doc! { "$and": [filter, search] },
    })
}

/// Ids and dates match exactly; other strings also match their numeric or
/// boolean reading. Objects go through `$eq` so their keys are compared as
/// data, never run as operators.
fn equality(schema: &CollectionSchema, field: &str, expected: &serde_json::Value) -> StorageResult<Bson> {
    if expected.is_object() {
        return Ok(Bson::Document(doc! { "$eq": json_to_bson(expected) }));
    }
    if schema.is_object_id_field(field) || schema.is_timestamp_field(field) {
        return field_to_bson(schema, field, expected);
    }
    let mut candidates: Vec<Bson> = equality_candidates(expected).iter().map(json_to_bson).collect();
    Ok(match candidates.len() {
        1 => candidates.remove(0),
        _ => Bson::Document(doc! { "$in": candidates }),
    })
}

pub fn sort_document(sort: &SortSpec) -> bson::Document {
    sort.fields()
        .iter()
        .map(|f| (f.field.clone(), Bson::Int32(f.direction.as_i32())))
        .collect()
}

pub fn projection_document(projection: &Projection) -> bson::Document {
    match projection {
        Projection::Include { fields, with_id } => {
            let mut document: bson::Document =
                fields.iter().map(|f| (f.clone(), Bson::Int32(1))).collect();
            if !with_id {
                document.insert(ID_FIELD, 0);
            }
            document
        }
        Projection::Exclude(fields) => fields.iter().map(|f| (f.clone(), Bson::Int32(0))).collect(),
    }
}
