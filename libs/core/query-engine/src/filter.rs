//! Typed filter conditions parsed from query parameters.
//!
//! `price[gte]=10&brand=acme` becomes
//! `{price: Range{Gte: "10"}, brand: Eq("acme")}`. Values stay as received;
//! backends coerce them with [`equality_candidates`] and [`range_operand`].

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Query parameters that control the listing instead of filtering it.
pub const RESERVED_PARAMS: [&str; 7] = ["page", "limit", "sort", "fields", "keyword", "filter", "skip"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RangeOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl RangeOp {
    /// Accepts `gte` as well as the already-translated `$gte`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.strip_prefix('$').unwrap_or(token) {
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            _ => None,
        }
    }

    /// Storage operator, e.g. `$gte`.
    pub fn operator(&self) -> &'static str {
        match self {
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
        }
    }

    /// Whether `ordering` (stored value compared to operand) satisfies the operator.
    pub fn accepts(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Self::Gt => ordering == Greater,
            Self::Gte => ordering != Less,
            Self::Lt => ordering == Less,
            Self::Lte => ordering != Greater,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Range(BTreeMap<RangeOp, Value>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet(BTreeMap<String, Condition>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw query pairs, skipping [`RESERVED_PARAMS`].
    ///
    /// For a repeated field the later assignment wins, except that several
    /// range operators on the same field accumulate. Fields and bracket
    /// tokens spelled as storage operators (`$where`, `price[$ne]`) are
    /// dropped.
    pub fn from_params(params: &[(String, String)]) -> Self {
        let mut filters = Self::new();

        for (key, value) in params {
            let (field, sub) = split_bracket(key);
            if field.is_empty() || RESERVED_PARAMS.contains(&field) || is_operator(field) {
                continue;
            }
            let value = Value::String(value.clone());

            match sub {
                None => filters.insert(field, Condition::Eq(value)),
                Some(token) => match RangeOp::from_token(token) {
                    Some(op) => filters.add_range(field, op, value),
                    None if is_operator(token) => {
                        tracing::debug!(field, token, "Dropping unsupported filter operator");
                    }
                    None => {
                        let mut nested = Map::new();
                        nested.insert(token.to_string(), value);
                        filters.insert(field, Condition::Eq(Value::Object(nested)));
                    }
                },
            }
        }

        filters
    }

    /// Build from a JSON object. An object value whose keys are all range
    /// operators (with or without `$`) is a range; anything else is equality.
    pub fn from_json(object: &Map<String, Value>) -> Self {
        let mut filters = Self::new();

        for (field, value) in object {
            let range = value.as_object().filter(|o| !o.is_empty()).and_then(|o| {
                o.iter()
                    .map(|(k, v)| RangeOp::from_token(k).map(|op| (op, v.clone())))
                    .collect::<Option<BTreeMap<_, _>>>()
            });
            let condition = match range {
                Some(ops) => Condition::Range(ops),
                None => Condition::Eq(value.clone()),
            };
            filters.insert(field, condition);
        }

        filters
    }

    /// Storage form: range operators rendered with `$`.
    pub fn to_json(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(field, condition)| {
                let value = match condition {
                    Condition::Eq(v) => v.clone(),
                    Condition::Range(ops) => Value::Object(
                        ops.iter()
                            .map(|(op, v)| (op.operator().to_string(), v.clone()))
                            .collect(),
                    ),
                };
                (field.clone(), value)
            })
            .collect()
    }

    pub fn insert(&mut self, field: impl Into<String>, condition: Condition) {
        self.0.insert(field.into(), condition);
    }

    fn add_range(&mut self, field: &str, op: RangeOp, value: Value) {
        match self.0.get_mut(field) {
            Some(Condition::Range(ops)) => {
                ops.insert(op, value);
            }
            _ => {
                self.0
                    .insert(field.to_string(), Condition::Range(BTreeMap::from([(op, value)])));
            }
        }
    }

    pub fn remove(&mut self, field: &str) -> Option<Condition> {
        self.0.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Condition)> {
        self.0.iter()
    }
}

/// `$where`, `$ne`: names the storage layer would read as operators.
pub fn is_operator(name: &str) -> bool {
    name.starts_with('$')
}

/// `price[gte]` → (`price`, Some(`gte`)); `name` → (`name`, None).
fn split_bracket(key: &str) -> (&str, Option<&str>) {
    match (key.find('['), key.strip_suffix(']')) {
        (Some(open), Some(inner)) if open > 0 => (&key[..open], Some(&inner[open + 1..])),
        _ => (key, None),
    }
}

/// Reinterpret a string as a number or boolean, if it spells one.
pub fn coerce(value: &Value) -> Option<Value> {
    let raw = value.as_str()?.trim();
    match raw {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        _ => {}
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(Value::from(n));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

/// Values an equality condition matches: the value itself, plus its coerced
/// form when the value is a string spelling a number or boolean.
pub fn equality_candidates(value: &Value) -> Vec<Value> {
    let mut candidates = vec![value.clone()];
    if let Some(coerced) = coerce(value) {
        candidates.push(coerced);
    }
    candidates
}

/// Range operands compare numerically whenever the value parses as a number.
pub fn range_operand(value: &Value) -> Value {
    match coerce(value) {
        Some(n @ Value::Number(_)) => n,
        _ => value.clone(),
    }
}
