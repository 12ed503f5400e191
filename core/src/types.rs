//! Payload type and the typed reporting search built on top of it.
//!
//! # Design
//! Request and response bodies stay structurally permissive: callers pass
//! whatever fields the gateway accepts and get back every field it returns.
//! `Payload` is an insertion-ordered JSON object so serialized requests keep
//! the caller's field order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object body, sent or received.
pub type Payload = Map<String, Value>;

/// Mutable access to the object stored under `key`, creating it (or
/// replacing a non-object value) when needed.
pub(crate) fn object_entry<'a>(payload: &'a mut Payload, key: &str) -> &'a mut Payload {
    let slot = payload
        .entry(key)
        .or_insert_with(|| Value::Object(Payload::new()));
    if !slot.is_object() {
        *slot = Value::Object(Payload::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just made an object"),
    }
}

/// `true` unless `complete` is explicitly the boolean `false`.
///
/// Anything that is not a JSON boolean, including an absent value, counts
/// as `true`.
pub fn completion_flag(complete: Option<&Value>) -> bool {
    match complete {
        Some(Value::Bool(flag)) => *flag,
        _ => true,
    }
}

/// Comparison applied by a reporting `Criterion`.
///
/// Serialized in the percent-encoded form the reports endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "%3D")]
    Equals,
    #[serde(rename = "%3C")]
    LessThan,
    #[serde(rename = "%3E")]
    GreaterThan,
    #[serde(rename = "%3C%3D")]
    LessThanOrEqual,
    #[serde(rename = "%3E%3D")]
    GreaterThanOrEqual,
    #[serde(rename = "START%20WITH")]
    StartWith,
}

/// One filter of a transaction search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    /// Numeric report field identifier, e.g. `"1"` for transaction id.
    pub field: String,
    pub operator: Operator,
    pub value: String,
}

/// Search request for the reports endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSearch {
    /// Report name, `"Search"` or `"TransHistoryMinimal"`.
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub start_row: String,
    pub end_row: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<Criterion>,
}

impl TransactionSearch {
    /// Search every row in the date range.
    pub fn new(name: impl Into<String>, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            start_row: "1".to_string(),
            end_row: "1000".to_string(),
            criteria: Vec::new(),
        }
    }

    pub fn with_rows(mut self, start_row: u32, end_row: u32) -> Self {
        self.start_row = start_row.to_string();
        self.end_row = end_row.to_string();
        self
    }

    pub fn with_criterion(mut self, field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        self.criteria.push(Criterion {
            field: field.into(),
            operator,
            value: value.into(),
        });
        self
    }

    pub fn to_payload(&self) -> Payload {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => unreachable!("TransactionSearch serializes to an object"),
        }
    }
}
