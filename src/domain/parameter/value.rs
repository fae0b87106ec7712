//! Typed parameter values

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Typed parameters keyed by name
pub type ParameterMap = BTreeMap<String, TypedValue>;

/// A parameter value after coercion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    #[serde(serialize_with = "serialize_date")]
    Date(NaiveDate),
    Guid(Uuid),
    Json(Value),
}

fn serialize_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&date.format("%Y-%m-%d"))
}

impl TypedValue {
    /// Canonical textual form, the way a client would submit it
    pub fn to_raw(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Guid(g) => g.hyphenated().to_string(),
            Self::Json(v) => v.to_string(),
        }
    }

    /// Convert a loosely typed JSON value into the closest typed value
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => n.as_f64().map(Self::Float).unwrap_or(Self::Json(Value::Number(n))),
            },
            Value::String(s) => Self::String(s),
            other => Self::Json(other),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(TypedValue::from_json(json!(7)), TypedValue::Integer(7));
        assert_eq!(TypedValue::from_json(json!(2.5)), TypedValue::Float(2.5));
    }

    #[test]
    fn test_from_json_nested_is_kept_as_json() {
        let value = json!({"approver": "alice"});
        assert_eq!(TypedValue::from_json(value.clone()), TypedValue::Json(value));
    }

    #[test]
    fn test_serialization_is_untagged() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let map: ParameterMap = [
            ("Amount".to_string(), TypedValue::Float(10.5)),
            ("Due".to_string(), TypedValue::Date(date)),
            ("Note".to_string(), TypedValue::Null),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, json!({"Amount": 10.5, "Due": "2024-03-01", "Note": null}));
    }
}
