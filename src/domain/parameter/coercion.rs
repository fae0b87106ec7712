//! Coercion of raw HTTP parameter text into typed values
//!
//! Every value is first deserialized as JSON against the target type. Scalar
//! types also accept their bare textual form, so `42`, `true` and
//! `2024-03-01` work without quoting. String parameters never fail: when the
//! text is not a JSON string it is taken verbatim.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::type_tag::TypeTag;
use super::value::TypedValue;

/// Raw value could not be converted to the declared type
#[derive(Debug, Error)]
#[error("Value '{raw}' cannot be converted to {target}")]
pub struct CoercionError {
    pub raw: String,
    pub target: TypeTag,
    #[source]
    source: serde_json::Error,
}

/// Convert `raw` into a value of `target`
pub fn coerce(raw: &str, target: TypeTag) -> Result<TypedValue, CoercionError> {
    match deserialize(raw, target) {
        Ok(value) => Ok(value),
        Err(_) if target == TypeTag::String => Ok(TypedValue::String(raw.to_string())),
        Err(source) => Err(CoercionError {
            raw: raw.to_string(),
            target,
            source,
        }),
    }
}

fn deserialize(raw: &str, target: TypeTag) -> Result<TypedValue, serde_json::Error> {
    let value = match target {
        TypeTag::String => TypedValue::String(serde_json::from_str(raw)?),
        TypeTag::Integer => TypedValue::Integer(parse_scalar::<i64>(raw)?),
        TypeTag::Float => TypedValue::Float(parse_float(raw)?),
        TypeTag::Boolean => TypedValue::Boolean(parse_scalar::<bool>(raw)?),
        TypeTag::DateTime => TypedValue::DateTime(parse_scalar::<DateTime<Utc>>(raw)?),
        TypeTag::Date => TypedValue::Date(parse_scalar::<NaiveDate>(raw)?),
        TypeTag::Guid => TypedValue::Guid(parse_scalar::<Uuid>(raw)?),
        TypeTag::Object => match serde_json::from_str::<Value>(raw)? {
            Value::Null => TypedValue::Null,
            other => TypedValue::Json(other),
        },
    };

    Ok(value)
}

/// JSON first, then the type's own textual form. The JSON error is kept when
/// both fail.
fn parse_scalar<T>(raw: &str) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + FromStr,
{
    serde_json::from_str::<T>(raw).or_else(|err| raw.parse::<T>().map_err(|_| err))
}

/// `NaN` and infinities have no JSON form and are rejected
fn parse_float(raw: &str) -> Result<f64, serde_json::Error> {
    let value = parse_scalar::<f64>(raw)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(serde_json::Error::custom(format!("{} is not a finite number", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_string_accepts_anything() {
        for raw in ["", " padded ", "plain text", "{not json", "null", "42"] {
            assert_eq!(
                coerce(raw, TypeTag::String).unwrap(),
                TypedValue::String(raw.to_string()),
                "raw value {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_string_unquotes_json_strings() {
        assert_eq!(
            coerce("\"quoted\"", TypeTag::String).unwrap(),
            TypedValue::String("quoted".to_string())
        );
    }

    #[test]
    fn test_integer_parses() {
        assert_eq!(coerce("42", TypeTag::Integer).unwrap(), TypedValue::Integer(42));
        assert_eq!(coerce("-7", TypeTag::Integer).unwrap(), TypedValue::Integer(-7));
    }

    #[test]
    fn test_integer_rejects_garbage() {
        let err = coerce("forty-two", TypeTag::Integer).unwrap_err();
        assert_eq!(err.target, TypeTag::Integer);
        assert_eq!(err.raw, "forty-two");
        assert!(err.to_string().contains("cannot be converted to integer"));
    }

    #[test]
    fn test_empty_value_is_not_special_cased() {
        assert!(coerce("", TypeTag::Integer).is_err());
        assert!(coerce("", TypeTag::Boolean).is_err());
        assert!(coerce("", TypeTag::Object).is_err());
    }

    #[test]
    fn test_boolean_and_float() {
        assert_eq!(coerce("true", TypeTag::Boolean).unwrap(), TypedValue::Boolean(true));
        assert_eq!(coerce("1.25", TypeTag::Float).unwrap(), TypedValue::Float(1.25));
        assert_eq!(coerce("3", TypeTag::Float).unwrap(), TypedValue::Float(3.0));
    }

    #[test]
    fn test_float_rejects_non_finite_values() {
        for raw in ["NaN", "inf", "-inf", "infinity", "1e400"] {
            let err = coerce(raw, TypeTag::Float).unwrap_err();
            assert_eq!(err.target, TypeTag::Float, "raw value {:?}", raw);
        }
    }

    #[test]
    fn test_dates_bare_and_quoted() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(
            coerce("2024-03-01T09:30:00Z", TypeTag::DateTime).unwrap(),
            TypedValue::DateTime(expected)
        );
        assert_eq!(
            coerce("\"2024-03-01T10:30:00+01:00\"", TypeTag::DateTime).unwrap(),
            TypedValue::DateTime(expected)
        );
        assert_eq!(
            coerce("2024-03-01", TypeTag::Date).unwrap(),
            TypedValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
    }

    #[test]
    fn test_object_keeps_structure() {
        assert_eq!(
            coerce(r#"{"limit": 10}"#, TypeTag::Object).unwrap(),
            TypedValue::Json(json!({"limit": 10}))
        );
        assert_eq!(coerce("null", TypeTag::Object).unwrap(), TypedValue::Null);
    }

    #[test]
    fn test_round_trip_for_non_string_types() {
        let values = [
            (TypeTag::Integer, TypedValue::Integer(i64::MIN)),
            (TypeTag::Integer, TypedValue::Integer(0)),
            (TypeTag::Float, TypedValue::Float(-0.5)),
            (TypeTag::Float, TypedValue::Float(1e21)),
            (TypeTag::Boolean, TypedValue::Boolean(false)),
            (
                TypeTag::DateTime,
                TypedValue::DateTime(Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap()),
            ),
            (
                TypeTag::Date,
                TypedValue::Date(NaiveDate::from_ymd_opt(2000, 2, 29).unwrap()),
            ),
            (TypeTag::Guid, TypedValue::Guid(Uuid::new_v4())),
            (TypeTag::Object, TypedValue::Json(json!([1, "two", {"three": 3}]))),
        ];

        for (tag, value) in values {
            let raw = value.to_raw();
            assert_eq!(coerce(&raw, tag).unwrap(), value, "round trip of {}", raw);
        }
    }
}
