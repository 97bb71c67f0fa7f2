use chrono::{DateTime, NaiveDateTime, Utc};
use shared::domain::TypeTag;

use crate::error::Result;

/// The service's date wire format: ISO-8601 truncated to whole seconds, no
/// fractional part or timezone suffix.
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A decoded parameter or output value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    DateTime(DateTime<Utc>),
    /// Structured payloads (histograms, data sets, fixed ranges) kept as raw
    /// JSON.
    Json(serde_json::Value),
}

impl TypedValue {
    /// String-encodes a value the way the service expects it. Best-effort by
    /// design: strings pass through, numbers and booleans use their canonical
    /// textual form, dates truncate to whole seconds, everything else falls
    /// back to JSON text.
    pub fn encode(&self) -> String {
        match self {
            TypedValue::Text(text) => text.clone(),
            TypedValue::Bool(value) => value.to_string(),
            TypedValue::Int(value) => value.to_string(),
            TypedValue::Double(value) => value.to_string(),
            TypedValue::DateTime(value) => value.format(DATE_TIME_FORMAT).to_string(),
            TypedValue::Json(value) => value.to_string(),
        }
    }

    /// Decodes service text under the declared type tag. `STRING` passes
    /// through unchanged and `DATE_TIME` parses as a timestamp; every other
    /// tag parses the text as JSON, which covers numeric, boolean, and
    /// structured types uniformly.
    pub fn decode(text: &str, type_tag: &TypeTag) -> Result<TypedValue> {
        match type_tag {
            TypeTag::String => Ok(TypedValue::Text(text.to_owned())),
            TypeTag::DateTime => Ok(TypedValue::DateTime(parse_date_time(text)?)),
            TypeTag::Boolean | TypeTag::Integer | TypeTag::Long | TypeTag::Double => {
                let value: serde_json::Value = serde_json::from_str(text)?;
                Ok(match value {
                    serde_json::Value::Number(number) => match type_tag {
                        // The server rounds out-of-domain values itself, so an
                        // INTEGER-tagged "1024.1111" still decodes here.
                        TypeTag::Double => TypedValue::Double(number.as_f64().unwrap_or(f64::NAN)),
                        _ => number
                            .as_i64()
                            .map(TypedValue::Int)
                            .unwrap_or_else(|| TypedValue::Double(number.as_f64().unwrap_or(f64::NAN))),
                    },
                    serde_json::Value::Bool(value) => TypedValue::Bool(value),
                    other => TypedValue::Json(other),
                })
            }
            TypeTag::FixedRangeInteger | TypeTag::FixedRangeDouble | TypeTag::Other(_) => {
                Ok(TypedValue::Json(serde_json::from_str(text)?))
            }
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Int(value) => Some(*value as f64),
            TypedValue::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            TypedValue::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            TypedValue::Json(value) => Some(value),
            _ => None,
        }
    }
}

fn parse_date_time(text: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT) {
        return Ok(parsed.and_utc());
    }
    // Some endpoints hand back full RFC 3339 timestamps.
    Ok(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc))
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Bool(value)
    }
}

impl From<i32> for TypedValue {
    fn from(value: i32) -> Self {
        TypedValue::Int(value.into())
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        TypedValue::Int(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::Double(value)
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::Text(value.to_owned())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::Text(value)
    }
}

impl From<DateTime<Utc>> for TypedValue {
    fn from(value: DateTime<Utc>) -> Self {
        TypedValue::DateTime(value)
    }
}

impl From<serde_json::Value> for TypedValue {
    fn from(value: serde_json::Value) -> Self {
        TypedValue::Json(value)
    }
}

#[cfg(test)]
#[path = "tests/value_tests.rs"]
mod tests;
