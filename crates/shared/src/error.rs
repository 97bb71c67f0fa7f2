use std::fmt;

use serde::{Deserialize, Serialize};

/// Decoded payload of a non-2xx API response. The platform reports errors as
/// JSON with a free-form shape; the common `error`/`message` fields are lifted
/// out and everything else is kept for diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ApiErrorBody {
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            error: None,
            message: Some(message.into()),
            extra: serde_json::Map::new(),
        }
    }
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, &self.message) {
            (Some(error), Some(message)) => write!(f, "{error}: {message}"),
            (Some(error), None) => write!(f, "{error}"),
            (None, Some(message)) => write!(f, "{message}"),
            (None, None) if !self.extra.is_empty() => {
                write!(f, "{}", serde_json::Value::Object(self.extra.clone()))
            }
            (None, None) => write!(f, "no error details"),
        }
    }
}
