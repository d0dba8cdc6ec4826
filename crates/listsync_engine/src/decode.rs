use listsync_core::{Entity, PageEnvelope};
use serde_json::Value;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("response body is not a page envelope: {0}")]
    UnexpectedShape(String),
}

/// Decode a list response: the paginated `{count, next, previous, results}`
/// envelope, or a bare array from a non-paginated endpoint.
pub fn decode_page(bytes: &[u8]) -> Result<PageEnvelope, DecodeError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|err| DecodeError::InvalidJson(err.to_string()))?;
    match value {
        Value::Array(items) => Ok(PageEnvelope::single_page(
            items.into_iter().map(Entity::new).collect(),
        )),
        Value::Object(_) => serde_json::from_value(value)
            .map_err(|err| DecodeError::UnexpectedShape(err.to_string())),
        other => Err(DecodeError::UnexpectedShape(format!(
            "expected object or array, found {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
