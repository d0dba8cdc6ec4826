use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One backend-owned record. The list layer never interprets its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(pub Value);

impl Entity {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The record's `id` field rendered as text, if it has one.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Entity {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Paginated response wrapper: `{count, next, previous, results}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PageEnvelope {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<Entity>,
}

impl PageEnvelope {
    /// A single terminal page, as produced by non-paginated list endpoints.
    pub fn single_page(results: Vec<Entity>) -> Self {
        Self {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        }
    }
}
