//! Event payloads for the event API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An event published to the event API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event name, e.g. `list/item.created`
    pub name: String,

    /// Event payload; always a JSON object on the wire
    #[serde(default = "empty_object")]
    pub data: Value,

    /// Information about the user that triggered the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,

    /// Idempotency id; events sharing an id are deduplicated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Timestamp in milliseconds since the Unix epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,

    /// Payload schema version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<String>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Event {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
            user: None,
            id: None,
            ts: None,
            v: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_user(mut self, user: Value) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_timestamp(mut self, ts: i64) -> Self {
        self.ts = Some(ts);
        self
    }

    pub fn with_version(mut self, v: impl Into<String>) -> Self {
        self.v = Some(v.into());
        self
    }

    /// Check the event and fill in the fields the API expects.
    ///
    /// A `null` payload becomes `{}`; a missing timestamp becomes `now_ms`.
    pub(crate) fn prepare(mut self, now_ms: i64) -> Result<Self, String> {
        if self.name.trim().is_empty() {
            return Err("event name must not be empty".to_string());
        }

        if self.data.is_null() {
            self.data = empty_object();
        } else if !self.data.is_object() {
            return Err(format!(
                "data for event {:?} must be a JSON object",
                self.name
            ));
        }

        if self.ts.is_none() {
            self.ts = Some(now_ms);
        }

        Ok(self)
    }
}

/// Response returned by the event API after a send
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendEventResponse {
    /// Ids assigned to the accepted events, in send order
    #[serde(default)]
    pub ids: Vec<String>,

    /// Status code echoed by the API
    #[serde(default)]
    pub status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prepare_fills_timestamp() {
        let event = Event::new("list/item.created", json!({"item": 1}))
            .prepare(1_700_000_000_000)
            .unwrap();
        assert_eq!(event.ts, Some(1_700_000_000_000));
    }

    #[test]
    fn test_prepare_keeps_explicit_timestamp() {
        let event = Event::new("list/item.created", json!({}))
            .with_timestamp(42)
            .prepare(1_700_000_000_000)
            .unwrap();
        assert_eq!(event.ts, Some(42));
    }

    #[test]
    fn test_prepare_null_data() {
        let event = Event::new("list/item.created", Value::Null).prepare(0).unwrap();
        assert_eq!(event.data, json!({}));
    }

    #[test]
    fn test_prepare_rejects_bad_events() {
        assert!(Event::new("  ", json!({})).prepare(0).is_err());
        assert!(Event::new("list/item.created", json!([1, 2])).prepare(0).is_err());
    }

    #[test]
    fn test_serialize_skips_unset_fields() {
        let event = Event::new("list/item.created", json!({"item": 1})).with_id("abc");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"name": "list/item.created", "data": {"item": 1}, "id": "abc"})
        );
    }
}
