// Request envelope: one per call, created by the bridge client after
// validation and dropped once the matching response has been normalized.

use serde_json::{Map, Value};

/// A marshaled request: the wire name plus a payload keyed by declared
/// keypaths.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    pub wire_name: String,
    pub payload: Map<String, Value>,
}

impl RequestEnvelope {
    pub fn new(wire_name: impl Into<String>) -> Self {
        RequestEnvelope {
            wire_name: wire_name.into(),
            payload: Map::new(),
        }
    }

    /// Wire form: `{"<wireName>": { ...payload }}`.
    pub fn to_wire(&self) -> Value {
        let mut outer = Map::new();
        outer.insert(self.wire_name.clone(), Value::Object(self.payload.clone()));
        Value::Object(outer)
    }

    /// Parse the wire form back into an envelope. Returns `None` unless the
    /// value is an object with exactly one entry whose value is an object.
    pub fn from_wire(value: &Value) -> Option<Self> {
        let outer = value.as_object()?;
        if outer.len() != 1 {
            return None;
        }
        let (wire_name, payload) = outer.iter().next()?;
        Some(RequestEnvelope {
            wire_name: wire_name.clone(),
            payload: payload.as_object()?.clone(),
        })
    }
}
