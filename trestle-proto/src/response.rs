// Canonical response shape and the normalization rules that produce it.
//
// Raw transport replies are loosely typed: hosts may omit the message, omit
// the payload, or (on broken transports) return something that is not an
// object at all. Every generated wrapper delegates to `normalize` instead of
// re-implementing the fallback rules, so the three runtimes cannot drift.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::status::SUCCESS;

/// Default message for a success reply that carried no explicit message.
pub const DEFAULT_OK_MSG: &str = "ok";

/// Default message for a failure reply that carried no explicit message.
pub const DEFAULT_ERR_MSG: &str = "Unknown error";

/// The only response shape script callers ever see.
///
/// Synthesized once per call, immutable, delivered to exactly one callback
/// invocation. `data` is absent (not `null`) when the host sent no payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResponse {
    pub code: i64,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl CanonicalResponse {
    /// A success response with the default message and no payload.
    pub fn ok() -> Self {
        CanonicalResponse {
            code: SUCCESS,
            msg: DEFAULT_OK_MSG.to_string(),
            data: None,
        }
    }

    /// A success response carrying a payload.
    pub fn ok_with(data: Map<String, Value>) -> Self {
        CanonicalResponse {
            code: SUCCESS,
            msg: DEFAULT_OK_MSG.to_string(),
            data: Some(data),
        }
    }

    /// A failure response with an explicit code and message.
    pub fn err(code: i64, msg: impl Into<String>) -> Self {
        CanonicalResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        crate::status::is_success(self.code)
    }
}

/// Normalize a raw transport reply into the canonical triple.
///
/// Rules:
/// - `code` := raw `code` if present as an integer, else `-1`.
/// - `msg`  := raw `msg` if present as a string; otherwise `"ok"` when the
///   code is `1`, `"Unknown error"` otherwise.
/// - `data` := raw `data` if present as an object, else absent.
///
/// Non-object raw replies carry no recognizable fields and normalize to
/// `{code: -1, msg: "Unknown error"}`.
pub fn normalize(raw: &Value) -> CanonicalResponse {
    let obj = raw.as_object();

    let code = obj
        .and_then(|o| o.get("code"))
        .and_then(Value::as_i64)
        .unwrap_or(crate::status::CLIENT_INVALID);

    let msg = obj
        .and_then(|o| o.get("msg"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            if code == SUCCESS {
                DEFAULT_OK_MSG.to_string()
            } else {
                DEFAULT_ERR_MSG.to_string()
            }
        });

    let data = obj
        .and_then(|o| o.get("data"))
        .and_then(Value::as_object)
        .cloned();

    CanonicalResponse { code, msg, data }
}
