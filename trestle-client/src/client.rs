// The validate-and-forward call path. One callback invocation per call that
// reaches a terminal outcome; the absent-callback guard is the only path
// that intentionally delivers zero.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{error, warn};

use trestle_proto::{normalize, CanonicalResponse, RequestEnvelope, CLIENT_INVALID};

use crate::pipe::{Pipe, ReplySink};
use crate::rules::{self, MethodDesc};

/// Script-surface callback. Modeled as `Box<dyn FnOnce>` because the caller
/// side is dynamically typed; a caller that passes nothing callable is the
/// `None` case.
pub type BridgeCallback = Box<dyn FnOnce(CanonicalResponse) + Send>;

/// Single-shot delivery wrapper. The protocol guarantees at most one
/// callback invocation per call; a second delivery attempt is a usage error
/// that is logged and dropped, never surfaced to the caller.
pub struct CompletionGuard {
    wire_name: String,
    callback: Mutex<Option<BridgeCallback>>,
}

impl CompletionGuard {
    pub fn new(wire_name: impl Into<String>, callback: BridgeCallback) -> Self {
        CompletionGuard {
            wire_name: wire_name.into(),
            callback: Mutex::new(Some(callback)),
        }
    }

    /// Deliver the response to the wrapped callback. Only the first call has
    /// effect.
    pub fn deliver(&self, response: CanonicalResponse) {
        let callback = self.callback.lock().unwrap().take();
        match callback {
            Some(cb) => cb(response),
            None => error!(
                method = %self.wire_name,
                code = response.code,
                "dropped duplicate response delivery"
            ),
        }
    }
}

/// The bridge client: one per embedded script runtime, shared by every
/// generated wrapper.
pub struct BridgeClient {
    pipe: Arc<dyn Pipe>,
}

impl BridgeClient {
    pub fn new(pipe: Arc<dyn Pipe>) -> Self {
        BridgeClient { pipe }
    }

    /// Validate `params` against the method's declared rules, marshal, and
    /// dispatch. The callback fires exactly once with the canonical
    /// response: either a validation failure (pre-transport) or the
    /// normalized transport reply.
    pub fn call(
        &self,
        method: &MethodDesc,
        params: Option<Value>,
        callback: Option<BridgeCallback>,
    ) {
        let Some(callback) = callback else {
            // Nothing to deliver to. Log and bail before touching the
            // transport so the call has no observable effect.
            warn!(method = %method.wire_name, "bridge call dropped: callback is not a function");
            return;
        };
        let guard = CompletionGuard::new(method.wire_name.clone(), callback);

        if let Err(diagnostic) = rules::evaluate(&method.rules, params.as_ref()) {
            guard.deliver(CanonicalResponse::err(CLIENT_INVALID, diagnostic));
            return;
        }

        let envelope = marshal(&method.wire_name, params.as_ref());
        self.pipe.dispatch(
            envelope,
            ReplySink::new(move |raw| guard.deliver(normalize(&raw))),
        );
    }
}

/// Build the request envelope from validated params. Fields are copied;
/// string values are trimmed before they cross the transport.
fn marshal(wire_name: &str, params: Option<&Value>) -> RequestEnvelope {
    let mut envelope = RequestEnvelope::new(wire_name);
    if let Some(fields) = params.and_then(Value::as_object) {
        for (key, value) in fields {
            let copied = match value.as_str() {
                Some(s) => Value::String(s.trim().to_string()),
                None => value.clone(),
            };
            envelope.payload.insert(key.clone(), copied);
        }
    }
    envelope
}
