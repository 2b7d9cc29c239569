// Completion object handed to handlers. Per-call state machine:
// Pending -> {Succeeded, Failed}, terminal, no retries.

use std::sync::Mutex;

use serde_json::{json, Map, Value};
use tracing::warn;

use trestle_proto::SUCCESS;

/// Raw-reply sink supplied by the transport for one call.
pub type ReplyFn = Box<dyn FnOnce(Value) + Send>;

/// Offers exactly two terminal operations, `succeed` and `fail`. Only the
/// first terminal call has effect; later calls are logged and ignored.
pub struct Completion {
    wire_name: String,
    reply: Mutex<Option<ReplyFn>>,
}

impl Completion {
    pub fn new(wire_name: impl Into<String>, reply: impl FnOnce(Value) + Send + 'static) -> Self {
        Completion {
            wire_name: wire_name.into(),
            reply: Mutex::new(Some(Box::new(reply))),
        }
    }

    /// Report success, optionally with a result payload. The raw reply
    /// carries no message; the normalizer supplies the success default.
    pub fn succeed(&self, data: Option<Map<String, Value>>) {
        let raw = match data {
            Some(data) => json!({"code": SUCCESS, "data": data}),
            None => json!({"code": SUCCESS}),
        };
        self.terminal("succeed", raw);
    }

    /// Report failure with a host-defined code and a human-readable message.
    pub fn fail(&self, code: i64, msg: impl Into<String>) {
        let raw = json!({"code": code, "msg": msg.into()});
        self.terminal("fail", raw);
    }

    fn terminal(&self, op: &str, raw: Value) {
        let reply = self.reply.lock().unwrap().take();
        match reply {
            Some(reply) => reply(raw),
            None => warn!(
                method = %self.wire_name,
                op,
                "completion already resolved; duplicate terminal call ignored"
            ),
        }
    }
}
