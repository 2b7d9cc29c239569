// Handler registry. Populated once at host-module initialization, read-only
// during dispatch; lookups after init take no lock because no writer runs
// concurrently with readers.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};
use tracing::{info, warn};

use trestle_proto::{RequestEnvelope, FAIL, INVALID_PARAM};
use trestle_spec::FieldSpec;

use crate::completion::Completion;
use crate::decode::decode_params;

/// A registered method implementation.
pub trait Handler: Send + Sync {
    fn invoke(&self, params: Map<String, Value>, completion: Completion);
}

impl<F> Handler for F
where
    F: Fn(Map<String, Value>, Completion) + Send + Sync,
{
    fn invoke(&self, params: Map<String, Value>, completion: Completion) {
        self(params, completion)
    }
}

/// Submitted by `register_method!` — collected at link time, drained once
/// by `init_registry`.
pub struct MethodRegistration {
    pub wire_name: &'static str,
    /// Declared parameter model, built lazily because field specs are not
    /// const-constructible.
    pub params: fn() -> Vec<FieldSpec>,
    pub handler: fn(Map<String, Value>, Completion),
}

inventory::collect!(MethodRegistration);

struct Entry {
    params: Vec<FieldSpec>,
    handler: Arc<dyn Handler>,
}

/// A host's method table. Registration takes `&mut self`, dispatch `&self`:
/// the borrow checker enforces that the table is never mutated mid-call.
#[derive(Default)]
pub struct Dispatcher {
    methods: HashMap<String, Entry>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher::default()
    }

    /// Register a handler for a wire name. A duplicate registration replaces
    /// the earlier one and is logged, matching load-order semantics.
    pub fn register(
        &mut self,
        wire_name: impl Into<String>,
        params: Vec<FieldSpec>,
        handler: Arc<dyn Handler>,
    ) {
        let wire_name = wire_name.into();
        if self
            .methods
            .insert(wire_name.clone(), Entry { params, handler })
            .is_some()
        {
            warn!(method = %wire_name, "handler replaced by a later registration");
        }
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Dispatch one envelope. Exactly one terminal outcome reaches `reply`:
    /// a registry miss or decode failure short-circuits before the handler
    /// runs; otherwise the handler owns the completion.
    pub fn dispatch(&self, envelope: RequestEnvelope, reply: impl FnOnce(Value) + Send + 'static) {
        let completion = Completion::new(envelope.wire_name.clone(), reply);

        let Some(entry) = self.methods.get(&envelope.wire_name) else {
            completion.fail(
                FAIL,
                format!("no handler registered for '{}'", envelope.wire_name),
            );
            return;
        };

        let params = match decode_params(&entry.params, &envelope.payload) {
            Ok(params) => params,
            Err(diagnostic) => {
                completion.fail(INVALID_PARAM, diagnostic);
                return;
            }
        };

        entry.handler.invoke(params, completion);
    }
}

// ---------------------------------------------------------------------------
// Process-wide registry (inventory-backed)
// ---------------------------------------------------------------------------

static REGISTRY: OnceLock<Dispatcher> = OnceLock::new();

/// Drain inventory submissions into the process-wide dispatcher. Called once
/// at host-module initialization; a second call is a logged no-op.
pub fn init_registry() -> &'static Dispatcher {
    let mut initialized = false;
    let dispatcher = REGISTRY.get_or_init(|| {
        initialized = true;
        let mut dispatcher = Dispatcher::new();
        for reg in inventory::iter::<MethodRegistration> {
            dispatcher.register(reg.wire_name, (reg.params)(), Arc::new(reg.handler));
        }
        info!(
            methods = dispatcher.len(),
            "handler registry initialized from inventory"
        );
        dispatcher
    });
    if !initialized {
        warn!("init_registry called more than once; registry unchanged");
    }
    dispatcher
}

/// The process-wide dispatcher, if `init_registry` has run.
pub fn global() -> Option<&'static Dispatcher> {
    REGISTRY.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn get_item_fields() -> Vec<FieldSpec> {
        serde_json::from_str(r#"[{"keyPath": "key", "required": true, "kind": "string"}]"#)
            .unwrap()
    }

    fn envelope(wire_name: &str, payload: Value) -> RequestEnvelope {
        let mut env = RequestEnvelope::new(wire_name);
        env.payload = payload.as_object().unwrap().clone();
        env
    }

    fn dispatch_collect(dispatcher: &Dispatcher, env: RequestEnvelope) -> Value {
        let replies: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = replies.clone();
        dispatcher.dispatch(env, move |raw| sink.lock().unwrap().push(raw));
        let replies = replies.lock().unwrap();
        assert_eq!(replies.len(), 1, "expected exactly one terminal outcome");
        replies[0].clone()
    }

    #[test]
    fn registry_miss_fails_descriptively() {
        let dispatcher = Dispatcher::new();
        let raw = dispatch_collect(&dispatcher, envelope("storage.getItem", json!({})));
        assert_eq!(raw["code"], 0);
        assert_eq!(raw["msg"], "no handler registered for 'storage.getItem'");
    }

    #[test]
    fn decode_failure_short_circuits_before_the_handler() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(
            "storage.getItem",
            get_item_fields(),
            Arc::new(|_params: Map<String, Value>, _completion: Completion| {
                panic!("handler must not run on malformed input");
            }),
        );
        let raw = dispatch_collect(&dispatcher, envelope("storage.getItem", json!({})));
        assert_eq!(raw["code"], -2);
        assert_eq!(raw["msg"], "missing required field 'key'");
    }

    #[test]
    fn handler_outcome_reaches_the_reply() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(
            "storage.getItem",
            get_item_fields(),
            Arc::new(|params: Map<String, Value>, completion: Completion| {
                assert_eq!(params["key"], "k1");
                let mut data = Map::new();
                data.insert("value".into(), json!("v"));
                completion.succeed(Some(data));
            }),
        );
        let raw = dispatch_collect(&dispatcher, envelope("storage.getItem", json!({"key": "k1"})));
        assert_eq!(raw, json!({"code": 1, "data": {"value": "v"}}));
    }

    #[test]
    fn handler_double_completion_is_ignored() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(
            "nav.navigateBack",
            Vec::new(),
            Arc::new(|_params: Map<String, Value>, completion: Completion| {
                completion.succeed(None);
                completion.fail(0, "late");
            }),
        );
        let raw = dispatch_collect(&dispatcher, envelope("nav.navigateBack", json!({})));
        assert_eq!(raw, json!({"code": 1}));
    }
}
