// End-to-end contract tests: generated-wrapper semantics driven through the
// real client, an in-process pipe, and the host dispatcher. Every runtime
// that embeds the bridge must observe exactly these outcomes.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

use trestle::prelude::*;
use trestle::LocalPipe;

fn get_item_spec() -> MethodSpec {
    serde_json::from_str(
        r#"{
            "name": "getItem",
            "wireName": "storage.getItem",
            "params": [{"keyPath": "key", "required": true, "kind": "string"}],
            "results": [{"keyPath": "value", "kind": "string"}]
        }"#,
    )
    .unwrap()
}

fn storage_dispatcher() -> Arc<Dispatcher> {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(
        "storage.getItem",
        get_item_spec().params,
        Arc::new(|params: Map<String, Value>, completion: Completion| {
            // The client trims identity strings before dispatch.
            assert_eq!(params["key"], "k1");
            let mut data = Map::new();
            data.insert("value".into(), json!("v"));
            completion.succeed(Some(data));
        }),
    );
    Arc::new(dispatcher)
}

fn capture() -> (Arc<Mutex<Vec<CanonicalResponse>>>, Option<BridgeCallback>) {
    let seen: Arc<Mutex<Vec<CanonicalResponse>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let cb: BridgeCallback = Box::new(move |r| sink.lock().unwrap().push(r));
    (seen, Some(cb))
}

#[test]
fn round_trip_through_the_local_pipe() {
    let client = BridgeClient::new(Arc::new(LocalPipe::new(storage_dispatcher())));
    let desc = MethodDesc::from_spec(&get_item_spec());
    let (seen, cb) = capture();

    client.call(&desc, Some(json!({"key": " k1 "})), cb);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].code, SUCCESS);
    assert_eq!(seen[0].msg, "ok");
    assert_eq!(seen[0].data.as_ref().unwrap()["value"], "v");
}

#[test]
fn client_validation_never_reaches_the_host() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(
        "storage.getItem",
        get_item_spec().params,
        Arc::new(|_: Map<String, Value>, _: Completion| {
            panic!("host must not run for invalid params");
        }),
    );
    let client = BridgeClient::new(Arc::new(LocalPipe::new(Arc::new(dispatcher))));
    let desc = MethodDesc::from_spec(&get_item_spec());

    for params in [None, Some(json!({})), Some(json!({"key": "  "}))] {
        let (seen, cb) = capture();
        client.call(&desc, params, cb);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].code, CLIENT_INVALID);
        assert!(seen[0].msg.starts_with("Invalid params:"), "{}", seen[0].msg);
    }
}

#[test]
fn host_decode_failure_surfaces_invalid_param() {
    // A descriptor with no client rules lets the malformed payload through
    // to the host, which must reject it before the handler runs.
    let desc = MethodDesc {
        wire_name: "storage.getItem".into(),
        rules: vec![],
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(
        "storage.getItem",
        get_item_spec().params,
        Arc::new(|_: Map<String, Value>, _: Completion| {
            panic!("handler must not see malformed input");
        }),
    );
    let client = BridgeClient::new(Arc::new(LocalPipe::new(Arc::new(dispatcher))));
    let (seen, cb) = capture();

    client.call(&desc, Some(json!({})), cb);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].code, INVALID_PARAM);
    assert_eq!(seen[0].msg, "missing required field 'key'");
}

#[test]
fn registry_miss_is_a_descriptive_failure() {
    let client = BridgeClient::new(Arc::new(LocalPipe::new(Arc::new(Dispatcher::new()))));
    let desc = MethodDesc {
        wire_name: "media.chooseMedia".into(),
        rules: vec![],
    };
    let (seen, cb) = capture();

    client.call(&desc, None, cb);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].code, FAIL);
    assert_eq!(seen[0].msg, "no handler registered for 'media.chooseMedia'");
}

#[test]
fn handler_defined_failure_codes_pass_through() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(
        "media.chooseMedia",
        Vec::new(),
        Arc::new(|_: Map<String, Value>, completion: Completion| {
            completion.fail(-7, "picker dismissed");
        }),
    );
    let client = BridgeClient::new(Arc::new(LocalPipe::new(Arc::new(dispatcher))));
    let desc = MethodDesc {
        wire_name: "media.chooseMedia".into(),
        rules: vec![],
    };
    let (seen, cb) = capture();

    client.call(&desc, None, cb);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].code, -7);
    assert_eq!(seen[0].msg, "picker dismissed");
    assert!(!seen[0].is_success());
}

#[test]
fn concurrent_calls_complete_independently() {
    // Completion order is reversed relative to issue order; each callback
    // still fires exactly once with its own payload.
    struct DeferredPipe {
        pending: Mutex<Vec<(RequestEnvelope, ReplySink)>>,
    }
    impl Pipe for DeferredPipe {
        fn dispatch(&self, envelope: RequestEnvelope, reply: ReplySink) {
            self.pending.lock().unwrap().push((envelope, reply));
        }
    }

    let pipe = Arc::new(DeferredPipe {
        pending: Mutex::new(Vec::new()),
    });
    let client = BridgeClient::new(pipe.clone());
    let desc = MethodDesc {
        wire_name: "storage.getItem".into(),
        rules: vec![],
    };

    let (seen_a, cb_a) = capture();
    let (seen_b, cb_b) = capture();
    client.call(&desc, Some(json!({"key": "a"})), cb_a);
    client.call(&desc, Some(json!({"key": "b"})), cb_b);

    let mut pending = pipe.pending.lock().unwrap();
    assert_eq!(pending.len(), 2);
    // Complete b first, then a.
    let (env_b, sink_b) = pending.pop().unwrap();
    let (env_a, sink_a) = pending.pop().unwrap();
    drop(pending);
    assert_eq!(env_a.payload["key"], "a");
    assert_eq!(env_b.payload["key"], "b");
    sink_b.complete(json!({"code": 1, "data": {"value": "vb"}}));
    sink_a.complete(json!({"code": 1, "data": {"value": "va"}}));

    let seen_a = seen_a.lock().unwrap();
    let seen_b = seen_b.lock().unwrap();
    assert_eq!(seen_a.len(), 1);
    assert_eq!(seen_b.len(), 1);
    assert_eq!(seen_a[0].data.as_ref().unwrap()["value"], "va");
    assert_eq!(seen_b[0].data.as_ref().unwrap()["value"], "vb");
}

// ---------------------------------------------------------------------------
// Inventory-backed registration
// ---------------------------------------------------------------------------

fn echo_params() -> Vec<FieldSpec> {
    serde_json::from_str(r#"[{"keyPath": "text", "required": true, "kind": "string"}]"#).unwrap()
}

fn echo(params: Map<String, Value>, completion: Completion) {
    let mut data = Map::new();
    data.insert("echo".into(), params["text"].clone());
    completion.succeed(Some(data));
}

trestle_host::register_method!("demo.echo", echo_params, echo);

#[test]
fn inventory_registration_round_trip() {
    let client = trestle::connect();
    let spec: MethodSpec = serde_json::from_str(
        r#"{
            "name": "echo",
            "wireName": "demo.echo",
            "params": [{"keyPath": "text", "required": true, "kind": "string"}]
        }"#,
    )
    .unwrap();
    let desc = MethodDesc::from_spec(&spec);
    let (seen, cb) = capture();

    client.call(&desc, Some(json!({"text": "hello"})), cb);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].code, SUCCESS);
    assert_eq!(seen[0].data.as_ref().unwrap()["echo"], "hello");
}
