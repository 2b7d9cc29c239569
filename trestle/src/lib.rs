// trestle: user-facing library crate. Re-exports the workspace and provides
// the in-process pipe used when the script runtime and a native host share
// a process (and by the contract tests).

pub use trestle_client as client;
pub use trestle_host as host;
pub use trestle_proto as proto;
pub use trestle_spec as spec;

pub mod prelude;

use std::sync::Arc;

use trestle_client::{BridgeClient, Pipe, ReplySink};
use trestle_host::Dispatcher;
use trestle_proto::RequestEnvelope;

/// Routes envelopes straight into an in-process dispatcher.
pub struct LocalPipe {
    dispatcher: Arc<Dispatcher>,
}

impl LocalPipe {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        LocalPipe { dispatcher }
    }
}

impl Pipe for LocalPipe {
    fn dispatch(&self, envelope: RequestEnvelope, reply: ReplySink) {
        self.dispatcher
            .dispatch(envelope, move |raw| reply.complete(raw));
    }
}

/// Pipe over the process-wide, inventory-initialized registry.
pub struct GlobalPipe;

impl Pipe for GlobalPipe {
    fn dispatch(&self, envelope: RequestEnvelope, reply: ReplySink) {
        match trestle_host::global() {
            Some(dispatcher) => dispatcher.dispatch(envelope, move |raw| reply.complete(raw)),
            None => reply.complete(serde_json::json!({
                "code": trestle_proto::FAIL,
                "msg": "host registry not initialized",
            })),
        }
    }
}

/// Initialize the process-wide registry from inventory submissions and
/// return a client wired to it.
pub fn connect() -> BridgeClient {
    trestle_host::init_registry();
    BridgeClient::new(Arc::new(GlobalPipe))
}
