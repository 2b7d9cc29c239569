// Transport abstraction. The pipe is opaque: it may cross a process or
// runtime boundary, and its completion is always asynchronous from the
// caller's perspective.

use serde_json::Value;

use trestle_proto::RequestEnvelope;

/// Single-use reply channel handed to the transport alongside each envelope.
/// Consuming `complete` makes a second completion unrepresentable.
pub struct ReplySink(Box<dyn FnOnce(Value) + Send>);

impl ReplySink {
    pub fn new(f: impl FnOnce(Value) + Send + 'static) -> Self {
        ReplySink(Box::new(f))
    }

    /// Hand the raw reply back. The raw value is host-shaped and is only
    /// ever read through the response normalizer.
    pub fn complete(self, raw: Value) {
        (self.0)(raw)
    }
}

/// The low-level call transport supplied by the hybrid engine.
pub trait Pipe: Send + Sync {
    fn dispatch(&self, envelope: RequestEnvelope, reply: ReplySink);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn sink_completes_exactly_once_by_construction() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let sink = ReplySink::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        sink.complete(json!({"code": 1}));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
