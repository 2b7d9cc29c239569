// Prelude: one-import access to the most commonly used Trestle types.
//
// Usage: `use trestle::prelude::*;`

// Wire contract
pub use trestle_proto::{
    normalize, CanonicalResponse, RequestEnvelope, CLIENT_INVALID, FAIL, INVALID_PARAM, SUCCESS,
};

// Method specifications
pub use trestle_spec::{
    validate_catalog, validate_method, FieldSpec, MethodCatalog, MethodSpec, ModelSpec,
    PrimitiveKind, SpecError,
};

// Script-side client
pub use trestle_client::{BridgeCallback, BridgeClient, MethodDesc, Pipe, ReplySink, Rule};

// Native-side dispatcher
pub use trestle_host::{decode_params, init_registry, Completion, Dispatcher, Handler};

// In-process wiring
pub use crate::{connect, GlobalPipe, LocalPipe};
