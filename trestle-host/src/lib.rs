// trestle-host: the native-side half of the bridge. Maps wire names to
// handlers, decodes incoming envelopes against the declared parameter
// model, and reports exactly one outcome per call through a completion
// object.

pub mod completion;
pub mod decode;
pub mod registry;

pub use completion::*;
pub use decode::*;
pub use registry::*;

// Re-exported for `register_method!` expansions in downstream crates.
#[doc(hidden)]
pub use inventory;

/// Submit a method handler for collection at host-module load time.
///
/// ```ignore
/// trestle_host::register_method!("storage.getItem", get_item_params, get_item);
/// ```
///
/// `$params` is a `fn() -> Vec<FieldSpec>` returning the declared parameter
/// model; `$handler` is a `fn(Map<String, Value>, Completion)`.
#[macro_export]
macro_rules! register_method {
    ($wire:expr, $params:expr, $handler:expr) => {
        $crate::inventory::submit! {
            $crate::MethodRegistration {
                wire_name: $wire,
                params: $params,
                handler: $handler,
            }
        }
    };
}
