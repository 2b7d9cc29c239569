// Status code table. The numeric values are the cross-runtime contract and
// appear verbatim in generated TypeScript/Kotlin/Swift bindings.

/// Call completed successfully.
pub const SUCCESS: i64 = 1;

/// Generic failure. Also used for host-configuration errors such as a
/// registry miss, where no handler ever ran.
pub const FAIL: i64 = 0;

/// Client-side validation rejected the call before it reached the transport.
pub const CLIENT_INVALID: i64 = -1;

/// Native-side decode of the parameter model failed before the handler ran.
pub const INVALID_PARAM: i64 = -2;

/// Whether a code counts as success. Callers must branch on this, never on
/// message text.
#[inline]
pub fn is_success(code: i64) -> bool {
    code == SUCCESS
}

// The remaining negative space is host-definable: hosts may report their own
// categorized codes through `fail(code, msg)` and they pass through the
// normalizer untouched.
