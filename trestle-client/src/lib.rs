// trestle-client: the runtime every generated script wrapper calls into.
// Validates inputs against declared rules, marshals the request envelope,
// dispatches across the transport boundary, and normalizes the reply into
// the canonical response shape.

pub mod client;
pub mod pipe;
pub mod rules;

pub use client::*;
pub use pipe::*;
pub use rules::*;
