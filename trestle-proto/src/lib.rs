// trestle-proto: wire-level contract shared by the script-side client, both
// native hosts, and the code generator. This crate defines the complete
// cross-runtime protocol; nothing here may drift per-platform.

pub mod envelope;
pub mod response;
pub mod status;

pub use envelope::*;
pub use response::*;
pub use status::*;
