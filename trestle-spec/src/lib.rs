// trestle-spec: declarative method specifications. Pure data plus the
// validation pass that every consumer (codegen, client, host) relies on.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::*;
