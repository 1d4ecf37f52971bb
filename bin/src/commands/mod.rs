//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod file;
pub(crate) mod schema;
