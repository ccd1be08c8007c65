//! User registry adapters.

mod json_file;
mod memory;

pub use json_file::{JsonFileUserRegistry, REGISTRY_SCHEMA_VERSION};
pub use memory::InMemoryUserRegistry;
