//! mpauth Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod crypto;
pub mod identity;
pub mod registry;
pub mod session;

pub use adapters::{ManualClock, SystemClock};
pub use crypto::WeChatDataDecryptor;
pub use identity::{DEFAULT_CODE2SESSION_URL, DEFAULT_REQUEST_TIMEOUT, WeChatIdentityVerifier};
pub use registry::{InMemoryUserRegistry, JsonFileUserRegistry, REGISTRY_SCHEMA_VERSION};
pub use session::InMemorySessionStore;
