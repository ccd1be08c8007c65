//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session workflows and the external
//! systems they coordinate. Each port is a trait implemented by adapters in the
//! infrastructure layer.

mod clock;
mod credential_decryptor;
mod identity_verifier;
mod session_store;
mod user_registry;

pub use clock::Clock;
pub use credential_decryptor::{CredentialDecryptor, DecryptError};
pub use identity_verifier::{IdentityError, IdentityVerifier, SessionSecret, VerifiedIdentity};
pub use session_store::{SessionStore, SessionStoreError};
pub use user_registry::{RegistryError, UserRegistry};
