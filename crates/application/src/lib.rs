//! mpauth Application - Session workflows and ports
//!
//! This crate defines the application layer with:
//! - Port traits for the identity exchange, credential decryption, user
//!   registry, session store and clock
//! - The `authorize`, `refresh` and token validation workflows
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod service;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use error::{AuthError, AuthResult};
pub use service::{AuthService, Collaborators};
pub use use_cases::{
    AuthorizeInput, AuthorizeOutput, AuthorizeStep, AuthorizeUser, MintSession, RefreshSession,
    RefreshSessionOutput, SessionOutcome, ValidateToken,
};
