//! mpauth Domain - Core session types
//!
//! This crate defines the domain model of the session service: subject
//! identities, the token format, session and registry records, settings and
//! the stable error classification. All types here are pure Rust with no I/O.

pub mod error;
pub mod identity;
pub mod session;
pub mod settings;
pub mod status;
pub mod token;

pub use error::{DomainError, DomainResult};
pub use identity::{IdentityClaims, SubjectId};
pub use session::{SessionRecord, UserRow};
pub use settings::{AuthSettings, AuthSettingsBuilder, DEFAULT_TOKEN_TTL_SECS};
pub use status::{ErrorKind, ResponseEnvelope, SUCCESS_STATUS_CODE};
pub use token::{DELIMITER, NONCE_LEN, SESSION_PART_LEN, Sku, Token, TokenCodec};
