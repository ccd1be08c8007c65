//! Application use cases (session workflow orchestration).

pub mod authorize;
mod mint_session;
mod refresh_session;
mod validate_token;

pub use authorize::{AuthorizeInput, AuthorizeOutput, AuthorizeStep, AuthorizeUser, SessionOutcome};
pub use mint_session::MintSession;
pub use refresh_session::{RefreshSession, RefreshSessionOutput};
pub use validate_token::ValidateToken;
