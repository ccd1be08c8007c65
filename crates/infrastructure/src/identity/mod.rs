//! Identity exchange adapters

mod wechat;

pub use wechat::{DEFAULT_CODE2SESSION_URL, DEFAULT_REQUEST_TIMEOUT, WeChatIdentityVerifier};
