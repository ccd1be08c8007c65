//! Credential decryption adapters

mod wechat_data;

pub use wechat_data::WeChatDataDecryptor;
