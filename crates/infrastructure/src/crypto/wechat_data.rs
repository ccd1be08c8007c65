//! Decryption of WeChat mini-program user data.
//!
//! The client receives its profile as base64 AES-128-CBC ciphertext (PKCS#7
//! padded) keyed by the base64 session key of the login. The plaintext is a
//! JSON document carrying `openId`, optional `unionId` and a `watermark`
//! naming the app it was issued for.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};
use mpauth_application::ports::{CredentialDecryptor, DecryptError, SessionSecret};
use mpauth_domain::IdentityClaims;
use serde::Deserialize;

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// AES-128 key and block size.
const BLOCK_LEN: usize = 16;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserData {
    open_id: String,
    #[serde(default)]
    union_id: Option<String>,
    #[serde(default)]
    watermark: Option<Watermark>,
}

#[derive(Debug, Deserialize)]
struct Watermark {
    appid: String,
}

/// Decryptor for payloads produced by `wx.getUserInfo`.
#[derive(Debug, Clone)]
pub struct WeChatDataDecryptor {
    app_id: String,
}

impl WeChatDataDecryptor {
    /// Creates a decryptor accepting payloads watermarked for `app_id`.
    #[must_use]
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
        }
    }

    /// Decrypts `payload` and extracts the offline identity.
    ///
    /// # Errors
    /// Returns an error if any input is not valid base64 of the right length,
    /// the ciphertext does not unpad, the plaintext is not the expected JSON,
    /// or the watermark names another app.
    pub fn decrypt_claims(
        &self,
        session_key: &str,
        payload: &str,
        iv: &str,
    ) -> Result<IdentityClaims, DecryptError> {
        let key = decode("session key", session_key)?;
        let iv = decode("iv", iv)?;
        let ciphertext = decode("encrypted data", payload)?;

        if key.len() != BLOCK_LEN {
            return Err(DecryptError::InvalidInput(format!(
                "session key must be {BLOCK_LEN} bytes, got {}",
                key.len()
            )));
        }
        if iv.len() != BLOCK_LEN {
            return Err(DecryptError::InvalidInput(format!(
                "iv must be {BLOCK_LEN} bytes, got {}",
                iv.len()
            )));
        }

        let plaintext = Aes128CbcDec::new_from_slices(&key, &iv)
            .map_err(|e| DecryptError::InvalidInput(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| DecryptError::Cipher("invalid padding".to_string()))?;

        let data: UserData = serde_json::from_slice(&plaintext)
            .map_err(|e| DecryptError::InvalidPlaintext(e.to_string()))?;

        match data.watermark {
            Some(watermark) if watermark.appid == self.app_id => {}
            Some(watermark) => return Err(DecryptError::WatermarkMismatch(watermark.appid)),
            None => {
                return Err(DecryptError::InvalidPlaintext(
                    "missing watermark".to_string(),
                ));
            }
        }

        Ok(IdentityClaims {
            open_id: data.open_id,
            union_id: data.union_id.filter(|id| !id.is_empty()),
        })
    }
}

fn decode(field: &str, value: &str) -> Result<Vec<u8>, DecryptError> {
    STANDARD
        .decode(value)
        .map_err(|e| DecryptError::InvalidInput(format!("{field} is not valid base64: {e}")))
}

#[async_trait]
impl CredentialDecryptor for WeChatDataDecryptor {
    async fn decrypt(
        &self,
        secret: &SessionSecret,
        payload: &str,
        iv: &str,
    ) -> Result<IdentityClaims, DecryptError> {
        self.decrypt_claims(secret.expose(), payload, iv)
    }
}
