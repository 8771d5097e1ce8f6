use std::fmt;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

/// AES-256-GCM output, each component standard base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub iv: String,
    pub tag: String,
    pub data: String,
}

/// Failures raised while sealing or opening payloads.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("ENCRYPTION_KEY is required")]
    MissingKey,
    #[error("ENCRYPTION_KEY must be base64 encoded")]
    InvalidKeyEncoding,
    #[error("ENCRYPTION_KEY must be 32 bytes (base64 encoded), found {found}")]
    InvalidKeyLength { found: usize },
    #[error("encrypted payload is malformed: {0}")]
    MalformedPayload(&'static str),
    #[error("encrypted payload failed authentication")]
    Integrity,
    #[error("encryption failed")]
    Encryption,
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CryptoError {
    /// Key problems are operator faults, not something a client can correct.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CryptoError::MissingKey
                | CryptoError::InvalidKeyEncoding
                | CryptoError::InvalidKeyLength { .. }
        )
    }
}

/// Authenticated encryption of serializable values.
///
/// Holds the configured key material but decodes and checks it on every call; a fresh
/// random nonce is drawn for every `encrypt`.
#[derive(Clone, Default)]
pub struct EncryptionService {
    key_material: Option<String>,
}

impl fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionService")
            .field("key_configured", &self.key_material.is_some())
            .finish()
    }
}

impl EncryptionService {
    /// `key_material` is the base64 form of a 32-byte key.
    pub fn new(key_material: Option<String>) -> Self {
        Self { key_material }
    }

    /// Produce a new random key in the configured encoding.
    pub fn generate_key() -> String {
        STANDARD.encode(Aes256Gcm::generate_key(OsRng))
    }

    /// Check the key without touching any payload.
    pub fn ensure_key(&self) -> Result<(), CryptoError> {
        self.cipher().map(|_| ())
    }

    pub fn encrypt<T: Serialize>(&self, value: &T) -> Result<EncryptedPayload, CryptoError> {
        let cipher = self.cipher()?;
        let plaintext = serde_json::to_vec(value)?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let mut sealed = cipher
            .encrypt(&nonce, plaintext.as_ref())
            .map_err(|_| CryptoError::Encryption)?;
        let tag = sealed.split_off(sealed.len() - TAG_LEN);

        Ok(EncryptedPayload {
            iv: STANDARD.encode(nonce),
            tag: STANDARD.encode(tag),
            data: STANDARD.encode(sealed),
        })
    }

    pub fn decrypt<T: DeserializeOwned>(&self, payload: &EncryptedPayload) -> Result<T, CryptoError> {
        let cipher = self.cipher()?;

        let iv = decode_part(&payload.iv, "iv is not base64")?;
        if iv.len() != NONCE_LEN {
            return Err(CryptoError::MalformedPayload("iv must be 12 bytes"));
        }
        let tag = decode_part(&payload.tag, "tag is not base64")?;
        if tag.len() != TAG_LEN {
            return Err(CryptoError::MalformedPayload("tag must be 16 bytes"));
        }
        let mut sealed = decode_part(&payload.data, "data is not base64")?;
        sealed.extend_from_slice(&tag);

        let plaintext = cipher
            .decrypt(Nonce::from_slice(&iv), sealed.as_ref())
            .map_err(|_| CryptoError::Integrity)?;

        Ok(serde_json::from_slice(&plaintext)?)
    }

    fn cipher(&self) -> Result<Aes256Gcm, CryptoError> {
        let encoded = self
            .key_material
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(CryptoError::MissingKey)?;

        let key = STANDARD
            .decode(encoded)
            .map_err(|_| CryptoError::InvalidKeyEncoding)?;
        if key.len() != KEY_LEN {
            return Err(CryptoError::InvalidKeyLength { found: key.len() });
        }

        Aes256Gcm::new_from_slice(&key).map_err(|_| CryptoError::InvalidKeyLength {
            found: key.len(),
        })
    }
}

fn decode_part(value: &str, reason: &'static str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(value)
        .map_err(|_| CryptoError::MalformedPayload(reason))
}
