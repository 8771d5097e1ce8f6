use super::crypto::CryptoError;
use super::domain::{ApplicationId, HandoffRecord, StoredApplication};

/// Storage abstraction so the intake service can be exercised in isolation.
///
/// Implementations own the at-rest protection of applications; handoff records are
/// PII-free and may be kept as is.
pub trait ApplicationRepository: Send + Sync {
    fn save_application(&self, record: &StoredApplication) -> Result<(), StoreError>;
    fn application(&self, id: &ApplicationId) -> Result<Option<StoredApplication>, StoreError>;
    fn save_handoff(&self, record: HandoffRecord) -> Result<(), StoreError>;
    fn handoff(&self, id: &ApplicationId) -> Result<Option<HandoffRecord>, StoreError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, StoreError::Crypto(err) if err.is_configuration())
    }
}
