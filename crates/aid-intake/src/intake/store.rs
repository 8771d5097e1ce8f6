use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use super::crypto::{EncryptedPayload, EncryptionService};
use super::domain::{ApplicationId, HandoffRecord, StoredApplication};
use super::repository::{ApplicationRepository, StoreError};

static SHARED_STORE: OnceLock<Arc<ApplicationStore>> = OnceLock::new();

/// In-memory application store.
///
/// Applications are sealed with the encryption service before they are inserted and only
/// opened on lookup. Nothing is evicted; contents live as long as the store.
#[derive(Debug, Default)]
pub struct ApplicationStore {
    cipher: EncryptionService,
    applications: RwLock<HashMap<ApplicationId, EncryptedPayload>>,
    handoffs: RwLock<HashMap<ApplicationId, HandoffRecord>>,
}

impl ApplicationStore {
    pub fn new(cipher: EncryptionService) -> Self {
        Self {
            cipher,
            applications: RwLock::new(HashMap::new()),
            handoffs: RwLock::new(HashMap::new()),
        }
    }

    /// Process-wide instance. The first caller's cipher wins; later calls, including repeated
    /// initialization of the calling module, get the same store back.
    pub fn shared(cipher: EncryptionService) -> Arc<Self> {
        SHARED_STORE
            .get_or_init(|| Arc::new(Self::new(cipher)))
            .clone()
    }

    /// Raw sealed payload as held at rest.
    pub fn sealed(&self, id: &ApplicationId) -> Result<Option<EncryptedPayload>, StoreError> {
        let guard = self.applications.read().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    pub fn application_count(&self) -> Result<usize, StoreError> {
        Ok(self.applications.read().map_err(poisoned)?.len())
    }

    pub fn handoff_count(&self) -> Result<usize, StoreError> {
        Ok(self.handoffs.read().map_err(poisoned)?.len())
    }
}

impl ApplicationRepository for ApplicationStore {
    fn save_application(&self, record: &StoredApplication) -> Result<(), StoreError> {
        let sealed = self.cipher.encrypt(record)?;
        let mut guard = self.applications.write().map_err(poisoned)?;
        guard.insert(record.application_id.clone(), sealed);
        Ok(())
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<StoredApplication>, StoreError> {
        let Some(sealed) = self.sealed(id)? else {
            return Ok(None);
        };
        Ok(Some(self.cipher.decrypt(&sealed)?))
    }

    fn save_handoff(&self, record: HandoffRecord) -> Result<(), StoreError> {
        let mut guard = self.handoffs.write().map_err(poisoned)?;
        guard.insert(record.application_id.clone(), record);
        Ok(())
    }

    fn handoff(&self, id: &ApplicationId) -> Result<Option<HandoffRecord>, StoreError> {
        let guard = self.handoffs.read().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Unavailable("store lock poisoned".to_string())
}
