//! In-memory repository (non-persistent, for tests and embedding)

use super::{
    AssociationRepository, RecordRepository, RepositoryError, SubscriberUnitRepository,
    Transaction, TransactionScope,
};
use crate::credentials::record::{
    AssociationRef, IdentityRecord, ImpiId, ImpuId, ImsuId, SubscriberUnit,
};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

/// Helper to convert poison errors into RepositoryError
fn handle_poison<T>(_err: PoisonError<T>) -> RepositoryError {
    RepositoryError::Transaction(
        "Lock poisoned: a thread panicked while holding the lock".to_string(),
    )
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    records: BTreeMap<ImpiId, IdentityRecord>,
    associations: BTreeMap<ImpiId, Vec<AssociationRef>>,
    subscriber_units: BTreeMap<ImsuId, SubscriberUnit>,
    last_id: u32,
}

impl StoreState {
    fn ensure_unique_identity(&self, record: &IdentityRecord) -> Result<(), RepositoryError> {
        let clash = self
            .records
            .values()
            .any(|other| other.identity == record.identity && other.id != record.id);
        if clash {
            return Err(RepositoryError::Duplicate(record.identity.clone()));
        }
        Ok(())
    }
}

/// Thread-safe in-memory store.
///
/// A transaction holds the write lock for its whole lifetime and works on a
/// staged copy that replaces the shared state only on commit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_subscriber_unit(&self, unit: SubscriberUnit) -> Result<(), RepositoryError> {
        self.state
            .write()
            .map_err(handle_poison)?
            .subscriber_units
            .insert(unit.id, unit);
        Ok(())
    }

    /// Link a stored IMPI to a public identity
    pub fn associate(
        &self,
        impi_id: ImpiId,
        impu_id: ImpuId,
        impu_identity: impl Into<String>,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().map_err(handle_poison)?;
        if !state.records.contains_key(&impi_id) {
            return Err(RepositoryError::NotFound(format!("impi {}", impi_id)));
        }

        let links = state.associations.entry(impi_id).or_default();
        if !links.iter().any(|link| link.impu_id == impu_id) {
            links.push(AssociationRef {
                impi_id,
                impu_id,
                impu_identity: impu_identity.into(),
            });
        }
        Ok(())
    }

    /// Remove a link. Returns whether it existed.
    pub fn dissociate(&self, impi_id: ImpiId, impu_id: ImpuId) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().map_err(handle_poison)?;
        let Some(links) = state.associations.get_mut(&impi_id) else {
            return Ok(false);
        };

        let before = links.len();
        links.retain(|link| link.impu_id != impu_id);
        let removed = links.len() != before;
        if links.is_empty() {
            state.associations.remove(&impi_id);
        }
        Ok(removed)
    }

    pub fn record_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.state.read().map_err(handle_poison)?.records.len())
    }
}

impl TransactionScope for MemoryStore {
    type Tx<'a> = MemoryTransaction<'a>;

    fn begin(&self) -> Result<Self::Tx<'_>, RepositoryError> {
        let guard = self.state.write().map_err(handle_poison)?;
        let staged = guard.clone();
        Ok(MemoryTransaction { guard, staged })
    }
}

/// Open transaction on a [`MemoryStore`]
pub struct MemoryTransaction<'a> {
    guard: RwLockWriteGuard<'a, StoreState>,
    staged: StoreState,
}

impl RecordRepository for MemoryTransaction<'_> {
    fn load_by_id(&self, id: ImpiId) -> Result<Option<IdentityRecord>, RepositoryError> {
        Ok(self.staged.records.get(&id).cloned())
    }

    fn save(&mut self, record: &IdentityRecord) -> Result<ImpiId, RepositoryError> {
        self.staged.ensure_unique_identity(record)?;

        let id = match record.id {
            Some(id) if self.staged.records.contains_key(&id) => id,
            Some(id) => return Err(RepositoryError::NotFound(format!("impi {}", id))),
            None => {
                let next = self.staged.last_id.checked_add(1).ok_or_else(|| {
                    RepositoryError::Storage("identity id space exhausted".to_string())
                })?;
                self.staged.last_id = next;
                ImpiId::new(next)
            }
        };

        let mut stored = record.clone();
        stored.id = Some(id);
        self.staged.records.insert(id, stored);
        Ok(id)
    }

    fn delete(&mut self, id: ImpiId) -> Result<(), RepositoryError> {
        self.staged
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("impi {}", id)))
    }
}

impl AssociationRepository for MemoryTransaction<'_> {
    fn find_associations_by_identity_id(
        &self,
        id: ImpiId,
    ) -> Result<Vec<AssociationRef>, RepositoryError> {
        Ok(self.staged.associations.get(&id).cloned().unwrap_or_default())
    }
}

impl SubscriberUnitRepository for MemoryTransaction<'_> {
    fn load_subscriber_unit(&self, id: ImsuId) -> Result<Option<SubscriberUnit>, RepositoryError> {
        Ok(self.staged.subscriber_units.get(&id).cloned())
    }
}

impl Transaction for MemoryTransaction<'_> {
    fn commit(mut self) -> Result<(), RepositoryError> {
        *self.guard = std::mem::take(&mut self.staged);
        Ok(())
    }
}
