//! Repository capabilities
//!
//! Persistence is owned by the embedding application. The core only sees
//! these traits, always through a transaction handle so that a deactivation
//! check and the delete it allows observe the same snapshot.

use crate::credentials::record::{AssociationRef, IdentityRecord, ImpiId, ImsuId, SubscriberUnit};
use thiserror::Error;

pub mod memory_store;

pub use memory_store::{MemoryStore, MemoryTransaction};

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate identity: {0}")]
    Duplicate(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transaction error: {0}")]
    Transaction(String),
}

/// IMPI records
pub trait RecordRepository {
    fn load_by_id(&self, id: ImpiId) -> Result<Option<IdentityRecord>, RepositoryError>;

    /// Insert when `record.id` is `None`, otherwise replace the stored record
    /// wholesale. Returns the record's id.
    fn save(&mut self, record: &IdentityRecord) -> Result<ImpiId, RepositoryError>;

    fn delete(&mut self, id: ImpiId) -> Result<(), RepositoryError>;
}

/// IMPI-IMPU links
pub trait AssociationRepository {
    fn find_associations_by_identity_id(
        &self,
        id: ImpiId,
    ) -> Result<Vec<AssociationRef>, RepositoryError>;
}

/// IMSU lookups
pub trait SubscriberUnitRepository {
    fn load_subscriber_unit(&self, id: ImsuId) -> Result<Option<SubscriberUnit>, RepositoryError>;
}

/// A transaction handle. Dropping it without `commit` rolls back.
pub trait Transaction: RecordRepository + AssociationRepository + SubscriberUnitRepository {
    fn commit(self) -> Result<(), RepositoryError>;
}

/// Source of transaction handles
pub trait TransactionScope {
    type Tx<'a>: Transaction
    where
        Self: 'a;

    fn begin(&self) -> Result<Self::Tx<'_>, RepositoryError>;
}
