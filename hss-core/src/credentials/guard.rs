//! Deactivation guard
//!
//! An IMPI that still has public identities attached must not be deleted.
//! The lookup has to run on the same transaction handle the caller will use
//! for the delete, otherwise an association added in between is missed.

use super::record::{AssociationRef, IdentityRecord, ImpiId};
use super::repository::{AssociationRepository, RepositoryError};
use crate::error::{HssError, HssResult};
use tracing::debug;

/// Whether the identity has no remaining IMPU associations
pub fn can_deactivate<A>(identity_id: ImpiId, associations: &A) -> Result<bool, RepositoryError>
where
    A: AssociationRepository + ?Sized,
{
    Ok(blocking_associations(identity_id, associations)?.is_empty())
}

/// Associations that currently prevent deactivation
pub fn blocking_associations<A>(
    identity_id: ImpiId,
    associations: &A,
) -> Result<Vec<AssociationRef>, RepositoryError>
where
    A: AssociationRepository + ?Sized,
{
    let found = associations.find_associations_by_identity_id(identity_id)?;
    debug!(impi_id = %identity_id, associations = found.len(), "deactivation check");
    Ok(found)
}

/// Record-level variant. A record that was never saved has nothing to
/// deactivate and is rejected as a precondition violation.
pub fn can_deactivate_record<A>(record: &IdentityRecord, associations: &A) -> HssResult<bool>
where
    A: AssociationRepository + ?Sized,
{
    let id = record.id.ok_or_else(|| {
        HssError::PreconditionViolation(format!(
            "identity {} has not been saved yet",
            record.identity
        ))
    })?;
    Ok(can_deactivate(id, associations)?)
}
