//! Admin use-cases: load, submit and delete an IMPI
//!
//! Each call runs inside exactly one transaction from the supplied
//! [`TransactionScope`]. Read-only calls commit to release the handle;
//! any early return drops it, which rolls back.

use super::auth_scheme::AuthSchemeFlag;
use super::guard;
use super::record::{AssociationRef, ImpiId, SubscriberUnit, NEW_RECORD_ID};
use super::repository::{
    AssociationRepository, RecordRepository, RepositoryError, SubscriberUnitRepository,
    Transaction, TransactionScope,
};
use super::view::IdentityView;
use crate::config::ProvisioningConfig;
use crate::error::{HssError, HssResult};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Everything an edit page shows for one identity
#[derive(Debug, Clone, Serialize)]
pub struct LoadedIdentity {
    pub view: IdentityView,
    pub associated_impus: Vec<AssociationRef>,
    pub subscriber_unit: Option<SubscriberUnit>,
    /// Whether the delete action should be offered
    pub can_delete: bool,
}

/// Result of a delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Still linked to these public identities; nothing was changed
    Blocked { associations: Vec<AssociationRef> },
}

pub struct IdentityAdmin<S> {
    store: S,
    provisioning: ProvisioningConfig,
}

impl<S: TransactionScope> IdentityAdmin<S> {
    /// Fails with [`HssError::Config`] when the baseline scheme set is empty
    /// or enables every scheme.
    pub fn new(store: S, provisioning: ProvisioningConfig) -> HssResult<Self> {
        provisioning.validate()?;
        Ok(Self {
            store,
            provisioning,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the edit view for `raw_id`, or a blank one for `-1`.
    ///
    /// A blank view has nothing to delete, so `can_delete` is false.
    pub fn load(&self, raw_id: i64) -> HssResult<LoadedIdentity> {
        if raw_id == NEW_RECORD_ID {
            let baseline = self.provisioning.default_auth_schemes.iter().copied();
            return Ok(LoadedIdentity {
                view: IdentityView::new_record(baseline),
                associated_impus: Vec::new(),
                subscriber_unit: None,
                can_delete: false,
            });
        }

        let id = persisted_id(raw_id)?;
        let tx = self.store.begin()?;

        let record = tx
            .load_by_id(id)?
            .ok_or_else(|| RepositoryError::NotFound(format!("impi {}", id)))?;
        let associated_impus = tx.find_associations_by_identity_id(id)?;
        let subscriber_unit = match record.subscriber_unit_id {
            Some(unit_id) => tx.load_subscriber_unit(unit_id)?,
            None => None,
        };
        tx.commit()?;

        debug!(
            impi_id = %id,
            associations = associated_impus.len(),
            auth_scheme_mask = record.auth_scheme_mask,
            "identity loaded"
        );

        Ok(LoadedIdentity {
            view: IdentityView::from_record(&record),
            can_delete: associated_impus.is_empty(),
            associated_impus,
            subscriber_unit,
        })
    }

    /// Rebuild the record from `view` and save it wholesale.
    pub fn submit(&self, view: &IdentityView) -> HssResult<ImpiId> {
        let record = view.to_record()?;

        let mut tx = self.store.begin()?;
        if let Some(unit_id) = record.subscriber_unit_id {
            if tx.load_subscriber_unit(unit_id)?.is_none() {
                return Err(RepositoryError::NotFound(format!("imsu {}", unit_id)).into());
            }
        }
        let id = tx.save(&record)?;
        tx.commit()?;

        info!(
            impi_id = %id,
            created = record.id.is_none(),
            auth_scheme_mask = record.auth_scheme_mask,
            "identity saved"
        );
        Ok(id)
    }

    /// Delete the identity unless public identities still reference it.
    /// The check and the delete share one transaction.
    pub fn delete(&self, raw_id: i64) -> HssResult<DeleteOutcome> {
        let id = persisted_id(raw_id)?;
        let mut tx = self.store.begin()?;

        if tx.load_by_id(id)?.is_none() {
            return Err(RepositoryError::NotFound(format!("impi {}", id)).into());
        }

        let associations = guard::blocking_associations(id, &tx)?;
        if !associations.is_empty() {
            warn!(impi_id = %id, associations = associations.len(), "delete blocked");
            return Ok(DeleteOutcome::Blocked { associations });
        }

        tx.delete(id)?;
        tx.commit()?;

        info!(impi_id = %id, "identity deleted");
        Ok(DeleteOutcome::Deleted)
    }

    /// Schemes a new identity starts with
    pub fn baseline_schemes(&self) -> &[AuthSchemeFlag] {
        &self.provisioning.default_auth_schemes
    }
}

fn persisted_id(raw_id: i64) -> HssResult<ImpiId> {
    ImpiId::from_raw(raw_id).ok_or_else(|| {
        HssError::PreconditionViolation(format!(
            "identity id {} does not refer to a saved record",
            raw_id
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::record::{ImpuId, ImsuId};
    use crate::credentials::repository::MemoryStore;

    fn admin() -> IdentityAdmin<MemoryStore> {
        IdentityAdmin::new(MemoryStore::new(), ProvisioningConfig::default()).unwrap()
    }

    fn submit_new(admin: &IdentityAdmin<MemoryStore>, identity: &str) -> ImpiId {
        let mut view = admin.load(NEW_RECORD_ID).unwrap().view;
        view.identity = identity.to_string();
        view.secret_key = "00112233445566778899aabbccddeeff".to_string();
        admin.submit(&view).unwrap()
    }

    #[test]
    fn test_load_new_uses_baseline() {
        let loaded = admin().load(NEW_RECORD_ID).unwrap();
        assert!(loaded.view.is_new());
        assert!(loaded.view.auth_schemes.is_selected(AuthSchemeFlag::AkaV1));
        assert!(!loaded.can_delete);
        assert!(loaded.associated_impus.is_empty());
    }

    #[test]
    fn test_load_new_honours_config() {
        let provisioning = ProvisioningConfig {
            default_auth_schemes: vec![AuthSchemeFlag::Md5, AuthSchemeFlag::Digest],
        };
        let admin = IdentityAdmin::new(MemoryStore::new(), provisioning).unwrap();
        let view = admin.load(NEW_RECORD_ID).unwrap().view;
        assert_eq!(view.auth_schemes.encode(), 12);
        assert_eq!(admin.baseline_schemes().len(), 2);
    }

    #[test]
    fn test_empty_baseline_is_rejected() {
        let provisioning = ProvisioningConfig {
            default_auth_schemes: Vec::new(),
        };
        let result = IdentityAdmin::new(MemoryStore::new(), provisioning);
        assert!(matches!(result, Err(HssError::Config(_))));
    }

    #[test]
    fn test_all_schemes_baseline_is_rejected() {
        let provisioning = ProvisioningConfig {
            default_auth_schemes: AuthSchemeFlag::ALL.to_vec(),
        };
        let result = IdentityAdmin::new(MemoryStore::new(), provisioning);
        assert!(matches!(result, Err(HssError::Config(_))));
    }

    #[test]
    fn test_new_record_mask_is_never_empty_or_all() {
        let admin = admin();
        let mut view = admin.load(NEW_RECORD_ID).unwrap().view;
        view.identity = "fresh@open-ims.test".to_string();
        let id = admin.submit(&view).unwrap();

        let stored = admin.load(id.to_raw()).unwrap().view.auth_schemes.clone();
        assert!(!stored.is_empty());
        assert!(!stored.is_all);
    }

    #[test]
    fn test_submit_then_load() {
        let admin = admin();
        let id = submit_new(&admin, "alice@open-ims.test");

        let loaded = admin.load(id.to_raw()).unwrap();
        assert_eq!(loaded.view.id, id.to_raw());
        assert_eq!(loaded.view.secret_key, "00112233445566778899aabbccddeeff");
        assert!(loaded.can_delete);
        assert!(loaded.subscriber_unit.is_none());
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let err = admin().load(99).unwrap_err();
        assert!(matches!(err, HssError::Repository(RepositoryError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_id() {
        assert!(matches!(admin().load(-5), Err(HssError::PreconditionViolation(_))));
    }

    #[test]
    fn test_load_reports_associations_and_unit() {
        let admin = admin();
        admin
            .store()
            .insert_subscriber_unit(SubscriberUnit {
                id: ImsuId::new(1),
                name: "alice".to_string(),
            })
            .unwrap();

        let mut view = admin.load(NEW_RECORD_ID).unwrap().view;
        view.identity = "alice@open-ims.test".to_string();
        view.subscriber_unit_id = 1;
        let id = admin.submit(&view).unwrap();
        admin.store().associate(id, ImpuId::new(5), "sip:alice@open-ims.test").unwrap();

        let loaded = admin.load(id.to_raw()).unwrap();
        assert!(!loaded.can_delete);
        assert_eq!(loaded.associated_impus.len(), 1);
        assert_eq!(loaded.subscriber_unit.map(|unit| unit.name), Some("alice".to_string()));
    }

    #[test]
    fn test_submit_unknown_subscriber_unit() {
        let admin = admin();
        let mut view = admin.load(NEW_RECORD_ID).unwrap().view;
        view.identity = "bob@open-ims.test".to_string();
        view.subscriber_unit_id = 8;

        let err = admin.submit(&view).unwrap_err();
        assert!(matches!(err, HssError::Repository(RepositoryError::NotFound(_))));
        assert_eq!(admin.store().record_count().unwrap(), 0);
    }

    #[test]
    fn test_submit_bad_hex_saves_nothing() {
        let admin = admin();
        let mut view = admin.load(NEW_RECORD_ID).unwrap().view;
        view.identity = "carol@open-ims.test".to_string();
        view.sqn = "zz".to_string();

        assert!(matches!(admin.submit(&view), Err(HssError::Format { field: "sqn", .. })));
        assert_eq!(admin.store().record_count().unwrap(), 0);
    }

    #[test]
    fn test_delete_unassociated() {
        let admin = admin();
        let id = submit_new(&admin, "dave@open-ims.test");

        assert_eq!(admin.delete(id.to_raw()).unwrap(), DeleteOutcome::Deleted);
        assert_eq!(admin.store().record_count().unwrap(), 0);
    }

    #[test]
    fn test_delete_blocked_by_association() {
        let admin = admin();
        let id = submit_new(&admin, "erin@open-ims.test");
        admin.store().associate(id, ImpuId::new(1), "sip:erin@open-ims.test").unwrap();

        match admin.delete(id.to_raw()).unwrap() {
            DeleteOutcome::Blocked { associations } => {
                assert_eq!(associations[0].impu_id, ImpuId::new(1));
            }
            other => panic!("expected blocked delete, got {:?}", other),
        }
        assert_eq!(admin.store().record_count().unwrap(), 1);
    }

    #[test]
    fn test_delete_new_record_is_precondition_violation() {
        let err = admin().delete(NEW_RECORD_ID).unwrap_err();
        assert!(matches!(err, HssError::PreconditionViolation(_)));
    }

    #[test]
    fn test_delete_missing_record() {
        let err = admin().delete(3).unwrap_err();
        assert!(matches!(err, HssError::Repository(RepositoryError::NotFound(_))));
    }
}
