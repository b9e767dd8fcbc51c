//! Test helpers and fixtures

use crate::config::ProvisioningConfig;
use crate::credentials::*;

/// 128-bit Milenage key used by the Open IMS sample subscribers
pub const SAMPLE_K: &str = "00112233445566778899aabbccddeeff";
pub const SAMPLE_OP: &str = "cdc202d5123e20f62b6d676ac72cb318";

/// A fully populated record that has not been saved
pub fn sample_record(identity: &str) -> IdentityRecord {
    let mut record = IdentityRecord::with_schemes(
        identity,
        [AuthSchemeFlag::AkaV1, AuthSchemeFlag::AkaV2],
    );
    record.secret_key = SecretBytes::new(hex_codec::decode(SAMPLE_K).unwrap());
    record.op = SecretBytes::new(hex_codec::decode(SAMPLE_OP).unwrap());
    record.amf = SecretBytes::new(vec![0x00, 0x00]);
    record.sqn = SecretBytes::new(vec![0; 6]);
    record
}

/// Admin over an empty store with default provisioning
pub fn test_admin() -> IdentityAdmin<MemoryStore> {
    IdentityAdmin::new(MemoryStore::new(), ProvisioningConfig::default()).unwrap()
}

/// Save `record` in its own transaction
pub fn store_record(store: &MemoryStore, record: &IdentityRecord) -> ImpiId {
    let mut tx = store.begin().unwrap();
    let id = tx.save(record).unwrap();
    tx.commit().unwrap();
    id
}

/// Saved identity linked to `impu_count` public identities
pub fn linked_identity(store: &MemoryStore, identity: &str, impu_count: u32) -> ImpiId {
    let id = store_record(store, &sample_record(identity));
    for n in 0..impu_count {
        store
            .associate(id, ImpuId::new(n + 1), format!("sip:{}-{}", n, identity))
            .unwrap();
    }
    id
}

/// Blank form filled in with the sample key material
pub fn filled_view(admin: &IdentityAdmin<MemoryStore>, identity: &str) -> IdentityView {
    let mut view = admin.load(NEW_RECORD_ID).unwrap().view;
    view.identity = identity.to_string();
    view.secret_key = SAMPLE_K.to_string();
    view.op = SAMPLE_OP.to_string();
    view.amf = "8000".to_string();
    view.sqn = "000000000000".to_string();
    view
}
