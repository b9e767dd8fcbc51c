//! IMPI credential handling
//!
//! - [`hex_codec`]: hex text to bytes and back for the secret fields
//! - [`auth_scheme`]: the 7-bit scheme mask and its "all" shortcut
//! - [`view`]: record to editable view and back
//! - [`guard`]: refuses deactivation while IMPUs are attached
//! - [`admin`]: load, submit and delete inside one transaction

pub mod admin;
pub mod auth_scheme;
pub mod guard;
pub mod hex_codec;
pub mod record;
pub mod repository;
pub mod secret;
pub mod view;

pub use admin::{DeleteOutcome, IdentityAdmin, LoadedIdentity};
pub use auth_scheme::{
    decode_mask, encode_flags, select_options, AuthSchemeFlag, AuthSchemeSet, DecodedMask,
    SchemeOption, UnknownAuthScheme, ALL_SCHEMES_MASK,
};
pub use guard::{blocking_associations, can_deactivate, can_deactivate_record};
pub use hex_codec::HexFormatError;
pub use record::{
    AssociationRef, IdentityRecord, ImpiId, ImpuId, ImsuId, SubscriberUnit, NEW_RECORD_ID,
};
pub use repository::{
    AssociationRepository, MemoryStore, MemoryTransaction, RecordRepository, RepositoryError,
    SubscriberUnitRepository, Transaction, TransactionScope,
};
pub use secret::SecretBytes;
pub use view::IdentityView;

#[cfg(test)]
mod tests;
