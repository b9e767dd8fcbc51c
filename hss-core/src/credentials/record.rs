//! IMPI records and the identifiers around them

use super::auth_scheme::{decode_mask, encode_flags, AuthSchemeFlag, DecodedMask};
use super::secret::SecretBytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw id the admin boundary uses for "not yet persisted"
pub const NEW_RECORD_ID: i64 = -1;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub fn new(id: u32) -> Self {
                $name(id)
            }

            pub fn get(&self) -> u32 {
                self.0
            }

            /// Map a raw boundary id. `None` for ids that are negative or
            /// out of range.
            pub fn from_raw(raw: i64) -> Option<Self> {
                u32::try_from(raw).ok().map($name)
            }

            pub fn to_raw(self) -> i64 {
                i64::from(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id! {
    /// Private identity (IMPI) id
    ImpiId
}

numeric_id! {
    /// Public identity (IMPU) id
    ImpuId
}

numeric_id! {
    /// Subscriber unit (IMSU) id
    ImsuId
}

/// Authentication material of one private identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    /// `None` until the record is first saved
    pub id: Option<ImpiId>,
    pub identity: String,
    /// Owning subscriber unit. A back-reference only.
    pub subscriber_unit_id: Option<ImsuId>,
    /// Long-term key K
    pub secret_key: SecretBytes,
    pub amf: SecretBytes,
    pub op: SecretBytes,
    pub sqn: SecretBytes,
    pub ip_address: Option<String>,
    pub auth_scheme_mask: u32,
}

impl IdentityRecord {
    /// New, unsaved record enabling only AKAv1
    pub fn new(identity: impl Into<String>) -> Self {
        Self::with_schemes(identity, [AuthSchemeFlag::AkaV1])
    }

    /// New, unsaved record enabling the given baseline schemes
    pub fn with_schemes<I>(identity: impl Into<String>, schemes: I) -> Self
    where
        I: IntoIterator<Item = AuthSchemeFlag>,
    {
        IdentityRecord {
            id: None,
            identity: identity.into(),
            subscriber_unit_id: None,
            secret_key: SecretBytes::default(),
            amf: SecretBytes::default(),
            op: SecretBytes::default(),
            sqn: SecretBytes::default(),
            ip_address: None,
            auth_scheme_mask: encode_flags(schemes),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Raw id as seen by the admin boundary
    pub fn raw_id(&self) -> i64 {
        self.id.map_or(NEW_RECORD_ID, ImpiId::to_raw)
    }

    pub fn auth_schemes(&self) -> DecodedMask {
        decode_mask(self.auth_scheme_mask)
    }
}

/// One IMPI-IMPU link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationRef {
    pub impi_id: ImpiId,
    pub impu_id: ImpuId,
    /// Public identity URI, e.g. `sip:alice@open-ims.test`
    pub impu_identity: String,
}

/// Subscriber unit summary shown next to an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberUnit {
    pub id: ImsuId,
    pub name: String,
}
