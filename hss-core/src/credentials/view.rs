//! Editable view of an IMPI record
//!
//! This is the shape a form layer binds to: hex strings for the binary
//! fields, raw numeric ids with `-1` for "none", and the scheme selection as
//! a [`DecodedMask`] so the "all schemes" shortcut stays a single switch.
//!
//! Submission always rebuilds the whole record from the whole view.

use super::auth_scheme::{decode_mask, AuthSchemeFlag, DecodedMask};
use super::hex_codec;
use super::record::{IdentityRecord, ImpiId, ImsuId, NEW_RECORD_ID};
use super::secret::SecretBytes;
use crate::error::{HssError, HssResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityView {
    /// Record id, or `-1` for a record that was never saved
    pub id: i64,
    pub identity: String,
    /// Subscriber unit id, or `-1` when unassigned
    pub subscriber_unit_id: i64,
    /// K as hex
    pub secret_key: String,
    pub amf: String,
    pub op: String,
    pub sqn: String,
    /// Carried through verbatim, blank strings included
    #[serde(default)]
    pub ip_address: Option<String>,
    pub auth_schemes: DecodedMask,
}

impl IdentityView {
    /// Blank view for a record that does not exist yet
    pub fn new_record<I>(baseline_schemes: I) -> Self
    where
        I: IntoIterator<Item = AuthSchemeFlag>,
    {
        IdentityView {
            id: NEW_RECORD_ID,
            identity: String::new(),
            subscriber_unit_id: NEW_RECORD_ID,
            secret_key: String::new(),
            amf: String::new(),
            op: String::new(),
            sqn: String::new(),
            ip_address: None,
            auth_schemes: DecodedMask::from_flags(baseline_schemes),
        }
    }

    pub fn from_record(record: &IdentityRecord) -> Self {
        IdentityView {
            id: record.raw_id(),
            identity: record.identity.clone(),
            subscriber_unit_id: record.subscriber_unit_id.map_or(NEW_RECORD_ID, ImsuId::to_raw),
            secret_key: hex_codec::encode(&record.secret_key),
            amf: hex_codec::encode(&record.amf),
            op: hex_codec::encode(&record.op),
            sqn: hex_codec::encode(&record.sqn),
            ip_address: record.ip_address.clone(),
            auth_schemes: decode_mask(record.auth_scheme_mask),
        }
    }

    /// Rebuild the full record.
    ///
    /// Fails with [`HssError::Format`] on malformed hex and with
    /// [`HssError::PreconditionViolation`] on a negative id other than `-1`.
    pub fn to_record(&self) -> HssResult<IdentityRecord> {
        Ok(IdentityRecord {
            id: raw_to_id(self.id, "id", ImpiId::from_raw)?,
            identity: self.identity.clone(),
            subscriber_unit_id: raw_to_id(
                self.subscriber_unit_id,
                "subscriber_unit_id",
                ImsuId::from_raw,
            )?,
            secret_key: decode_secret("secret_key", &self.secret_key)?,
            amf: decode_secret("amf", &self.amf)?,
            op: decode_secret("op", &self.op)?,
            sqn: decode_secret("sqn", &self.sqn)?,
            ip_address: self.ip_address.clone(),
            auth_scheme_mask: self.auth_schemes.encode(),
        })
    }

    pub fn is_new(&self) -> bool {
        self.id == NEW_RECORD_ID
    }
}

fn raw_to_id<T>(raw: i64, field: &str, convert: fn(i64) -> Option<T>) -> HssResult<Option<T>> {
    if raw == NEW_RECORD_ID {
        return Ok(None);
    }
    convert(raw)
        .map(Some)
        .ok_or_else(|| HssError::PreconditionViolation(format!("invalid {}: {}", field, raw)))
}

fn decode_secret(field: &'static str, text: &str) -> HssResult<SecretBytes> {
    hex_codec::decode(text)
        .map(SecretBytes::new)
        .map_err(|e| HssError::format(field, e))
}

impl Drop for IdentityView {
    fn drop(&mut self) {
        self.secret_key.zeroize();
        self.amf.zeroize();
        self.op.zeroize();
        self.sqn.zeroize();
    }
}

impl fmt::Debug for IdentityView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityView")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("subscriber_unit_id", &self.subscriber_unit_id)
            .field("secret_key", &"<redacted>")
            .field("amf", &"<redacted>")
            .field("op", &"<redacted>")
            .field("sqn", &"<redacted>")
            .field("ip_address", &self.ip_address)
            .field("auth_schemes", &self.auth_schemes)
            .finish()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn secret() -> impl Strategy<Value = SecretBytes> {
        prop::collection::vec(any::<u8>(), 0..40).prop_map(SecretBytes::new)
    }

    prop_compose! {
        fn arb_record()(
            id in prop::option::of(any::<u32>()),
            identity in "\\PC{0,40}",
            subscriber_unit_id in prop::option::of(any::<u32>()),
            secret_key in secret(),
            amf in secret(),
            op in secret(),
            sqn in secret(),
            ip_address in prop::option::of("\\PC{0,20}"),
            auth_scheme_mask in 0u32..=127,
        ) -> IdentityRecord {
            IdentityRecord {
                id: id.map(ImpiId::new),
                identity,
                subscriber_unit_id: subscriber_unit_id.map(ImsuId::new),
                secret_key,
                amf,
                op,
                sqn,
                ip_address,
                auth_scheme_mask,
            }
        }
    }

    proptest! {
        #[test]
        fn prop_view_roundtrip(record in arb_record()) {
            let back = IdentityView::from_record(&record).to_record().unwrap();
            prop_assert_eq!(back, record);
        }

        #[test]
        fn prop_view_json_roundtrip(record in arb_record()) {
            let view = IdentityView::from_record(&record);
            let json = serde_json::to_string(&view).unwrap();
            let parsed: IdentityView = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(parsed, view);
        }
    }
}
