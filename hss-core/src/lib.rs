//! Credential administration core for a Home Subscriber Server
//!
//! Private user identities (IMPIs) carry hex-encoded key material and a
//! bitmask of permitted authentication schemes. This crate converts between
//! the stored record and an editable view, guards deletion against live
//! public-identity associations, and runs the admin use-cases inside a
//! caller-supplied transaction.

pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;

pub use config::{ConfigError, HssConfig};
pub use credentials::{
    AuthSchemeFlag, DecodedMask, DeleteOutcome, IdentityAdmin, IdentityRecord, IdentityView,
    LoadedIdentity,
};
pub use error::{HssError, HssResult};
pub use logging::{init_logging, LogLevel};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = LogLevel::Info;
        assert_eq!(AuthSchemeFlag::AkaV1.bit(), 1);
        assert!(IdentityView::new_record([AuthSchemeFlag::AkaV1]).is_new());
    }
}
