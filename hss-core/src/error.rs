//! Error types shared by the credential use-cases

use crate::config::ConfigError;
use crate::credentials::hex_codec::HexFormatError;
use crate::credentials::repository::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HssError {
    /// A hex secret field could not be decoded
    #[error("Invalid hex in field `{field}`: {source}")]
    Format {
        field: &'static str,
        #[source]
        source: HexFormatError,
    },

    /// The caller broke a contract, e.g. asked to delete a record that was
    /// never saved
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// Passed through unchanged from the repository
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Rejected provisioning settings
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl HssError {
    pub(crate) fn format(field: &'static str, source: HexFormatError) -> Self {
        HssError::Format { field, source }
    }
}

pub type HssResult<T> = Result<T, HssError>;
