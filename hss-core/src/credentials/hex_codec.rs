//! Hex codec for binary credential fields
//!
//! K, AMF, OP and SQN travel through the admin boundary as hex text. Encoding
//! is always lowercase; decoding accepts either case but never pads,
//! truncates or skips characters.

use thiserror::Error;

/// Malformed hex input.
///
/// Only positions and lengths are reported. The input itself may be a
/// secret and is never copied into the error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexFormatError {
    #[error("odd number of hex digits ({len})")]
    OddLength { len: usize },

    #[error("invalid hex character at position {index}")]
    InvalidCharacter { index: usize },
}

/// Encode bytes as lowercase hex. Output length is `2 * bytes.len()`.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Decode hex text (either case) back into bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, HexFormatError> {
    hex::decode(text).map_err(|e| match e {
        hex::FromHexError::OddLength => HexFormatError::OddLength { len: text.len() },
        hex::FromHexError::InvalidHexCharacter { index, .. } => {
            HexFormatError::InvalidCharacter { index }
        }
        // Only produced by the fixed-size decode_to_slice API
        hex::FromHexError::InvalidStringLength => HexFormatError::OddLength { len: text.len() },
    })
}
