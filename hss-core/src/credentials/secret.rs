//! Secret byte fields
//!
//! Security: contents are zeroized on drop and never printed by `Debug`.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Binary credential material (K, OP, AMF, SQN)
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        SecretBytes(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for SecretBytes {
    fn from(bytes: Vec<u8>) -> Self {
        SecretBytes(bytes)
    }
}

impl From<&[u8]> for SecretBytes {
    fn from(bytes: &[u8]) -> Self {
        SecretBytes(bytes.to_vec())
    }
}

impl AsRef<[u8]> for SecretBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes(<redacted {} bytes>)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretBytes::from(&[0xdeu8, 0xad, 0xbe, 0xef][..]);
        let printed = format!("{:?}", secret);
        assert_eq!(printed, "SecretBytes(<redacted 4 bytes>)");
        assert!(!printed.contains("222"));
    }

    #[test]
    fn test_zeroize_clears_contents() {
        let mut secret = SecretBytes::new(vec![1, 2, 3]);
        secret.zeroize();
        assert!(secret.is_empty());
    }

    #[test]
    fn test_equality_is_by_content() {
        assert_eq!(SecretBytes::new(vec![1, 2]), SecretBytes::from(&[1u8, 2][..]));
        assert_ne!(SecretBytes::new(vec![1, 2]), SecretBytes::new(vec![2, 1]));
    }
}
