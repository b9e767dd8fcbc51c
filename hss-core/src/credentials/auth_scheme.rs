//! Authentication scheme bitmask
//!
//! An IMPI stores the schemes it may authenticate with as a single integer.
//! Each of the seven Cx schemes owns one bit in the low seven bits; a mask
//! with all seven set is the "all schemes" sentinel and is always handled as
//! one unit, never as seven individual selections.
//!
//! Bits above the low seven are ignored when decoding. They are not rejected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Mask value meaning "every scheme enabled"
pub const ALL_SCHEMES_MASK: u32 = 0x7f;

/// Label shown for the sentinel in selection lists
pub const ALL_SCHEMES_LABEL: &str = "All";

/// One Cx authentication scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AuthSchemeFlag {
    #[serde(rename = "AKAv1")]
    AkaV1,
    #[serde(rename = "AKAv2")]
    AkaV2,
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "Digest")]
    Digest,
    #[serde(rename = "HTTPDigestMD5")]
    HttpDigestMd5,
    #[serde(rename = "Early")]
    Early,
    #[serde(rename = "NASSBundle")]
    NassBundle,
}

impl AuthSchemeFlag {
    /// Every flag, in bit order
    pub const ALL: [AuthSchemeFlag; 7] = [
        AuthSchemeFlag::AkaV1,
        AuthSchemeFlag::AkaV2,
        AuthSchemeFlag::Md5,
        AuthSchemeFlag::Digest,
        AuthSchemeFlag::HttpDigestMd5,
        AuthSchemeFlag::Early,
        AuthSchemeFlag::NassBundle,
    ];

    /// Bit value of this flag inside an auth scheme mask
    pub const fn bit(self) -> u32 {
        match self {
            AuthSchemeFlag::AkaV1 => 1,
            AuthSchemeFlag::AkaV2 => 2,
            AuthSchemeFlag::Md5 => 4,
            AuthSchemeFlag::Digest => 8,
            AuthSchemeFlag::HttpDigestMd5 => 16,
            AuthSchemeFlag::Early => 32,
            AuthSchemeFlag::NassBundle => 64,
        }
    }

    /// Name used on the Cx interface (SIP-Authentication-Scheme AVP)
    pub fn wire_name(self) -> &'static str {
        match self {
            AuthSchemeFlag::AkaV1 => "Digest-AKAv1-MD5",
            AuthSchemeFlag::AkaV2 => "Digest-AKAv2-MD5",
            AuthSchemeFlag::Md5 => "Digest-MD5",
            AuthSchemeFlag::Digest => "Digest",
            AuthSchemeFlag::HttpDigestMd5 => "HTTP_DIGEST_MD5",
            AuthSchemeFlag::Early => "Early-IMS-Security",
            AuthSchemeFlag::NassBundle => "NASS-Bundle",
        }
    }

    /// Short name, as used in config files
    pub fn short_name(self) -> &'static str {
        match self {
            AuthSchemeFlag::AkaV1 => "AKAv1",
            AuthSchemeFlag::AkaV2 => "AKAv2",
            AuthSchemeFlag::Md5 => "MD5",
            AuthSchemeFlag::Digest => "Digest",
            AuthSchemeFlag::HttpDigestMd5 => "HTTPDigestMD5",
            AuthSchemeFlag::Early => "Early",
            AuthSchemeFlag::NassBundle => "NASSBundle",
        }
    }
}

impl fmt::Display for AuthSchemeFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown authentication scheme: {0}")]
pub struct UnknownAuthScheme(pub String);

impl FromStr for AuthSchemeFlag {
    type Err = UnknownAuthScheme;

    /// Accepts either the Cx wire name or the short name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AuthSchemeFlag::ALL
            .into_iter()
            .find(|flag| {
                flag.wire_name().eq_ignore_ascii_case(s)
                    || flag.short_name().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| UnknownAuthScheme(s.to_string()))
    }
}

/// A set of explicitly selected schemes
pub type AuthSchemeSet = BTreeSet<AuthSchemeFlag>;

/// OR together the bits of the given flags.
pub fn encode_flags<I>(flags: I) -> u32
where
    I: IntoIterator<Item = AuthSchemeFlag>,
{
    flags.into_iter().fold(0, |mask, flag| mask | flag.bit())
}

/// Decode a stored mask.
///
/// A mask whose low seven bits are all set decodes to `is_all` with no
/// explicit flags. Higher bits are ignored.
pub fn decode_mask(mask: u32) -> DecodedMask {
    if mask & ALL_SCHEMES_MASK == ALL_SCHEMES_MASK {
        return DecodedMask::all();
    }

    let flags = AuthSchemeFlag::ALL
        .into_iter()
        .filter(|flag| mask & flag.bit() != 0)
        .collect();

    DecodedMask {
        flags,
        is_all: false,
    }
}

/// Scheme selection as presented to an editor: either "all", or a set of
/// individually chosen schemes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedMask {
    pub flags: AuthSchemeSet,
    pub is_all: bool,
}

impl DecodedMask {
    /// The "all schemes" selection
    pub fn all() -> Self {
        Self {
            flags: AuthSchemeSet::new(),
            is_all: true,
        }
    }

    /// A selection of explicit flags. Naming every flag yields [`Self::all`].
    pub fn from_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = AuthSchemeFlag>,
    {
        let mut selection = Self {
            flags: flags.into_iter().collect(),
            is_all: false,
        };
        selection.collapse_full_set();
        selection
    }

    /// Encode back into a mask. The "all" indicator wins over explicit flags.
    pub fn encode(&self) -> u32 {
        if self.is_all {
            ALL_SCHEMES_MASK
        } else {
            encode_flags(self.flags.iter().copied())
        }
    }

    /// Whether the checkbox for `flag` is ticked. Under "all" no individual
    /// box is ticked.
    pub fn is_selected(&self, flag: AuthSchemeFlag) -> bool {
        !self.is_all && self.flags.contains(&flag)
    }

    /// Whether `flag` ends up enabled once encoded
    pub fn enables(&self, flag: AuthSchemeFlag) -> bool {
        self.is_all || self.flags.contains(&flag)
    }

    /// Tick or clear one checkbox. Ticking the last missing flag switches
    /// to "all".
    pub fn set_selected(&mut self, flag: AuthSchemeFlag, selected: bool) {
        if selected {
            self.flags.insert(flag);
        } else {
            self.flags.remove(&flag);
        }
        self.collapse_full_set();
    }

    /// Tick or clear the "all schemes" shortcut. Ticking it drops any
    /// explicit selection.
    pub fn set_all(&mut self, all: bool) {
        self.is_all = all;
        if all {
            self.flags.clear();
        }
    }

    fn collapse_full_set(&mut self) {
        if !self.is_all && encode_flags(self.flags.iter().copied()) == ALL_SCHEMES_MASK {
            *self = Self::all();
        }
    }

    /// No scheme at all would be enabled
    pub fn is_empty(&self) -> bool {
        !self.is_all && self.flags.is_empty()
    }
}

/// One entry of the scheme selection list offered to editors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemeOption {
    pub code: u32,
    pub label: &'static str,
}

/// Selection list: every individual scheme followed by the "all" entry.
pub fn select_options() -> Vec<SchemeOption> {
    AuthSchemeFlag::ALL
        .into_iter()
        .map(|flag| SchemeOption {
            code: flag.bit(),
            label: flag.wire_name(),
        })
        .chain(std::iter::once(SchemeOption {
            code: ALL_SCHEMES_MASK,
            label: ALL_SCHEMES_LABEL,
        }))
        .collect()
}
