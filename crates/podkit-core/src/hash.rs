//! # Content Hash Newtypes
//!
//! `Hash` is the 32-byte content hash used to identify PODs, anchor
//! dictionary keys, and label Merkle leaves. On the wire it is exactly 64
//! hex characters (`^[0-9a-fA-F]{64}$`); in memory it is `[u8; 32]`.
//!
//! `PodId` wraps a `Hash` so a POD identifier can never be confused with an
//! arbitrary content hash, and `Key` wraps the original string form of a
//! dictionary key alongside nothing else — its hash is derived on demand.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HexError;

/// A 32-byte content hash with a 64-hex-char wire encoding.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash(pub [u8; 32]);

/// Root of the empty Merkle tree and the all-zero hash constant.
pub const EMPTY_HASH: Hash = Hash([0u8; 32]);

impl Hash {
    /// Decode from a 64-char hex string (either case accepted).
    pub fn from_hex(s: &str) -> Result<Self, HexError> {
        if s.len() != 64 {
            return Err(HexError::BadLength(s.len()));
        }
        let mut out = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let hi = hex_nibble(chunk[0]).ok_or(HexError::BadCharacter(2 * i))?;
            let lo = hex_nibble(chunk[1]).ok_or(HexError::BadCharacter(2 * i + 1))?;
            out[i] = (hi << 4) | lo;
        }
        Ok(Self(out))
    }

    /// Render as lowercase hex.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Build a hash key from a little-endian u64, zero-padded to 32 bytes.
    ///
    /// Used to place array elements in a Merkle tree by position: index `i`
    /// becomes a leaf key whose path is the low bits of `i`.
    pub fn from_index(i: u64) -> Self {
        let mut out = [0u8; 32];
        out[..8].copy_from_slice(&i.to_le_bytes());
        Self(out)
    }

    /// The bit of the key consumed at tree level `lvl` (level 0 = root).
    pub fn path_bit(&self, lvl: usize) -> bool {
        self.0[lvl / 8] & (1 << (lvl % 8)) != 0
    }
}

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Hash {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(de::Error::custom)
    }
}

/// Identifier of a POD: the content hash of its entries.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PodId(pub Hash);

impl PodId {
    /// Access the inner hash.
    pub fn as_hash(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Debug for PodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PodId({})", self.0.to_hex())
    }
}

impl fmt::Display for PodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A dictionary key in its original string form.
///
/// The Merkle leaf key is derived by hashing the string, so two keys with
/// the same text are the same key regardless of where they were built.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    /// Wrap a key string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The key text.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self(s)
    }
}
