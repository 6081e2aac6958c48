//! Strong type definitions for hashledger.
//!
//! Digests are newtypes so a block digest can never be confused with a MAC tag
//! or raw bytes at compile time.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A 32-byte block digest.
///
/// Produced by a [`DigestAlgorithm`](crate::crypto::DigestAlgorithm) over the
/// domain-separated canonical encoding of a block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// Create a new Digest from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Whether this is the all-zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The zero digest, used as the genesis predecessor link.
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = slice.try_into()?;
        Ok(Self(arr))
    }
}

// Hex in human-readable formats (JSON), raw bytes otherwise.
impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Digest::from_hex(&s).map_err(D::Error::custom)
        } else {
            let bytes = serde_bytes_compat::deserialize(deserializer)?;
            Digest::try_from(bytes.as_slice())
                .map_err(|_| D::Error::invalid_length(bytes.len(), &"32 bytes"))
        }
    }
}

mod serde_bytes_compat {
    use serde::de::{self, Visitor};
    use serde::Deserializer;
    use std::fmt;

    struct BytesVisitor;

    impl<'de> Visitor<'de> for BytesVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a byte string")
        }

        fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
            Ok(v.to_vec())
        }

        fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut out = Vec::with_capacity(32);
            while let Some(b) = seq.next_element::<u8>()? {
                out.push(b);
            }
            Ok(out)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        deserializer.deserialize_bytes(BytesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_hex_roundtrip() {
        let d = Digest::from_bytes([0x42; 32]);
        let hex = d.to_hex();
        let recovered = Digest::from_hex(&hex).unwrap();
        assert_eq!(d, recovered);
    }

    #[test]
    fn test_digest_display() {
        let d = Digest::from_bytes([0xab; 32]);
        assert_eq!(format!("{}", d), "abababababababab");
    }

    #[test]
    fn test_digest_debug() {
        let d = Digest::from_bytes([0xcd; 32]);
        assert!(format!("{:?}", d).starts_with("Digest("));
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(Digest::ZERO.is_zero());
        assert!(!Digest::from_bytes([1; 32]).is_zero());
    }

    #[test]
    fn test_from_hex_rejects_short_input() {
        assert!(Digest::from_hex("abcd").is_err());
    }

    #[test]
    fn test_json_is_hex_string() {
        let d = Digest::from_bytes([0x01; 32]);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
