//! Canonical CBOR encoding for block digests.
//!
//! Blocks are encoded as a CBOR map following RFC 8949 Core Deterministic
//! Encoding:
//! - Integer keys 0-5, emitted in ascending order
//! - Integers use smallest valid encoding
//! - Byte strings are length-prefixed, definite lengths only
//! - No floats (timestamps are i64 milliseconds)
//!
//! The digest input is `BLOCK_DOMAIN || canonical_block_bytes(..)`.
//!
//! **This encoding is versioned.** Any change to field order or representation
//! requires bumping [`ENCODING_VERSION`]; old digests stop matching otherwise.

use bytes::Bytes;
use ciborium::value::Value;

use crate::block::Block;
use crate::crypto::{DigestAlgorithm, DigestProvider};
use crate::error::CoreError;
use crate::types::Digest;

/// Current canonical encoding version.
pub const ENCODING_VERSION: u8 = 1;

/// Domain separation prefix for block digests.
pub const BLOCK_DOMAIN: &[u8] = b"hashledger/block/v1";

/// Field keys. Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const VERSION: u64 = 0;
    pub const ALGORITHM: u64 = 1;
    pub const INDEX: u64 = 2;
    pub const TIMESTAMP: u64 = 3;
    pub const PAYLOAD: u64 = 4;
    pub const PREVIOUS_DIGEST: u64 = 5;

    pub const COUNT: u64 = 6;
}

/// Encode block fields to canonical CBOR bytes.
pub fn canonical_block_bytes(
    algorithm: DigestAlgorithm,
    index: u64,
    timestamp: i64,
    payload: &[u8],
    previous_digest: &Digest,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64 + payload.len());

    encode_uint(&mut buf, 5, keys::COUNT);

    encode_uint(&mut buf, 0, keys::VERSION);
    encode_uint(&mut buf, 0, ENCODING_VERSION.into());

    encode_uint(&mut buf, 0, keys::ALGORITHM);
    encode_uint(&mut buf, 0, algorithm.to_u8().into());

    encode_uint(&mut buf, 0, keys::INDEX);
    encode_uint(&mut buf, 0, index);

    encode_uint(&mut buf, 0, keys::TIMESTAMP);
    encode_int(&mut buf, timestamp);

    encode_uint(&mut buf, 0, keys::PAYLOAD);
    encode_bytes(&mut buf, payload);

    encode_uint(&mut buf, 0, keys::PREVIOUS_DIGEST);
    encode_bytes(&mut buf, previous_digest.as_bytes());

    buf
}

/// Encode an existing block.
pub fn encode_block(block: &Block) -> Vec<u8> {
    canonical_block_bytes(
        block.algorithm(),
        block.index(),
        block.timestamp(),
        block.payload(),
        block.previous_digest(),
    )
}

/// Compute a block digest from its fields.
pub fn compute_digest(
    algorithm: DigestAlgorithm,
    index: u64,
    timestamp: i64,
    payload: &[u8],
    previous_digest: &Digest,
) -> Digest {
    let body = canonical_block_bytes(algorithm, index, timestamp, payload, previous_digest);
    let mut input = Vec::with_capacity(BLOCK_DOMAIN.len() + body.len());
    input.extend_from_slice(BLOCK_DOMAIN);
    input.extend_from_slice(&body);
    algorithm.digest(&input)
}

/// Encode a signed integer (major types 0 and 1).
fn encode_int(buf: &mut Vec<u8>, n: i64) {
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Decode a block from canonical bytes, recomputing its digest.
///
/// Input that parses but is not in canonical form is rejected, so every
/// accepted byte string has exactly one logical block behind it.
pub fn decode_block(bytes: &[u8]) -> Result<Block, CoreError> {
    let value: Value =
        ciborium::from_reader(bytes).map_err(|e| CoreError::Decoding(e.to_string()))?;

    let map = match value {
        Value::Map(m) => m,
        _ => return Err(CoreError::MalformedBlock("expected map".into())),
    };

    let get = |key: u64| -> Option<&Value> {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == key as i128))
            .map(|(_, v)| v)
    };

    let uint = |key: u64, name: &str| -> Result<u64, CoreError> {
        match get(key) {
            Some(Value::Integer(i)) => u64::try_from(i128::from(*i))
                .map_err(|_| CoreError::MalformedBlock(format!("{name} out of range"))),
            _ => Err(CoreError::MalformedBlock(format!("missing {name}"))),
        }
    };

    let version = uint(keys::VERSION, "version")?;
    if version != u64::from(ENCODING_VERSION) {
        return Err(CoreError::UnsupportedVersion(version.min(u8::MAX as u64) as u8));
    }

    let algorithm = u8::try_from(uint(keys::ALGORITHM, "algorithm")?)
        .ok()
        .and_then(DigestAlgorithm::from_u8)
        .ok_or_else(|| CoreError::MalformedBlock("unknown algorithm".into()))?;

    let index = uint(keys::INDEX, "index")?;

    let timestamp = match get(keys::TIMESTAMP) {
        Some(Value::Integer(i)) => i64::try_from(i128::from(*i))
            .map_err(|_| CoreError::MalformedBlock("timestamp out of range".into()))?,
        _ => return Err(CoreError::MalformedBlock("missing timestamp".into())),
    };

    let payload = match get(keys::PAYLOAD) {
        Some(Value::Bytes(b)) => Bytes::from(b.clone()),
        _ => return Err(CoreError::MalformedBlock("invalid payload".into())),
    };

    let previous_digest = match get(keys::PREVIOUS_DIGEST) {
        Some(Value::Bytes(b)) => Digest::try_from(b.as_slice())
            .map_err(|_| CoreError::MalformedBlock("invalid previous_digest".into()))?,
        _ => return Err(CoreError::MalformedBlock("missing previous_digest".into())),
    };

    let reencoded = canonical_block_bytes(algorithm, index, timestamp, &payload, &previous_digest);
    if reencoded != bytes {
        return Err(CoreError::MalformedBlock("non-canonical encoding".into()));
    }

    Ok(Block::from_parts(
        index,
        timestamp,
        payload,
        previous_digest,
        algorithm,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_encoding() {
        let mut buf = Vec::new();

        encode_uint(&mut buf, 0, 0);
        assert_eq!(buf, vec![0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 24]);

        buf.clear();
        encode_uint(&mut buf, 0, 256);
        assert_eq!(buf, vec![0x19, 0x01, 0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 1736870400000);
        assert_eq!(buf, vec![0x1b, 0x00, 0x00, 0x01, 0x94, 0x65, 0x8b, 0x10, 0x00]);
    }

    #[test]
    fn test_negative_timestamp_encoding() {
        let mut buf = Vec::new();
        encode_int(&mut buf, -1);
        assert_eq!(buf, vec![0x20]);

        buf.clear();
        encode_int(&mut buf, -500);
        assert_eq!(buf, vec![0x39, 0x01, 0xf3]);
    }

    #[test]
    fn test_layout_of_small_block() {
        let bytes = canonical_block_bytes(DigestAlgorithm::Sha256, 1, 2, b"A", &Digest::ZERO);

        let mut expected = vec![
            0xa6, // map(6)
            0x00, 0x01, // version 1
            0x01, 0x02, // algorithm sha256
            0x02, 0x01, // index 1
            0x03, 0x02, // timestamp 2
            0x04, 0x41, b'A', // payload
            0x05, 0x58, 0x20, // previous_digest, bytes(32)
        ];
        expected.extend_from_slice(&[0u8; 32]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_field_boundaries_are_unambiguous() {
        // "1" + "23" and "12" + "3" concatenate identically as plain strings.
        let a = canonical_block_bytes(DigestAlgorithm::Blake3, 1, 23, b"x", &Digest::ZERO);
        let b = canonical_block_bytes(DigestAlgorithm::Blake3, 12, 3, b"x", &Digest::ZERO);
        assert_ne!(a, b);

        let c = canonical_block_bytes(DigestAlgorithm::Blake3, 0, 0, b"ab", &Digest::ZERO);
        let d = canonical_block_bytes(DigestAlgorithm::Blake3, 0, 0, b"a", &Digest::ZERO);
        assert_ne!(c, d);
    }

    #[test]
    fn test_algorithm_is_part_of_encoding() {
        let a = compute_digest(DigestAlgorithm::Blake3, 0, 0, b"", &Digest::ZERO);
        let b = compute_digest(DigestAlgorithm::Sha256, 0, 0, b"", &Digest::ZERO);
        assert_ne!(a, b);
    }

    #[test]
    fn test_decode_roundtrip() {
        let prev = Digest::from_bytes([0x11; 32]);
        let bytes = canonical_block_bytes(DigestAlgorithm::Sha256, 7, -3, b"payload", &prev);
        let block = decode_block(&bytes).unwrap();

        assert_eq!(block.index(), 7);
        assert_eq!(block.timestamp(), -3);
        assert_eq!(block.payload().as_ref(), b"payload");
        assert_eq!(block.previous_digest(), &prev);
        assert_eq!(block.algorithm(), DigestAlgorithm::Sha256);
        assert_eq!(encode_block(&block), bytes);
        assert!(block.is_self_consistent());
    }

    #[test]
    fn test_decode_rejects_non_canonical() {
        let mut bytes = canonical_block_bytes(DigestAlgorithm::Blake3, 1, 2, b"A", &Digest::ZERO);
        // Re-encode index 1 in the two-byte form: valid CBOR, not canonical.
        let pos = bytes.iter().position(|b| *b == 0x02).unwrap();
        bytes.splice(pos + 1..pos + 2, [0x18, 0x01]);

        assert!(matches!(
            decode_block(&bytes),
            Err(CoreError::MalformedBlock(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let mut bytes = canonical_block_bytes(DigestAlgorithm::Blake3, 1, 2, b"A", &Digest::ZERO);
        bytes[2] = 0x09;
        assert!(matches!(
            decode_block(&bytes),
            Err(CoreError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_block(&[0xff, 0x00]).is_err());
        assert!(matches!(
            decode_block(&[0x01]),
            Err(CoreError::MalformedBlock(_))
        ));
    }
}
