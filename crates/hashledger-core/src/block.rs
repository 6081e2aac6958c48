//! Block: one immutable record in a chain.
//!
//! A block's fields are fixed at construction and only readable afterwards.
//! Its digest commits to every field through the canonical encoding.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::canonical::compute_digest;
use crate::clock::{Clock, SystemClock};
use crate::crypto::DigestAlgorithm;
use crate::error::CoreError;
use crate::types::Digest;

/// Encode a structured payload value to CBOR bytes.
///
/// Fails with [`CoreError::Encoding`] when the value cannot be serialized
/// (for example a map with non-string keys rejected by its `Serialize` impl).
pub fn encode_payload<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, CoreError> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| CoreError::Encoding(e.to_string()))?;
    Ok(buf.into())
}

/// A single ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub(crate) index: u64,
    pub(crate) timestamp: i64,
    pub(crate) payload: Bytes,
    pub(crate) previous_digest: Digest,
    pub(crate) algorithm: DigestAlgorithm,
    pub(crate) digest: Digest,
}

impl Block {
    /// Build a block stamped with the current wall-clock time, hashed with BLAKE3.
    pub fn new(index: u64, payload: impl Into<Bytes>, previous_digest: Digest) -> Self {
        BlockBuilder::new(index)
            .payload(payload)
            .previous(previous_digest)
            .build(&SystemClock)
    }

    /// Build a block from a structured payload, encoded as CBOR.
    pub fn from_value<T: Serialize + ?Sized>(
        index: u64,
        value: &T,
        previous_digest: Digest,
    ) -> Result<Self, CoreError> {
        Ok(Self::new(index, encode_payload(value)?, previous_digest))
    }

    /// Assemble a block from explicit fields and compute its digest.
    pub(crate) fn from_parts(
        index: u64,
        timestamp: i64,
        payload: Bytes,
        previous_digest: Digest,
        algorithm: DigestAlgorithm,
    ) -> Self {
        let digest = compute_digest(algorithm, index, timestamp, &payload, &previous_digest);
        Self {
            index,
            timestamp,
            payload,
            previous_digest,
            algorithm,
            digest,
        }
    }

    /// Position of this block in its chain.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Creation time in Unix milliseconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Decode the payload as a CBOR-encoded value.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, CoreError> {
        ciborium::from_reader(self.payload.as_ref()).map_err(|e| CoreError::Decoding(e.to_string()))
    }

    /// Digest of the preceding block, or [`Digest::ZERO`] for genesis.
    pub fn previous_digest(&self) -> &Digest {
        &self.previous_digest
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// The digest stored at construction time.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Recompute the digest from the block's current field values.
    pub fn recompute_digest(&self) -> Digest {
        compute_digest(
            self.algorithm,
            self.index,
            self.timestamp,
            &self.payload,
            &self.previous_digest,
        )
    }

    /// Whether the stored digest matches the fields.
    pub fn is_self_consistent(&self) -> bool {
        self.recompute_digest() == self.digest
    }

    /// Whether this block sits at position 0 with the sentinel link.
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_digest.is_zero()
    }
}

/// Builder for creating blocks with explicit time and algorithm.
pub struct BlockBuilder {
    index: u64,
    timestamp: Option<i64>,
    payload: Bytes,
    previous_digest: Digest,
    algorithm: DigestAlgorithm,
}

impl BlockBuilder {
    /// Start building a block at `index`.
    pub fn new(index: u64) -> Self {
        Self {
            index,
            timestamp: None,
            payload: Bytes::new(),
            previous_digest: Digest::ZERO,
            algorithm: DigestAlgorithm::default(),
        }
    }

    /// Pin the timestamp instead of reading the clock.
    pub fn timestamp(mut self, ts: i64) -> Self {
        self.timestamp = Some(ts);
        self
    }

    pub fn payload(mut self, p: impl Into<Bytes>) -> Self {
        self.payload = p.into();
        self
    }

    /// Set the previous block's digest.
    pub fn previous(mut self, prev: Digest) -> Self {
        self.previous_digest = prev;
        self
    }

    pub fn algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the block, reading `clock` once unless a timestamp was pinned.
    pub fn build(self, clock: &dyn Clock) -> Block {
        let timestamp = self.timestamp.unwrap_or_else(|| clock.now_millis());
        Block::from_parts(
            self.index,
            timestamp,
            self.payload,
            self.previous_digest,
            self.algorithm,
        )
    }
}
