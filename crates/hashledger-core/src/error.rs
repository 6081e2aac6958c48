//! Error types for hashledger core.

use thiserror::Error;

use crate::types::Digest;

/// Core errors that can occur while building or decoding blocks.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A payload value could not be canonically serialized.
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("malformed block: {0}")]
    MalformedBlock(String),

    /// The chain has no blocks. Construction guarantees this cannot happen.
    #[error("chain is empty")]
    EmptyChain,

    #[error("unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("unsupported encoding version: {0}")]
    UnsupportedVersion(u8),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,
}

/// Reasons a chain fails verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("block {index}: stored digest {stored} does not match recomputed {computed}")]
    DigestMismatch {
        index: u64,
        stored: Digest,
        computed: Digest,
    },

    #[error("block {index}: previous digest {found} does not link to {expected}")]
    BrokenLink {
        index: u64,
        expected: Digest,
        found: Digest,
    },

    #[error("block at position {position} carries index {found}")]
    IndexMismatch { position: u64, found: u64 },

    #[error("genesis block must link to the zero digest, found {0}")]
    GenesisLink(Digest),

    #[error("block {index}: timestamp {timestamp} precedes previous {previous}")]
    TimestampRegression {
        index: u64,
        timestamp: i64,
        previous: i64,
    },

    #[error("block {index}: digest algorithm {found} differs from chain algorithm {expected}")]
    AlgorithmMismatch {
        index: u64,
        expected: String,
        found: String,
    },

    #[error("chain is empty")]
    EmptyChain,

    #[error("checkpoint does not match chain: {0}")]
    CheckpointMismatch(String),

    #[error("checkpoint signature verification failed")]
    SignatureFailed,
}

impl ValidationError {
    /// The index of the block the failure was detected at, when there is one.
    pub fn index(&self) -> Option<u64> {
        match self {
            Self::DigestMismatch { index, .. }
            | Self::BrokenLink { index, .. }
            | Self::TimestampRegression { index, .. }
            | Self::AlgorithmMismatch { index, .. } => Some(*index),
            Self::IndexMismatch { position, .. } => Some(*position),
            Self::GenesisLink(_) => Some(0),
            Self::EmptyChain | Self::CheckpointMismatch(_) | Self::SignatureFailed => None,
        }
    }
}

impl From<CoreError> for ValidationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::EmptyChain => ValidationError::EmptyChain,
            CoreError::InvalidSignature | CoreError::InvalidPublicKey => {
                ValidationError::SignatureFailed
            }
            other => ValidationError::CheckpointMismatch(other.to_string()),
        }
    }
}
