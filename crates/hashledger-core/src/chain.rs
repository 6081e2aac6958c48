//! Chain: an ordered, append-only sequence of blocks.
//!
//! A chain always holds at least its genesis block. Blocks are only ever
//! added at the tail, each linked to the digest of the block before it.

use bytes::Bytes;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::block::{encode_payload, Block, BlockBuilder};
use crate::clock::{Clock, SystemClock};
use crate::crypto::{DigestAlgorithm, Ed25519PublicKey, Ed25519Signature, Keypair};
use crate::error::{CoreError, ValidationError};
use crate::types::Digest;
use crate::validation::verify_blocks;

/// Payload stored in the genesis block unless configured otherwise.
pub const DEFAULT_GENESIS_PAYLOAD: &[u8] = b"Genesis Block";

/// Domain separation prefix for signed checkpoints.
pub const CHECKPOINT_DOMAIN: &[u8] = b"hashledger/checkpoint/v1";

/// Configuration for a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// Digest algorithm for every block in the chain.
    pub algorithm: DigestAlgorithm,
    /// Whether verification also checks the genesis block itself.
    pub verify_genesis: bool,
    /// Whether a block older than its predecessor fails verification.
    pub strict_timestamps: bool,
    /// Payload of the genesis block.
    pub genesis_payload: Bytes,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::Blake3,
            verify_genesis: true,
            strict_timestamps: false,
            genesis_payload: Bytes::from_static(DEFAULT_GENESIS_PAYLOAD),
        }
    }
}

/// The main Chain struct.
#[derive(Clone)]
pub struct Chain {
    blocks: Vec<Block>,
    config: ChainConfig,
    clock: Arc<dyn Clock>,
}

impl Chain {
    /// Create a chain holding only a genesis block, with default configuration.
    pub fn new() -> Self {
        Self::with_config(ChainConfig::default())
    }

    pub fn with_config(config: ChainConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a chain whose block timestamps come from `clock`.
    pub fn with_clock(config: ChainConfig, clock: Arc<dyn Clock>) -> Self {
        let genesis = BlockBuilder::new(0)
            .payload(config.genesis_payload.clone())
            .previous(Digest::ZERO)
            .algorithm(config.algorithm)
            .build(clock.as_ref());

        tracing::debug!(
            digest = %genesis.digest(),
            algorithm = %config.algorithm,
            "created genesis block"
        );

        Self {
            blocks: vec![genesis],
            config,
            clock,
        }
    }

    /// Rebuild a chain from previously exported blocks.
    ///
    /// The blocks are verified under `config` first; a sequence that fails
    /// verification is refused.
    pub fn from_blocks(blocks: Vec<Block>, config: ChainConfig) -> Result<Self, ValidationError> {
        verify_blocks(&blocks, &config)?;
        Ok(Self {
            blocks,
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock used for future appends.
    pub fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.config.algorithm
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Append
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a block carrying `payload`, linked to the current tail.
    pub fn append(&mut self, payload: impl Into<Bytes>) -> Result<&Block, CoreError> {
        let previous = *self.tail()?.digest();
        let index = self.blocks.len() as u64;

        let block = BlockBuilder::new(index)
            .payload(payload)
            .previous(previous)
            .algorithm(self.config.algorithm)
            .build(self.clock.as_ref());

        tracing::debug!(
            index,
            digest = %block.digest(),
            previous = %block.previous_digest(),
            "appended block"
        );

        self.blocks.push(block);
        self.tail()
    }

    /// Append a structured payload, encoded as CBOR.
    ///
    /// On [`CoreError::Encoding`] the chain is left unchanged.
    pub fn append_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&Block, CoreError> {
        let payload = encode_payload(value)?;
        self.append(payload)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query
    // ─────────────────────────────────────────────────────────────────────────

    /// The most recently appended block (genesis for a fresh chain).
    pub fn tail(&self) -> Result<&Block, CoreError> {
        self.blocks.last().ok_or(CoreError::EmptyChain)
    }

    /// Get a block by index.
    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Number of blocks, genesis included. Never zero.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify the chain, reporting the first failure found.
    pub fn verify(&self) -> Result<(), ValidationError> {
        verify_blocks(&self.blocks, &self.config).map_err(|e| {
            tracing::warn!(index = ?e.index(), error = %e, "chain verification failed");
            e
        })
    }

    /// Whether the chain passes verification. Never panics or errors.
    pub fn validate(&self) -> bool {
        self.verify().is_ok()
    }

    /// Sign the current tail, producing a checkpoint that later detects a
    /// rewritten tail.
    pub fn seal(&self, keypair: &Keypair) -> Result<Checkpoint, CoreError> {
        let tail = self.tail()?;
        let message = Checkpoint::message(tail.index(), tail.digest());
        Ok(Checkpoint {
            index: tail.index(),
            digest: *tail.digest(),
            signer: keypair.public_key(),
            signature: keypair.sign(&message),
        })
    }

    #[cfg(any(test, feature = "tamper"))]
    pub(crate) fn block_mut(&mut self, index: u64) -> Option<&mut Block> {
        let i = usize::try_from(index).ok()?;
        self.blocks.get_mut(i)
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("len", &self.blocks.len())
            .field("algorithm", &self.config.algorithm)
            .field("tail", &self.blocks.last().map(|b| *b.digest()))
            .finish()
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// A signed statement that block `index` of a chain had digest `digest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub index: u64,
    pub digest: Digest,
    pub signer: Ed25519PublicKey,
    pub signature: Ed25519Signature,
}

impl Checkpoint {
    /// The signed message: `CHECKPOINT_DOMAIN || index (u64 BE) || digest`.
    pub fn message(index: u64, digest: &Digest) -> Vec<u8> {
        let mut msg = Vec::with_capacity(CHECKPOINT_DOMAIN.len() + 8 + 32);
        msg.extend_from_slice(CHECKPOINT_DOMAIN);
        msg.extend_from_slice(&index.to_be_bytes());
        msg.extend_from_slice(digest.as_bytes());
        msg
    }

    /// Check the signature, then that `chain` verifies and still holds the
    /// checkpointed digest at `index`.
    pub fn verify(&self, chain: &Chain) -> Result<(), ValidationError> {
        self.signer
            .verify(&Self::message(self.index, &self.digest), &self.signature)?;

        chain.verify()?;

        let block = chain.get(self.index).ok_or_else(|| {
            ValidationError::CheckpointMismatch(format!(
                "chain has no block {} (len {})",
                self.index,
                chain.len()
            ))
        })?;

        if *block.digest() != self.digest {
            return Err(ValidationError::CheckpointMismatch(format!(
                "block {} digest {} differs from signed {}",
                self.index,
                block.digest(),
                self.digest
            )));
        }
        Ok(())
    }
}
