//! # hashledger core
//!
//! Pure primitives for a hash-linked ledger: blocks, chains, canonical
//! encoding and verification.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`Block`] - An immutable record bound to its predecessor by digest
//! - [`Chain`] - An append-only sequence of blocks rooted at a genesis block
//! - [`Digest`] - A 32-byte BLAKE3 or SHA-256 output
//! - [`SharedChain`] - A lock-protected chain for multi-threaded callers
//!
//! ## Canonicalization
//!
//! Block digests are computed over deterministic CBOR. See [`canonical`].
//!
//! ## Example
//!
//! ```rust
//! use hashledger_core::Chain;
//!
//! let mut chain = Chain::new();
//! chain.append("Alice pays Bob 10").unwrap();
//! chain.append("Bob pays Carol 5").unwrap();
//!
//! assert_eq!(chain.len(), 3);
//! assert!(chain.validate());
//! ```

pub mod block;
pub mod canonical;
pub mod chain;
pub mod clock;
pub mod crypto;
pub mod error;
pub mod shared;
#[cfg(any(test, feature = "tamper"))]
pub mod tamper;
pub mod types;
pub mod validation;

pub use block::{encode_payload, Block, BlockBuilder};
pub use canonical::{canonical_block_bytes, compute_digest, decode_block, encode_block};
pub use chain::{Chain, ChainConfig, Checkpoint, DEFAULT_GENESIS_PAYLOAD};
pub use clock::{Clock, FixedClock, StepClock, SystemClock};
pub use crypto::{
    mac, verify_mac, DigestAlgorithm, DigestProvider, Ed25519PublicKey, Ed25519Signature, Keypair,
};
pub use error::{CoreError, ValidationError};
pub use shared::SharedChain;
pub use types::Digest;
pub use validation::{verify_block_digest, verify_blocks, verify_genesis, verify_link};
