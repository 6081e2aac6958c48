//! # hashledger
//!
//! A minimal hash-linked ledger: an append-only chain of blocks, each bound
//! to its predecessor by digest, with verification that detects retroactive
//! tampering.
//!
//! ## Key Concepts
//!
//! - **Block**: Immutable. Position, timestamp, payload, previous digest, digest.
//! - **Chain**: Starts with a genesis block. Grows only at the tail.
//! - **Verification**: Recomputes each digest and checks each link.
//! - **Checkpoint**: A signed tail digest, for catching a rewritten tail.
//!
//! ## Usage
//!
//! ```rust
//! use hashledger::{Chain, Keypair};
//!
//! let mut chain = Chain::new();
//! chain.append("Transaction 1: Alice pays 10 to Bob").unwrap();
//! chain.append("Transaction 2: Bob pays 5 to Carol").unwrap();
//! assert!(chain.validate());
//!
//! let keypair = Keypair::generate();
//! let checkpoint = chain.seal(&keypair).unwrap();
//! assert!(checkpoint.verify(&chain).is_ok());
//! ```
//!
//! ## Blocks are read-only
//!
//! Nothing in this crate's API mutates a stored block. The attack-simulation
//! hook lives in `hashledger_core::tamper` and is compiled only with the
//! `demo` feature, so a plain `Chain` has no `tamper` method:
//!
//! ```compile_fail
//! let mut chain = hashledger::Chain::new();
//! chain.append("A").unwrap();
//! chain.tamper(1);
//! ```
//!
//! ## Features
//!
//! - `demo` - The tamper-detection walkthrough (`hashledger::demo`) and the
//!   `hashledger` binary. Enables `hashledger-core/tamper`.
//!
//! ## Re-exports
//!
//! - `hashledger::core` - Core primitives (Block, Chain, Digest, etc.)

#[cfg(feature = "demo")]
pub mod demo;
pub mod error;
pub mod export;

pub use hashledger_core as core;

#[cfg(feature = "demo")]
pub use demo::{DemoConfig, DemoReport};
pub use error::{LedgerError, Result};
pub use export::{export_json, import_json, ExportedChain};

pub use hashledger_core::{
    Block, BlockBuilder, Chain, ChainConfig, Checkpoint, Clock, CoreError, Digest,
    DigestAlgorithm, Keypair, SharedChain, SystemClock, ValidationError,
};
