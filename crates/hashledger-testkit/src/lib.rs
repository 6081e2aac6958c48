//! # hashledger testkit
//!
//! Testing utilities for hashledger.
//!
//! - **Golden vectors**: fixed canonical bytes and SHA-256 digests
//! - **Generators**: proptest strategies for property-based testing
//! - **Fixtures**: deterministic chains
//!
//! ## Golden Vectors
//!
//! ```rust
//! use hashledger_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, digest) in verify_all_vectors() {
//!     assert!(matches, "{name}: {digest}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use hashledger_testkit::generators::{chain_from_params, ChainParams};
//!
//! proptest! {
//!     #[test]
//!     fn chains_validate(params: ChainParams) {
//!         prop_assert!(chain_from_params(&params).validate());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::ChainFixture;
pub use generators::{chain_from_params, ChainParams};
pub use vectors::{all_vectors, block_from_vector, verify_all_vectors, GoldenVector};

/// Attack-simulation hook, re-exported for test harnesses.
pub use hashledger_core::tamper::{Tamper, TamperExt};
