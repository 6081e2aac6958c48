//! Test fixtures and helpers.
//!
//! Deterministic chains for integration tests and demos.

use std::sync::Arc;

use hashledger_core::{Chain, ChainConfig, DigestAlgorithm, Keypair, StepClock};

use crate::vectors::GOLDEN_START;

/// A chain with a deterministic clock and signing key.
pub struct ChainFixture {
    pub chain: Chain,
    pub keypair: Keypair,
}

impl ChainFixture {
    /// Genesis only, BLAKE3, clock starting at the golden start time.
    pub fn new() -> Self {
        Self::with_config(ChainConfig::default())
    }

    pub fn with_config(config: ChainConfig) -> Self {
        Self {
            chain: Chain::with_clock(config, Arc::new(StepClock::new(GOLDEN_START, 1000))),
            keypair: Keypair::from_seed(&[0x42; 32]),
        }
    }

    /// The golden SHA-256 chain: genesis plus "A", "B", "C".
    pub fn golden() -> Self {
        let mut fixture = Self::with_config(ChainConfig {
            algorithm: DigestAlgorithm::Sha256,
            ..ChainConfig::default()
        });
        fixture.append_all(["A", "B", "C"]);
        fixture
    }

    /// Append each payload in order.
    pub fn append_all<I, P>(&mut self, payloads: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<bytes::Bytes>,
    {
        for p in payloads {
            self.chain
                .append(p)
                .expect("a constructed chain always has a tail");
        }
        self
    }

    /// Genesis plus `count` numbered records.
    pub fn with_records(count: usize) -> Self {
        let mut fixture = Self::new();
        fixture.append_all((0..count).map(|i| format!("record {i}")));
        fixture
    }
}

impl Default for ChainFixture {
    fn default() -> Self {
        Self::new()
    }
}
