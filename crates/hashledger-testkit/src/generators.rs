//! Proptest generators for property-based testing.

use proptest::prelude::*;
use std::sync::Arc;

use hashledger_core::{Chain, ChainConfig, Digest, DigestAlgorithm, StepClock};

/// Generate a random Digest.
pub fn digest() -> impl Strategy<Value = Digest> {
    any::<[u8; 32]>().prop_map(Digest::from_bytes)
}

/// Generate a DigestAlgorithm.
pub fn algorithm() -> impl Strategy<Value = DigestAlgorithm> {
    prop_oneof![Just(DigestAlgorithm::Blake3), Just(DigestAlgorithm::Sha256)]
}

/// Generate a reasonable timestamp.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=i64::MAX / 2
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate between 1 and `max_count` payloads.
pub fn payloads(max_count: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(payload(64), 1..=max_count)
}

/// Parameters for generating a chain.
#[derive(Debug, Clone)]
pub struct ChainParams {
    pub algorithm: DigestAlgorithm,
    pub start: i64,
    pub step: i64,
    pub payloads: Vec<Vec<u8>>,
}

impl Arbitrary for ChainParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            algorithm(),
            0i64..=1_700_000_000_000i64,
            0i64..=60_000i64,
            prop::collection::vec(payload(64), 0..=16),
        )
            .prop_map(|(algorithm, start, step, payloads)| ChainParams {
                algorithm,
                start,
                step,
                payloads,
            })
            .boxed()
    }
}

/// Build a chain from parameters: genesis plus one block per payload.
pub fn chain_from_params(params: &ChainParams) -> Chain {
    let config = ChainConfig {
        algorithm: params.algorithm,
        ..ChainConfig::default()
    };
    let mut chain = Chain::with_clock(config, Arc::new(StepClock::new(params.start, params.step)));
    for p in &params.payloads {
        chain
            .append(p.clone())
            .expect("a constructed chain always has a tail");
    }
    chain
}
