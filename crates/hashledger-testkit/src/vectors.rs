//! Golden test vectors for deterministic verification.
//!
//! Every implementation of the v1 block encoding must reproduce these bytes
//! and SHA-256 digests exactly.

use hashledger_core::{
    canonical_block_bytes, compute_digest, Block, BlockBuilder, Digest, DigestAlgorithm,
    FixedClock,
};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub index: u64,
    /// Timestamp in Unix milliseconds.
    pub timestamp: i64,
    pub payload: &'static [u8],
    /// Previous digest (hex).
    pub previous_digest: &'static str,
    /// Expected canonical bytes (hex). Empty means not pinned.
    pub expected_bytes: &'static str,
    /// Expected SHA-256 block digest (hex).
    pub expected_digest: &'static str,
}

const ZERO_HEX: &str = "0000000000000000000000000000000000000000000000000000000000000000";

pub const GENESIS_DIGEST: &str = "51d4cc96cd377c20e526baae3c3ca031c6c452461f312b6407ae483134d266e3";
pub const A_DIGEST: &str = "c8ce9f469c08e06948d935ae1d0307b9a6801205feb175920c6e47fd405b7985";
pub const B_DIGEST: &str = "211d4092bf9894e15ee34dd55bca48c222bcc4d1611bf32ff7f79ade87fc5319";
pub const C_DIGEST: &str = "180396db71099398ffab66c3f111a98790edc75a67549295a4f192f2310e2502";

/// Start time of the golden chain; each following block is one second later.
pub const GOLDEN_START: i64 = 1736870400000; // 2025-01-14T16:00:00Z

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "genesis",
            index: 0,
            timestamp: GOLDEN_START,
            payload: b"Genesis Block",
            previous_digest: ZERO_HEX,
            expected_bytes: "a6000101020200031b00000194658b1000044d47656e6573697320426c6f636b05582000000000\
                             00000000000000000000000000000000000000000000000000000000",
            expected_digest: GENESIS_DIGEST,
        },
        GoldenVector {
            name: "A after genesis",
            index: 1,
            timestamp: GOLDEN_START + 1000,
            payload: b"A",
            previous_digest: GENESIS_DIGEST,
            expected_bytes: "",
            expected_digest: A_DIGEST,
        },
        GoldenVector {
            name: "B after A",
            index: 2,
            timestamp: GOLDEN_START + 2000,
            payload: b"B",
            previous_digest: A_DIGEST,
            expected_bytes: "",
            expected_digest: B_DIGEST,
        },
        GoldenVector {
            name: "C after B",
            index: 3,
            timestamp: GOLDEN_START + 3000,
            payload: b"C",
            previous_digest: B_DIGEST,
            expected_bytes: "",
            expected_digest: C_DIGEST,
        },
        GoldenVector {
            name: "empty payload at epoch",
            index: 0,
            timestamp: 0,
            payload: b"",
            previous_digest: ZERO_HEX,
            expected_bytes: "a600010102020003000440055820000000000000000000000000000000000000000000000000\
                             0000000000000000",
            expected_digest: "e87b7ed0151366f7b4c7cd727419f25089c574cb0d5db28061b588b94d6c0d2c",
        },
        GoldenVector {
            name: "negative timestamp, binary payload",
            index: 5,
            timestamp: -1,
            payload: &[0x00, 0x01, 0x02],
            previous_digest: "1111111111111111111111111111111111111111111111111111111111111111",
            expected_bytes: "a600010102020503200443000102055820111111111111111111111111111111111111111111\
                             1111111111111111111111",
            expected_digest: "59028eb6bdce3f5becb4ea7b8c784e88b8014e2eb1e43aa3b3b11a78acaa311f",
        },
    ]
}

fn previous(vector: &GoldenVector) -> Digest {
    Digest::from_hex(vector.previous_digest).unwrap_or(Digest::ZERO)
}

/// Build the block a vector describes, hashed with SHA-256.
pub fn block_from_vector(vector: &GoldenVector) -> Block {
    BlockBuilder::new(vector.index)
        .timestamp(vector.timestamp)
        .payload(vector.payload)
        .previous(previous(vector))
        .algorithm(DigestAlgorithm::Sha256)
        .build(&FixedClock(vector.timestamp))
}

/// Verify all golden vectors, returning `(name, matches, actual digest hex)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let digest = compute_digest(
                DigestAlgorithm::Sha256,
                v.index,
                v.timestamp,
                v.payload,
                &previous(v),
            );
            let bytes = hex::encode(canonical_block_bytes(
                DigestAlgorithm::Sha256,
                v.index,
                v.timestamp,
                v.payload,
                &previous(v),
            ));

            let bytes_match = v.expected_bytes.is_empty() || bytes == v.expected_bytes;
            let hex = digest.to_hex();
            (v.name.to_string(), bytes_match && hex == v.expected_digest, hex)
        })
        .collect()
}
