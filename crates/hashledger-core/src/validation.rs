//! Chain verification: digest recomputation and linkage checks.

use crate::block::Block;
use crate::chain::ChainConfig;
use crate::error::ValidationError;
use crate::types::Digest;

/// Check that a block's stored digest matches its fields.
pub fn verify_block_digest(block: &Block) -> Result<(), ValidationError> {
    let computed = block.recompute_digest();
    if computed != *block.digest() {
        return Err(ValidationError::DigestMismatch {
            index: block.index(),
            stored: *block.digest(),
            computed,
        });
    }
    Ok(())
}

/// Check that `block` links to `previous` by stored digest.
pub fn verify_link(previous: &Block, block: &Block) -> Result<(), ValidationError> {
    if block.previous_digest() != previous.digest() {
        return Err(ValidationError::BrokenLink {
            index: block.index(),
            expected: *previous.digest(),
            found: *block.previous_digest(),
        });
    }
    Ok(())
}

/// Check the genesis block's position, algorithm, sentinel link and
/// self-consistency.
pub fn verify_genesis(genesis: &Block, config: &ChainConfig) -> Result<(), ValidationError> {
    if genesis.index() != 0 {
        return Err(ValidationError::IndexMismatch {
            position: 0,
            found: genesis.index(),
        });
    }
    if genesis.algorithm() != config.algorithm {
        return Err(ValidationError::AlgorithmMismatch {
            index: 0,
            expected: config.algorithm.to_string(),
            found: genesis.algorithm().to_string(),
        });
    }
    if *genesis.previous_digest() != Digest::ZERO {
        return Err(ValidationError::GenesisLink(*genesis.previous_digest()));
    }
    verify_block_digest(genesis)
}

/// Verify a whole block sequence, stopping at the first failure.
///
/// For every block after genesis:
/// 1. its index equals its position and its algorithm equals the chain's,
/// 2. its recomputed digest equals its stored digest,
/// 3. its previous digest equals the stored digest of the block before it,
/// 4. with `strict_timestamps`, its timestamp does not precede the previous one.
///
/// Genesis is checked only when `config.verify_genesis` is set.
pub fn verify_blocks(blocks: &[Block], config: &ChainConfig) -> Result<(), ValidationError> {
    let genesis = blocks.first().ok_or(ValidationError::EmptyChain)?;

    if config.verify_genesis {
        verify_genesis(genesis, config)?;
    }

    for (position, pair) in blocks.windows(2).enumerate() {
        let (previous, block) = (&pair[0], &pair[1]);
        let position = position as u64 + 1;

        if block.index() != position {
            return Err(ValidationError::IndexMismatch {
                position,
                found: block.index(),
            });
        }

        if block.algorithm() != config.algorithm {
            return Err(ValidationError::AlgorithmMismatch {
                index: position,
                expected: config.algorithm.to_string(),
                found: block.algorithm().to_string(),
            });
        }

        verify_block_digest(block)?;
        verify_link(previous, block)?;

        if config.strict_timestamps && block.timestamp() < previous.timestamp() {
            return Err(ValidationError::TimestampRegression {
                index: position,
                timestamp: block.timestamp(),
                previous: previous.timestamp(),
            });
        }
    }

    Ok(())
}
