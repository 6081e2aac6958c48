//! Attack simulation: direct mutation of stored blocks.
//!
//! Everything here bypasses the read-only block contract. It models an
//! attacker rewriting the authoritative copy of the data, and exists only
//! for tests and under the `tamper` feature. Nothing in the normal API
//! re-exports it; callers opt in with `use hashledger_core::tamper::TamperExt`.

use bytes::Bytes;

use crate::block::Block;
use crate::chain::Chain;
use crate::types::Digest;

/// Adds [`tamper`](TamperExt::tamper) to [`Chain`].
pub trait TamperExt {
    /// Mutable handle to the block at `index`, or `None` if out of range.
    fn tamper(&mut self, index: u64) -> Option<Tamper<'_>>;
}

impl TamperExt for Chain {
    fn tamper(&mut self, index: u64) -> Option<Tamper<'_>> {
        self.block_mut(index).map(|block| Tamper { block })
    }
}

/// Mutable handle to a stored block, returned by [`TamperExt::tamper`].
pub struct Tamper<'a> {
    block: &'a mut Block,
}

impl Tamper<'_> {
    /// Overwrite the payload, leaving the stored digest stale.
    pub fn set_payload(&mut self, payload: impl Into<Bytes>) -> &mut Self {
        self.block.payload = payload.into();
        self
    }

    pub fn set_timestamp(&mut self, timestamp: i64) -> &mut Self {
        self.block.timestamp = timestamp;
        self
    }

    pub fn set_index(&mut self, index: u64) -> &mut Self {
        self.block.index = index;
        self
    }

    pub fn set_previous_digest(&mut self, digest: Digest) -> &mut Self {
        self.block.previous_digest = digest;
        self
    }

    pub fn set_digest(&mut self, digest: Digest) -> &mut Self {
        self.block.digest = digest;
        self
    }

    /// Recompute and overwrite the stored digest so the block is
    /// self-consistent again.
    pub fn reseal(&mut self) -> &mut Self {
        self.block.digest = self.block.recompute_digest();
        self
    }

    pub fn block(&self) -> &Block {
        self.block
    }
}
