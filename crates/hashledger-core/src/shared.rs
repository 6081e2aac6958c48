//! Thread-safe chain handle.
//!
//! Appends take the write lock, so reading the tail and pushing the new block
//! happen as one step. Verification and snapshots take the read lock and never
//! observe a chain mid-append.

use bytes::Bytes;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::block::Block;
use crate::chain::{Chain, Checkpoint};
use crate::crypto::Keypair;
use crate::error::{CoreError, ValidationError};

/// A cloneable, lock-protected [`Chain`].
#[derive(Clone, Default)]
pub struct SharedChain {
    inner: Arc<RwLock<Chain>>,
}

impl SharedChain {
    pub fn new(chain: Chain) -> Self {
        Self {
            inner: Arc::new(RwLock::new(chain)),
        }
    }

    // `Chain::append` pushes as its final step, so a poisoned chain is still whole.
    fn read(&self) -> RwLockReadGuard<'_, Chain> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Chain> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a block and return a copy of it.
    pub fn append(&self, payload: impl Into<Bytes>) -> Result<Block, CoreError> {
        self.write().append(payload).cloned()
    }

    pub fn append_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<Block, CoreError> {
        self.write().append_value(value).cloned()
    }

    pub fn tail(&self) -> Result<Block, CoreError> {
        self.read().tail().cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn validate(&self) -> bool {
        self.read().validate()
    }

    pub fn verify(&self) -> Result<(), ValidationError> {
        self.read().verify()
    }

    pub fn seal(&self, keypair: &Keypair) -> Result<Checkpoint, CoreError> {
        self.read().seal(keypair)
    }

    /// Point-in-time copy of the whole chain.
    pub fn snapshot(&self) -> Chain {
        self.read().clone()
    }

    /// Run `f` against the chain under the read lock.
    pub fn with_chain<R>(&self, f: impl FnOnce(&Chain) -> R) -> R {
        f(&*self.read())
    }

    /// Run `f` with exclusive access, e.g. to append several blocks atomically.
    pub fn with_chain_mut<R>(&self, f: impl FnOnce(&mut Chain) -> R) -> R {
        f(&mut *self.write())
    }
}

impl From<Chain> for SharedChain {
    fn from(chain: Chain) -> Self {
        Self::new(chain)
    }
}
