// Copyright(C) Mundis.
//! Transactions deferred by contract code to a later block.
//!
//! A generated transaction is created while its parent is applied and gets an id from the
//! [`GeneratedTransactionSequencer`]. Once its parent's block is sealed it is pending in the
//! [`GeneratedTransactionPool`] until a later block applies it or its expiration passes.

use serde::{Deserialize, Serialize};

mod pool;
mod sequencer;

pub use {pool::GeneratedTransactionPool, sequencer::GeneratedTransactionSequencer};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratedTransactionStatus {
    /// Produced by a transaction in a block that is not sealed yet.
    Created,
    /// Waiting to be included in a later block.
    Pending,
    Applied,
    Expired,
}

impl GeneratedTransactionStatus {
    /// Applied and expired transactions never change again.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Applied | Self::Expired)
    }
}

#[cfg(test)]
#[path = "tests/pool_tests.rs"]
pub mod pool_tests;
