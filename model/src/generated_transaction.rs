// Copyright(C) Mundis.
//! Transactions emitted by contract code rather than submitted by clients.
//!
//! A contract that wants to interact with other contracts in a later block emits a
//! transaction. The runtime assigns it the next chain-wide sequential id and stores it in the
//! block that produced it; later blocks include it by referencing that id. Nobody signs it:
//! the code that emitted it is its authorization.

use {
    crate::{
        base_types::GeneratedTransactionId,
        codec,
        hash::Hash,
        sanitize::{Sanitize, SanitizeError},
        transaction::Transaction,
    },
    serde::{Deserialize, Serialize},
};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedTransaction {
    pub transaction: Transaction,
    pub id: GeneratedTransactionId,
}

impl GeneratedTransaction {
    pub fn new(id: GeneratedTransactionId, transaction: Transaction) -> Self {
        Self { transaction, id }
    }

    pub fn merkle_digest(&self) -> Hash {
        codec::digest(self)
    }
}

impl Sanitize for GeneratedTransaction {
    fn sanitize(&self) -> Result<(), SanitizeError> {
        self.transaction.sanitize()
    }
}
