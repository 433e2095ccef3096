// Copyright(C) Mundis.
use mundis_model::{
    base_types::GeneratedTransactionId, generated_transaction::GeneratedTransaction,
    transaction::Transaction,
};

/// Hands out generated transaction ids: unique, increasing, never reused once committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedTransactionSequencer {
    next_id: GeneratedTransactionId,
}

impl GeneratedTransactionSequencer {
    pub fn starting_at(next_id: GeneratedTransactionId) -> Self {
        Self { next_id }
    }

    /// The id the next assignment will use.
    pub fn next_id(&self) -> GeneratedTransactionId {
        self.next_id
    }

    pub fn assign(&mut self, transaction: Transaction) -> GeneratedTransaction {
        let id = self.next_id;
        self.next_id += 1;
        GeneratedTransaction::new(id, transaction)
    }

    pub fn snapshot(&self) -> GeneratedTransactionId {
        self.next_id
    }

    /// Forgets every id assigned since `snapshot` was taken.
    pub fn restore(&mut self, snapshot: GeneratedTransactionId) {
        debug_assert!(snapshot <= self.next_id);
        self.next_id = snapshot;
    }
}
