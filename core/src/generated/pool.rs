// Copyright(C) Mundis.
use {
    super::GeneratedTransactionStatus,
    crate::error::{TransactionError, TransactionResult},
    log::{debug, trace},
    mundis_model::{
        base_types::{BlockNum, GeneratedTransactionId, UnixTimestamp},
        generated_transaction::GeneratedTransaction,
        output::ProcessedGeneratedTransaction,
    },
    std::collections::BTreeMap,
};

#[derive(Debug, Clone)]
struct PoolEntry {
    transaction: GeneratedTransaction,
    status: GeneratedTransactionStatus,
    /// Block whose application produced the transaction.
    created_in: BlockNum,
    processed: Option<ProcessedGeneratedTransaction>,
}

/// Tracks every generated transaction through created, pending, applied and expired.
#[derive(Debug, Default)]
pub struct GeneratedTransactionPool {
    entries: BTreeMap<GeneratedTransactionId, PoolEntry>,
}

impl GeneratedTransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Starts tracking a transaction deferred while applying block `block_num`.
    pub fn record(
        &mut self,
        block_num: BlockNum,
        transaction: GeneratedTransaction,
    ) -> TransactionResult<()> {
        let id = transaction.id;
        if let Some(existing) = self.entries.get(&id) {
            return Err(TransactionError::InvalidLifecycleTransition {
                id,
                from: existing.status,
                to: GeneratedTransactionStatus::Created,
            });
        }
        trace!("Recorded generated transaction {id} from block {block_num}");
        self.entries.insert(
            id,
            PoolEntry {
                transaction,
                status: GeneratedTransactionStatus::Created,
                created_in: block_num,
                processed: None,
            },
        );
        Ok(())
    }

    /// Seals block `block_num`: transactions it created become pending. Returns how many.
    pub fn mark_pending(&mut self, block_num: BlockNum) -> usize {
        let mut count = 0;
        for entry in self.entries.values_mut() {
            if entry.created_in == block_num && entry.status == GeneratedTransactionStatus::Created
            {
                entry.status = GeneratedTransactionStatus::Pending;
                count += 1;
            }
        }
        count
    }

    /// Hands out a pending transaction for application. It stays pending until
    /// [`Self::mark_applied`] so a failed application leaves the pool untouched.
    pub fn take_for_application(
        &self,
        id: GeneratedTransactionId,
    ) -> TransactionResult<GeneratedTransaction> {
        let entry = self.entry(id)?;
        Self::check_transition(id, entry.status, GeneratedTransactionStatus::Applied)?;
        Ok(entry.transaction.clone())
    }

    pub fn mark_applied(
        &mut self,
        id: GeneratedTransactionId,
        processed: ProcessedGeneratedTransaction,
    ) -> TransactionResult<()> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(TransactionError::UnknownGeneratedTransaction(id))?;
        Self::check_transition(id, entry.status, GeneratedTransactionStatus::Applied)?;
        entry.status = GeneratedTransactionStatus::Applied;
        entry.processed = Some(processed);
        Ok(())
    }

    /// Expires every pending transaction whose expiration is before `now`, in id order.
    pub fn expire(&mut self, now: UnixTimestamp) -> Vec<GeneratedTransactionId> {
        let expired: Vec<_> = self
            .entries
            .iter_mut()
            .filter(|(_, entry)| {
                entry.status == GeneratedTransactionStatus::Pending
                    && entry.transaction.transaction.expiration < now
            })
            .map(|(id, entry)| {
                entry.status = GeneratedTransactionStatus::Expired;
                *id
            })
            .collect();
        if !expired.is_empty() {
            debug!("Expired {} generated transaction(s) at {now}", expired.len());
        }
        expired
    }

    pub fn status(&self, id: GeneratedTransactionId) -> Option<GeneratedTransactionStatus> {
        self.entries.get(&id).map(|entry| entry.status)
    }

    /// Pending transactions, oldest id first.
    pub fn pending(&self) -> Vec<&GeneratedTransaction> {
        self.entries
            .values()
            .filter(|entry| entry.status == GeneratedTransactionStatus::Pending)
            .map(|entry| &entry.transaction)
            .collect()
    }

    pub fn processed(&self, id: GeneratedTransactionId) -> Option<&ProcessedGeneratedTransaction> {
        self.entries.get(&id)?.processed.as_ref()
    }

    fn entry(&self, id: GeneratedTransactionId) -> TransactionResult<&PoolEntry> {
        self.entries
            .get(&id)
            .ok_or(TransactionError::UnknownGeneratedTransaction(id))
    }

    fn check_transition(
        id: GeneratedTransactionId,
        from: GeneratedTransactionStatus,
        to: GeneratedTransactionStatus,
    ) -> TransactionResult<()> {
        use GeneratedTransactionStatus::*;
        let allowed = matches!(
            (from, to),
            (Created, Pending) | (Pending, Applied) | (Pending, Expired)
        );
        if !allowed {
            return Err(TransactionError::InvalidLifecycleTransition { id, from, to });
        }
        Ok(())
    }
}
