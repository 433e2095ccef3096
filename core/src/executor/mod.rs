// Copyright(C) Mundis.
use {
    crate::{
        error::TransactionError,
        execution::ExecutionEngine,
        executor::executor_core::ExecutorCore,
        generated::{GeneratedTransactionPool, GeneratedTransactionSequencer},
        history::{BlockLog, ChainHistory},
    },
    log::info,
    mundis_config::ChainParameters,
    mundis_model::{
        base_types::{ChainId, GeneratedTransactionId, TransactionId, UnixTimestamp},
        block_id::BlockId,
        hash::Hash,
        output::{ProcessedGeneratedTransaction, ProcessedTransaction},
        signed_transaction::SignedTransaction,
    },
    tokio::{
        sync::mpsc::{Receiver, Sender},
        task::JoinHandle,
    },
};

mod executor_core;

/// The default channel capacity for each channel of the executor.
pub const CHANNEL_CAPACITY: usize = 1_000;

/// The contents of the next block, in application order.
#[derive(Debug, Clone)]
pub struct BlockBatch {
    pub timestamp: UnixTimestamp,
    pub transactions: Vec<SignedTransaction>,
    /// Pending generated transactions to apply after `transactions`.
    pub generated: Vec<GeneratedTransactionId>,
}

/// What executing a [`BlockBatch`] did.
#[derive(Debug, Clone)]
pub struct ExecutedBatch {
    pub block_id: BlockId,
    /// Merkle root over the applied transactions followed by the applied generated ones.
    pub transaction_mroot: Hash,
    pub applied: Vec<ProcessedTransaction>,
    pub applied_generated: Vec<ProcessedGeneratedTransaction>,
    pub rejected: Vec<(TransactionId, TransactionError)>,
    pub rejected_generated: Vec<(GeneratedTransactionId, TransactionError)>,
    /// Generated transactions that expired before this block.
    pub expired: Vec<GeneratedTransactionId>,
    /// Generated transactions deferred by this block, now pending.
    pub deferred: Vec<GeneratedTransactionId>,
}

pub struct Executor;

impl Executor {
    /// Spawns the task executing blocks received on `rx_batches`. It stops once the sending
    /// side is dropped.
    pub fn spawn<E>(
        parameters: ChainParameters,
        chain_id: ChainId,
        history: BlockLog,
        engine: E,
        rx_batches: Receiver<BlockBatch>,
        tx_executed: Sender<ExecutedBatch>,
    ) -> anyhow::Result<JoinHandle<()>>
    where
        E: ExecutionEngine + Send + 'static,
    {
        parameters.validate()?;
        info!(
            "Executor starting at block #{} on chain {}",
            history.head_block_num(),
            chain_id
        );

        Ok(ExecutorCore::spawn(
            parameters,
            chain_id,
            history,
            engine,
            GeneratedTransactionSequencer::default(),
            GeneratedTransactionPool::new(),
            rx_batches,
            tx_executed,
        ))
    }
}

#[cfg(test)]
#[path = "tests/executor_tests.rs"]
pub mod executor_tests;
