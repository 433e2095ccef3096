// Copyright(C) Mundis.
use {
    super::{BlockBatch, ExecutedBatch},
    crate::{
        execution::{ExecutionEngine, TransactionApplier},
        generated::{GeneratedTransactionPool, GeneratedTransactionSequencer},
        history::{BlockLog, ChainHistory},
        validation::TransactionValidator,
    },
    anyhow::ensure,
    itertools::{Either, Itertools},
    log::{debug, info, warn},
    mundis_config::ChainParameters,
    mundis_model::{
        base_types::{BlockNum, ChainId, GeneratedTransactionId},
        hash::{hashv, merkle_root, Hash},
        output::{ProcessedGeneratedTransaction, ProcessedTransaction},
        signed_transaction::SignedTransaction,
    },
    tokio::{
        sync::mpsc::{Receiver, Sender},
        task::JoinHandle,
    },
};

/// Executes blocks of transactions, one at a time.
pub struct ExecutorCore<E> {
    parameters: ChainParameters,
    chain_id: ChainId,
    history: BlockLog,
    engine: E,
    sequencer: GeneratedTransactionSequencer,
    pool: GeneratedTransactionPool,
    /// Input channel to receive the blocks to execute.
    rx_batches: Receiver<BlockBatch>,
    /// Output channel to deliver what each block did.
    tx_executed: Sender<ExecutedBatch>,
}

impl<E: ExecutionEngine + Send + 'static> ExecutorCore<E> {
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        parameters: ChainParameters,
        chain_id: ChainId,
        history: BlockLog,
        engine: E,
        sequencer: GeneratedTransactionSequencer,
        pool: GeneratedTransactionPool,
        rx_batches: Receiver<BlockBatch>,
        tx_executed: Sender<ExecutedBatch>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            Self {
                parameters,
                chain_id,
                history,
                engine,
                sequencer,
                pool,
                rx_batches,
                tx_executed,
            }
            .run()
            .await;
        })
    }

    /// Main loop receiving blocks to execute.
    async fn run(&mut self) {
        while let Some(batch) = self.rx_batches.recv().await {
            let executed = match self.execute(batch) {
                Ok(executed) => executed,
                Err(e) => {
                    warn!("Skipped block: {e}");
                    continue;
                }
            };
            info!(
                "Executed block #{} ({} applied, {} rejected, {} generated)",
                executed.block_id.block_num(),
                executed.applied.len(),
                executed.rejected.len(),
                executed.applied_generated.len()
            );
            if self.tx_executed.send(executed).await.is_err() {
                debug!("Executed block receiver dropped, stopping");
                return;
            }
        }
    }

    /// Executes one block. Signed and generated transactions both expire against the
    /// block's own timestamp.
    fn execute(&mut self, batch: BlockBatch) -> anyhow::Result<ExecutedBatch> {
        let BlockBatch {
            timestamp,
            transactions,
            generated,
        } = batch;
        let head_time = self.history.head_block_time();
        ensure!(
            timestamp >= head_time,
            "block timestamp {timestamp} is before head block time {head_time}"
        );
        let block_num: BlockNum = self.history.head_block_num() + 1;

        let expired = self.pool.expire(timestamp);

        // Validation only reads history, so the whole batch is checked up front.
        let validator = TransactionValidator::new(&self.parameters, &self.chain_id, &self.history)
            .at_time(timestamp);
        let (accepted, mut rejected): (Vec<SignedTransaction>, Vec<_>) = validator
            .validate_batch(&transactions)
            .into_iter()
            .zip(transactions)
            .partition_map(|(result, trx)| match result {
                Ok(_) => Either::Left(trx),
                Err(e) => Either::Right((trx.id(), e)),
            });

        let mut applier =
            TransactionApplier::new(&mut self.engine, &mut self.sequencer, &self.parameters);

        let mut applied: Vec<ProcessedTransaction> = Vec::with_capacity(accepted.len());
        for trx in accepted {
            let id = trx.id();
            match applier.apply_signed(trx) {
                Ok(processed) => applied.push(processed),
                Err(e) => rejected.push((id, e)),
            }
        }

        let mut applied_generated: Vec<ProcessedGeneratedTransaction> = vec![];
        let mut generated_leaves = vec![];
        let mut rejected_generated = vec![];
        for id in generated {
            let result = self.pool.take_for_application(id).and_then(|gtx| {
                let leaf = gtx.merkle_digest();
                let processed = applier.apply_generated(gtx)?;
                self.pool.mark_applied(id, processed.clone())?;
                Ok((leaf, processed))
            });
            match result {
                Ok((leaf, processed)) => {
                    generated_leaves.push(leaf);
                    applied_generated.push(processed);
                }
                Err(e) => {
                    warn!("Generated transaction {id} not applied: {e}");
                    rejected_generated.push((id, e));
                }
            }
        }

        let deferred = self.record_deferred(block_num, &applied, &applied_generated);
        let transaction_mroot = Self::transaction_mroot(&applied, generated_leaves);
        let block_hash = hashv(&[
            self.history.head().unwrap_or_default().as_ref(),
            transaction_mroot.as_ref(),
            &timestamp.to_le_bytes()[..],
        ]);
        let block_id = self.history.append(&block_hash, timestamp);

        Ok(ExecutedBatch {
            block_id,
            transaction_mroot,
            applied,
            applied_generated,
            rejected,
            rejected_generated,
            expired,
            deferred,
        })
    }

    /// Records every transaction deferred in `block_num` and seals them as pending.
    fn record_deferred(
        &mut self,
        block_num: BlockNum,
        applied: &[ProcessedTransaction],
        applied_generated: &[ProcessedGeneratedTransaction],
    ) -> Vec<GeneratedTransactionId> {
        let deferred = applied
            .iter()
            .flat_map(|p| p.deferred_transactions())
            .chain(applied_generated.iter().flat_map(|p| p.deferred_transactions()));
        let mut ids = vec![];
        for gtx in deferred {
            match self.pool.record(block_num, gtx.clone()) {
                Ok(()) => ids.push(gtx.id),
                Err(e) => warn!("Cannot record generated transaction {}: {e}", gtx.id),
            }
        }
        self.pool.mark_pending(block_num);
        ids
    }

    /// Applied transactions first, then the applied generated ones.
    fn transaction_mroot(applied: &[ProcessedTransaction], generated_leaves: Vec<Hash>) -> Hash {
        let leaves: Vec<Hash> = applied
            .iter()
            .map(|p| p.transaction.merkle_digest())
            .chain(generated_leaves)
            .collect();
        merkle_root(&leaves)
    }
}
