// Copyright(C) Mundis.
use {
    super::{ApplyContext, ApplyEffects, ExecutionEngine},
    crate::{
        error::{TransactionError, TransactionResult},
        generated::GeneratedTransactionSequencer,
    },
    log::{debug, warn},
    mundis_config::ChainParameters,
    mundis_model::{
        account::AccountName,
        generated_transaction::GeneratedTransaction,
        message::Message,
        output::{
            MessageOutput, NotifyOutput, PendingInlineTransaction, Processable,
            ProcessedGeneratedTransaction, ProcessedTransaction,
        },
        signed_transaction::SignedTransaction,
    },
};

/// Applies transactions and builds their output trees.
///
/// One transaction is one atomic scope: every notification and inline message beneath it
/// succeeds, or the engine's session is undone, the id sequencer is rewound and no output
/// is produced.
pub struct TransactionApplier<'a, E: ExecutionEngine + ?Sized> {
    engine: &'a mut E,
    sequencer: &'a mut GeneratedTransactionSequencer,
    parameters: &'a ChainParameters,
}

impl<'a, E: ExecutionEngine + ?Sized> TransactionApplier<'a, E> {
    pub fn new(
        engine: &'a mut E,
        sequencer: &'a mut GeneratedTransactionSequencer,
        parameters: &'a ChainParameters,
    ) -> Self {
        Self {
            engine,
            sequencer,
            parameters,
        }
    }

    pub fn apply_signed(&mut self, trx: SignedTransaction) -> TransactionResult<ProcessedTransaction> {
        self.apply(trx)
    }

    pub fn apply_generated(
        &mut self,
        trx: GeneratedTransaction,
    ) -> TransactionResult<ProcessedGeneratedTransaction> {
        self.apply(trx)
    }

    /// Applies every message of `transaction` as a single atomic unit.
    pub fn apply<T: Processable>(&mut self, transaction: T) -> TransactionResult<T::Processed> {
        let checkpoint = self.sequencer.snapshot();
        self.engine.start_undo_session();

        match self.apply_messages(transaction.messages(), 0) {
            Ok(output) => {
                self.engine.commit();
                debug!(
                    "Applied {} message(s), next generated id {}",
                    output.len(),
                    self.sequencer.next_id()
                );
                Ok(transaction.into_processed(output))
            }
            Err(e) => {
                self.engine.undo();
                self.sequencer.restore(checkpoint);
                warn!("Transaction unwound: {}", e);
                Err(e)
            }
        }
    }

    fn apply_messages(&mut self, messages: &[Message], depth: u16) -> TransactionResult<Vec<MessageOutput>> {
        messages
            .iter()
            .map(|message| self.apply_message(&message.code, message, depth))
            .collect()
    }

    /// Runs `receiver`'s handler for `message`, then the notifications it asked for, then
    /// its inline messages.
    fn apply_message(
        &mut self,
        receiver: &AccountName,
        message: &Message,
        depth: u16,
    ) -> TransactionResult<MessageOutput> {
        let max_depth = self.parameters.max_apply_depth;
        if depth > max_depth {
            return Err(TransactionError::RecursionLimit { depth, max_depth });
        }

        let mut context = ApplyContext::new(
            receiver,
            message,
            depth,
            self.parameters.max_deferred_per_message,
        );
        self.engine.apply(&mut context)?;
        let ApplyEffects {
            notified,
            inline_messages,
            deferred,
            violation,
        } = context.into_effects();
        if let Some(error) = violation {
            return Err(error);
        }

        let deferred_transactions = deferred
            .into_iter()
            .map(|transaction| self.sequencer.assign(transaction))
            .collect();

        let mut notify = Vec::with_capacity(notified.len());
        for name in notified {
            let output = self.apply_message(&name, message, depth + 1)?;
            notify.push(NotifyOutput { name, output });
        }

        let pending = PendingInlineTransaction::new(inline_messages);
        let output = self.apply_messages(pending.messages(), depth + 1)?;

        Ok(MessageOutput {
            notify,
            inline_transaction: pending.into_processed(output),
            deferred_transactions,
        })
    }
}
