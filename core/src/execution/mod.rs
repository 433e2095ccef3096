// Copyright(C) Mundis.
//! The boundary between this crate and the engine that runs contract code.

use {
    crate::error::{TransactionError, TransactionResult},
    mundis_model::{account::AccountName, message::Message, transaction::Transaction},
};

mod applier;

pub use applier::TransactionApplier;

/// Runs contract code. Called synchronously, once per (receiver, message) pair; the engine
/// reports effects through the [`ApplyContext`] and must be done with them when it returns.
pub trait ExecutionEngine {
    fn apply(&mut self, context: &mut ApplyContext<'_>) -> TransactionResult<()>;

    /// Opens a scope whose state changes are dropped by [`ExecutionEngine::undo`].
    fn start_undo_session(&mut self) {}

    /// Keeps the changes made since the matching `start_undo_session`.
    fn commit(&mut self) {}

    /// Drops the changes made since the matching `start_undo_session`.
    fn undo(&mut self) {}
}

/// What one handler invocation may see and request.
pub struct ApplyContext<'a> {
    receiver: &'a AccountName,
    message: &'a Message,
    depth: u16,
    max_deferred: u16,
    effects: ApplyEffects,
}

/// Effects requested by a handler, in request order.
#[derive(Default)]
pub(crate) struct ApplyEffects {
    pub(crate) notified: Vec<AccountName>,
    pub(crate) inline_messages: Vec<Message>,
    pub(crate) deferred: Vec<Transaction>,
    /// First rejected request. It fails the application even if the engine ignored it.
    pub(crate) violation: Option<TransactionError>,
}

impl<'a> ApplyContext<'a> {
    pub(crate) fn new(
        receiver: &'a AccountName,
        message: &'a Message,
        depth: u16,
        max_deferred: u16,
    ) -> Self {
        Self {
            receiver,
            message,
            depth,
            max_deferred,
            effects: ApplyEffects::default(),
        }
    }

    /// The account whose code is handling the message.
    pub fn receiver(&self) -> &AccountName {
        self.receiver
    }

    pub fn message(&self) -> &Message {
        self.message
    }

    /// 0 for a message of the transaction itself, +1 per notification or inline hop.
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Asks for `account` to be notified of this message once the receiver is done.
    ///
    /// An account may be notified at most once per application, and the receiver has
    /// already seen the message.
    pub fn require_notice(&mut self, account: AccountName) -> TransactionResult<()> {
        if &account == self.receiver || self.effects.notified.contains(&account) {
            return Err(self.reject(TransactionError::DuplicateNotification {
                receiver: self.receiver.clone(),
                account,
            }));
        }
        self.effects.notified.push(account);
        Ok(())
    }

    /// Queues `message` to be applied after the notifications, in the same atomic scope.
    pub fn send_inline(&mut self, message: Message) {
        self.effects.inline_messages.push(message);
    }

    /// Defers `transaction` to a later block. It is recorded with a fresh id, not applied.
    pub fn send_deferred(&mut self, transaction: Transaction) -> TransactionResult<()> {
        if self.effects.deferred.len() >= usize::from(self.max_deferred) {
            return Err(self.reject(TransactionError::TooManyDeferred {
                receiver: self.receiver.clone(),
                max: self.max_deferred,
            }));
        }
        self.effects.deferred.push(transaction);
        Ok(())
    }

    fn reject(&mut self, error: TransactionError) -> TransactionError {
        self.effects.violation.get_or_insert_with(|| error.clone());
        error
    }

    pub(crate) fn into_effects(self) -> ApplyEffects {
        self.effects
    }
}

#[cfg(test)]
#[path = "tests/applier_tests.rs"]
pub mod applier_tests;
