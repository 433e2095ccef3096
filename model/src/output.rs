// Copyright(C) Mundis.
//! The record of what applying a transaction did.
//!
//! Applying one message yields a [`MessageOutput`]: the accounts notified of it (each with the
//! output of its own handling), the inline messages applied right after within the same
//! atomic scope, and the transactions deferred to a later block. Deferred transactions are
//! only recorded here, never applied, which keeps the tree finite.

use {
    crate::{
        account::AccountName,
        base_types::{GeneratedTransactionId, TransactionId},
        generated_transaction::GeneratedTransaction,
        message::Message,
        signed_transaction::SignedTransaction,
        transaction::Transaction,
    },
    serde::{Deserialize, Serialize},
};

/// Maps a transaction kind to the result of applying it.
pub trait Processable {
    type Processed;

    fn messages(&self) -> &[Message];

    fn into_processed(self, output: Vec<MessageOutput>) -> Self::Processed;
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOutput {
    /// Accounts notified of the message, in notification order. Each appears once.
    pub notify: Vec<NotifyOutput>,
    /// Messages generated and applied after `notify`.
    pub inline_transaction: InlineTransaction,
    /// Transactions generated but not applied.
    pub deferred_transactions: Vec<GeneratedTransaction>,
}

impl MessageOutput {
    pub fn notified_accounts(&self) -> impl Iterator<Item = &AccountName> {
        self.notify.iter().map(|n| &n.name)
    }

    /// Every deferred transaction in this subtree: own ones first, then those of each
    /// notification, then those of the inline messages.
    pub fn collect_deferred(&self) -> Vec<&GeneratedTransaction> {
        let mut found = Vec::new();
        self.collect_deferred_into(&mut found);
        found
    }

    fn collect_deferred_into<'a>(&'a self, found: &mut Vec<&'a GeneratedTransaction>) {
        found.extend(self.deferred_transactions.iter());
        for notify in &self.notify {
            notify.output.collect_deferred_into(found);
        }
        for output in &self.inline_transaction.output {
            output.collect_deferred_into(found);
        }
    }

    /// Length of the longest chain of nested applications below this one.
    pub fn depth(&self) -> usize {
        self.notify
            .iter()
            .map(|n| &n.output)
            .chain(self.inline_transaction.output.iter())
            .map(|o| o.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NotifyOutput {
    pub name: AccountName,
    pub output: MessageOutput,
}

/// Messages queued during application for immediate, nested application.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingInlineTransaction {
    pub transaction: Transaction,
}

impl PendingInlineTransaction {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            transaction: Transaction::new(messages),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transaction.messages.is_empty()
    }
}

impl Processable for PendingInlineTransaction {
    type Processed = InlineTransaction;

    fn messages(&self) -> &[Message] {
        &self.transaction.messages
    }

    fn into_processed(self, output: Vec<MessageOutput>) -> InlineTransaction {
        InlineTransaction {
            transaction: self.transaction,
            output,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineTransaction {
    pub transaction: Transaction,
    pub output: Vec<MessageOutput>,
}

impl InlineTransaction {
    pub fn is_empty(&self) -> bool {
        self.transaction.messages.is_empty()
    }
}

impl From<PendingInlineTransaction> for InlineTransaction {
    fn from(pending: PendingInlineTransaction) -> Self {
        pending.into_processed(vec![])
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedTransaction {
    pub transaction: SignedTransaction,
    pub output: Vec<MessageOutput>,
}

impl ProcessedTransaction {
    pub fn id(&self) -> TransactionId {
        self.transaction.id()
    }

    /// Every transaction deferred anywhere in the output, in id order.
    pub fn deferred_transactions(&self) -> Vec<&GeneratedTransaction> {
        self.output.iter().flat_map(|o| o.collect_deferred()).collect()
    }
}

impl From<SignedTransaction> for ProcessedTransaction {
    fn from(transaction: SignedTransaction) -> Self {
        transaction.into_processed(vec![])
    }
}

impl Processable for SignedTransaction {
    type Processed = ProcessedTransaction;

    fn messages(&self) -> &[Message] {
        &self.transaction.messages
    }

    fn into_processed(self, output: Vec<MessageOutput>) -> ProcessedTransaction {
        ProcessedTransaction {
            transaction: self,
            output,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedGeneratedTransaction {
    pub id: GeneratedTransactionId,
    pub output: Vec<MessageOutput>,
}

impl ProcessedGeneratedTransaction {
    pub fn deferred_transactions(&self) -> Vec<&GeneratedTransaction> {
        self.output.iter().flat_map(|o| o.collect_deferred()).collect()
    }
}

impl From<&GeneratedTransaction> for ProcessedGeneratedTransaction {
    fn from(transaction: &GeneratedTransaction) -> Self {
        Self {
            id: transaction.id,
            output: vec![],
        }
    }
}

impl Processable for GeneratedTransaction {
    type Processed = ProcessedGeneratedTransaction;

    fn messages(&self) -> &[Message] {
        &self.transaction.messages
    }

    fn into_processed(self, output: Vec<MessageOutput>) -> ProcessedGeneratedTransaction {
        ProcessedGeneratedTransaction {
            id: self.id,
            output,
        }
    }
}
