// Copyright(C) Mundis.
use {
    crate::{
        error::TransactionResult,
        execution::{ApplyContext, ExecutionEngine},
        history::{BlockLog, ChainHistory},
    },
    mundis_model::{
        account::AccountName,
        base_types::ChainId,
        hash::hash,
        keypair::Keypair,
        message::Message,
        signed_transaction::SignedTransaction,
        transaction::Transaction,
    },
    rand::{rngs::StdRng, SeedableRng as _},
    std::collections::HashMap,
};

pub fn keys() -> Vec<Keypair> {
    let mut rng = StdRng::from_seed([0; 32]);
    (0..4).map(|_| Keypair::generate(&mut rng)).collect()
}

pub fn chain_id() -> ChainId {
    hash(b"mundis-test")
}

pub fn name(s: &str) -> AccountName {
    s.parse().unwrap()
}

pub fn message(code: &str, type_name: &str) -> Message {
    Message::new(name(code), name(type_name), vec![], vec![])
}

/// A log of `blocks` blocks, block `n` stamped `1_000 + 3 * n`.
pub fn block_log(blocks: u32) -> BlockLog {
    let mut log = BlockLog::with_capacity(100_000);
    for n in 1..=blocks {
        log.append(&hash(&n.to_le_bytes()), 1_000 + u64::from(n) * 3);
    }
    log
}

/// A transaction bound to the head of `log`, expiring a minute later, signed by `signer`.
pub fn signed(messages: Vec<Message>, log: &BlockLog, signer: &Keypair) -> SignedTransaction {
    let mut transaction = Transaction::new(messages);
    if let Some(head) = log.head() {
        transaction.set_reference_block(&head);
    }
    transaction.set_expiration(log.head_block_time() + 60);
    let mut trx = SignedTransaction::new(transaction);
    trx.sign(signer, &chain_id());
    trx
}

type Handler = Box<dyn Fn(&mut ApplyContext<'_>) -> TransactionResult<()> + Send + Sync>;

/// Runs per-receiver closures and journals every invocation as `receiver:action`. The
/// journal honours undo sessions, so it shows exactly which applications were kept.
#[derive(Default)]
pub struct ScriptedEngine {
    handlers: HashMap<AccountName, Handler>,
    pub journal: Vec<String>,
    sessions: Vec<usize>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(mut self, receiver: &str, handler: F) -> Self
    where
        F: Fn(&mut ApplyContext<'_>) -> TransactionResult<()> + Send + Sync + 'static,
    {
        self.handlers.insert(name(receiver), Box::new(handler));
        self
    }

    pub fn open_sessions(&self) -> usize {
        self.sessions.len()
    }
}

impl ExecutionEngine for ScriptedEngine {
    fn apply(&mut self, context: &mut ApplyContext<'_>) -> TransactionResult<()> {
        self.journal.push(format!(
            "{}:{}",
            context.receiver(),
            context.message().type_name
        ));
        match self.handlers.get(context.receiver()) {
            Some(handler) => handler(context),
            None => Ok(()),
        }
    }

    fn start_undo_session(&mut self) {
        self.sessions.push(self.journal.len());
    }

    fn commit(&mut self) {
        self.sessions.pop();
    }

    fn undo(&mut self) {
        if let Some(len) = self.sessions.pop() {
            self.journal.truncate(len);
        }
    }
}
