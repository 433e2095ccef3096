// Copyright(C) Mundis.
//! Checks a transaction must pass before it is applied.
//!
//! Everything here is pure and only reads chain history, so independent transactions can be
//! validated in parallel. A failure rejects the transaction without any state change.

use {
    crate::{
        error::{TransactionError, TransactionResult},
        history::{resolve_reference_block, ChainHistory},
    },
    log::debug,
    mundis_config::ChainParameters,
    mundis_model::{
        base_types::{ChainId, UnixTimestamp},
        block_id::BlockId,
        pubkey::Pubkey,
        sanitize::Sanitize,
        signed_transaction::SignedTransaction,
        transaction::Transaction,
    },
    rayon::prelude::*,
    std::collections::BTreeSet,
};

pub struct TransactionValidator<'a> {
    parameters: &'a ChainParameters,
    chain_id: &'a ChainId,
    history: &'a (dyn ChainHistory + Sync),
    /// Time expirations are measured against.
    now: UnixTimestamp,
}

impl<'a> TransactionValidator<'a> {
    pub fn new(
        parameters: &'a ChainParameters,
        chain_id: &'a ChainId,
        history: &'a (dyn ChainHistory + Sync),
    ) -> Self {
        Self {
            parameters,
            chain_id,
            history,
            now: history.head_block_time(),
        }
    }

    /// Measures expiration against `now` rather than the head block time, e.g. the
    /// timestamp of the block being built.
    pub fn at_time(mut self, now: UnixTimestamp) -> Self {
        self.now = now;
        self
    }

    /// Resolves the block `t` claims as its reference and checks the claim.
    pub fn check_reference_block(&self, t: &Transaction) -> TransactionResult<BlockId> {
        let stale = || TransactionError::StaleOrInvalidReference {
            ref_block_num: t.ref_block_num,
            ref_block_prefix: t.ref_block_prefix,
        };
        let reference = resolve_reference_block(self.history, t.ref_block_num).ok_or_else(stale)?;
        if !t.verify_reference_block(&reference) {
            return Err(stale());
        }
        Ok(reference)
    }

    /// `t` must not have expired and must not expire beyond the allowed lifetime.
    pub fn check_expiration(&self, t: &Transaction) -> TransactionResult<()> {
        let now = self.now;
        if t.expiration < now {
            return Err(TransactionError::ExpiredTransaction {
                expiration: t.expiration,
                now,
            });
        }
        let max_lifetime = self.parameters.max_transaction_lifetime;
        if t.expiration > now.saturating_add(max_lifetime) {
            return Err(TransactionError::ExpirationTooFar {
                expiration: t.expiration,
                now,
                max_lifetime,
            });
        }
        Ok(())
    }

    /// The signer keys handed to the authorization checker.
    pub fn recover_signers(&self, trx: &SignedTransaction) -> TransactionResult<BTreeSet<Pubkey>> {
        Ok(trx.get_signature_keys(self.chain_id)?)
    }

    /// Runs every check in order and returns the recovered signer keys.
    pub fn validate(&self, trx: &SignedTransaction) -> TransactionResult<BTreeSet<Pubkey>> {
        let result = trx
            .sanitize()
            .map_err(|e| TransactionError::Malformed(e.to_string()))
            .and_then(|_| self.check_reference_block(&trx.transaction))
            .and_then(|_| self.check_expiration(&trx.transaction))
            .and_then(|_| self.recover_signers(trx));
        if let Err(e) = &result {
            debug!("Rejected transaction {}: {}", trx.id(), e);
        }
        result
    }

    /// Validates independent transactions in parallel; results keep the input order.
    pub fn validate_batch(
        &self,
        transactions: &[SignedTransaction],
    ) -> Vec<TransactionResult<BTreeSet<Pubkey>>> {
        transactions.par_iter().map(|trx| self.validate(trx)).collect()
    }
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
pub mod validation_tests;
