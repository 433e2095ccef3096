// Copyright(C) Mundis.
use {
    crate::generated::GeneratedTransactionStatus,
    mundis_model::{
        account::AccountName,
        base_types::{GeneratedTransactionId, UnixTimestamp},
        error::ModelError,
        pubkey::Pubkey,
    },
    thiserror::Error,
};

pub type TransactionResult<T> = Result<T, TransactionError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("Reference block #{ref_block_num} (prefix {ref_block_prefix:#010x}) does not match chain history")]
    StaleOrInvalidReference { ref_block_num: u16, ref_block_prefix: u32 },

    #[error("Transaction expired at {expiration}, head block time is {now}")]
    ExpiredTransaction {
        expiration: UnixTimestamp,
        now: UnixTimestamp,
    },

    #[error("Expiration {expiration} is more than {max_lifetime}s past head block time {now}")]
    ExpirationTooFar {
        expiration: UnixTimestamp,
        now: UnixTimestamp,
        max_lifetime: u64,
    },

    #[error("Invalid signature by {signer}")]
    InvalidSignature { signer: Pubkey },

    #[error("{receiver} notified {account} more than once")]
    DuplicateNotification {
        receiver: AccountName,
        account: AccountName,
    },

    #[error("Execution failed in {receiver}: {reason}")]
    ExecutionFailure { receiver: AccountName, reason: String },

    #[error("Nested application depth {depth} exceeds the limit of {max_depth}")]
    RecursionLimit { depth: u16, max_depth: u16 },

    #[error("{receiver} deferred more than {max} transactions")]
    TooManyDeferred { receiver: AccountName, max: u16 },

    #[error("Malformed transaction: {0}")]
    Malformed(String),

    #[error("Unknown generated transaction {0}")]
    UnknownGeneratedTransaction(GeneratedTransactionId),

    #[error("Generated transaction {id} cannot move from {from:?} to {to:?}")]
    InvalidLifecycleTransition {
        id: GeneratedTransactionId,
        from: GeneratedTransactionStatus,
        to: GeneratedTransactionStatus,
    },
}

impl TransactionError {
    pub fn execution_failure(receiver: &AccountName, reason: impl Into<String>) -> Self {
        Self::ExecutionFailure {
            receiver: receiver.clone(),
            reason: reason.into(),
        }
    }

    /// Errors raised before anything was applied; the transaction simply never happened.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::StaleOrInvalidReference { .. }
                | Self::ExpiredTransaction { .. }
                | Self::ExpirationTooFar { .. }
                | Self::InvalidSignature { .. }
                | Self::Malformed(_)
        )
    }
}

impl From<ModelError> for TransactionError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::InvalidSignature { signer } => Self::InvalidSignature { signer },
            other => Self::Malformed(other.to_string()),
        }
    }
}
