// Copyright(C) Mundis.
use {
    crate::{pubkey::Pubkey, sanitize::SanitizeError},
    thiserror::Error,
};

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] Box<bincode::ErrorKind>),

    #[error("Invalid name '{0}'")]
    InvalidName(String),

    #[error("Message index {index} out of range ({len} messages)")]
    MessageIndexOutOfRange { index: usize, len: usize },

    #[error("Signature by {signer} does not verify against the signing digest")]
    InvalidSignature { signer: Pubkey },

    #[error("Malformed value: {0}")]
    Malformed(#[from] SanitizeError),
}
