// Copyright(C) Mundis.
//! Transactions: sets of messages applied atomically, all succeed or all fail.
//!
//! Every transaction refers to a recent block that defines the context it was built
//! against. Only the low 16 bits of that block's number are stored, so a transaction can name
//! any block among the last 65,536. The block prefix, 4 bytes of the reference block's id
//! that follow the embedded number, disambiguates it.
//!
//! Every transaction also expires, so the network never has to remember all transactions
//! ever published. An expiration too far in the future is rejected by the runtime because it
//! would force nodes to keep too much history.

use {
    crate::{
        account::FuncName,
        base_types::UnixTimestamp,
        block_id::BlockId,
        codec,
        error::{ModelError, ModelResult},
        hash::Hash,
        message::Message,
        sanitize::{Sanitize, SanitizeError},
    },
    serde::{de::DeserializeOwned, Deserialize, Serialize},
};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub messages: Vec<Message>,
    /// Low 16 bits of the reference block number.
    pub ref_block_num: u16,
    /// Bytes 4..8 of the reference block id, read little endian.
    pub ref_block_prefix: u32,
    pub expiration: UnixTimestamp,
}

impl Transaction {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Content digest over messages and binding fields. Signatures are never part of it.
    pub fn digest(&self) -> Hash {
        codec::digest(self)
    }

    /// Binds this transaction to `reference_block`. Leaves `expiration` alone.
    pub fn set_reference_block(&mut self, reference_block: &BlockId) {
        self.ref_block_num = reference_block.ref_block_num();
        self.ref_block_prefix = reference_block.ref_block_prefix();
    }

    /// Whether this transaction was bound to `reference_block`. A mismatch is an answer, not
    /// an error; the caller owns the rejection policy.
    pub fn verify_reference_block(&self, reference_block: &BlockId) -> bool {
        self.ref_block_num == reference_block.ref_block_num()
            && self.ref_block_prefix == reference_block.ref_block_prefix()
    }

    pub fn set_expiration(&mut self, expiration: UnixTimestamp) {
        self.expiration = expiration;
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Re-encodes the payload of the message at `index` as `type_name(value)`.
    pub fn set_message_payload<T: Serialize>(
        &mut self,
        index: usize,
        type_name: FuncName,
        value: &T,
    ) -> ModelResult<()> {
        let len = self.messages.len();
        self.messages
            .get_mut(index)
            .ok_or(ModelError::MessageIndexOutOfRange { index, len })?
            .set_payload(type_name, value)
    }

    pub fn message_as<T: DeserializeOwned>(&self, index: usize) -> ModelResult<T> {
        self.messages
            .get(index)
            .ok_or(ModelError::MessageIndexOutOfRange {
                index,
                len: self.messages.len(),
            })?
            .payload_as()
    }

    /// Drops every message. Binding fields are kept.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Sanitize for Transaction {
    fn sanitize(&self) -> Result<(), SanitizeError> {
        if self.messages.is_empty() {
            return Err(SanitizeError::EmptyTransaction);
        }
        Ok(())
    }
}
