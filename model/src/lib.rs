// Copyright(C) Mundis.
//! Value types of the transaction execution model: identities, transaction kinds, the
//! execution output tree and their canonical encoding.

pub mod account;
pub mod base_types;
pub mod block_id;
pub mod codec;
pub mod error;
pub mod generated_transaction;
pub mod hash;
pub mod keypair;
pub mod message;
pub mod output;
pub mod pubkey;
pub mod sanitize;
pub mod signature;
pub mod signed_transaction;
pub mod transaction;

use crate::hash::{merkle_root, Hash};

/// A value that can be committed to as a leaf of a block-level Merkle tree.
pub trait MerkleDigest {
    fn merkle_digest(&self) -> Hash;
}

impl MerkleDigest for signed_transaction::SignedTransaction {
    fn merkle_digest(&self) -> Hash {
        signed_transaction::SignedTransaction::merkle_digest(self)
    }
}

impl MerkleDigest for generated_transaction::GeneratedTransaction {
    fn merkle_digest(&self) -> Hash {
        generated_transaction::GeneratedTransaction::merkle_digest(self)
    }
}

/// Merkle root over the leaf digests of `items`, in order.
pub fn merkle_root_of<T: MerkleDigest>(items: &[T]) -> Hash {
    let leaves: Vec<Hash> = items.iter().map(MerkleDigest::merkle_digest).collect();
    merkle_root(&leaves)
}
