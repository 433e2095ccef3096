// Copyright(C) Mundis.
//! Block identifiers that embed their own height.
//!
//! The first 4 bytes of a [`BlockId`] hold the block number (big endian) and the rest is the
//! block hash. Transactions commit to a recent block through the low 16 bits of that number
//! and the 4 bytes that follow it, see [`Transaction::set_reference_block`].
//!
//! [`Transaction::set_reference_block`]: crate::transaction::Transaction::set_reference_block

use {
    crate::{
        base_types::BlockNum,
        hash::{Hash, HASH_BYTES},
    },
    serde::{Deserialize, Serialize},
    std::fmt,
};

#[derive(Serialize, Deserialize, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BlockId(pub(crate) [u8; HASH_BYTES]);

impl BlockId {
    /// Stamps `block_num` over the leading bytes of `block_hash`.
    pub fn new(block_num: BlockNum, block_hash: &Hash) -> Self {
        let mut bytes = block_hash.to_bytes();
        bytes[..4].copy_from_slice(&block_num.to_be_bytes());
        Self(bytes)
    }

    pub const fn new_from_array(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn block_num(&self) -> BlockNum {
        BlockNum::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Low 16 bits of the block number.
    pub fn ref_block_num(&self) -> u16 {
        (self.block_num() & 0xFFFF) as u16
    }

    /// The first 4 bytes of the hash that are not the block number.
    pub fn ref_block_prefix(&self) -> u32 {
        u32::from_le_bytes([self.0[4], self.0[5], self.0[6], self.0[7]])
    }

    pub fn to_bytes(self) -> [u8; HASH_BYTES] {
        self.0
    }
}

impl AsRef<[u8]> for BlockId {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}:{}", self.block_num(), bs58::encode(self.0).into_string())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::hash::hash};

    #[test]
    fn block_number_occupies_leading_bytes() {
        let id = BlockId::new(0x0001_2345, &hash(b"block"));
        assert_eq!(id.block_num(), 0x0001_2345);
        assert_eq!(id.ref_block_num(), 0x2345);
        assert_eq!(&id.to_bytes()[4..], &hash(b"block").to_bytes()[4..]);
    }

    #[test]
    fn prefix_reads_the_bytes_after_the_number() {
        let mut bytes = [0u8; HASH_BYTES];
        bytes[..4].copy_from_slice(&1000u32.to_be_bytes());
        bytes[4..8].copy_from_slice(&0xAABB_CCDDu32.to_le_bytes());
        let id = BlockId::new_from_array(bytes);
        assert_eq!(id.block_num(), 1000);
        assert_eq!(id.ref_block_prefix(), 0xAABB_CCDD);
    }
}
