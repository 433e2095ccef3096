// Copyright(C) Mundis.
//! Read-only access to recent chain history, used to resolve reference blocks.

use {
    mundis_model::{
        base_types::{BlockNum, UnixTimestamp},
        block_id::BlockId,
        hash::Hash,
    },
    std::collections::VecDeque,
};

/// Number of blocks a 16 bit reference block number can reach back.
pub const REFERENCE_WINDOW: BlockNum = 1 << 16;

/// The chain history provider. Implementations are append-only from this crate's point of
/// view and must be safe to query from several validating threads at once.
pub trait ChainHistory {
    /// Number of the current head block; 0 before the first block.
    fn head_block_num(&self) -> BlockNum;

    /// Timestamp of the current head block.
    fn head_block_time(&self) -> UnixTimestamp;

    /// Id of block `block_num`, if it is still retained.
    fn block_id(&self, block_num: BlockNum) -> Option<BlockId>;
}

/// The most recent block whose number has `ref_block_num` as its low 16 bits.
pub fn resolve_reference_block<H>(history: &H, ref_block_num: u16) -> Option<BlockId>
where
    H: ChainHistory + ?Sized,
{
    let head = history.head_block_num();
    let candidate = (head & !(REFERENCE_WINDOW - 1)) | BlockNum::from(ref_block_num);
    let block_num = if candidate > head {
        candidate.checked_sub(REFERENCE_WINDOW)?
    } else {
        candidate
    };
    history.block_id(block_num)
}

/// An in-memory block history keeping the last `capacity` blocks.
#[derive(Debug, Clone)]
pub struct BlockLog {
    blocks: VecDeque<(BlockId, UnixTimestamp)>,
    capacity: usize,
}

impl Default for BlockLog {
    fn default() -> Self {
        Self::with_capacity(REFERENCE_WINDOW as usize)
    }
}

impl BlockLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            blocks: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Appends the next block and returns its id.
    pub fn append(&mut self, block_hash: &Hash, timestamp: UnixTimestamp) -> BlockId {
        let id = BlockId::new(self.head_block_num() + 1, block_hash);
        if self.blocks.len() == self.capacity {
            self.blocks.pop_front();
        }
        self.blocks.push_back((id, timestamp));
        id
    }

    pub fn head(&self) -> Option<BlockId> {
        self.blocks.back().map(|(id, _)| *id)
    }
}

impl ChainHistory for BlockLog {
    fn head_block_num(&self) -> BlockNum {
        self.head().map(|id| id.block_num()).unwrap_or(0)
    }

    fn head_block_time(&self) -> UnixTimestamp {
        self.blocks.back().map(|(_, time)| *time).unwrap_or(0)
    }

    fn block_id(&self, block_num: BlockNum) -> Option<BlockId> {
        let (oldest, _) = self.blocks.front()?;
        let offset = block_num.checked_sub(oldest.block_num())?;
        self.blocks.get(offset as usize).map(|(id, _)| *id)
    }
}
