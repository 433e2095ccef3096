// Copyright(C) Mundis.
use crate::hash::Hash;

/// Seconds since the UNIX epoch.
pub type UnixTimestamp = u64;
/// Identity of one chain instance; mixed into every signature digest.
pub type ChainId = Hash;
pub type BlockNum = u32;
pub type TransactionId = Hash;
/// Chain-wide sequence number of a transaction emitted by contract code.
pub type GeneratedTransactionId = u64;
