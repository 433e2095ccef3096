// Copyright(C) Mundis.
//! Validation and application of transactions against a chain's recent history.

pub mod error;
pub mod execution;
pub mod executor;
pub mod generated;
pub mod history;
pub mod validation;

pub use {
    error::{TransactionError, TransactionResult},
    execution::{ApplyContext, ExecutionEngine, TransactionApplier},
    executor::{BlockBatch, ExecutedBatch, Executor},
    validation::TransactionValidator,
};

#[cfg(test)]
#[path = "tests/common.rs"]
pub mod common;
