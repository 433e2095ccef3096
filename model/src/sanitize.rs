// Copyright(C) Mundis.
//! Structural checks applied to decoded values before the runtime sees them.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SanitizeError {
    #[error("transaction carries no messages")]
    EmptyTransaction,
}

/// A well-formedness check that does not need chain state. The default accepts everything.
pub trait Sanitize {
    fn sanitize(&self) -> Result<(), SanitizeError> {
        Ok(())
    }
}

