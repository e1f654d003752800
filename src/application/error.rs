use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Vote not found: {0}")]
    VoteNotFound(String),

    #[error("Vote title cannot be empty")]
    EmptyTitle,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
