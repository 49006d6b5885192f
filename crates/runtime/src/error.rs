use quest_core::{OracleError, RewardError};

/// Runtime errors.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("oracle query failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("reward grant failed: {0}")]
    Reward(#[from] RewardError),

    #[error("save repository failed: {0}")]
    Repository(String),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
