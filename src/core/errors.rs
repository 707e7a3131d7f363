use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Email already exists")]
    DuplicateEmail,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidCredentials,

    #[error("Corrupt stored value: {0}")]
    Codec(#[from] serde_json::Error),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// True for the failures a caller is expected to show to the user and
    /// retry; false for backend faults.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            StoreError::DuplicateEmail | StoreError::UserNotFound | StoreError::InvalidCredentials
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
