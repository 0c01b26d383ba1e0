use thiserror::Error;

use crate::cache::CacheError;

/// Message shown when the server gives no usable error payload
pub const GENERIC_LOGIN_FAILURE: &str = "Something went wrong.";

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    /// Authentication was rejected; carries the server payload when one was sent
    #[error("{0}")]
    Rejected(String),

    #[error("Failed to persist session: {0}")]
    Cache(#[from] CacheError),
}

impl LoginError {
    /// Form validation failures that never reached the server
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LoginError::InvalidEmail | LoginError::PasswordTooShort { .. }
        )
    }
}
