//! Response Envelope
//!
//! Every gateway call answers with an [`ApiResponse`], success or not.

use serde::{Deserialize, Serialize};

use crate::store::UserStoreError;

/// Category of a failed call. Not part of the wire shape; transports use it
/// to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    DuplicateEmail,
    NotFound,
    /// The operation did not run to completion
    Internal,
}

impl From<&UserStoreError> for ErrorKind {
    fn from(error: &UserStoreError) -> Self {
        match error {
            UserStoreError::Validation(_) => Self::Validation,
            UserStoreError::DuplicateEmail => Self::DuplicateEmail,
            UserStoreError::NotFound { .. } => Self::NotFound,
        }
    }
}

/// `{success, data?, message?, error?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub kind: Option<ErrorKind>,
}

impl<T> ApiResponse<T> {
    /// Success carrying a payload.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            error: None,
            kind: None,
        }
    }

    /// Success with no payload.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
            kind: None,
        }
    }

    /// Failure built from a store error.
    pub fn failure(error: &UserStoreError) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.to_string()),
            kind: Some(ErrorKind::from(error)),
        }
    }

    /// Failure not caused by the store, e.g. a panicked task.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(message.into()),
            kind: Some(ErrorKind::Internal),
        }
    }
}
