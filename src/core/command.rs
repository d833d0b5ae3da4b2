use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::library::LibraryError;

#[derive(Debug)]
pub enum CommandError {
    Access {
        message: String,
        reason_code: Option<String>,
    },
    Unauthenticated {
        message: String,
    },
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    InsufficientStock {
        message: String,
        available: i64,
        requested: i64,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Serialization {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Other {
        message: String,
        reason_code: Option<String>,
    },
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::Database { message, reason_code, retryable } => {
                CommandError::Database { message, reason_code, retryable }
            }
            LibraryError::AccessDenied { message, reason_code } => {
                CommandError::Access { message, reason_code }
            }
            LibraryError::NotGranted { message, reason_code } => {
                CommandError::Access { message, reason_code }
            }
            LibraryError::Unauthenticated { message } => {
                CommandError::Unauthenticated { message }
            }
            LibraryError::DuplicateKey { message } => {
                CommandError::DuplicateKey { message }
            }
            LibraryError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            LibraryError::InsufficientStock { message, available, requested } => {
                CommandError::InsufficientStock { message, available, requested }
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                CommandError::Runtime { message, reason_code, retryable }
            }
            LibraryError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            LibraryError::Serialization { message } => {
                CommandError::Serialization { message }
            }
            LibraryError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code, retryable: true }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

// Notice is the one-shot message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Self { level: NoticeLevel::Success, message: message.to_string() }
    }

    pub fn info(message: &str) -> Self {
        Self { level: NoticeLevel::Info, message: message.to_string() }
    }

    pub fn warning(message: &str) -> Self {
        Self { level: NoticeLevel::Warning, message: message.to_string() }
    }

    pub fn error(message: &str) -> Self {
        Self { level: NoticeLevel::Error, message: message.to_string() }
    }
}
