use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum LibraryError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    // caller is authenticated but holds the wrong role
    AccessDenied {
        message: String,
        reason_code: Option<String>,
    },
    // caller tried to act on a record it does not own
    NotGranted {
        message: String,
        reason_code: Option<String>,
    },
    Unauthenticated {
        message: String,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    // raised when an issue or an adjustment would take available_quantity below zero
    InsufficientStock {
        message: String,
        available: i64,
        requested: i64,
    },
    // This is a retry-able error, which indicates that a conditional write lost against a
    // concurrent writer (version mismatch) or the store is throttling.
    // The caller can retry with or without a backoff.
    CurrentlyUnavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    // reason_code carries the offending field name when the error maps onto a form field
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn access_denied(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::AccessDenied { message: message.to_string(), reason_code }
    }

    pub fn not_granted(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::NotGranted { message: message.to_string(), reason_code }
    }

    pub fn unauthenticated(message: &str) -> LibraryError {
        LibraryError::Unauthenticated { message: message.to_string() }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn insufficient_stock(message: &str, available: i64, requested: i64) -> LibraryError {
        LibraryError::InsufficientStock { message: message.to_string(), available, requested }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::CurrentlyUnavailable { message: message.to_string(), reason_code, retryable }
    }

    pub fn database_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> LibraryError {
        if retryable {
            LibraryError::unavailable(
                format!("ddb database unavailable error {:?} {:?}", message, reason).as_str(), reason, true)
        } else if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("404") {
                LibraryError::not_found(
                    format!("not found error {:?} {:?}", message, reason).as_str())
            } else if reason_val.as_str().contains("400") {
                LibraryError::validation(
                    format!("rejected request {:?} {:?}", message, reason).as_str(), None)
            } else {
                LibraryError::database(
                    format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
            }
        } else {
            LibraryError::database(
                format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
        }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    // validation error bound to a form field
    pub fn invalid_field(field: &str, message: &str) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code: Some(field.to_string()) }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } => { *retryable }
            LibraryError::AccessDenied { .. } => { false }
            LibraryError::NotGranted { .. } => { false }
            LibraryError::Unauthenticated { .. } => { false }
            LibraryError::DuplicateKey { .. } => { false }
            LibraryError::NotFound { .. } => { false }
            LibraryError::InsufficientStock { .. } => { false }
            LibraryError::CurrentlyUnavailable { retryable, .. } => { *retryable }
            LibraryError::Validation { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("serde io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<String> for LibraryError {
    fn from(err: String) -> Self {
        LibraryError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::AccessDenied { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::NotGranted { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Unauthenticated { message } => {
                write!(f, "{}", message)
            }
            LibraryError::DuplicateKey { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::InsufficientStock { message, available, requested } => {
                write!(f, "{} (available {}, requested {})", message, available, requested)
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

/// A specialized Result type for the library services and repositories.
pub type LibraryResult<T> = Result<T, LibraryError>;

// It defines abstraction for paginated result
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    // The page number or token
    pub page: Option<String>,
    // page size
    pub page_size: usize,
    // Next page if available
    pub next_page: Option<String>,
    // list of records
    pub records: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub(crate) fn new(page: Option<&str>, page_size: usize,
                      next_page: Option<String>, records: Vec<T>) -> Self {
        PaginatedResult {
            page: page.map(str::to_string),
            page_size,
            next_page,
            records,
        }
    }
}

// Role is the profile attached to every account. Anything that cannot be recognized is
// treated as a regular user, never as staff.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Staff,
    #[default]
    User,
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.to_uppercase().as_str() {
            "STAFF" => Role::Staff,
            _ => Role::User,
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Role::Staff => write!(f, "STAFF"),
            Role::User => write!(f, "USER"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Issue,
    Return,
}

impl From<String> for TransactionType {
    fn from(s: String) -> Self {
        match s.to_uppercase().as_str() {
            "RETURN" => TransactionType::Return,
            _ => TransactionType::Issue,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TransactionType::Issue => write!(f, "ISSUE"),
            TransactionType::Return => write!(f, "RETURN"),
        }
    }
}
