use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum LibraryError {
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
        // requested id when the caller knows it
        id: Option<String>,
    },
    // Throttling or transient store failures; the caller may retry with or without a backoff.
    CurrentlyUnavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
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

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str, id: Option<String>) -> LibraryError {
        LibraryError::NotFound { message: message.to_string(), id }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::CurrentlyUnavailable { message: message.to_string(), reason_code, retryable }
    }

    // Classifies a store failure by its retry hint and the HTTP status carried in `reason`.
    // Among 400s only a ValidationException is a request error; missing tables and bad
    // credentials also come back as 400.
    pub fn database_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> LibraryError {
        if retryable {
            return LibraryError::unavailable(
                format!("store unavailable: {} ({:?})", message, reason).as_str(), reason, true);
        }
        match reason.as_deref() {
            Some(code) if code.contains("404") => {
                LibraryError::not_found(format!("store reported missing resource: {}", message).as_str(), None)
            }
            Some(code) if code.contains("400") && message.contains("ValidationException") => {
                LibraryError::validation(format!("store rejected request: {}", message).as_str(), reason)
            }
            _ => LibraryError::database(format!("store error: {} ({:?})", message, reason).as_str(), reason, false),
        }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } | LibraryError::CurrentlyUnavailable { retryable, .. } => *retryable,
            _ => false,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LibraryError::Database { message, .. }
            | LibraryError::DuplicateKey { message }
            | LibraryError::NotFound { message, .. }
            | LibraryError::CurrentlyUnavailable { message, .. }
            | LibraryError::Validation { message, .. }
            | LibraryError::Serialization { message }
            | LibraryError::Runtime { message, .. } => message.as_str(),
        }
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(format!("json: {}", err).as_str())
    }
}

impl From<String> for LibraryError {
    fn from(err: String) -> Self {
        LibraryError::serialization(err.as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Database { reason_code: Some(code), .. }
            | LibraryError::CurrentlyUnavailable { reason_code: Some(code), .. }
            | LibraryError::Validation { reason_code: Some(code), .. }
            | LibraryError::Runtime { reason_code: Some(code), .. } => {
                write!(f, "{} [{}]", self.message(), code)
            }
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for LibraryError {}

/// A specialized Result type for the catalog.
pub type LibraryResult<T> = Result<T, LibraryError>;

// One page of a store scan
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    // The page token
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

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Category {
    Adventure,
    Classics,
    Crime,
    Fantasy,
}

impl FromStr for Category {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Adventure" => Ok(Category::Adventure),
            "Classics" => Ok(Category::Classics),
            "Crime" => Ok(Category::Crime),
            "Fantasy" => Ok(Category::Fantasy),
            other => Err(LibraryError::validation(
                format!("unknown book category {}", other).as_str(), None)),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Category::Adventure => write!(f, "Adventure"),
            Category::Classics => write!(f, "Classics"),
            Category::Crime => write!(f, "Crime"),
            Category::Fantasy => write!(f, "Fantasy"),
        }
    }
}
