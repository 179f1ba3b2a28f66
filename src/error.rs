//! Error types for the CLI and the persistence bridge.
//!
//! The task store itself never fails on a missing id; those outcomes are
//! reported through [`crate::store::Lookup`]. Errors here cover what the
//! command layer turns into a non-zero exit:
//! - 2: user error (unknown id, bad argument)
//! - 4: operation failed (disk, JSON)

use std::path::PathBuf;

use thiserror::Error;

/// Exit codes for the `tdf` binary.
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Error::NotFound {
            kind: "Task",
            id: id.into(),
        }
    }

    pub fn category_not_found(id: impl Into<String>) -> Self {
        Error::NotFound {
            kind: "Category",
            id: id.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::NotFound { .. } | Error::InvalidArgument(_) => exit_codes::USER_ERROR,
            Error::Io(_) | Error::Json(_) | Error::Persist { .. } => exit_codes::OPERATION_FAILED,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
