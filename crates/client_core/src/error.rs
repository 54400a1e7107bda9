use std::fmt;

use shared::domain::SortAlgorithm;
use thiserror::Error;

/// Remote operation a workbench transition performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LoadFile,
    GenerateRandom,
    Sort(SortAlgorithm),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::LoadFile => f.write_str("load file"),
            Operation::GenerateRandom => f.write_str("generate random vector"),
            Operation::Sort(algorithm) => write!(f, "sort ({})", algorithm.label()),
        }
    }
}

/// Failures detected locally, before any request reaches the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("no file selected; choose a file before loading")]
    NoFileSelected,
    #[error("failed to read file '{path}': {reason}")]
    UnreadableFile { path: String, reason: String },
    #[error("no vector to sort; load or generate a vector first")]
    EmptyVector,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{operation} failed: service responded with status {status}")]
    Status { operation: Operation, status: u16 },
    #[error("{operation} failed: {message}")]
    Transport {
        operation: Operation,
        message: String,
    },
    #[error("{operation} failed: malformed response body: {message}")]
    Decode {
        operation: Operation,
        message: String,
    },
}

impl ServiceError {
    pub(crate) fn transport(operation: Operation, err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Decode {
                operation,
                message: err.to_string(),
            }
        } else {
            ServiceError::Transport {
                operation,
                message: err.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("cannot start {requested}: {in_flight} is still in progress")]
    Busy {
        requested: Operation,
        in_flight: Operation,
    },
}

impl ClientError {
    /// HTTP status carried by a non-success service response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Service(ServiceError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}
