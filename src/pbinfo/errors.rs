//! Error types for the pbinfo client.

use std::fmt;

use reqwest::StatusCode;
use url::Url;

/// Failure of a single HTTP exchange.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network failure, timeout, or an unreadable body.
    #[error("request to {url} failed")]
    Transport {
        url: Url,
        #[source]
        source: anyhow::Error,
    },
    #[error("request to {url} failed: {status}")]
    Status { url: Url, status: StatusCode },
}

impl FetchError {
    pub fn transport(url: &Url, source: impl Into<anyhow::Error>) -> Self {
        Self::Transport {
            url: url.clone(),
            source: source.into(),
        }
    }

    pub fn url(&self) -> &Url {
        match self {
            Self::Transport { url, .. } | Self::Status { url, .. } => url,
        }
    }
}

/// The page no longer has the shape the extraction rules expect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("restrictions table not found")]
    MissingMetadataTable,
    #[error("title not found")]
    MissingTitle,
    #[error("restrictions table has {found} columns, expected {min} to {max}")]
    ColumnCount { found: usize, min: usize, max: usize },
    #[error("incomplete data ({count} example chunks instead of an even number)")]
    UnpairedExamples { count: usize },
}

/// Public operation an error happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FindProblem,
    FullTestCases,
    ExampleTestCases,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FindProblem => "find problem",
            Self::FullTestCases => "retrieve test cases for problem",
            Self::ExampleTestCases => "retrieve examples for problem",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to {operation} with ID {id}")]
    Fetch {
        operation: Operation,
        id: u32,
        #[source]
        source: FetchError,
    },
    #[error("failed to retrieve test cases for problem with ID {id}: download of {chunk} failed")]
    Chunk {
        id: u32,
        /// Test identifier and kind taken from the download link, e.g. `5001 (in)`.
        chunk: String,
        #[source]
        source: FetchError,
    },
    #[error("failed to {operation} with ID {id}: {reason}")]
    Structure {
        operation: Operation,
        id: u32,
        reason: StructureError,
    },
}

impl Error {
    pub fn problem_id(&self) -> u32 {
        match self {
            Self::Fetch { id, .. } | Self::Chunk { id, .. } | Self::Structure { id, .. } => *id,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::Fetch { operation, .. } | Self::Structure { operation, .. } => *operation,
            Self::Chunk { .. } => Operation::FullTestCases,
        }
    }

    /// The page was fetched but its markup did not match.
    pub fn structure(&self) -> Option<&StructureError> {
        match self {
            Self::Structure { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// The underlying HTTP failure, if any.
    pub fn fetch(&self) -> Option<&FetchError> {
        match self {
            Self::Fetch { source, .. } | Self::Chunk { source, .. } => Some(source),
            Self::Structure { .. } => None,
        }
    }
}

/// A JSON record could not be decoded.
#[derive(Debug, thiserror::Error)]
#[error("{message} at path '{path}' (line {line} col {column})")]
pub struct DecodeError {
    pub path: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}
