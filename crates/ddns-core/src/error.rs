//! Error types for the DDNS reconciler
//!
//! Every fallible operation in the workspace returns [`Result`]. Nothing below
//! the binary terminates the process; the binary maps an [`Error`] to one
//! diagnostic line and an exit code.

use crate::traits::{AddressFamily, RecordType};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// The step of a reconciliation pass an error happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Asking the public resolver for our address
    ResolveAddress(AddressFamily),
    /// Listing the provider's record
    CheckRecord(RecordType),
    /// Writing the new content to the provider's record
    UpdateRecord(RecordType),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ResolveAddress(family) => write!(f, "getting {} address", family),
            Stage::CheckRecord(record_type) => write!(f, "checking {} record", record_type),
            Stage::UpdateRecord(record_type) => write!(f, "updating {} record", record_type),
        }
    }
}

/// Core error type for the DDNS reconciler
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration values that parse but make no sense
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read
    #[error("Cannot load configuration file {}: {source}", path.display())]
    ConfigLoad {
        /// Path that was given on the command line
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML or misses a required field
    #[error("Cannot parse configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The request did not complete within the configured timeout
    #[error("Request timed out while {stage}.")]
    Timeout {
        /// Where the request was issued
        stage: Stage,
    },

    /// No connection could be established
    #[error("Connection error while {stage}. The internet is probably down. ({message})")]
    Connect {
        /// Where the request was issued
        stage: Stage,
        /// Transport error text
        message: String,
    },

    /// Any other transport failure (TLS, redirects, body decoding)
    #[error("Request failed while {stage}: {message}")]
    Transport {
        /// Where the request was issued
        stage: Stage,
        /// Transport error text
        message: String,
    },

    /// The remote end answered with a non-success status code
    #[error("Error {stage}. HTTP {status}")]
    Status {
        /// Where the request was issued
        stage: Stage,
        /// HTTP status code
        status: u16,
    },

    /// The record listing came back empty
    #[error("{record_type} record for {hostname} does not exist, please create it at your DNS provider.")]
    RecordNotFound {
        /// Record type that was queried
        record_type: RecordType,
        /// Fully qualified hostname that was queried
        hostname: String,
    },

    /// The response body did not have the expected shape
    #[error("Cannot parse response while {stage}: {message}")]
    InvalidResponse {
        /// Where the request was issued
        stage: Stage,
        /// What was wrong with the body
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error that is neither a timeout nor a connect failure
    pub fn transport(stage: Stage, msg: impl Into<String>) -> Self {
        Self::Transport {
            stage,
            message: msg.into(),
        }
    }

    /// Create a connection error
    pub fn connect(stage: Stage, msg: impl Into<String>) -> Self {
        Self::Connect {
            stage,
            message: msg.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(stage: Stage, msg: impl Into<String>) -> Self {
        Self::InvalidResponse {
            stage,
            message: msg.into(),
        }
    }

    /// Sort a reqwest failure into timeout, connect or other transport error
    ///
    /// Timeout is checked first: a connect attempt that times out reports both.
    #[cfg(feature = "http")]
    pub fn from_reqwest(stage: Stage, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { stage }
        } else if err.is_connect() {
            Self::connect(stage, err.to_string())
        } else {
            Self::transport(stage, err.to_string())
        }
    }

    /// Whether this error was raised before any network activity
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::ConfigLoad { .. } | Error::ConfigParse(_)
        )
    }

    /// The HTTP status code, for errors caused by a non-success response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
