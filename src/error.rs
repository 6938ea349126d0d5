//! Error types for ferro-liftover
//!
//! Every error carries enough context to name the failing file, the line
//! and the reason. Per-marker mapping failures are not errors; they are
//! routed to the unmapped stream by [`crate::partition`].

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Marker table errors (E1xxx)
    /// Row has the wrong number of columns
    InvalidRowShape = 1001,
    /// Position is not a positive integer
    InvalidPosition = 1002,
    /// Identifier appears more than once
    DuplicateIdentifier = 1003,

    // Chain errors (E2xxx)
    /// Malformed or inconsistent chain file
    InvalidChain = 2001,

    // Join errors (E3xxx)
    /// Mapping outcomes disagree with the dataset
    JoinFailed = 3001,

    // Configuration errors (E8xxx)
    /// Configuration could not be loaded
    InvalidConfig = 8001,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRowShape => "wrong number of columns",
            ErrorCode::InvalidPosition => "invalid marker position",
            ErrorCode::DuplicateIdentifier => "duplicate marker identifier",
            ErrorCode::InvalidChain => "malformed chain file",
            ErrorCode::JoinFailed => "mapped stream does not match dataset",
            ErrorCode::InvalidConfig => "invalid configuration",
            ErrorCode::IoError => "file I/O error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-liftover operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LiftError {
    /// Malformed marker annotation table
    #[error("Format error in {source_name} at line {line}: {msg}")]
    Format {
        source_name: String,
        line: usize,
        msg: String,
        code: ErrorCode,
    },

    /// Malformed or inconsistent chain file
    #[error("Chain format error in {source_name} at line {line}: {msg}")]
    ChainFormat {
        source_name: String,
        line: usize,
        msg: String,
    },

    /// Mapping outcomes are inconsistent with the original dataset
    #[error("Join error: {msg}")]
    Join { msg: String },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {msg}")]
    Config { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },
}

impl LiftError {
    /// Marker table error with an explicit code
    pub fn format(
        source_name: impl Into<String>,
        line: usize,
        code: ErrorCode,
        msg: impl Into<String>,
    ) -> Self {
        LiftError::Format {
            source_name: source_name.into(),
            line,
            msg: msg.into(),
            code,
        }
    }

    /// Chain error at a line
    pub fn chain(source_name: impl Into<String>, line: usize, msg: impl Into<String>) -> Self {
        LiftError::ChainFormat {
            source_name: source_name.into(),
            line,
            msg: msg.into(),
        }
    }

    /// Join error
    pub fn join(msg: impl Into<String>) -> Self {
        LiftError::Join { msg: msg.into() }
    }

    /// Wrap an IO error with context about what was being done
    pub fn io(context: impl fmt::Display, err: std::io::Error) -> Self {
        LiftError::Io {
            msg: format!("{}: {}", context, err),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            LiftError::Format { code, .. } => *code,
            LiftError::ChainFormat { .. } => ErrorCode::InvalidChain,
            LiftError::Join { .. } => ErrorCode::JoinFailed,
            LiftError::Config { .. } => ErrorCode::InvalidConfig,
            LiftError::Io { .. } => ErrorCode::IoError,
        }
    }

    /// Line number of the offending input, when the error has one
    pub fn line(&self) -> Option<usize> {
        match self {
            LiftError::Format { line, .. } | LiftError::ChainFormat { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Error message prefixed with its code, e.g. `[E2001] Chain format error ...`
    pub fn detailed_message(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}
