//! Error types and handling for nori formatting operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for nori operations
#[derive(Debug, Error)]
pub enum NoriError {
    /// Lexer or parser rejected the source text
    #[error("Parse error: {message} at line {line}, column {col}")]
    Parse {
        message: String,
        line: u32,
        col: u32,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A construct structurally required to have a child is missing one.
    /// Fatal for the affected unit: guessing a layout here would silently
    /// corrupt code.
    #[error("Missing required child of {construct}: {detail}")]
    MissingChild {
        construct: &'static str,
        detail: String,
    },

    /// The trial printer never reached its target node. Indicates a
    /// cursor/tree mismatch bug, not a user-facing formatting failure.
    #[error("Trial print never reached target node {node_id}")]
    PrintTargetNotFound { node_id: u64 },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    Structure,
    TrialPrint,
    Io,
    Internal,
}

impl NoriError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            NoriError::Parse { .. } => ErrorKind::Parse,
            NoriError::Config { .. } => ErrorKind::Config,
            NoriError::MissingChild { .. } => ErrorKind::Structure,
            NoriError::PrintTargetNotFound { .. } => ErrorKind::TrialPrint,
            NoriError::Io { .. } => ErrorKind::Io,
            NoriError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Whether the per-unit boundary should skip the unit and keep the batch
    /// running. All formatting-time errors are recoverable at that boundary;
    /// they only abort the one unit that produced them.
    pub fn skips_unit(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Structure | ErrorKind::TrialPrint | ErrorKind::Parse
        )
    }

    pub fn parse(message: impl Into<String>, line: u32, col: u32) -> Self {
        NoriError::Parse {
            message: message.into(),
            line,
            col,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        NoriError::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(
            NoriError::parse("unexpected token", 3, 7).kind(),
            ErrorKind::Parse
        );
        assert_eq!(
            NoriError::MissingChild {
                construct: "for-loop",
                detail: "control section".into(),
            }
            .kind(),
            ErrorKind::Structure
        );
        assert_eq!(
            NoriError::PrintTargetNotFound { node_id: 42 }.kind(),
            ErrorKind::TrialPrint
        );
    }

    #[test]
    fn formatting_errors_skip_the_unit() {
        assert!(NoriError::PrintTargetNotFound { node_id: 1 }.skips_unit());
        assert!(!NoriError::config("bad toml").skips_unit());
    }
}
