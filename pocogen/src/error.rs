//! Error types for pocogen

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for pocogen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or saving generated output
#[derive(Error, Debug)]
pub enum Error {
    /// Indentation was decreased below zero (mismatched block open/close)
    #[error("Invalid indent state: cannot decrease indentation below zero (depth {depth})")]
    InvalidIndentState { depth: usize },

    /// The raw name has nothing left after cleanup
    #[error("Cannot derive an identifier from {raw:?}: nothing remains after cleanup")]
    EmptyIdentifier { raw: String },

    /// No unique suffix was found within the attempt limit
    #[error("Name exhausted: no unique identifier for {raw:?} in scope {scope:?}")]
    NameExhausted { raw: String, scope: String },

    /// The destination key cannot be resolved to a file
    #[error("Invalid destination {key:?}: {reason}")]
    InvalidDestination { key: String, reason: String },

    /// Two keys resolve to the same file, one key's file would have to be a
    /// directory of another, or a key was registered twice
    #[error("Destination collision: {key:?} and {existing:?} both claim {}", path.display())]
    DestinationCollision {
        key: String,
        existing: String,
        path: PathBuf,
    },

    /// One or more files could not be written
    #[error("{0}")]
    Persistence(PersistenceFailures),

    /// IO error outside of per-file persistence
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single file that failed to persist
#[derive(Debug)]
pub struct PersistenceFailure {
    /// Destination key as registered in the output context
    pub key: String,

    /// Resolved destination path
    pub path: PathBuf,

    /// Underlying storage error
    pub source: std::io::Error,
}

/// Every persistence failure collected during one save
#[derive(Debug, Default)]
pub struct PersistenceFailures(pub Vec<PersistenceFailure>);

impl PersistenceFailures {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersistenceFailure> {
        self.0.iter()
    }

    pub(crate) fn push(&mut self, key: &str, path: PathBuf, source: std::io::Error) {
        self.0.push(PersistenceFailure {
            key: key.to_string(),
            path,
            source,
        });
    }
}

impl fmt::Display for PersistenceFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to persist {} file(s):", self.0.len())?;
        for failure in &self.0 {
            write!(
                f,
                "\n  - {} ({}): {}",
                failure.key,
                failure.path.display(),
                failure.source
            )?;
        }
        Ok(())
    }
}
