//! Error handling for classification and WHOIS operations.
//!
//! A single error type covers every way a classification run or a WHOIS
//! probe can fail, from a missing input list to an unreachable WHOIS server.

use std::fmt;
use std::path::Path;

/// Main error type for the library.
#[derive(Debug, Clone)]
pub enum PatternError {
    /// The domain list to classify does not exist
    InputNotFound { path: String },

    /// The domain list exists but could not be read
    FileError { path: String, message: String },

    /// The output directory could not be created
    DirectoryCreation { path: String, message: String },

    /// An output file could not be written
    WriteError { path: String, message: String },

    /// Configuration errors (invalid TOML, bad values)
    ConfigError { message: String },

    /// WHOIS lookup errors, structured or command-line
    WhoisError { domain: String, message: String },

    /// Timeout errors when operations take too long
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// Serialization failures and other errors outside the categories above
    Internal { message: String },
}

impl PatternError {
    /// Create a new missing-input error.
    pub fn input_not_found<P: AsRef<Path>>(path: P) -> Self {
        Self::InputNotFound {
            path: path.as_ref().display().to_string(),
        }
    }

    /// Create a new file read error.
    pub fn file_error<P: AsRef<Path>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Create a new directory creation error.
    pub fn directory_creation<P: AsRef<Path>, M: Into<String>>(path: P, message: M) -> Self {
        Self::DirectoryCreation {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Create a new output write error.
    pub fn write_error<P: AsRef<Path>, M: Into<String>>(path: P, message: M) -> Self {
        Self::WriteError {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new WHOIS error.
    pub fn whois<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::WhoisError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Whether this error left no output behind.
    ///
    /// Write failures are the only ones that can occur after some output
    /// files already exist.
    pub fn is_clean_halt(&self) -> bool {
        !matches!(self, Self::WriteError { .. })
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputNotFound { path } => {
                write!(f, "Input file '{}' does not exist", path)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::DirectoryCreation { path, message } => {
                write!(f, "Cannot create output directory '{}': {}", path, message)
            }
            Self::WriteError { path, message } => {
                write!(f, "Failed to write '{}': {}", path, message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::WhoisError { domain, message } => {
                write!(f, "WHOIS error for '{}': {}", domain, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for PatternError {}

impl From<toml::de::Error> for PatternError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}

impl From<serde_json::Error> for PatternError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON serialization failed: {}", err),
        }
    }
}
