//! Error types for configuration, config files, group payload decoding and
//! native client calls.

use thiserror::Error;

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, KafkaClientError>;

/// A configuration put/get that the native library (or the C boundary) refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{kind} Put \"{key}\" => \"{value}\": {reason}")]
    Rejected {
        kind: &'static str,
        key: String,
        value: String,
        reason: String,
    },

    #[error("{kind} Get(\"{key}\") failed: {reason}")]
    Lookup {
        kind: &'static str,
        key: String,
        reason: String,
    },

    #[error("{kind} \"{key}\": key or value contains a NUL byte")]
    NulByte { kind: &'static str, key: String },

    #[error("{kind} has been released")]
    Released { kind: &'static str },
}

/// Fatal errors while reading a sectioned configuration file.
#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("open file \"{path}\" failed: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[file: {file}] read failed at line {line}: {source}")]
    Read {
        file: String,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("[file: {file}] line {line} (\"{raw}\") is invalid header")]
    InvalidHeader {
        file: String,
        line: usize,
        raw: String,
    },

    #[error("[file: {file}] line {line}: header \"{header}\" is not \"topic\" or \"global\"")]
    UnknownSection {
        file: String,
        line: usize,
        header: String,
    },

    #[error("[file: {file}] line {line} doesn't have a header like \"[topic]\" or \"[global]\"")]
    MissingSection { file: String, line: usize },

    #[error("[file: {file}] line {line} (\"{raw}\"): expected exactly one '='")]
    MalformedEntry {
        file: String,
        line: usize,
        raw: String,
    },

    #[error("[file: {file}] line {line}: {source}")]
    Rejected {
        file: String,
        line: usize,
        #[source]
        source: ConfigError,
    },
}

impl ConfigFileError {
    /// 1-based line number the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ConfigFileError::Open { .. } => None,
            ConfigFileError::Read { line, .. }
            | ConfigFileError::InvalidHeader { line, .. }
            | ConfigFileError::UnknownSection { line, .. }
            | ConfigFileError::MissingSection { line, .. }
            | ConfigFileError::MalformedEntry { line, .. }
            | ConfigFileError::Rejected { line, .. } => Some(*line),
        }
    }
}

/// Decoding a group metadata/assignment buffer failed; the buffer is abandoned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("read of {n} bytes at offset {pos} exceeds buffer of {size} bytes")]
    OutOfBounds { pos: usize, n: usize, size: usize },

    #[error("negative string length {length} at offset {pos}")]
    NegativeLength { pos: usize, length: i16 },

    #[error("negative array count {count} at offset {pos}")]
    NegativeCount { pos: usize, count: i32 },
}

/// Errors surfaced by the native client wrappers.
#[derive(Error, Debug)]
pub enum KafkaClientError {
    #[error("Create {kind} failed: {reason}")]
    ClientCreation { kind: &'static str, reason: String },

    #[error("Create topic \"{topic}\" failed: {reason}")]
    TopicCreation { topic: String, reason: String },

    #[error("{operation} failed: {reason} (code {code})")]
    Kafka {
        operation: &'static str,
        code: i32,
        reason: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}
