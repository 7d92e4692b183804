use std::fmt;
use thiserror::Error;

/// The kind of entity a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Contract,
    ReferenceCounter,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Account => f.write_str("account"),
            EntityKind::Contract => f.write_str("contract"),
            EntityKind::ReferenceCounter => f.write_str("reference counter"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
    #[error("state store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("malformed amount: {0:?}")]
    MalformedAmount(String),
    #[error("arithmetic overflow: {0}")]
    Overflow(String),
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    #[error("{operation} expects {expected} argument(s), got {actual}")]
    InvalidArguments {
        operation: String,
        expected: usize,
        actual: usize,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LedgerError {
    fn from(err: rocksdb::Error) -> Self {
        Self::StoreUnavailable(err.into_string())
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
