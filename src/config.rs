//! TOML configuration for the engine and for provisioning a fresh ledger.

use crate::domain::account::Account;
use crate::domain::contract::Contract;
use crate::error::{LedgerError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Reference number handed to the first transfer of a freshly seeded ledger.
pub const DEFAULT_REFERENCE_SEED: u64 = 2_985_674_978;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Maximum number of transactions returned by a history query.
    pub history_limit: usize,
    /// Business recorded as the owner of contracts registered at runtime.
    pub business_id: String,
    pub business_name: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            history_limit: 27,
            business_id: "T5940872".to_string(),
            business_name: "Open Travel".to_string(),
        }
    }
}

/// Initial ledger contents written by provisioning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub reference_seed: u64,
    pub accounts: Vec<Account>,
    pub contracts: Vec<Contract>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            reference_seed: DEFAULT_REFERENCE_SEED,
            accounts: Vec::new(),
            contracts: Vec::new(),
        }
    }
}

/// Reads and parses a TOML file.
pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|err| LedgerError::Config(format!("{}: {err}", path.display())))?;
    Ok(toml::from_str(&text)?)
}
