//! Byte representation of the ledger entities in the state store.
//!
//! Values are JSON documents. Decoding is permissive: a key that was never
//! written, or bytes that no longer parse, decode to the zero value of the
//! entity so that first use of a key needs no special casing.

use super::account::Account;
use super::contract::{Contract, ContractIndex};
use super::transaction::{ReferenceCounter, Transaction, TransactionLog};
use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Store key of the transaction log.
pub const TRANSACTION_LOG_KEY: &str = "allTx";
/// Store key of the contract index.
pub const CONTRACT_INDEX_KEY: &str = "contractIds";
/// Store key of the reference counter.
pub const REFERENCE_COUNTER_KEY: &str = "refNumber";

pub trait Entity: Serialize + DeserializeOwned + Default {
    const KIND: &'static str;

    fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    fn decode(bytes: Option<&[u8]>) -> Self {
        let Some(bytes) = bytes else {
            return Self::default();
        };
        serde_json::from_slice(bytes).unwrap_or_else(|err| {
            tracing::warn!(kind = Self::KIND, %err, "malformed entity bytes, using zero value");
            Self::default()
        })
    }
}

impl Entity for Account {
    const KIND: &'static str = "account";
}

impl Entity for Contract {
    const KIND: &'static str = "contract";
}

impl Entity for ContractIndex {
    const KIND: &'static str = "contract index";
}

impl Entity for Transaction {
    const KIND: &'static str = "transaction";
}

impl Entity for TransactionLog {
    const KIND: &'static str = "transaction log";
}

impl Entity for ReferenceCounter {
    const KIND: &'static str = "reference counter";
}
