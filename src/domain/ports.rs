use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Key-value state store the ledger runs against.
///
/// The store is expected to give each engine invocation a consistent view and
/// to make writes durable once they return. Every error is terminal for the
/// invocation; the engine never retries.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Applies several writes together.
    ///
    /// The default implementation issues one `put` per entry, so a failure
    /// part way through leaves the earlier writes in place. Adapters that can
    /// apply a batch all-or-nothing must override it.
    async fn commit(&self, writes: Vec<(String, Vec<u8>)>) -> Result<()> {
        for (key, value) in writes {
            self.put(&key, value).await?;
        }
        Ok(())
    }
}

pub type StateStoreBox = Box<dyn StateStore>;

/// Source of the current time for transaction timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub type ClockBox = Box<dyn Clock>;
