use crate::domain::ports::StateStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;

/// Column Family holding every ledger key.
pub const CF_STATE: &str = "ledger_state";

/// A persistent state store implementation using RocksDB.
///
/// All ledger keys live in one Column Family. `commit` goes through a
/// `WriteBatch`, so the writes of one transfer land atomically.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_state = ColumnFamilyDescriptor::new(CF_STATE, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_state])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn state_cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_STATE).ok_or_else(|| {
            LedgerError::StoreUnavailable("ledger_state column family not found".to_string())
        })
    }
}

#[async_trait]
impl StateStore for RocksDBStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let cf = self.state_cf()?;
        Ok(self.db.get_cf(cf, key.as_bytes())?)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let cf = self.state_cf()?;
        self.db.put_cf(cf, key.as_bytes(), value)?;
        Ok(())
    }

    async fn commit(&self, writes: Vec<(String, Vec<u8>)>) -> Result<()> {
        let cf = self.state_cf()?;
        let mut batch = WriteBatch::default();
        for (key, value) in writes {
            batch.put_cf(cf, key.as_bytes(), value);
        }
        self.db.write(batch)?;
        Ok(())
    }
}
