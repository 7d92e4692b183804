#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use points_ledger::application::engine::{LedgerEngine, TransferRequest};
use points_ledger::config::{LedgerConfig, SeedConfig};
use points_ledger::domain::account::{Account, Points};
use points_ledger::domain::contract::{Contract, PolicyMethod};
use points_ledger::domain::ports::StateStore;
use points_ledger::error::{LedgerError, Result};
use points_ledger::infrastructure::clock::FixedClock;
use points_ledger::infrastructure::in_memory::InMemoryStateStore;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub const SEED: u64 = 2_985_674_978;

pub fn june_2016() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 6, 1, 9, 0, 0).unwrap()
}

pub fn year_2099() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap()
}

pub fn account(id: &str, name: &str, balance: Decimal) -> Account {
    Account::new(id, name, Points::new(balance))
}

/// The demo ledger: four members and the travel and feedback contracts.
pub fn demo_seed() -> SeedConfig {
    let end = Utc.with_ymd_and_hms(2060, 12, 31, 11, 59, 0).unwrap();
    SeedConfig {
        reference_seed: SEED,
        accounts: vec![
            account("B1928564", "OpenFN", Decimal::from(1_000_000)),
            account("T5940872", "Open Travel", Decimal::from(500_000)),
            account("U2974034", "Natalie", Decimal::from(1001)),
            account("U3151672", "Anthony", Decimal::from(50_000)),
        ],
        contracts: vec![
            Contract {
                id: "Paris".to_string(),
                title: "Paris for Less".to_string(),
                start_date: Utc.with_ymd_and_hms(2016, 5, 11, 12, 0, 0).unwrap(),
                end_date: end,
                method: PolicyMethod::Travel,
                ..Contract::default()
            },
            Contract {
                id: "Feedback".to_string(),
                title: "Points for Feedback".to_string(),
                start_date: Utc.with_ymd_and_hms(2016, 5, 24, 12, 0, 0).unwrap(),
                end_date: end,
                method: PolicyMethod::Feedback,
                ..Contract::default()
            },
        ],
    }
}

pub async fn seeded_engine_at(store: InMemoryStateStore, now: DateTime<Utc>) -> LedgerEngine {
    let engine = LedgerEngine::new(
        Box::new(store),
        Box::new(FixedClock(now)),
        LedgerConfig::default(),
    );
    engine.seed(&demo_seed()).await.unwrap();
    engine
}

pub fn transfer(to: &str, from: &str, contract_id: &str, amount: &str) -> TransferRequest {
    TransferRequest {
        to: to.to_string(),
        from: from.to_string(),
        r#type: "Purchase".to_string(),
        description: "test transfer".to_string(),
        contract_id: contract_id.to_string(),
        activities: 0,
        amount: amount.to_string(),
        money: "0".to_string(),
    }
}

/// Wraps an in-memory store and fails every write once `fail_writes` is set.
///
/// `batched` selects between the atomic commit of the inner store and the
/// default one-put-per-key commit, which can fail halfway through.
#[derive(Clone)]
pub struct FlakyStore {
    pub inner: InMemoryStateStore,
    pub fail_writes: Arc<AtomicBool>,
    pub fail_on_key: Option<String>,
    pub batched: bool,
}

impl FlakyStore {
    pub fn new(inner: InMemoryStateStore, batched: bool) -> Self {
        Self {
            inner,
            fail_writes: Arc::new(AtomicBool::new(false)),
            fail_on_key: None,
            batched,
        }
    }

    fn should_fail(&self, key: &str) -> bool {
        self.fail_writes.load(Ordering::SeqCst)
            && self.fail_on_key.as_deref().is_none_or(|k| k == key)
    }
}

#[async_trait]
impl StateStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        if self.should_fail(key) {
            return Err(LedgerError::StoreUnavailable(format!("write to {key} refused")));
        }
        self.inner.put(key, value).await
    }

    async fn commit(&self, writes: Vec<(String, Vec<u8>)>) -> Result<()> {
        if self.batched {
            if writes.iter().any(|(key, _)| self.should_fail(key)) {
                return Err(LedgerError::StoreUnavailable("batch refused".to_string()));
            }
            return self.inner.commit(writes).await;
        }
        for (key, value) in writes {
            self.put(&key, value).await?;
        }
        Ok(())
    }
}

/// Writes an invocation file with `rows` transfers between two demo members.
pub fn generate_invocations(path: &Path, rows: usize) -> std::result::Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(file);

    for i in 1..=rows {
        let (to, from) = if i % 2 == 0 {
            ("U2974034", "U3151672")
        } else {
            ("U3151672", "U2974034")
        };
        wtr.write_record([
            "transferPoints",
            to,
            from,
            "Purchase",
            "generated",
            "none",
            "0",
            "1.5",
            "0",
        ])?;
    }
    wtr.write_record(["getReferenceNumber"])?;

    wtr.flush()?;
    Ok(())
}
