use crate::config::{LedgerConfig, SeedConfig};
use crate::domain::account::{Account, Points};
use crate::domain::codec::{
    CONTRACT_INDEX_KEY, Entity, REFERENCE_COUNTER_KEY, TRANSACTION_LOG_KEY,
};
use crate::domain::contract::{Contract, ContractIndex, PolicyMethod};
use crate::domain::policy;
use crate::domain::ports::{ClockBox, StateStoreBox};
use crate::domain::transaction::{
    ReferenceCounter, Transaction, TransactionLog, TransactionStatus,
};
use crate::error::{EntityKind, LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Format of the `lastModifiedDate` display string written on accounts.
pub const MODIFIED_FORMAT: &str = "%d %b %y %H:%M UTC";

/// A request to move points from one account to another.
///
/// The amount fields are kept as text: a value that does not parse is recorded
/// on the resulting transaction rather than rejected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransferRequest {
    pub to: String,
    pub from: String,
    pub r#type: String,
    pub description: String,
    pub contract_id: String,
    pub activities: i64,
    pub amount: String,
    pub money: String,
}

/// A request to create or overwrite a discount contract.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContractRegistration {
    pub id: String,
    pub title: String,
    pub condition_a: String,
    pub condition_b: String,
    pub discount_rate: String,
}

/// The transaction-processing core.
///
/// `LedgerEngine` owns no ledger state of its own: every call reloads what it
/// needs from the state store and runs to completion before returning.
/// Concurrent calls must be ordered by the store.
pub struct LedgerEngine {
    store: StateStoreBox,
    clock: ClockBox,
    config: LedgerConfig,
}

impl LedgerEngine {
    /// Creates a new `LedgerEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `store` - The key-value store holding the ledger.
    /// * `clock` - The source of transaction timestamps.
    /// * `config` - Engine settings.
    pub fn new(store: StateStoreBox, clock: ClockBox, config: LedgerConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Moves points between two accounts under the named contract.
    ///
    /// The reference number is persisted before anything else can fail, so a
    /// transfer that errors later still consumes its number. The receiver, the
    /// sender and the log are then written in a single `commit`; whether that
    /// is all-or-nothing depends on the store adapter.
    pub async fn transfer(&self, request: TransferRequest) -> Result<Transaction> {
        let now = self.clock.now();
        let mut tx = draft(request, now);

        tx.reference_number = self.allocate_reference_number().await?;

        let contract = self.resolve_contract(&tx.contract_id).await?;
        tx.amount = policy::evaluate(&tx, contract.as_ref())?;

        let modified = now.format(MODIFIED_FORMAT).to_string();
        let mut receiver = self.load_account(&tx.to).await?;
        receiver.credit(tx.amount, &modified)?;
        tx.to_name = receiver.name.clone();

        let mut writes = Vec::with_capacity(3);
        if tx.from == tx.to {
            receiver.debit(tx.amount, &modified)?;
            tx.from_name = receiver.name.clone();
        } else {
            let mut sender = self.load_account(&tx.from).await?;
            sender.debit(tx.amount, &modified)?;
            tx.from_name = sender.name.clone();
            writes.push((sender.id.clone(), sender.encode()?));
        }
        writes.push((receiver.id.clone(), receiver.encode()?));

        let mut log = self.load::<TransactionLog>(TRANSACTION_LOG_KEY).await?;
        log.append(tx.clone());
        writes.push((TRANSACTION_LOG_KEY.to_string(), log.encode()?));

        self.store.commit(writes).await?;

        tracing::info!(
            reference = tx.reference_number,
            from = %tx.from,
            to = %tx.to,
            amount = %tx.amount,
            status = tx.status.message(),
            "transfer committed"
        );
        Ok(tx)
    }

    /// Creates or overwrites a discount contract and indexes its identifier.
    ///
    /// A rate that does not parse, or lies outside `[0, 1)`, is still stored,
    /// under the title "Invalid Contract" with a zero rate. The record and the
    /// index entry go to the store in one `commit`.
    pub async fn register_contract(&self, registration: ContractRegistration) -> Result<Contract> {
        let mut contract = Contract {
            id: registration.id,
            business_id: self.config.business_id.clone(),
            business_name: self.config.business_name.clone(),
            title: registration.title,
            conditions: vec![registration.condition_a, registration.condition_b],
            method: PolicyMethod::Discount,
            ..Contract::default()
        };

        match parse_discount_rate(&registration.discount_rate) {
            Some(rate) => contract.discount_rate = rate,
            None => {
                tracing::warn!(
                    contract = %contract.id,
                    rate = %registration.discount_rate,
                    "invalid discount rate, storing contract as invalid"
                );
                contract.title = Contract::INVALID_TITLE.to_string();
            }
        }

        let mut writes = vec![(contract.id.clone(), contract.encode()?)];
        let mut index = self.load::<ContractIndex>(CONTRACT_INDEX_KEY).await?;
        if index.insert(&contract.id) {
            writes.push((CONTRACT_INDEX_KEY.to_string(), index.encode()?));
        }
        self.store.commit(writes).await?;

        tracing::info!(contract = %contract.id, "contract registered");
        Ok(contract)
    }

    /// Advances the reference counter without recording a transfer.
    /// Returns the new counter value.
    pub async fn increment_reference_number(&self) -> Result<u64> {
        Ok(self.allocate_reference_number().await? + 1)
    }

    /// Fetches a single account.
    pub async fn account(&self, id: &str) -> Result<Account> {
        self.load_account(id).await
    }

    /// The most recent transactions where `account_id` is sender or receiver,
    /// newest first, capped at the configured history limit.
    pub async fn recent_transactions(&self, account_id: &str) -> Result<TransactionLog> {
        let log = self.load::<TransactionLog>(TRANSACTION_LOG_KEY).await?;
        Ok(log.recent_for(account_id, self.config.history_limit))
    }

    /// Every registered contract, in index order.
    pub async fn contracts(&self) -> Result<Vec<Contract>> {
        let index = self.load::<ContractIndex>(CONTRACT_INDEX_KEY).await?;
        let mut contracts = Vec::with_capacity(index.len());
        for id in index.ids() {
            contracts.push(self.load::<Contract>(id).await?);
        }
        Ok(contracts)
    }

    /// The next reference number, without allocating it.
    pub async fn reference_number(&self) -> Result<u64> {
        let bytes = self.require(REFERENCE_COUNTER_KEY, EntityKind::ReferenceCounter).await?;
        Ok(ReferenceCounter::decode(Some(bytes.as_slice())).0)
    }

    /// Resets the ledger to the given accounts and contracts.
    ///
    /// Clears the transaction log and restarts the reference counter at the
    /// configured seed. Accounts and contracts not named in `seed` are left
    /// untouched in the store but drop out of the contract index.
    pub async fn seed(&self, seed: &SeedConfig) -> Result<()> {
        let mut writes = Vec::with_capacity(seed.accounts.len() + seed.contracts.len() + 3);
        for account in &seed.accounts {
            writes.push((account.id.clone(), account.encode()?));
        }
        for contract in &seed.contracts {
            writes.push((contract.id.clone(), contract.encode()?));
        }

        let index: ContractIndex = seed.contracts.iter().map(|c| c.id.as_str()).collect();
        writes.push((CONTRACT_INDEX_KEY.to_string(), index.encode()?));
        writes.push((
            TRANSACTION_LOG_KEY.to_string(),
            TransactionLog::default().encode()?,
        ));
        writes.push((
            REFERENCE_COUNTER_KEY.to_string(),
            ReferenceCounter(seed.reference_seed).encode()?,
        ));

        self.store.commit(writes).await?;
        tracing::info!(
            accounts = seed.accounts.len(),
            contracts = index.len(),
            reference_seed = seed.reference_seed,
            "ledger seeded"
        );
        Ok(())
    }

    async fn allocate_reference_number(&self) -> Result<u64> {
        let bytes = self.require(REFERENCE_COUNTER_KEY, EntityKind::ReferenceCounter).await?;
        let mut counter = ReferenceCounter::decode(Some(bytes.as_slice()));
        let reference = counter.allocate()?;
        self.store
            .put(REFERENCE_COUNTER_KEY, counter.encode()?)
            .await?;
        tracing::debug!(reference, "allocated reference number");
        Ok(reference)
    }

    /// Looks up the contract a transfer names. An identifier missing from the
    /// index means no contract applies; an indexed identifier whose record is
    /// gone is a lookup error.
    async fn resolve_contract(&self, id: &str) -> Result<Option<Contract>> {
        let index = self.load::<ContractIndex>(CONTRACT_INDEX_KEY).await?;
        if !index.contains(id) {
            tracing::debug!(contract = %id, "no registered contract, amount passes through");
            return Ok(None);
        }
        let bytes = self.require(id, EntityKind::Contract).await?;
        Ok(Some(Contract::decode(Some(bytes.as_slice()))))
    }

    async fn load_account(&self, id: &str) -> Result<Account> {
        let bytes = self.require(id, EntityKind::Account).await?;
        Ok(Account::decode(Some(bytes.as_slice())))
    }

    async fn load<E: Entity>(&self, key: &str) -> Result<E> {
        let bytes = self.store.get(key).await?;
        Ok(E::decode(bytes.as_deref()))
    }

    async fn require(&self, key: &str, kind: EntityKind) -> Result<Vec<u8>> {
        self.store
            .get(key)
            .await?
            .ok_or_else(|| LedgerError::NotFound {
                kind,
                id: key.to_string(),
            })
    }
}

/// Builds the draft transaction, recording amount fields that fail to parse.
fn draft(request: TransferRequest, now: DateTime<Utc>) -> Transaction {
    let mut tx = Transaction {
        date: now,
        to: request.to,
        from: request.from,
        r#type: request.r#type,
        description: request.description,
        contract_id: request.contract_id,
        activities: request.activities,
        ..Transaction::default()
    };

    for (field, text) in [(&mut tx.amount, &request.amount), (&mut tx.money, &request.money)] {
        match Points::parse(text) {
            Ok(points) => *field = points,
            Err(err) => {
                tracing::warn!(%err, "recording transfer with invalid amount");
                tx.status = TransactionStatus::InvalidAmount;
            }
        }
    }
    tx
}

fn parse_discount_rate(text: &str) -> Option<Decimal> {
    let rate = Decimal::from_str(text.trim()).ok()?;
    (rate >= Decimal::ZERO && rate < Decimal::ONE).then_some(rate)
}
