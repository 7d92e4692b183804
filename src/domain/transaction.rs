use super::account::Points;
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome recorded on a transaction, stored as a code + message pair.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(into = "StatusRecord", try_from = "StatusRecord")]
pub enum TransactionStatus {
    #[default]
    Completed,
    /// The amount or money field did not parse; the field was recorded as zero.
    InvalidAmount,
}

impl TransactionStatus {
    pub fn code(&self) -> u8 {
        match self {
            TransactionStatus::Completed => 1,
            TransactionStatus::InvalidAmount => 0,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "Transaction Completed",
            TransactionStatus::InvalidAmount => "Invalid Amount",
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StatusRecord {
    status_code: u8,
    status_msg: String,
}

impl From<TransactionStatus> for StatusRecord {
    fn from(status: TransactionStatus) -> Self {
        Self {
            status_code: status.code(),
            status_msg: status.message().to_string(),
        }
    }
}

impl Default for StatusRecord {
    fn default() -> Self {
        TransactionStatus::default().into()
    }
}

impl TryFrom<StatusRecord> for TransactionStatus {
    type Error = String;

    fn try_from(record: StatusRecord) -> Result<Self, Self::Error> {
        match record.status_code {
            1 => Ok(TransactionStatus::Completed),
            0 => Ok(TransactionStatus::InvalidAmount),
            code => Err(format!("unknown transaction status code {code}")),
        }
    }
}

/// Immutable record of one points transfer.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Transaction {
    pub reference_number: u64,
    pub date: DateTime<Utc>,
    pub description: String,
    pub r#type: String,
    /// Requested amount until evaluation, effective amount afterwards.
    pub amount: Points,
    /// Tracked for reporting only; never applied to balances.
    pub money: Points,
    #[serde(rename = "feedbackActivitiesDone")]
    pub activities: i64,
    #[serde(rename = "toUserid")]
    pub to: String,
    #[serde(rename = "fromUserid")]
    pub from: String,
    pub to_name: String,
    pub from_name: String,
    pub contract_id: String,
    /// Stored as flat `statusCode` and `statusMsg` fields.
    #[serde(flatten)]
    pub status: TransactionStatus,
}

impl Transaction {
    /// Whether `account_id` is the sender or the receiver.
    pub fn involves(&self, account_id: &str) -> bool {
        self.from == account_id || self.to == account_id
    }
}

/// Append-only history of every transfer, in transfer order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct TransactionLog {
    transactions: Vec<Transaction>,
}

impl TransactionLog {
    pub fn append(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The latest `limit` transactions touching `account_id`, most recent first.
    pub fn recent_for(&self, account_id: &str, limit: usize) -> TransactionLog {
        let transactions = self
            .transactions
            .iter()
            .rev()
            .filter(|tx| tx.involves(account_id))
            .take(limit)
            .cloned()
            .collect();
        TransactionLog { transactions }
    }
}

/// The next reference number to hand out.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(transparent)]
pub struct ReferenceCounter(pub u64);

impl ReferenceCounter {
    /// Returns the current value and advances the counter by one.
    pub fn allocate(&mut self) -> crate::error::Result<u64> {
        let current = self.0;
        self.0 = current
            .checked_add(1)
            .ok_or_else(|| LedgerError::Overflow(format!("reference number {current}")))?;
        Ok(current)
    }
}
