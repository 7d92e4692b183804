use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A quantity of loyalty points.
///
/// This is a wrapper around `rust_decimal::Decimal` so that balance math stays
/// exact. Balances are allowed to go negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Points(pub Decimal);

impl Points {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Parses a user supplied amount, e.g. `"100"` or `" 12.5 "`.
    pub fn parse(text: &str) -> Result<Self> {
        Decimal::from_str(text.trim())
            .map(Self)
            .map_err(|_| LedgerError::MalformedAmount(text.to_string()))
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| LedgerError::Overflow(format!("{self} + {rhs}")))
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or_else(|| LedgerError::Overflow(format!("{self} - {rhs}")))
    }
}

impl From<Decimal> for Points {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A member of the points network.
///
/// The date fields are display strings and are never parsed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct Account {
    #[serde(rename = "userId")]
    pub id: String,
    pub name: String,
    pub balance: Points,
    #[serde(rename = "numberOfTransactions")]
    pub transaction_count: u64,
    /// Free-form membership tag, e.g. "Member" or "Platinum".
    pub status: String,
    #[serde(rename = "expirationDate")]
    pub expiration: String,
    #[serde(rename = "joinDate")]
    pub joined: String,
    #[serde(rename = "lastModifiedDate")]
    pub modified: String,
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>, balance: Points) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance,
            ..Self::default()
        }
    }

    /// Credits the account as the receiving side of a transfer. The account is
    /// left unchanged if the new balance would overflow.
    pub fn credit(&mut self, amount: Points, modified: &str) -> Result<()> {
        self.balance = self.balance.checked_add(amount)?;
        self.touch(modified);
        Ok(())
    }

    /// Debits the account as the sending side of a transfer. There is no floor.
    pub fn debit(&mut self, amount: Points, modified: &str) -> Result<()> {
        self.balance = self.balance.checked_sub(amount)?;
        self.touch(modified);
        Ok(())
    }

    fn touch(&mut self, modified: &str) {
        self.transaction_count += 1;
        self.modified = modified.to_string();
    }
}
