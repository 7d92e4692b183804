//! Contract evaluation: turns a draft transaction into the effective amount.
//!
//! Evaluation is pure. Loading the contract is the caller's job, so a lookup
//! failure surfaces as an error there instead of as a magic amount here.

use super::account::Points;
use super::contract::{Contract, PolicyMethod};
use super::transaction::Transaction;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Flat bonus paid by a feedback contract.
pub const FEEDBACK_BONUS: Decimal = dec!(1000);
/// Bonus paid per recorded activity by a feedback contract.
pub const FEEDBACK_BONUS_PER_ACTIVITY: Decimal = dec!(100);

/// Computes the amount to move between the two accounts.
///
/// `contract` is `None` when the transaction names a contract that is not
/// registered, in which case the requested amount passes through unchanged.
/// Fails with `Overflow` when the effective amount is out of decimal range.
pub fn evaluate(tx: &Transaction, contract: Option<&Contract>) -> Result<Points> {
    let Some(contract) = contract else {
        return Ok(tx.amount);
    };

    let effective = match contract.method {
        PolicyMethod::Travel => travel(tx, contract),
        PolicyMethod::Feedback => feedback(tx, contract),
        PolicyMethod::Discount => discount(tx, contract)?,
    };
    tracing::debug!(
        contract = %contract.id,
        method = ?contract.method,
        requested = %tx.amount,
        %effective,
        "evaluated contract"
    );
    Ok(effective)
}

fn travel(tx: &Transaction, contract: &Contract) -> Points {
    if contract.is_active_at(tx.date) {
        Points::new(tx.amount.value() * dec!(0.5))
    } else {
        tx.amount
    }
}

fn feedback(tx: &Transaction, contract: &Contract) -> Points {
    if !contract.is_active_at(tx.date) {
        return Points::ZERO;
    }
    let activities = Decimal::from(tx.activities.max(0));
    Points::new(FEEDBACK_BONUS + FEEDBACK_BONUS_PER_ACTIVITY * activities)
}

// The rate is not range checked here: out of range values were either let in
// by an older registration or written straight to the store.
fn discount(tx: &Transaction, contract: &Contract) -> Result<Points> {
    let amount = tx.amount.value();
    amount
        .checked_mul(contract.discount_rate)
        .and_then(|off| amount.checked_sub(off))
        .map(Points::new)
        .ok_or_else(|| {
            LedgerError::Overflow(format!(
                "{amount} at discount rate {}",
                contract.discount_rate
            ))
        })
}
