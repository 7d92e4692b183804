//! Ledger entities, their store encoding, contract evaluation and the ports
//! the application layer depends on.

pub mod account;
pub mod codec;
pub mod contract;
pub mod policy;
pub mod ports;
pub mod transaction;
