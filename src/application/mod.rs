//! Application layer containing the ledger orchestration.
//!
//! This module defines the `LedgerEngine`, which turns transfer requests,
//! contract registrations and queries into reads and writes against the
//! state store port.

pub mod engine;
