use crate::application::engine::{ContractRegistration, LedgerEngine, TransferRequest};
use crate::config::SeedConfig;
use crate::error::{LedgerError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Every operation the ledger can be invoked with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Init,
    TransferPoints,
    AddSmartContract,
    IncrementReferenceNumber,
    GetUserAccount,
    GetTxs,
    GetAllContracts,
    GetReferenceNumber,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Init => "init",
            Operation::TransferPoints => "transferPoints",
            Operation::AddSmartContract => "addSmartContract",
            Operation::IncrementReferenceNumber => "incrementReferenceNumber",
            Operation::GetUserAccount => "getUserAccount",
            Operation::GetTxs => "getTxs",
            Operation::GetAllContracts => "getAllContracts",
            Operation::GetReferenceNumber => "getReferenceNumber",
        }
    }

    /// Number of positional arguments the operation takes.
    pub fn arity(&self) -> usize {
        match self {
            Operation::TransferPoints => 8,
            Operation::AddSmartContract => 5,
            Operation::GetUserAccount | Operation::GetTxs => 1,
            Operation::Init
            | Operation::IncrementReferenceNumber
            | Operation::GetAllContracts
            | Operation::GetReferenceNumber => 0,
        }
    }

    /// Whether the operation only reads ledger state.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Operation::GetUserAccount
                | Operation::GetTxs
                | Operation::GetAllContracts
                | Operation::GetReferenceNumber
        )
    }
}

impl FromStr for Operation {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "init" => Ok(Operation::Init),
            "transferPoints" => Ok(Operation::TransferPoints),
            "addSmartContract" => Ok(Operation::AddSmartContract),
            "incrementReferenceNumber" => Ok(Operation::IncrementReferenceNumber),
            "getUserAccount" => Ok(Operation::GetUserAccount),
            "getTxs" => Ok(Operation::GetTxs),
            "getAllContracts" => Ok(Operation::GetAllContracts),
            "getReferenceNumber" => Ok(Operation::GetReferenceNumber),
            other => Err(LedgerError::UnknownOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps named operations with string arguments onto engine calls and encodes
/// the results as JSON bytes.
pub struct Dispatcher {
    engine: LedgerEngine,
    seed: Option<SeedConfig>,
}

impl Dispatcher {
    pub fn new(engine: LedgerEngine) -> Self {
        Self { engine, seed: None }
    }

    /// Enables the `init` operation, which re-seeds the ledger from `seed`.
    pub fn with_seed(mut self, seed: SeedConfig) -> Self {
        self.seed = Some(seed);
        self
    }

    pub async fn invoke(&self, name: &str, args: &[String]) -> Result<Vec<u8>> {
        let operation: Operation = name.parse()?;
        if args.len() != operation.arity() {
            return Err(LedgerError::InvalidArguments {
                operation: operation.to_string(),
                expected: operation.arity(),
                actual: args.len(),
            });
        }
        tracing::debug!(%operation, query = operation.is_query(), "dispatching");

        match operation {
            Operation::Init => {
                let seed = self.seed.as_ref().ok_or_else(|| {
                    LedgerError::Config("no seed configuration for init".to_string())
                })?;
                self.engine.seed(seed).await?;
                Ok(Vec::new())
            }
            Operation::TransferPoints => {
                let request = TransferRequest {
                    to: args[0].clone(),
                    from: args[1].clone(),
                    r#type: args[2].clone(),
                    description: args[3].clone(),
                    contract_id: args[4].clone(),
                    activities: parse_activities(&args[5]),
                    amount: args[6].clone(),
                    money: args[7].clone(),
                };
                to_bytes(&self.engine.transfer(request).await?)
            }
            Operation::AddSmartContract => {
                let registration = ContractRegistration {
                    id: args[0].clone(),
                    title: args[1].clone(),
                    condition_a: args[2].clone(),
                    condition_b: args[3].clone(),
                    discount_rate: args[4].clone(),
                };
                to_bytes(&self.engine.register_contract(registration).await?)
            }
            Operation::IncrementReferenceNumber => {
                to_bytes(&self.engine.increment_reference_number().await?)
            }
            Operation::GetUserAccount => to_bytes(&self.engine.account(&args[0]).await?),
            Operation::GetTxs => to_bytes(&self.engine.recent_transactions(&args[0]).await?),
            Operation::GetAllContracts => to_bytes(&self.engine.contracts().await?),
            Operation::GetReferenceNumber => to_bytes(&self.engine.reference_number().await?),
        }
    }
}

fn parse_activities(text: &str) -> i64 {
    text.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(activities = %text, "unparseable activity count, using 0");
        0
    })
}

fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::domain::account::{Account, Points};
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::in_memory::InMemoryStateStore;
    use rust_decimal_macros::dec;

    fn dispatcher() -> Dispatcher {
        let engine = LedgerEngine::new(
            Box::new(InMemoryStateStore::new()),
            Box::new(SystemClock),
            LedgerConfig::default(),
        );
        Dispatcher::new(engine).with_seed(SeedConfig {
            reference_seed: 7,
            accounts: vec![
                Account::new("A", "Alice", Points::new(dec!(10))),
                Account::new("B", "Bob", Points::ZERO),
            ],
            contracts: vec![],
        })
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_operation_names_round_trip() {
        for op in [
            Operation::Init,
            Operation::TransferPoints,
            Operation::AddSmartContract,
            Operation::IncrementReferenceNumber,
            Operation::GetUserAccount,
            Operation::GetTxs,
            Operation::GetAllContracts,
            Operation::GetReferenceNumber,
        ] {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let err = dispatcher().invoke("deleteEverything", &[]).await.unwrap_err();
        assert!(matches!(err, LedgerError::UnknownOperation(name) if name == "deleteEverything"));
    }

    #[tokio::test]
    async fn test_wrong_arity() {
        let err = dispatcher()
            .invoke("getUserAccount", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidArguments {
                expected: 1,
                actual: 0,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_init_then_transfer_and_query() {
        let d = dispatcher();
        assert!(d.invoke("init", &[]).await.unwrap().is_empty());

        let bytes = d
            .invoke(
                "transferPoints",
                &args(&["B", "A", "gift", "hello", "none", "x", "4", "0"]),
            )
            .await
            .unwrap();
        let tx: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(tx["referenceNumber"], 7);
        assert_eq!(tx["feedbackActivitiesDone"], 0);

        let bytes = d.invoke("getUserAccount", &args(&["B"])).await.unwrap();
        let bob: Account = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(bob.balance, Points::new(dec!(4)));

        let bytes = d.invoke("getReferenceNumber", &[]).await.unwrap();
        assert_eq!(bytes, b"8");
    }

    #[tokio::test]
    async fn test_init_without_seed_is_config_error() {
        let engine = LedgerEngine::new(
            Box::new(InMemoryStateStore::new()),
            Box::new(SystemClock),
            LedgerConfig::default(),
        );
        let err = Dispatcher::new(engine).invoke("init", &[]).await.unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }
}
