//! In-memory ledger for tests
//!
//! Records every client call by name so tests can assert which network
//! round-trips happened (and, as importantly, which did not).

use crate::client::ledger::{
    ClientError, LedgerClient, SimulateResponse, SubmissionSettings, SubmitResponse,
    TransactionStatus,
};
use crate::codec;
use crate::core::{AccountSnapshot, Drops, FeeLevels, ReserveSchedule, SignerList, Transaction};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub struct MockLedger {
    accounts: Mutex<HashMap<String, AccountSnapshot>>,
    signer_lists: Mutex<HashMap<String, SignerList>>,
    objects: Mutex<HashMap<String, Vec<Value>>>,
    engine_result: Mutex<String>,
    calls: Mutex<Vec<String>>,
    submitted: Mutex<Vec<String>>,
    reserve: ReserveSchedule,
    fees: FeeLevels,
    ledger: u32,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            signer_lists: Mutex::new(HashMap::new()),
            objects: Mutex::new(HashMap::new()),
            engine_result: Mutex::new("tesSUCCESS".to_string()),
            calls: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            reserve: ReserveSchedule::new(Drops(10_000_000), Drops(200_000)),
            fees: FeeLevels::flat(Drops(10)),
            ledger: 1_000,
        }
    }

    pub fn add_account(&self, address: &str, balance: Drops, owner_count: u32, sequence: u32) {
        self.accounts.lock().unwrap().insert(
            address.to_string(),
            AccountSnapshot {
                address: address.to_string(),
                balance,
                owner_count,
                sequence,
                flags: 0,
            },
        );
    }

    pub fn set_signer_list(&self, address: &str, list: SignerList) {
        self.signer_lists
            .lock()
            .unwrap()
            .insert(address.to_string(), list);
    }

    pub fn add_object(&self, address: &str, object: Value) {
        self.objects
            .lock()
            .unwrap()
            .entry(address.to_string())
            .or_default()
            .push(object);
    }

    pub fn set_engine_result(&self, result: &str) {
        *self.engine_result.lock().unwrap() = result.to_string();
    }

    pub fn reserve(&self) -> ReserveSchedule {
        self.reserve
    }

    pub fn current_ledger(&self) -> u32 {
        self.ledger
    }

    /// Names of the client methods called so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Blobs submitted so far, decoded
    pub fn submitted(&self) -> Vec<Transaction> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|blob| codec::decode(blob).unwrap())
            .collect()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn account_info(&self, address: &str) -> Result<AccountSnapshot, ClientError> {
        self.record("account_info");
        self.accounts
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| ClientError::AccountNotFound(address.to_string()))
    }

    async fn reserve_schedule(&self) -> Result<ReserveSchedule, ClientError> {
        self.record("reserve_schedule");
        Ok(self.reserve)
    }

    async fn fee_levels(&self) -> Result<FeeLevels, ClientError> {
        self.record("fee_levels");
        Ok(self.fees)
    }

    async fn ledger_index(&self) -> Result<u32, ClientError> {
        self.record("ledger_index");
        Ok(self.ledger)
    }

    async fn signer_list(&self, address: &str) -> Result<Option<SignerList>, ClientError> {
        self.record("signer_list");
        Ok(self.signer_lists.lock().unwrap().get(address).cloned())
    }

    async fn account_objects(&self, address: &str) -> Result<Vec<Value>, ClientError> {
        self.record("account_objects");
        Ok(self
            .objects
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .unwrap_or_default())
    }

    async fn submit(&self, tx_blob: &str) -> Result<SubmitResponse, ClientError> {
        self.record("submit");
        self.submitted.lock().unwrap().push(tx_blob.to_string());
        let engine_result = self.engine_result.lock().unwrap().clone();
        Ok(SubmitResponse {
            hash: codec::transaction_hash(tx_blob)?,
            engine_result: engine_result.clone(),
            engine_result_message: None,
            validated: false,
            raw: json!({ "engine_result": engine_result }),
        })
    }

    async fn simulate(&self, tx: &Transaction) -> Result<SimulateResponse, ClientError> {
        self.record("simulate");
        // Same encoding the network would receive
        codec::encode(tx)?;
        let engine_result = self.engine_result.lock().unwrap().clone();
        Ok(SimulateResponse {
            engine_result: engine_result.clone(),
            engine_result_message: None,
            raw: json!({ "applied": false, "engine_result": engine_result }),
        })
    }

    async fn transaction(&self, hash: &str) -> Result<Option<TransactionStatus>, ClientError> {
        self.record("transaction");
        let known = self
            .submitted
            .lock()
            .unwrap()
            .iter()
            .any(|blob| codec::transaction_hash(blob).map(|h| h == hash).unwrap_or(false));
        Ok(known.then(|| TransactionStatus {
            validated: true,
            result: Some("tesSUCCESS".to_string()),
            raw: json!({ "hash": hash, "validated": true }),
        }))
    }

    fn settings(&self) -> SubmissionSettings {
        SubmissionSettings {
            poll_interval: Duration::from_millis(1),
            ..SubmissionSettings::default()
        }
    }
}
