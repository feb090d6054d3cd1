//! JSON-over-WebSocket ledger client
//!
//! Requests are tagged with an increasing `id`; responses with other ids
//! (and any unsolicited stream messages) are skipped while waiting.

use crate::client::ledger::{
    ClientError, LedgerClient, SimulateResponse, SubmissionSettings, SubmitResponse,
    TransactionStatus,
};
use crate::codec;
use crate::core::{
    AccountSnapshot, Drops, FeeLevels, ReserveSchedule, SignerEntry, SignerEntryWrapper,
    SignerList, Transaction,
};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Ledger client speaking the JSON WebSocket API
pub struct WsLedgerClient {
    url: String,
    stream: Mutex<WsStream>,
    next_id: AtomicU64,
    settings: SubmissionSettings,
}

impl WsLedgerClient {
    /// Connect to `url` (`ws://`, or `wss://` with the `tls` feature)
    pub async fn connect(url: &str, settings: SubmissionSettings) -> Result<Self, ClientError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| ClientError::Connection(format!("{}: {}", url, e)))?;
        log::info!("Connected to {}", url);

        Ok(Self {
            url: url.to_string(),
            stream: Mutex::new(stream),
            next_id: AtomicU64::new(1),
            settings,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one command and wait for its response's `result`
    pub async fn request(&self, command: &str, params: Value) -> Result<Value, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut body = match params {
            Value::Object(map) => map,
            Value::Null => serde_json::Map::new(),
            other => {
                return Err(ClientError::UnexpectedResponse(format!(
                    "request params must be an object, got {}",
                    other
                )))
            }
        };
        body.insert("id".to_string(), json!(id));
        body.insert("command".to_string(), json!(command));

        let mut stream = self.stream.lock().await;
        log::trace!("-> {} #{}", command, id);
        stream
            .send(Message::Text(Value::Object(body).to_string().into()))
            .await?;

        while let Some(message) = stream.next().await {
            match message? {
                Message::Text(text) => {
                    let response: Value = serde_json::from_str(&text)?;
                    if response.get("id").and_then(Value::as_u64) != Some(id) {
                        log::trace!("Skipping unrelated message");
                        continue;
                    }
                    log::trace!("<- {} #{}", command, id);
                    return into_result(response);
                }
                Message::Ping(payload) => stream.send(Message::Pong(payload)).await?,
                Message::Close(_) => {
                    return Err(ClientError::Connection("server closed the connection".to_string()))
                }
                _ => {}
            }
        }

        Err(ClientError::Connection("stream ended".to_string()))
    }

    /// Close the connection
    pub async fn close(&self) -> Result<(), ClientError> {
        let mut stream = self.stream.lock().await;
        stream.close(None).await?;
        Ok(())
    }
}

fn into_result(response: Value) -> Result<Value, ClientError> {
    if response.get("status").and_then(Value::as_str) == Some("error") {
        let code = response
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let message = response
            .get("error_message")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        return Err(ClientError::Ledger { code, message });
    }

    response
        .get("result")
        .cloned()
        .ok_or_else(|| ClientError::UnexpectedResponse("response has no result".to_string()))
}

// =============================================================================
// Field helpers
// =============================================================================

fn field<'a>(value: &'a Value, key: &str) -> Result<&'a Value, ClientError> {
    value
        .get(key)
        .ok_or_else(|| ClientError::UnexpectedResponse(format!("missing field {}", key)))
}

fn field_u32(value: &Value, key: &str) -> Result<u32, ClientError> {
    field(value, key)?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ClientError::UnexpectedResponse(format!("{} is not a u32", key)))
}

/// Drops arrive as strings in some responses and numbers in others
fn field_drops(value: &Value, key: &str) -> Result<Drops, ClientError> {
    match field(value, key)? {
        Value::String(s) => Ok(Drops::from_drops_str(s)?),
        Value::Number(n) => n
            .as_u64()
            .map(Drops)
            .ok_or_else(|| ClientError::UnexpectedResponse(format!("{} is not drops", key))),
        _ => Err(ClientError::UnexpectedResponse(format!("{} is not drops", key))),
    }
}

fn parse_account(address: &str, data: &Value) -> Result<AccountSnapshot, ClientError> {
    Ok(AccountSnapshot {
        address: address.to_string(),
        balance: field_drops(data, "Balance")?,
        owner_count: field_u32(data, "OwnerCount")?,
        sequence: field_u32(data, "Sequence")?,
        flags: data.get("Flags").and_then(Value::as_u64).unwrap_or(0) as u32,
    })
}

fn parse_signer_list(object: &Value) -> Result<SignerList, ClientError> {
    let entries: Vec<SignerEntryWrapper> =
        serde_json::from_value(field(object, "SignerEntries")?.clone())?;
    Ok(SignerList {
        quorum: field_u32(object, "SignerQuorum")?,
        entries: entries
            .into_iter()
            .map(|w| w.signer_entry)
            .collect::<Vec<SignerEntry>>(),
    })
}

fn parse_simulation(result: Value) -> Result<SimulateResponse, ClientError> {
    let engine_result = field(&result, "engine_result")?
        .as_str()
        .ok_or_else(|| ClientError::UnexpectedResponse("engine_result is not text".to_string()))?
        .to_string();
    Ok(SimulateResponse {
        engine_result,
        engine_result_message: result
            .get("engine_result_message")
            .and_then(Value::as_str)
            .map(str::to_string),
        raw: result,
    })
}

fn account_not_found(error: ClientError, address: &str) -> ClientError {
    match error {
        ClientError::Ledger { code, .. } if code == "actNotFound" => {
            ClientError::AccountNotFound(address.to_string())
        }
        other => other,
    }
}

#[async_trait]
impl LedgerClient for WsLedgerClient {
    async fn account_info(&self, address: &str) -> Result<AccountSnapshot, ClientError> {
        let result = self
            .request(
                "account_info",
                json!({ "account": address, "ledger_index": "current" }),
            )
            .await
            .map_err(|e| account_not_found(e, address))?;
        parse_account(address, field(&result, "account_data")?)
    }

    async fn reserve_schedule(&self) -> Result<ReserveSchedule, ClientError> {
        let result = self.request("server_state", Value::Null).await?;
        let ledger = field(field(&result, "state")?, "validated_ledger")?;
        Ok(ReserveSchedule::new(
            field_drops(ledger, "reserve_base")?,
            field_drops(ledger, "reserve_inc")?,
        ))
    }

    async fn fee_levels(&self) -> Result<FeeLevels, ClientError> {
        let result = self.request("fee", Value::Null).await?;
        let drops = field(&result, "drops")?;
        Ok(FeeLevels {
            base: field_drops(drops, "base_fee")?,
            open_ledger: field_drops(drops, "open_ledger_fee")?,
            median: field_drops(drops, "median_fee")?,
            minimum: field_drops(drops, "minimum_fee")?,
        })
    }

    async fn ledger_index(&self) -> Result<u32, ClientError> {
        let result = self.request("ledger_current", Value::Null).await?;
        field_u32(&result, "ledger_current_index")
    }

    async fn signer_list(&self, address: &str) -> Result<Option<SignerList>, ClientError> {
        let result = self
            .request(
                "account_info",
                json!({ "account": address, "ledger_index": "validated", "signer_lists": true }),
            )
            .await
            .map_err(|e| account_not_found(e, address))?;

        // API v2 puts signer_lists at the top level, v1 inside account_data
        let lists = result
            .get("signer_lists")
            .or_else(|| result.get("account_data").and_then(|d| d.get("signer_lists")))
            .and_then(Value::as_array);

        match lists.and_then(|l| l.first()) {
            Some(object) => Ok(Some(parse_signer_list(object)?)),
            None => Ok(None),
        }
    }

    async fn account_objects(&self, address: &str) -> Result<Vec<Value>, ClientError> {
        let mut objects = Vec::new();
        let mut marker: Option<Value> = None;

        loop {
            let mut params = json!({ "account": address, "ledger_index": "validated" });
            if let Some(m) = marker.take() {
                params["marker"] = m;
            }

            let result = self
                .request("account_objects", params)
                .await
                .map_err(|e| account_not_found(e, address))?;

            if let Some(page) = result.get("account_objects").and_then(Value::as_array) {
                objects.extend(page.iter().cloned());
            }

            match result.get("marker") {
                Some(m) if !m.is_null() => marker = Some(m.clone()),
                _ => break,
            }
        }

        Ok(objects)
    }

    async fn submit(&self, tx_blob: &str) -> Result<SubmitResponse, ClientError> {
        let result = self.request("submit", json!({ "tx_blob": tx_blob })).await?;

        let engine_result = field(&result, "engine_result")?
            .as_str()
            .unwrap_or_default()
            .to_string();
        let hash = result
            .get("tx_json")
            .and_then(|t| t.get("hash"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(SubmitResponse {
            hash,
            engine_result,
            engine_result_message: result
                .get("engine_result_message")
                .and_then(Value::as_str)
                .map(str::to_string),
            validated: false,
            raw: result,
        })
    }

    async fn simulate(&self, tx: &Transaction) -> Result<SimulateResponse, ClientError> {
        let mut unsigned = tx.clone();
        unsigned.strip_signatures();
        if unsigned.common.signing_pub_key.is_none() {
            unsigned.common.signing_pub_key = Some(String::new());
        }
        let tx_blob = codec::encode(&unsigned)?;
        let result = self.request("simulate", json!({ "tx_blob": tx_blob })).await?;
        parse_simulation(result)
    }

    async fn transaction(&self, hash: &str) -> Result<Option<TransactionStatus>, ClientError> {
        let result = match self.request("tx", json!({ "transaction": hash })).await {
            Ok(result) => result,
            Err(ClientError::Ledger { code, .. }) if code == "txnNotFound" => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(Some(TransactionStatus {
            validated: result
                .get("validated")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            result: result
                .get("meta")
                .and_then(|m| m.get("TransactionResult"))
                .and_then(Value::as_str)
                .map(str::to_string),
            raw: result,
        }))
    }

    fn settings(&self) -> SubmissionSettings {
        self.settings
    }
}
