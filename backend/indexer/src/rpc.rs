//! Soroban RPC client — polls `getEvents` and decodes SosRS events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//!
//! ## Filters
//!
//! `getEvents` accepts at most [`MAX_FILTERS`] filters of at most
//! [`MAX_IDS_PER_FILTER`] contract ids each, so one request covers at most
//! [`MAX_CONTRACTS_PER_REQUEST`] contracts.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, SosrsEvent};
use crate::xdr;

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

pub const MAX_FILTERS: usize = 5;
pub const MAX_IDS_PER_FILTER: usize = 5;
pub const MAX_CONTRACTS_PER_REQUEST: usize = MAX_FILTERS * MAX_IDS_PER_FILTER;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Topic list, each entry base64 `ScVal` XDR or its JSON rendering
    pub topic: Vec<String>,
    /// Event data: base64 `ScVal` XDR, a JSON `ScVal`, or a plain JSON object
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    /// Unique event id assigned by the RPC (`<toid>-<index>`)
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

/// One page of `getEvents` output.
#[derive(Debug)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events emitted by `contract_ids`.
///
/// * `start_ledger` — the ledger sequence to scan from (inclusive); ignored
///   when `cursor` is given.
/// * `cursor`       — optional opaque pagination cursor from a previous page.
/// * `limit`        — maximum number of events to return.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_ids: &[String],
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventPage> {
    if contract_ids.len() > MAX_CONTRACTS_PER_REQUEST {
        return Err(IndexerError::EventParse(format!(
            "{} contract ids exceed the per-request maximum of {MAX_CONTRACTS_PER_REQUEST}",
            contract_ids.len()
        )));
    }

    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(contract_ids, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                continue;
            }
            Ok(resp) => {
                let status = resp.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    warn!("Rate-limited by RPC (will retry in {backoff}s)");
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let body: RpcResponse = resp.json().await?;

                if let Some(err) = body.error {
                    // Malformed request / unknown method / bad params cannot
                    // succeed on retry.
                    if matches!(err.code, -32600 | -32601 | -32602) {
                        return Err(IndexerError::EventParse(format!(
                            "RPC hard error {}: {}",
                            err.code, err.message
                        )));
                    }
                    warn!(
                        "RPC soft error (will retry in {backoff}s): {} {}",
                        err.code, err.message
                    );
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let result = body.result.ok_or_else(|| {
                    IndexerError::EventParse("Empty result from getEvents".to_string())
                })?;

                debug!(
                    "Fetched {} events (latest_ledger={:?})",
                    result.events.len(),
                    result.latest_ledger
                );

                return Ok(EventPage {
                    events: result.events,
                    cursor: result.cursor,
                    latest_ledger: result.latest_ledger,
                });
            }
        }
    }
}

fn build_params(
    contract_ids: &[String],
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Value {
    let filters: Vec<Value> = contract_ids
        .chunks(MAX_IDS_PER_FILTER)
        .map(|ids| {
            json!({
                "type": "contract",
                "contractIds": ids,
            })
        })
        .collect();

    let mut params = json!({
        "filters": filters,
        "pagination": {
            "limit": limit
        }
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`SosrsEvent`] structs.
///
/// Events from failed contract calls and events without an id are dropped.
pub fn decode_events(raw: &[RawEvent]) -> Vec<SosrsEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call != Some(false))
        .filter_map(decode_single)
        .collect()
}

fn decode_single(raw: &RawEvent) -> Option<SosrsEvent> {
    let event_id = raw.id.clone().or_else(|| raw.paging_token.clone())?;
    let contract_id = raw.contract_id.clone()?;
    let kind = EventKind::from_topic(&decode_topic(raw.topic.first()?));

    let data = decode_value(&raw.value);
    let campaign_id = raw
        .topic
        .get(1)
        .map(|t| decode_topic(t))
        .or_else(|| field(&data, &["campaign_id"]));

    let (actor, counterparty, amount) = decode_data(&data, kind);

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = field(&data, &["timestamp"])
        .and_then(|t| t.parse::<i64>().ok())
        .or_else(|| raw.ledger_closed_at.as_deref().and_then(parse_iso_to_unix))
        .unwrap_or(0);

    Some(SosrsEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        campaign_id,
        actor,
        counterparty,
        amount,
        ledger,
        timestamp,
        contract_id,
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Pick `(actor, counterparty, amount)` out of the flattened event data.
fn decode_data(
    data: &Value,
    kind: EventKind,
) -> (Option<String>, Option<String>, Option<String>) {
    match kind {
        EventKind::CampaignCreated => (
            field(data, &["owner"]),
            field(data, &["contract_address"]),
            None,
        ),
        EventKind::DonationReceived => {
            (field(data, &["donor"]), None, field(data, &["amount"]))
        }
        EventKind::WithdrawExecuted => {
            (field(data, &["owner"]), None, field(data, &["amount"]))
        }
        EventKind::CampaignClosed => (field(data, &["owner"]), None, None),
        EventKind::OwnershipTransferred => (
            field(data, &["previous_owner"]),
            field(data, &["new_owner"]),
            None,
        ),
        EventKind::Unknown => (None, None, None),
    }
}

fn field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Flatten the event value, decoding it first when it is base64 XDR.
fn decode_value(value: &Value) -> Value {
    match value {
        Value::String(encoded) => xdr::decode_base64(encoded).unwrap_or_else(|e| {
            debug!("Undecodable event value {encoded:?}: {e}");
            Value::Null
        }),
        other => flatten_scval(other),
    }
}

/// Turn the JSON rendering of an `ScVal` into plain JSON.
///
/// `{"map":[{"key":{"symbol":"amount"},"val":{"i128":"5"}}]}` becomes
/// `{"amount":"5"}`; `{"u64":"7"}` becomes `"7"`; scalar wrappers
/// (`symbol`, `string`, `address`, integers, `bool`) are unwrapped. Values
/// that are not in `ScVal` form are returned unchanged.
pub fn flatten_scval(value: &Value) -> Value {
    let Value::Object(obj) = value else {
        return value.clone();
    };

    if let (1, Some((tag, inner))) = (obj.len(), obj.iter().next()) {
        match tag.as_str() {
            "map" => {
                if let Value::Array(entries) = inner {
                    let mut out = Map::new();
                    for entry in entries {
                        let key = entry.get("key").map(flatten_scval);
                        let val = entry.get("val").map(flatten_scval);
                        if let (Some(Value::String(k)), Some(v)) = (key, val) {
                            out.insert(k, v);
                        }
                    }
                    return Value::Object(out);
                }
            }
            "vec" => {
                if let Value::Array(items) = inner {
                    return Value::Array(items.iter().map(flatten_scval).collect());
                }
            }
            "symbol" | "string" | "address" | "bool" | "u32" | "i32" | "u64" | "i64"
            | "u128" | "i128" | "timepoint" | "duration" => {
                return match inner {
                    Value::Number(n) => Value::String(n.to_string()),
                    other => other.clone(),
                };
            }
            _ => {}
        }
    }

    Value::Object(
        obj.iter()
            .map(|(k, v)| (k.clone(), flatten_scval(v)))
            .collect(),
    )
}

/// Decode a topic entry into its plain string form.
///
/// Accepts, in order: base64 `ScVal` XDR, JSON
/// (`{"type":"symbol","value":"created"}` or the `ScVal` JSON form
/// `{"symbol":"created"}`), and finally the raw string itself.
fn decode_topic(raw: &str) -> String {
    if let Ok(Value::String(s)) = xdr::decode_base64(raw) {
        return s;
    }
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(inner) = v.get("value") {
            if let Some(s) = inner.as_str() {
                return s.to_string();
            }
            if let Some(n) = inner.as_u64() {
                return n.to_string();
            }
        }
        if let Value::String(s) = flatten_scval(&v) {
            return s;
        }
    }
    raw.to_string()
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
