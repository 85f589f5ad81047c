//! Conversion of base64 `ScVal` XDR into the plain JSON the decoder reads.
//!
//! Soroban RPC returns every topic and the event value as a base64-encoded
//! `ScVal`. Maps become JSON objects keyed by their symbol/string keys,
//! integers become decimal strings (values are up to 128 bits wide), and
//! addresses become strkeys.

use serde_json::{Map, Value};
use stellar_xdr::curr::{Int128Parts, Limits, ReadXdr, ScVal, UInt128Parts};

use crate::errors::Result;

/// Decode a base64 `ScVal` and flatten it into plain JSON.
pub fn decode_base64(encoded: &str) -> Result<Value> {
    let val = ScVal::from_xdr_base64(encoded.trim(), Limits::none())?;
    Ok(to_json(&val))
}

/// Flatten a decoded `ScVal` into plain JSON.
pub fn to_json(val: &ScVal) -> Value {
    match val {
        ScVal::Bool(b) => Value::Bool(*b),
        ScVal::Void => Value::Null,
        ScVal::U32(v) => Value::String(v.to_string()),
        ScVal::I32(v) => Value::String(v.to_string()),
        ScVal::U64(v) => Value::String(v.to_string()),
        ScVal::I64(v) => Value::String(v.to_string()),
        ScVal::Timepoint(t) => Value::String(t.0.to_string()),
        ScVal::Duration(d) => Value::String(d.0.to_string()),
        ScVal::U128(UInt128Parts { hi, lo }) => {
            Value::String(((u128::from(*hi) << 64) | u128::from(*lo)).to_string())
        }
        ScVal::I128(Int128Parts { hi, lo }) => {
            Value::String(((i128::from(*hi) << 64) | i128::from(*lo)).to_string())
        }
        ScVal::String(s) => Value::String(s.0.to_utf8_string_lossy()),
        ScVal::Symbol(s) => Value::String(s.0.to_utf8_string_lossy()),
        ScVal::Address(addr) => Value::String(addr.to_string()),
        ScVal::Vec(Some(items)) => Value::Array(items.0.iter().map(to_json).collect()),
        ScVal::Map(Some(entries)) => {
            let mut out = Map::new();
            for entry in entries.0.iter() {
                if let Value::String(key) = to_json(&entry.key) {
                    out.insert(key, to_json(&entry.val));
                }
            }
            Value::Object(out)
        }
        // Bytes, 256-bit integers and ledger-internal values never appear
        // in SosRS events.
        _ => Value::Null,
    }
}
