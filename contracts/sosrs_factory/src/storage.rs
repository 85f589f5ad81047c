//! # Storage
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type          | Description                          |
//! |----------------|---------------|--------------------------------------|
//! | `Admin`        | `Address`     | May replace the campaign WASM hash   |
//! | `CampaignWasm` | `BytesN<32>`  | Hash of the campaign code to deploy  |
//! | `NextId`       | `u64`         | Id for the next campaign, from 1     |
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key            | Type      | Description                       |
//! |----------------|-----------|-----------------------------------|
//! | `Campaign(id)` | `Address` | Deployed campaign contract for id |

use soroban_sdk::{contracttype, Address, BytesN, Env};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

/// First id handed out by a fresh factory.
pub const FIRST_CAMPAIGN_ID: u64 = 1;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Factory administrator (Instance).
    Admin,
    /// Campaign WASM hash (Instance).
    CampaignWasm,
    /// Next campaign id (Instance).
    NextId,
    /// Campaign address keyed by id (Persistent).
    Campaign(u64),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn init_factory(env: &Env, admin: &Address, wasm_hash: &BytesN<32>) {
    let instance = env.storage().instance();
    instance.set(&DataKey::Admin, admin);
    instance.set(&DataKey::CampaignWasm, wasm_hash);
    instance.set(&DataKey::NextId, &FIRST_CAMPAIGN_ID);
    bump_instance(env);
}

pub fn get_admin(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .expect("factory not initialised")
}

pub fn get_campaign_wasm(env: &Env) -> BytesN<32> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::CampaignWasm)
        .expect("factory not initialised")
}

pub fn set_campaign_wasm(env: &Env, wasm_hash: &BytesN<32>) {
    env.storage().instance().set(&DataKey::CampaignWasm, wasm_hash);
    bump_instance(env);
}

/// Id the next campaign will receive.
pub fn peek_next_id(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::NextId)
        .unwrap_or(FIRST_CAMPAIGN_ID)
}

/// Reads, increments, and stores the campaign counter.
/// Returns the id to use for the *current* campaign (pre-increment value).
pub fn get_and_increment_campaign_id(env: &Env) -> u64 {
    let current = peek_next_id(env);
    env.storage()
        .instance()
        .set(&DataKey::NextId, &(current + 1));
    current
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn save_campaign(env: &Env, id: u64, address: &Address) {
    let key = DataKey::Campaign(id);
    env.storage().persistent().set(&key, address);
    bump_persistent(env, &key);
}

pub fn load_campaign(env: &Env, id: u64) -> Option<Address> {
    let key = DataKey::Campaign(id);
    let address = env.storage().persistent().get(&key);
    if address.is_some() {
        bump_persistent(env, &key);
    }
    address
}
