//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by a campaign.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key      | Type             | Description                         |
//! |----------|------------------|-------------------------------------|
//! | `Config` | `CampaignConfig` | Immutable identity and parameters   |
//! | `Owner`  | `Address`        | Current owner                       |
//! | `State`  | `CampaignState`  | Closure flag and total balance      |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key              | Type   | Description                          |
//! |------------------|--------|--------------------------------------|
//! | `Deposit(donor)` | `i128` | Cumulative amount donated by `donor` |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Campaign, CampaignConfig, CampaignState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Immutable campaign configuration (Instance).
    Config,
    /// Current owner (Instance).
    Owner,
    /// Closure flag and balance (Instance).
    State,
    /// Cumulative deposit per donor (Persistent).
    Deposit(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Write the initial entries of a freshly constructed campaign.
pub fn init_campaign(env: &Env, config: &CampaignConfig, owner: &Address) {
    let state = CampaignState {
        is_closed: false,
        total_balance: 0,
    };
    let instance = env.storage().instance();
    instance.set(&DataKey::Config, config);
    instance.set(&DataKey::Owner, owner);
    instance.set(&DataKey::State, &state);
    bump_instance(env);
}

/// Load the immutable configuration.
/// Panics if the constructor never ran, which the host rules out.
pub fn load_config(env: &Env) -> CampaignConfig {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("campaign not initialised")
}

pub fn load_owner(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .expect("campaign not initialised")
}

pub fn save_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
    bump_instance(env);
}

pub fn load_state(env: &Env) -> CampaignState {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .expect("campaign not initialised")
}

pub fn save_state(env: &Env, state: &CampaignState) {
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

/// Reconstruct the full [`Campaign`] view from its separate entries.
pub fn load_campaign(env: &Env) -> Campaign {
    let config = load_config(env);
    let owner = load_owner(env);
    let state = load_state(env);
    Campaign {
        id: config.id,
        owner,
        token: config.token,
        donation_goal: config.donation_goal,
        deadline: config.deadline,
        metadata: config.metadata,
        is_closed: state.is_closed,
        total_balance: state.total_balance,
    }
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Cumulative amount donated by `donor`; zero when they never donated.
pub fn get_deposit(env: &Env, donor: &Address) -> i128 {
    let key = DataKey::Deposit(donor.clone());
    match env.storage().persistent().get::<DataKey, i128>(&key) {
        Some(amount) => {
            bump_persistent(env, &key);
            amount
        }
        None => 0,
    }
}

/// Add `amount` to the donor's cumulative deposit and return the new total.
pub fn add_to_deposit(env: &Env, donor: &Address, amount: i128) -> i128 {
    let key = DataKey::Deposit(donor.clone());
    let current: i128 = env.storage().persistent().get(&key).unwrap_or(0);
    let updated = current + amount;
    env.storage().persistent().set(&key, &updated);
    bump_persistent(env, &key);
    updated
}
