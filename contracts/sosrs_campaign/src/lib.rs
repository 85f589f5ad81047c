//! # SosRS Campaign Contract
//!
//! A single-owner fundraising campaign. Each instance is deployed by the
//! SosRS factory with a sequential id and is bound to one token contract
//! (usually the native XLM Stellar Asset Contract).
//!
//! | Phase       | Entry Point(s)                                   |
//! |-------------|--------------------------------------------------|
//! | Creation    | `__constructor`                                  |
//! | Funding     | [`CampaignContract::donate`]                     |
//! | Closure     | [`CampaignContract::force_campaign_closure`]     |
//! | Payout      | [`CampaignContract::withdraw`]                   |
//! | Ownership   | [`CampaignContract::transfer_ownership`]         |
//! | Queries     | `get_campaign`, `total_balance`, `deposit_of`, … |
//!
//! Donations are only accepted while the campaign is open; withdrawals are
//! only allowed once the owner has closed it. Storage access is delegated to
//! [`storage`], event emission to [`events`].

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, token, Address, Env, String,
};

pub mod events;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use types::{Campaign, CampaignMetadata};
use types::CampaignConfig;

/// Strkey of the Stellar account whose ed25519 key is all zeroes. It has no
/// private key, so ownership handed to it could never be exercised.
pub const NULL_ACCOUNT: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    InvalidAmount = 1,
    CampaignClosed = 2,
    Unauthorized = 3,
    CampaignOpen = 4,
    NoBalance = 5,
    InsufficientBalance = 6,
    InvalidAddress = 7,
    InvalidGoal = 8,
    InvalidDeadline = 9,
}

#[contract]
pub struct CampaignContract;

#[contractimpl]
impl CampaignContract {
    // ─────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────

    /// Create the campaign in the Open state with a zero balance.
    ///
    /// Panics with `InvalidGoal` for a non-positive goal and with
    /// `InvalidDeadline` when the deadline is not in the future; either
    /// aborts the deployment.
    pub fn __constructor(
        env: Env,
        id: u64,
        owner: Address,
        token: Address,
        donation_goal: i128,
        deadline: u64,
        metadata: CampaignMetadata,
    ) {
        if donation_goal <= 0 {
            panic_with_error!(&env, Error::InvalidGoal);
        }
        if deadline <= env.ledger().timestamp() {
            panic_with_error!(&env, Error::InvalidDeadline);
        }

        let config = CampaignConfig {
            id,
            token,
            donation_goal,
            deadline,
            metadata,
        };
        storage::init_campaign(&env, &config, &owner);
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Donate `amount` of the campaign token.
    ///
    /// `donor` must authorise the call; the tokens are pulled from the donor
    /// into this contract and credited to the donor's cumulative deposit.
    pub fn donate(env: Env, donor: Address, amount: i128) -> Result<(), Error> {
        donor.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let mut state = storage::load_state(&env);
        if state.is_closed {
            return Err(Error::CampaignClosed);
        }

        let config = storage::load_config(&env);
        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&donor, &env.current_contract_address(), &amount);

        state.total_balance += amount;
        storage::save_state(&env, &state);
        storage::add_to_deposit(&env, &donor, amount);

        events::emit_donation_received(&env, config.id, donor, amount);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Owner operations
    // ─────────────────────────────────────────────────────────

    /// Close the campaign. Idempotent; only the first call emits `closed`.
    pub fn force_campaign_closure(env: Env, caller: Address) -> Result<(), Error> {
        let owner = Self::require_owner(&env, &caller)?;

        let mut state = storage::load_state(&env);
        if state.is_closed {
            return Ok(());
        }

        state.is_closed = true;
        storage::save_state(&env, &state);

        let config = storage::load_config(&env);
        events::emit_campaign_closed(&env, config.id, owner);
        Ok(())
    }

    /// Withdraw `amount` of the collected funds to the owner.
    ///
    /// Only allowed once the campaign is closed. The balance is decremented
    /// and persisted before the token transfer is made.
    pub fn withdraw(env: Env, caller: Address, amount: i128) -> Result<(), Error> {
        let owner = Self::require_owner(&env, &caller)?;

        let mut state = storage::load_state(&env);
        if !state.is_closed {
            return Err(Error::CampaignOpen);
        }
        if state.total_balance == 0 {
            return Err(Error::NoBalance);
        }
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if amount > state.total_balance {
            return Err(Error::InsufficientBalance);
        }

        state.total_balance -= amount;
        storage::save_state(&env, &state);

        let config = storage::load_config(&env);
        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&env.current_contract_address(), &owner, &amount);

        events::emit_withdraw_executed(&env, config.id, owner, amount);
        Ok(())
    }

    /// Hand the campaign over to `new_owner`.
    ///
    /// Rejects the null account and the campaign contract itself.
    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        let previous_owner = Self::require_owner(&env, &caller)?;

        let null_account = Address::from_string(&String::from_str(&env, NULL_ACCOUNT));
        if new_owner == null_account || new_owner == env.current_contract_address() {
            return Err(Error::InvalidAddress);
        }

        storage::save_owner(&env, &new_owner);

        let config = storage::load_config(&env);
        events::emit_ownership_transferred(&env, config.id, previous_owner, new_owner);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_campaign(env: Env) -> Campaign {
        storage::load_campaign(&env)
    }

    pub fn id(env: Env) -> u64 {
        storage::load_config(&env).id
    }

    pub fn owner(env: Env) -> Address {
        storage::load_owner(&env)
    }

    pub fn token(env: Env) -> Address {
        storage::load_config(&env).token
    }

    pub fn donation_goal(env: Env) -> i128 {
        storage::load_config(&env).donation_goal
    }

    pub fn deadline(env: Env) -> u64 {
        storage::load_config(&env).deadline
    }

    pub fn metadata(env: Env) -> CampaignMetadata {
        storage::load_config(&env).metadata
    }

    pub fn is_closed(env: Env) -> bool {
        storage::load_state(&env).is_closed
    }

    /// Funds currently held, i.e. donations minus withdrawals.
    pub fn total_balance(env: Env) -> i128 {
        storage::load_state(&env).total_balance
    }

    /// Cumulative amount donated by `donor`.
    pub fn deposit_of(env: Env, donor: Address) -> i128 {
        storage::get_deposit(&env, &donor)
    }

    /// `true` once the held balance meets the donation goal.
    pub fn goal_reached(env: Env) -> bool {
        let config = storage::load_config(&env);
        storage::load_state(&env).total_balance >= config.donation_goal
    }

    // ─────────────────────────────────────────────────────────
    // Internal Helpers
    // ─────────────────────────────────────────────────────────

    fn require_owner(env: &Env, caller: &Address) -> Result<Address, Error> {
        caller.require_auth();
        let owner = storage::load_owner(env);
        if *caller != owner {
            return Err(Error::Unauthorized);
        }
        Ok(owner)
    }
}
