//! # SosRS Campaign Factory
//!
//! Deploys SosRS campaign contracts from an uploaded WASM hash and keeps an
//! index of them by sequential id.
//!
//! | Phase     | Entry Point(s)                                        |
//! |-----------|-------------------------------------------------------|
//! | Bootstrap | `__constructor`                                       |
//! | Creation  | [`FactoryContract::create_campaign`]                  |
//! | Admin     | [`FactoryContract::set_campaign_wasm_hash`]           |
//! | Queries   | `get_campaign`, `campaign_count`, `next_id`, …        |
//!
//! Ids start at 1, are assigned densely and are never reused. A campaign
//! whose constructor fails aborts the whole call, so the counter only moves
//! when a campaign actually exists.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, Address, BytesN, Env,
};

pub mod events;
mod storage;
mod types;

#[cfg(test)]
mod test_deploy;

pub use types::CampaignMetadata;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    Unauthorized = 1,
}

/// Result of a successful `create_campaign`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignRecord {
    pub id: u64,
    pub address: Address,
}

#[contract]
pub struct FactoryContract;

#[contractimpl]
impl FactoryContract {
    /// Store the administrator and the campaign WASM hash; the first
    /// campaign will receive id 1.
    pub fn __constructor(env: Env, admin: Address, campaign_wasm_hash: BytesN<32>) {
        storage::init_factory(&env, &admin, &campaign_wasm_hash);
    }

    /// Deploy a new campaign owned by `owner`.
    ///
    /// `owner` must authorise the call. The campaign constructor validates
    /// `goal` and `deadline`; its errors propagate and revert the creation.
    pub fn create_campaign(
        env: Env,
        owner: Address,
        token: Address,
        goal: i128,
        deadline: u64,
        metadata: CampaignMetadata,
    ) -> CampaignRecord {
        owner.require_auth();

        let id = storage::get_and_increment_campaign_id(&env);
        let wasm_hash = storage::get_campaign_wasm(&env);

        let address = env
            .deployer()
            .with_current_contract(campaign_salt(&env, id))
            .deploy_v2(wasm_hash, (id, owner.clone(), token, goal, deadline, metadata));

        storage::save_campaign(&env, id, &address);
        events::emit_campaign_created(&env, owner, id, address.clone());

        CampaignRecord { id, address }
    }

    /// Point future deployments at a new campaign WASM. Admin only.
    pub fn set_campaign_wasm_hash(
        env: Env,
        caller: Address,
        campaign_wasm_hash: BytesN<32>,
    ) -> Result<(), Error> {
        caller.require_auth();
        if caller != storage::get_admin(&env) {
            return Err(Error::Unauthorized);
        }
        storage::set_campaign_wasm(&env, &campaign_wasm_hash);
        Ok(())
    }

    /// Address of campaign `id`, if it exists.
    pub fn get_campaign(env: Env, id: u64) -> Option<Address> {
        storage::load_campaign(&env, id)
    }

    /// Number of campaigns created so far.
    pub fn campaign_count(env: Env) -> u64 {
        storage::peek_next_id(&env) - storage::FIRST_CAMPAIGN_ID
    }

    pub fn next_id(env: Env) -> u64 {
        storage::peek_next_id(&env)
    }

    pub fn campaign_wasm_hash(env: Env) -> BytesN<32> {
        storage::get_campaign_wasm(&env)
    }

    pub fn admin(env: Env) -> Address {
        storage::get_admin(&env)
    }
}

/// Deployment salt for campaign `id`: the id big-endian in the last 8 bytes.
fn campaign_salt(env: &Env, id: u64) -> BytesN<32> {
    let mut salt = [0u8; 32];
    salt[24..].copy_from_slice(&id.to_be_bytes());
    BytesN::from_array(env, &salt)
}
