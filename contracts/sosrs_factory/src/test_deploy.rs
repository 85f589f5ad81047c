//! End-to-end deployment tests against the compiled campaign WASM.
//!
//! The WASM must exist before this crate's tests compile; `make test` builds
//! it first (`cargo build -p sosrs_campaign --target wasm32-unknown-unknown --release`).

extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    token, vec, Address, Env, IntoVal, String, TryIntoVal,
};

use crate::events::CampaignCreated;
use crate::{CampaignMetadata, FactoryContract, FactoryContractClient};

mod campaign {
    soroban_sdk::contractimport!(
        file = "../../target/wasm32-unknown-unknown/release/sosrs_campaign.wasm"
    );
}

const GOAL: i128 = 50_000_000;

fn setup() -> (Env, FactoryContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let wasm_hash = env.deployer().upload_contract_wasm(campaign::WASM);
    let contract_id = env.register(FactoryContract, (admin, wasm_hash));
    let client = FactoryContractClient::new(&env, &contract_id);
    let token_admin = Address::generate(&env);
    let token = env.register_stellar_asset_contract_v2(token_admin).address();
    (env, client, token)
}

fn metadata(env: &Env, name: &str) -> CampaignMetadata {
    CampaignMetadata {
        name: String::from_str(env, name),
        objectives_hash: String::from_str(env, "bafyobj"),
        description_hash: String::from_str(env, "bafydesc"),
        contact: String::from_str(env, "contato@sosrs.org"),
        city: String::from_str(env, "Porto Alegre"),
        country: String::from_str(env, "Brazil"),
        image_hash: String::from_str(env, "bafyimg"),
    }
}

#[test]
fn test_created_campaigns_get_sequential_ids() {
    let (env, client, token) = setup();
    let deadline = env.ledger().timestamp() + 86_400;

    for expected_id in 1..=3u64 {
        let owner = Address::generate(&env);
        let record = client.create_campaign(&owner, &token, &GOAL, &deadline, &metadata(&env, "x"));

        assert_eq!(record.id, expected_id);
        assert_eq!(client.get_campaign(&expected_id), Some(record.address.clone()));

        let deployed = campaign::Client::new(&env, &record.address);
        assert_eq!(deployed.id(), expected_id);
        assert_eq!(deployed.owner(), owner);
        assert_eq!(deployed.donation_goal(), GOAL);
        assert!(!deployed.is_closed());
    }
    assert_eq!(client.campaign_count(), 3);
}

#[test]
fn test_campaign_created_event() {
    let (env, client, token) = setup();
    let owner = Address::generate(&env);
    let deadline = env.ledger().timestamp() + 86_400;

    let record = client.create_campaign(&owner, &token, &GOAL, &deadline, &metadata(&env, "x"));

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        record.id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: CampaignCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CampaignCreated {
            owner,
            campaign_id: record.id,
            contract_address: record.address,
            timestamp: env.ledger().timestamp(),
        }
    );
}

#[test]
fn test_invalid_goal_propagates_and_keeps_counter() {
    let (env, client, token) = setup();
    let owner = Address::generate(&env);
    let deadline = env.ledger().timestamp() + 86_400;

    let result = client.try_create_campaign(&owner, &token, &0, &deadline, &metadata(&env, "x"));

    assert!(result.is_err());
    assert_eq!(client.next_id(), 1);
    assert_eq!(client.get_campaign(&1), None);
}

#[test]
fn test_deployed_campaign_accepts_donations() {
    let (env, client, token) = setup();
    let owner = Address::generate(&env);
    let donor = Address::generate(&env);
    let deadline = env.ledger().timestamp() + 86_400;
    token::StellarAssetClient::new(&env, &token).mint(&donor, &GOAL);

    let record = client.create_campaign(&owner, &token, &GOAL, &deadline, &metadata(&env, "x"));
    let deployed = campaign::Client::new(&env, &record.address);

    deployed.donate(&donor, &GOAL);
    deployed.force_campaign_closure(&owner);
    deployed.withdraw(&owner, &GOAL);

    assert_eq!(deployed.total_balance(), 0);
    assert_eq!(token::Client::new(&env, &token).balance(&owner), GOAL);
}
