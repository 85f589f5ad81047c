extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    token, vec, Address, Env, IntoVal, String, Symbol, TryFromVal, TryIntoVal,
};

use crate::events::{CampaignClosed, DonationReceived, OwnershipTransferred, WithdrawExecuted};
use crate::{CampaignContract, CampaignContractClient, CampaignMetadata};

const CAMPAIGN_ID: u64 = 7;

fn setup() -> (
    Env,
    CampaignContractClient<'static>,
    Address,
    token::StellarAssetClient<'static>,
) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = 1_716_000_000);

    let owner = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let asset = env.register_stellar_asset_contract_v2(token_admin);
    let sac = token::StellarAssetClient::new(&env, &asset.address());

    let metadata = CampaignMetadata {
        name: String::from_str(&env, "Abrigo Canoas"),
        objectives_hash: String::from_str(&env, "bafyobj"),
        description_hash: String::from_str(&env, "bafydesc"),
        contact: String::from_str(&env, "+55 51 0000-0000"),
        city: String::from_str(&env, "Canoas"),
        country: String::from_str(&env, "Brazil"),
        image_hash: String::from_str(&env, "bafyimg"),
    };
    let deadline = env.ledger().timestamp() + 86_400;
    let contract_id = env.register(
        CampaignContract,
        (
            CAMPAIGN_ID,
            owner.clone(),
            asset.address(),
            1_000i128,
            deadline,
            metadata,
        ),
    );
    let client = CampaignContractClient::new(&env, &contract_id);
    (env, client, owner, sac)
}

/// Number of retained events published by the campaign under `topic`.
fn count_events(env: &Env, client: &CampaignContractClient, topic: &str) -> usize {
    let expected = Symbol::new(env, topic);
    env.events()
        .all()
        .iter()
        .filter(|(contract, topics, _)| {
            *contract == client.address
                && topics
                    .get(0)
                    .and_then(|t| Symbol::try_from_val(env, &t).ok())
                    .is_some_and(|s| s == expected)
        })
        .count()
}

fn advance(env: &Env, seconds: u64) {
    env.ledger().with_mut(|li| li.timestamp += seconds);
}

#[test]
fn test_donation_received_event() {
    let (env, client, _owner, sac) = setup();
    let donor = Address::generate(&env);
    sac.mint(&donor, &500);

    for amount in [300i128, 50, 150] {
        advance(&env, 5);
        client.donate(&donor, &amount);

        let all_events = env.events().all();
        let last_event = all_events.last().expect("No events found");

        // Topic: (symbol_short!("donated"), campaign_id)
        assert_eq!(last_event.0, client.address);
        let expected_topics = vec![
            &env,
            symbol_short!("donated").into_val(&env),
            CAMPAIGN_ID.into_val(&env),
        ];
        assert_eq!(last_event.1, expected_topics);

        let event_data: DonationReceived = last_event.2.try_into_val(&env).unwrap();
        assert_eq!(
            event_data,
            DonationReceived {
                donor: donor.clone(),
                amount,
                timestamp: env.ledger().timestamp(),
            }
        );
    }
}

#[test]
fn test_withdraw_executed_events_match_amounts() {
    let (env, client, owner, sac) = setup();
    let donor = Address::generate(&env);
    sac.mint(&donor, &1_700);
    client.donate(&donor, &1_700);
    client.force_campaign_closure(&owner);

    for amount in [1_200i128, 200, 300] {
        advance(&env, 60);
        client.withdraw(&owner, &amount);

        let all_events = env.events().all();
        let last_event = all_events.last().expect("No events found");

        assert_eq!(last_event.0, client.address);
        let expected_topics = vec![
            &env,
            symbol_short!("withdrawn").into_val(&env),
            CAMPAIGN_ID.into_val(&env),
        ];
        assert_eq!(last_event.1, expected_topics);

        let event_data: WithdrawExecuted = last_event.2.try_into_val(&env).unwrap();
        assert_eq!(
            event_data,
            WithdrawExecuted {
                owner: owner.clone(),
                amount,
                timestamp: env.ledger().timestamp(),
            }
        );
    }
    assert_eq!(client.total_balance(), 0);
}

#[test]
fn test_campaign_closed_event_only_on_transition() {
    let (env, client, owner, _sac) = setup();

    client.force_campaign_closure(&owner);
    assert_eq!(count_events(&env, &client, "closed"), 1);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("closed").into_val(&env),
        CAMPAIGN_ID.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let event_data: CampaignClosed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CampaignClosed {
            owner: owner.clone(),
            timestamp: env.ledger().timestamp(),
        }
    );

    // A second closure changes nothing and publishes no further `closed` event.
    client.force_campaign_closure(&owner);
    assert!(client.is_closed());
    assert!(count_events(&env, &client, "closed") <= 1);
}

#[test]
fn test_ownership_transferred_event() {
    let (env, client, owner, _sac) = setup();
    let new_owner = Address::generate(&env);

    client.transfer_ownership(&owner, &new_owner);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("ownership").into_val(&env),
        CAMPAIGN_ID.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: OwnershipTransferred = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        OwnershipTransferred {
            previous_owner: owner,
            new_owner,
            timestamp: env.ledger().timestamp(),
        }
    );
}

#[test]
fn test_failed_donation_publishes_nothing() {
    let (env, client, _owner, _sac) = setup();
    let donor = Address::generate(&env);

    assert!(client.try_donate(&donor, &0).is_err());
    assert_eq!(count_events(&env, &client, "donated"), 0);
}
